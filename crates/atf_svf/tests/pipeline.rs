//! End-to-end conversion through SVF text for every supported device.

use atf_common::Bits;
use atf_device::{DeviceKind, DeviceLayout};
use atf_fuses::{to_fuse_vector, to_word_map, WordMap};
use atf_svf::{extract, read_svf, write_svf, Event, VectorEmitter};

/// An irregular fuse image with every reserved fuse cleared, so it survives
/// a round trip through row words unchanged.
fn image(layout: &dyn DeviceLayout) -> Bits {
    (0..layout.fuse_count())
        .map(|i| {
            let mapped = layout.fuse_to_coord(i).unwrap().is_some();
            mapped && (i * 31 + i / 7) % 5 < 2
        })
        .collect()
}

#[test]
fn fuses_survive_svf_text() {
    for kind in DeviceKind::ALL {
        let layout = kind.layout();
        let fuses = image(layout);
        let words = to_word_map(&fuses, layout).unwrap();

        let events = VectorEmitter::new(layout.idcode()).emit(&words, "pipeline test");
        let text = write_svf(&events);
        let parsed = read_svf(&text).unwrap();
        let recovered = extract(&parsed);

        assert_eq!(recovered, words, "{kind}");
        assert_eq!(to_fuse_vector(&recovered, layout).unwrap(), fuses, "{kind}");
    }
}

#[test]
fn idcode_check_carries_device_idcode() {
    for kind in DeviceKind::ALL {
        let layout = kind.layout();
        let text = write_svf(&VectorEmitter::new(layout.idcode()).emit(&WordMap::new(), ""));
        let expected = format!(
            "SDR 32 TDI (fffeefff)\n\tTDO ({:08x})\n\tMASK (fffeefff);\n",
            layout.idcode()
        );
        assert!(text.contains(&expected), "{kind}");
    }
}

#[test]
fn parsed_stream_has_one_event_per_statement() {
    let mut words = WordMap::new();
    words.insert(0, Bits::ones(86));
    let events = VectorEmitter::new(0x0150_203f).emit(&words, "note");
    let parsed = read_svf(&write_svf(&events)).unwrap();
    let statements = events
        .iter()
        .filter(|e| !matches!(e, Event::Comment(_)))
        .count();
    assert_eq!(parsed.len(), statements);
}

#[test]
fn vendor_style_stream() {
    // Hand-written in the style of a third-party programmer: extra
    // FREQUENCY and cycle-count waits, uppercase hex, and patterns that rely
    // on sticky TDI.
    let text = "\
! vendor programmer output
FREQUENCY 1E6 HZ;
TRST ABSENT;
ENDIR IDLE;
ENDDR IDLE;
STATE RESET;
SIR 10 TDI (059);
SDR 32 TDI (FFFFFFFF) TDO (0150203F) MASK (0FFFFFFF);
SIR 10 TDI (280);
SDR 10 TDI (1B9);
RUNTEST 100 TCK;
SIR 10 TDI (2B3);
SIR 10 TDI (29E);
RUNTEST IDLE 210E-3 SEC;
SIR 10 TDI (2A1);
SDR 11 TDI (000);
SIR 10 TDI (290);
SDR 86 TDI (3FFFFFFFFFFFFFFFFFFFFE);
SIR 10 TDI (29E);
RUNTEST IDLE 30E-3 SEC;
SIR 10 TDI (2A1);
SDR 11 TDI (100);
SIR 10 TDI (291);
SDR 32 TDI (CAFEF00D);
SIR 10 TDI (29E);
RUNTEST 30000 TCK;
SIR 10 TDI (2A1);
SDR 11 TDI (101);
SIR 10 TDI (291);
SDR 32;
SIR 10 TDI (2A1);
SDR 11 TDI (000);
SIR 10 TDI (28C);
RUNTEST IDLE 20E-3 SEC;
SIR 10 TDI (290);
SDR 86 TDI (000000000000000000000) TDO (3FFFFFFFFFFFFFFFFFFFFE);
SIR 10 TDI (280);
SDR 10 TDI (000);
";
    let words = extract(&read_svf(text).unwrap());
    assert_eq!(words.keys().copied().collect::<Vec<_>>(), vec![0, 256]);
    let row0 = &words[&0];
    assert_eq!(row0.len(), 86);
    assert!(!row0.get(0));
    assert_eq!(row0.count_ones(), 85);
    assert_eq!(words[&256].to_u64(), Some(0xcafe_f00d));
}
