//! SVF text rendering.

use crate::event::{Event, RunTest, Scan};
use std::time::Duration;

/// Widest pattern always written at `ceil(length / 4)` digits.
const FULL_WIDTH_LIMIT: usize = 32;

/// Renders events as SVF text, one statement per line.
///
/// Scan patterns are lowercase hex. Patterns up to 32 bits are written
/// `ceil(length / 4)` digits wide. Wider patterns, the row words, take
/// `length / 4` digits unless a set bit needs the extra one. TDO, MASK, and
/// SMASK continue on tab-indented lines.
pub fn write_svf(events: &[Event]) -> String {
    let mut out = String::new();
    for event in events {
        write_event(&mut out, event);
    }
    out
}

fn write_event(out: &mut String, event: &Event) {
    match event {
        Event::Comment(text) => {
            if text.is_empty() {
                out.push_str("//\n");
            }
            for line in text.lines() {
                out.push_str(&format!("// {line}\n"));
            }
        }
        Event::Frequency(None) => out.push_str("FREQUENCY;\n"),
        Event::Frequency(Some(hz)) => out.push_str(&format!("FREQUENCY {hz:E} HZ;\n")),
        Event::Trst(mode) => out.push_str(&format!("TRST {};\n", mode.name())),
        Event::EndIr(state) => out.push_str(&format!("ENDIR {state};\n")),
        Event::EndDr(state) => out.push_str(&format!("ENDDR {state};\n")),
        Event::Hir(scan) => write_scan(out, "HIR", scan),
        Event::Hdr(scan) => write_scan(out, "HDR", scan),
        Event::Tir(scan) => write_scan(out, "TIR", scan),
        Event::Tdr(scan) => write_scan(out, "TDR", scan),
        Event::Sir(scan) => write_scan(out, "SIR", scan),
        Event::Sdr(scan) => write_scan(out, "SDR", scan),
        Event::RunTest(run) => write_runtest(out, run),
        Event::State { path, end } => {
            out.push_str("STATE");
            for state in path {
                out.push_str(&format!(" {state}"));
            }
            out.push_str(&format!(" {end};\n"));
        }
        Event::PioMap(pins) => {
            let pins: Vec<String> = pins
                .iter()
                .map(|(direction, name)| format!("{} {name}", direction.name()))
                .collect();
            out.push_str(&format!("PIOMAP ({});\n", pins.join(" ")));
        }
        Event::Pio(vector) => out.push_str(&format!("PIO ({vector});\n")),
    }
}

fn write_scan(out: &mut String, keyword: &str, scan: &Scan) {
    let length = scan.length();
    out.push_str(&format!("{keyword} {length}"));
    if length > 0 {
        let digits = if length <= FULL_WIDTH_LIMIT {
            length.div_ceil(4)
        } else {
            length / 4
        };
        out.push_str(&format!(" TDI ({})", scan.tdi.to_hex_string_min(digits)));
        for (name, pattern) in [("TDO", &scan.tdo), ("MASK", &scan.mask), ("SMASK", &scan.smask)] {
            if let Some(bits) = pattern {
                out.push_str(&format!("\n\t{name} ({})", bits.to_hex_string_min(digits)));
            }
        }
    }
    out.push_str(";\n");
}

fn write_runtest(out: &mut String, run: &RunTest) {
    out.push_str("RUNTEST");
    if let Some(state) = run.run_state {
        out.push_str(&format!(" {state}"));
    }
    if let Some(count) = run.run_count {
        let clock = run.run_clock.map_or("TCK", |c| c.name());
        out.push_str(&format!(" {count} {clock}"));
    }
    if let Some(time) = run.min_time {
        out.push_str(&format!(" {} SEC", seconds(time)));
    }
    if let Some(time) = run.max_time {
        out.push_str(&format!(" MAXIMUM {} SEC", seconds(time)));
    }
    if let Some(state) = run.end_state {
        out.push_str(&format!(" ENDSTATE {state}"));
    }
    out.push_str(";\n");
}

/// Formats a duration in SVF seconds, in milliseconds when exact.
fn seconds(time: Duration) -> String {
    let nanos = time.as_nanos();
    if nanos % 1_000_000 == 0 {
        format!("{}E-3", nanos / 1_000_000)
    } else {
        format!("{nanos}E-9")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::VectorEmitter;
    use crate::event::{PioDirection, RunClock, TapState, TrstMode};
    use atf_common::Bits;
    use atf_fuses::WordMap;

    #[test]
    fn header_statements() {
        let text = write_svf(&[
            Event::Trst(TrstMode::Absent),
            Event::EndIr(TapState::Idle),
            Event::Hdr(Scan::new(Bits::new(0))),
            Event::State {
                path: vec![],
                end: TapState::Reset,
            },
        ]);
        assert_eq!(text, "TRST ABSENT;\nENDIR IDLE;\nHDR 0;\nSTATE RESET;\n");
    }

    #[test]
    fn scan_with_expected_value() {
        let scan = Scan::value(0xfffe_efff, 32).with_expected(
            Bits::from_u64(0x0150_203f, 32),
            Bits::from_u64(0xfffe_efff, 32),
        );
        assert_eq!(
            write_svf(&[Event::Sdr(scan)]),
            "SDR 32 TDI (fffeefff)\n\tTDO (0150203f)\n\tMASK (fffeefff);\n"
        );
    }

    #[test]
    fn scan_pads_to_whole_digits() {
        assert_eq!(write_svf(&[Event::Sir(Scan::value(0x59, 10))]), "SIR 10 TDI (059);\n");
        assert_eq!(write_svf(&[Event::Sdr(Scan::value(0x7, 11))]), "SDR 11 TDI (007);\n");
        assert_eq!(
            write_svf(&[Event::Sdr(Scan::new(Bits::ones(6)))]),
            "SDR 6 TDI (3f);\n"
        );
    }

    #[test]
    fn row_words_drop_clear_top_digit() {
        let word = Bits::from_u64(0xabc, 86);
        let scan = Scan::new(word.clone()).with_expected(word, Bits::ones(86));
        assert_eq!(
            write_svf(&[Event::Sdr(scan)]),
            format!(
                "SDR 86 TDI ({0}abc)\n\tTDO ({0}abc)\n\tMASK (3{1});\n",
                "0".repeat(18),
                "f".repeat(21)
            )
        );

        let mut top = Bits::new(166);
        top.set(165, true);
        assert_eq!(
            write_svf(&[Event::Sdr(Scan::new(top))]),
            format!("SDR 166 TDI (2{});\n", "0".repeat(41))
        );
        assert_eq!(
            write_svf(&[Event::Sdr(Scan::new(Bits::new(326)))]),
            format!("SDR 326 TDI ({});\n", "0".repeat(81))
        );
    }

    #[test]
    fn runtest_forms() {
        assert_eq!(
            write_svf(&[Event::RunTest(RunTest::idle_for(Duration::from_millis(210)))]),
            "RUNTEST IDLE 210E-3 SEC;\n"
        );
        let run = RunTest {
            run_count: Some(1000),
            run_clock: Some(RunClock::Tck),
            min_time: Some(Duration::from_micros(1500)),
            max_time: Some(Duration::from_secs(1)),
            end_state: Some(TapState::DrPause),
            ..RunTest::default()
        };
        assert_eq!(
            write_svf(&[Event::RunTest(run)]),
            "RUNTEST 1000 TCK 1500000E-9 SEC MAXIMUM 1000E-3 SEC ENDSTATE DRPAUSE;\n"
        );
    }

    #[test]
    fn misc_statements() {
        let text = write_svf(&[
            Event::Frequency(None),
            Event::Frequency(Some(1e6)),
            Event::PioMap(vec![
                (PioDirection::In, "A".into()),
                (PioDirection::Out, "B".into()),
            ]),
            Event::Pio("HL".into()),
            Event::Comment(String::new()),
        ]);
        assert_eq!(
            text,
            "FREQUENCY;\nFREQUENCY 1E6 HZ;\nPIOMAP (IN A OUT B);\nPIO (HL);\n//\n"
        );
    }

    #[test]
    fn program_group_text() {
        let mut words = WordMap::new();
        words.insert(256, Bits::from_u64(0xdead_beef, 32));
        let text = write_svf(&VectorEmitter::new(0x0150_203f).emit(&words, "made by hand"));
        assert!(text.starts_with("// made by hand\nTRST ABSENT;\n"));
        assert!(text.contains(
            "// ISC program word\n\
             SIR 10 TDI (2a1);\n\
             SDR 11 TDI (100);\n\
             SIR 10 TDI (291);\n\
             SDR 32 TDI (deadbeef);\n\
             SIR 10 TDI (29e);\n\
             RUNTEST IDLE 30E-3 SEC;\n\
             // ISC unknown\n\
             SIR 10 TDI (2bf);\n"
        ));
        assert!(text.contains(
            "// ISC verify word\n\
             SIR 10 TDI (2a1);\n\
             SDR 11 TDI (100);\n\
             SIR 10 TDI (28c);\n\
             RUNTEST IDLE 20E-3 SEC;\n\
             SIR 10 TDI (291);\n\
             SDR 32 TDI (deadbeef)\n\tTDO (deadbeef)\n\tMASK (ffffffff);\n"
        ));
        assert!(text.ends_with("// ISC disable\nSIR 10 TDI (280);\nSDR 10 TDI (000);\nSTATE IDLE;\n"));
    }
}
