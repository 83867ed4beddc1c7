//! Generation of ISC programming vectors from row words.
//!
//! The emitted stream checks the IDCODE, enters ISC mode, bulk-erases the
//! array, programs every row, reads every row back against the programmed
//! word, and leaves ISC mode. Statement grouping and comments follow the
//! vendor programmer's output so streams can be compared line by line.

use crate::event::{Event, RunTest, Scan, TapState, TrstMode};
use atf_common::Bits;
use atf_device::{Instr, ADDRESS_LENGTH, IR_LENGTH};
use atf_fuses::WordMap;
use std::time::Duration;
use tracing::debug;

/// IDCODE bits compared during the identification check; the version and
/// part-variant bits are masked off.
const IDCODE_MASK: u64 = 0xfffe_efff;

/// Width of the `ISC_CONFIG` data register.
const CONFIG_LENGTH: usize = 10;

/// `ISC_CONFIG` value that enters ISC mode.
const CONFIG_ENABLE: u64 = 0x1b9;

/// `ISC_CONFIG` value that leaves ISC mode.
const CONFIG_DISABLE: u64 = 0x000;

const ERASE_TIME: Duration = Duration::from_millis(210);
const PROGRAM_TIME: Duration = Duration::from_millis(30);
const READ_TIME: Duration = Duration::from_millis(20);

/// Builds programming streams for one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorEmitter {
    idcode: u32,
    unknown_after_pulse: bool,
}

impl VectorEmitter {
    /// Creates an emitter that expects `idcode` from the target.
    pub fn new(idcode: u32) -> Self {
        Self {
            idcode,
            unknown_after_pulse: true,
        }
    }

    /// Controls whether an `ISC_UNKNOWN` instruction follows every pulse.
    ///
    /// The vendor programmer emits it; the device treats it as `BYPASS`.
    pub fn unknown_after_pulse(mut self, enabled: bool) -> Self {
        self.unknown_after_pulse = enabled;
        self
    }

    /// Emits the full programming stream for `words`.
    ///
    /// Each line of `comment` becomes a leading comment statement. Rows are
    /// programmed, then verified, in ascending row order.
    pub fn emit(&self, words: &WordMap, comment: &str) -> Vec<Event> {
        let mut events = Vec::new();
        emit_header(&mut events, comment);
        self.emit_check_idcode(&mut events);
        emit_config(&mut events, "ISC enable", CONFIG_ENABLE);
        self.emit_erase(&mut events);
        for (&row, word) in words {
            self.emit_program(&mut events, row, word);
        }
        for (&row, word) in words {
            emit_verify(&mut events, row, word);
        }
        emit_config(&mut events, "ISC disable", CONFIG_DISABLE);

        debug!(
            rows = words.len(),
            events = events.len(),
            "emitted programming vectors"
        );
        events
    }

    fn emit_check_idcode(&self, events: &mut Vec<Event>) {
        events.push(comment_line("Check IDCODE"));
        events.push(sir(Instr::Idcode.code()));
        events.push(Event::Sdr(Scan::value(IDCODE_MASK, 32).with_expected(
            Bits::from_u64(u64::from(self.idcode), 32),
            Bits::from_u64(IDCODE_MASK, 32),
        )));
    }

    fn emit_erase(&self, events: &mut Vec<Event>) {
        events.push(comment_line("ISC erase"));
        events.push(sir(Instr::IscLatchErase.code()));
        events.push(sir(Instr::IscProgramErase.code()));
        events.push(Event::RunTest(RunTest::idle_for(ERASE_TIME)));
        self.emit_unknown(events);
    }

    fn emit_program(&self, events: &mut Vec<Event>, row: u32, word: &Bits) {
        events.push(comment_line("ISC program word"));
        emit_address(events, row);
        events.push(sir(data_opcode(row)));
        events.push(Event::Sdr(Scan::new(word.clone())));
        events.push(sir(Instr::IscProgramErase.code()));
        events.push(Event::RunTest(RunTest::idle_for(PROGRAM_TIME)));
        self.emit_unknown(events);
    }

    fn emit_unknown(&self, events: &mut Vec<Event>) {
        if self.unknown_after_pulse {
            events.push(comment_line("ISC unknown"));
            events.push(sir(Instr::IscUnknown.code()));
        }
    }
}

fn emit_header(events: &mut Vec<Event>, comment: &str) {
    events.extend(comment.lines().map(comment_line));
    events.push(Event::Trst(TrstMode::Absent));
    events.push(Event::EndIr(TapState::Idle));
    events.push(Event::EndDr(TapState::Idle));
    events.push(Event::Hdr(Scan::new(Bits::new(0))));
    events.push(Event::Hir(Scan::new(Bits::new(0))));
    events.push(Event::Tdr(Scan::new(Bits::new(0))));
    events.push(Event::Tir(Scan::new(Bits::new(0))));
    events.push(goto(TapState::Reset));
}

fn emit_config(events: &mut Vec<Event>, label: &str, value: u64) {
    events.push(comment_line(label));
    events.push(sir(Instr::IscConfig.code()));
    events.push(Event::Sdr(Scan::value(value, CONFIG_LENGTH)));
    events.push(goto(TapState::Idle));
}

fn emit_verify(events: &mut Vec<Event>, row: u32, word: &Bits) {
    events.push(comment_line("ISC verify word"));
    emit_address(events, row);
    events.push(sir(Instr::IscRead.code()));
    events.push(Event::RunTest(RunTest::idle_for(READ_TIME)));
    events.push(sir(data_opcode(row)));
    events.push(Event::Sdr(
        Scan::new(word.clone()).with_expected(word.clone(), Bits::ones(word.len())),
    ));
}

fn emit_address(events: &mut Vec<Event>, row: u32) {
    events.push(sir(Instr::IscAddress.code()));
    events.push(Event::Sdr(Scan::value(u64::from(row), ADDRESS_LENGTH)));
}

/// `ISC_DATA` with row address bits 9..8 in its low bits.
fn data_opcode(row: u32) -> u16 {
    Instr::IscData.code() | ((row >> 8) & 0x3) as u16
}

fn sir(code: u16) -> Event {
    Event::Sir(Scan::value(u64::from(code), IR_LENGTH))
}

fn goto(end: TapState) -> Event {
    Event::State { path: Vec::new(), end }
}

fn comment_line(text: &str) -> Event {
    Event::Comment(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Renders each event as a short token: comments as `#text`, instruction
    /// shifts as their opcode, and everything else by kind.
    fn outline(events: &[Event]) -> Vec<String> {
        events
            .iter()
            .map(|event| match event {
                Event::Comment(text) => format!("#{text}"),
                Event::Sir(scan) => format!("SIR {:03x}", scan.tdi.to_u64().unwrap_or(u64::MAX)),
                Event::Sdr(scan) => format!("SDR {}", scan.length()),
                Event::RunTest(run) => format!("RUNTEST {:?}", run.min_time.unwrap_or_default()),
                Event::State { end, .. } => format!("STATE {end}"),
                Event::Trst(_) => "TRST".to_string(),
                Event::EndIr(_) => "ENDIR".to_string(),
                Event::EndDr(_) => "ENDDR".to_string(),
                Event::Hdr(_) | Event::Hir(_) | Event::Tdr(_) | Event::Tir(_) => {
                    "PAD".to_string()
                }
                other => format!("{other:?}"),
            })
            .collect()
    }

    #[test]
    fn single_row_stream_matches_catalogue() {
        let mut words = WordMap::new();
        words.insert(7, Bits::from_u64(0b1011, 86));
        let events = VectorEmitter::new(0x0150_203f).emit(&words, "");

        let expected = [
            "TRST", "ENDIR", "ENDDR", "PAD", "PAD", "PAD", "PAD", "STATE RESET",
            "#Check IDCODE", "SIR 059", "SDR 32",
            "#ISC enable", "SIR 280", "SDR 10", "STATE IDLE",
            "#ISC erase", "SIR 2b3", "SIR 29e", "RUNTEST 210ms",
            "#ISC unknown", "SIR 2bf",
            "#ISC program word", "SIR 2a1", "SDR 11", "SIR 290", "SDR 86", "SIR 29e",
            "RUNTEST 30ms",
            "#ISC unknown", "SIR 2bf",
            "#ISC verify word", "SIR 2a1", "SDR 11", "SIR 28c", "RUNTEST 20ms", "SIR 290",
            "SDR 86",
            "#ISC disable", "SIR 280", "SDR 10", "STATE IDLE",
        ];
        assert_eq!(outline(&events), expected);
    }

    #[test]
    fn payloads_carry_row_and_word() {
        let word = Bits::from_u64(0b1011, 86);
        let mut words = WordMap::new();
        words.insert(7, word.clone());
        let events = VectorEmitter::new(0x0150_203f).emit(&words, "");
        let sdrs: Vec<&Scan> = events
            .iter()
            .filter_map(|e| match e {
                Event::Sdr(scan) => Some(scan),
                _ => None,
            })
            .collect();

        assert_eq!(sdrs[0].tdi.to_u64(), Some(0xfffe_efff));
        assert_eq!(sdrs[0].tdo.as_ref().and_then(Bits::to_u64), Some(0x0150_203f));
        assert_eq!(sdrs[0].mask.as_ref().and_then(Bits::to_u64), Some(0xfffe_efff));
        assert_eq!(sdrs[1].tdi.to_u64(), Some(0x1b9));
        assert_eq!(sdrs[2].tdi.to_u64(), Some(7));
        assert_eq!(sdrs[3].tdi, word);
        assert_eq!(sdrs[3].tdo, None);
        assert_eq!(sdrs[4].tdi.to_u64(), Some(7));
        assert_eq!(sdrs[5].tdi, word);
        assert_eq!(sdrs[5].tdo.as_ref(), Some(&word));
        assert_eq!(sdrs[5].mask.as_ref(), Some(&Bits::ones(86)));
        assert_eq!(sdrs[6].tdi.to_u64(), Some(0));
    }

    #[test]
    fn high_rows_fold_address_into_data_opcode() {
        assert_eq!(data_opcode(0), 0x290);
        assert_eq!(data_opcode(255), 0x290);
        assert_eq!(data_opcode(256), 0x291);
        assert_eq!(data_opcode(512), 0x292);
        assert_eq!(data_opcode(768), 0x293);
    }

    #[test]
    fn comment_lines_lead_the_stream() {
        let events = VectorEmitter::new(0).emit(&WordMap::new(), "first\nsecond");
        assert_eq!(events[0], Event::Comment("first".into()));
        assert_eq!(events[1], Event::Comment("second".into()));
        assert_eq!(events[2], Event::Trst(TrstMode::Absent));
    }

    #[test]
    fn unknown_group_can_be_dropped() {
        let mut words = WordMap::new();
        words.insert(0, Bits::new(4));
        words.insert(1, Bits::new(4));
        let with = VectorEmitter::new(0).emit(&words, "");
        let without = VectorEmitter::new(0)
            .unknown_after_pulse(false)
            .emit(&words, "");
        let unknowns = |events: &[Event]| {
            events
                .iter()
                .filter(|e| **e == sir(Instr::IscUnknown.code()))
                .count()
        };
        assert_eq!(unknowns(&with), 3);
        assert_eq!(unknowns(&without), 0);
        assert_eq!(with.len() - without.len(), 6);
    }

    #[test]
    fn rows_are_programmed_then_verified_in_order() {
        let mut words = WordMap::new();
        for row in [768u32, 3, 256] {
            words.insert(row, Bits::new(4));
        }
        let events = VectorEmitter::new(0).emit(&words, "");
        let addresses: Vec<u64> = events
            .windows(2)
            .filter_map(|pair| match pair {
                [first, Event::Sdr(scan)] if *first == sir(Instr::IscAddress.code()) => {
                    scan.tdi.to_u64()
                }
                _ => None,
            })
            .collect();
        assert_eq!(addresses, vec![3, 256, 768, 3, 256, 768]);
    }
}
