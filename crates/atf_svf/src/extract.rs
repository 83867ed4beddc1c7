//! Recovery of programmed row words from an SVF event stream.
//!
//! The extractor models just enough of the ISC state machine to see which
//! rows a programming stream writes. It never checks that the stream is
//! well-formed; events it does not understand are skipped.

use crate::event::Event;
use atf_common::Bits;
use atf_device::Instr;
use atf_fuses::WordMap;
use tracing::{debug, trace, warn};

/// Low opcode bits that `ISC_DATA` borrows for row address bits 9..8.
const DATA_ADDRESS_BITS: u64 = 0x3;

/// ISC state folded over an event stream.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    opcode: Option<u64>,
    erase_latched: bool,
    address: u32,
    data: Bits,
    words: WordMap,
}

impl Extractor {
    /// Creates an extractor with no instruction loaded and no rows written.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one event.
    pub fn step(mut self, event: &Event) -> Self {
        match event {
            Event::Sir(scan) => self.load_instruction(&scan.tdi),
            Event::Sdr(scan) => self.shift_data(&scan.tdi),
            Event::RunTest(_) => self.pulse(),
            _ => {}
        }
        self
    }

    /// Returns the rows written so far.
    pub fn words(&self) -> &WordMap {
        &self.words
    }

    /// Consumes the extractor, returning the rows written.
    pub fn finish(self) -> WordMap {
        self.words
    }

    fn load_instruction(&mut self, tdi: &Bits) {
        let opcode = tdi.to_u64();
        if opcode == Some(code(Instr::IscLatchErase)) {
            self.erase_latched = true;
        } else if opcode == Some(code(Instr::IscData)) {
            self.erase_latched = false;
        }
        self.opcode = opcode;
    }

    fn shift_data(&mut self, tdi: &Bits) {
        let Some(opcode) = self.opcode else {
            return;
        };
        if opcode == code(Instr::IscAddress) {
            match tdi.to_u64().and_then(|a| u32::try_from(a).ok()) {
                Some(address) => self.address = address,
                None => warn!(bits = tdi.len(), "ISC address does not fit a row id; ignored"),
            }
        } else if opcode & !DATA_ADDRESS_BITS == code(Instr::IscData) {
            self.data = tdi.clone();
        }
    }

    fn pulse(&mut self) {
        if self.erase_latched || self.opcode != Some(code(Instr::IscProgramErase)) {
            return;
        }
        trace!(row = self.address, bits = self.data.len(), "row programmed");
        if self.words.insert(self.address, self.data.clone()).is_some() {
            warn!(row = self.address, "row programmed more than once; keeping the last word");
        }
    }
}

fn code(instr: Instr) -> u64 {
    u64::from(instr.code())
}

/// Replays `events` and returns every row word they program.
///
/// A row is committed by a program pulse (`RUNTEST` under
/// `ISC_PROGRAM_ERASE`) while the erase latch is clear. It takes the most
/// recent `ISC_ADDRESS` and `ISC_DATA` shifts. Bulk-erase pulses commit
/// nothing.
pub fn extract<'a, I>(events: I) -> WordMap
where
    I: IntoIterator<Item = &'a Event>,
{
    let words = events
        .into_iter()
        .fold(Extractor::new(), Extractor::step)
        .finish();
    debug!(rows = words.len(), "extracted row words from SVF");
    words
}
