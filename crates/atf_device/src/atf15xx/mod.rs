//! ATF15xx device models and the family's JTAG instruction set.
//!
//! All three parts share one 10-bit instruction register and the same ISC
//! (in-system configuration) opcodes; they differ only in array geometry.

pub mod atf1502as;
pub mod atf1504as;
pub mod atf1508as;

use serde::{Deserialize, Serialize};

/// Length of the instruction register, in bits.
pub const IR_LENGTH: usize = 10;

/// Length of the ISC address data register, in bits.
pub const ADDRESS_LENGTH: usize = 11;

/// ATF15xx JTAG instructions.
///
/// `IscData` is loaded with the row address's two high bits OR'ed into its
/// low bits, so readers compare it with those bits masked off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum Instr {
    /// Boundary-scan external test.
    Extest = 0x000,
    /// Boundary-scan sample/preload.
    Sample = 0x055,
    /// Select the 32-bit IDCODE register.
    Idcode = 0x059,
    /// Read the user electronic signature.
    IscReadUes = 0x270,
    /// Enter or leave ISC mode through a 10-bit configuration register.
    IscConfig = 0x280,
    /// Read the addressed row into the data register.
    IscRead = 0x28c,
    /// Select the row data register (low two bits carry address bits 9..8).
    IscData = 0x290,
    /// Program the addressed row, or bulk-erase while the erase latch is set.
    IscProgramErase = 0x29e,
    /// Select the 11-bit row address register.
    IscAddress = 0x2a1,
    /// Latch bulk-erase mode for the next program/erase pulse.
    IscLatchErase = 0x2b3,
    /// Emitted by the vendor programmer after every pulse; behaves as BYPASS.
    IscUnknown = 0x2bf,
    /// Single-bit bypass register.
    Bypass = 0x3ff,
}

impl Instr {
    const ALL: [Instr; 12] = [
        Instr::Extest,
        Instr::Sample,
        Instr::Idcode,
        Instr::IscReadUes,
        Instr::IscConfig,
        Instr::IscRead,
        Instr::IscData,
        Instr::IscProgramErase,
        Instr::IscAddress,
        Instr::IscLatchErase,
        Instr::IscUnknown,
        Instr::Bypass,
    ];

    /// Returns the opcode loaded into the instruction register.
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Looks up an instruction by its exact opcode.
    pub fn from_code(code: u16) -> Option<Instr> {
        Self::ALL.into_iter().find(|i| i.code() == code)
    }

    /// Returns the vendor mnemonic.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Instr::Extest => "EXTEST",
            Instr::Sample => "SAMPLE",
            Instr::Idcode => "IDCODE",
            Instr::IscReadUes => "ISC_READ_UES",
            Instr::IscConfig => "ISC_CONFIG",
            Instr::IscRead => "ISC_READ",
            Instr::IscData => "ISC_DATA",
            Instr::IscProgramErase => "ISC_PROGRAM_ERASE",
            Instr::IscAddress => "ISC_ADDRESS",
            Instr::IscLatchErase => "ISC_LATCH_ERASE",
            Instr::IscUnknown => "ISC_UNKNOWN",
            Instr::Bypass => "BYPASS",
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcodes_match_instruction_set() {
        assert_eq!(Instr::Idcode.code(), 0x059);
        assert_eq!(Instr::IscConfig.code(), 0x280);
        assert_eq!(Instr::IscData.code(), 0x290);
        assert_eq!(Instr::IscProgramErase.code(), 0x29e);
        assert_eq!(Instr::IscAddress.code(), 0x2a1);
        assert_eq!(Instr::IscLatchErase.code(), 0x2b3);
        assert_eq!(Instr::IscUnknown.code(), 0x2bf);
        assert_eq!(Instr::Bypass.code(), 0x3ff);
    }

    #[test]
    fn opcodes_fit_instruction_register() {
        for instr in Instr::ALL {
            assert!(u32::from(instr.code()) < 1 << IR_LENGTH);
        }
    }

    #[test]
    fn from_code_exact_match() {
        assert_eq!(Instr::from_code(0x2a1), Some(Instr::IscAddress));
        assert_eq!(Instr::from_code(0x291), None);
    }

    #[test]
    fn mnemonics() {
        assert_eq!(Instr::IscProgramErase.mnemonic(), "ISC_PROGRAM_ERASE");
        assert_eq!(Instr::Sample.mnemonic(), "SAMPLE");
    }
}
