//! One SVF statement per [`Event`].

use atf_common::Bits;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// A JTAG TAP controller state, as named in SVF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TapState {
    /// Test-Logic-Reset.
    Reset,
    /// Run-Test/Idle.
    Idle,
    /// Select-DR-Scan.
    DrSelect,
    /// Capture-DR.
    DrCapture,
    /// Shift-DR.
    DrShift,
    /// Exit1-DR.
    DrExit1,
    /// Pause-DR.
    DrPause,
    /// Exit2-DR.
    DrExit2,
    /// Update-DR.
    DrUpdate,
    /// Select-IR-Scan.
    IrSelect,
    /// Capture-IR.
    IrCapture,
    /// Shift-IR.
    IrShift,
    /// Exit1-IR.
    IrExit1,
    /// Pause-IR.
    IrPause,
    /// Exit2-IR.
    IrExit2,
    /// Update-IR.
    IrUpdate,
}

impl TapState {
    /// Returns the SVF state name.
    pub fn name(self) -> &'static str {
        match self {
            TapState::Reset => "RESET",
            TapState::Idle => "IDLE",
            TapState::DrSelect => "DRSELECT",
            TapState::DrCapture => "DRCAPTURE",
            TapState::DrShift => "DRSHIFT",
            TapState::DrExit1 => "DREXIT1",
            TapState::DrPause => "DRPAUSE",
            TapState::DrExit2 => "DREXIT2",
            TapState::DrUpdate => "DRUPDATE",
            TapState::IrSelect => "IRSELECT",
            TapState::IrCapture => "IRCAPTURE",
            TapState::IrShift => "IRSHIFT",
            TapState::IrExit1 => "IREXIT1",
            TapState::IrPause => "IRPAUSE",
            TapState::IrExit2 => "IREXIT2",
            TapState::IrUpdate => "IRUPDATE",
        }
    }
}

impl fmt::Display for TapState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TapState {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_uppercase().as_str() {
            "RESET" => TapState::Reset,
            "IDLE" => TapState::Idle,
            "DRSELECT" => TapState::DrSelect,
            "DRCAPTURE" => TapState::DrCapture,
            "DRSHIFT" => TapState::DrShift,
            "DREXIT1" => TapState::DrExit1,
            "DRPAUSE" => TapState::DrPause,
            "DREXIT2" => TapState::DrExit2,
            "DRUPDATE" => TapState::DrUpdate,
            "IRSELECT" => TapState::IrSelect,
            "IRCAPTURE" => TapState::IrCapture,
            "IRSHIFT" => TapState::IrShift,
            "IREXIT1" => TapState::IrExit1,
            "IRPAUSE" => TapState::IrPause,
            "IREXIT2" => TapState::IrExit2,
            "IRUPDATE" => TapState::IrUpdate,
            _ => return Err(()),
        })
    }
}

/// How the test reset line is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrstMode {
    /// Held asserted.
    On,
    /// Held deasserted.
    Off,
    /// High impedance.
    Z,
    /// The part has no TRST pin.
    Absent,
}

impl TrstMode {
    /// Returns the SVF keyword.
    pub fn name(self) -> &'static str {
        match self {
            TrstMode::On => "ON",
            TrstMode::Off => "OFF",
            TrstMode::Z => "Z",
            TrstMode::Absent => "ABSENT",
        }
    }
}

impl FromStr for TrstMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ON" => Ok(TrstMode::On),
            "OFF" => Ok(TrstMode::Off),
            "Z" => Ok(TrstMode::Z),
            "ABSENT" => Ok(TrstMode::Absent),
            _ => Err(()),
        }
    }
}

/// The clock counted by a `RUNTEST` cycle count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunClock {
    /// The test clock.
    Tck,
    /// The system clock.
    Sck,
}

impl RunClock {
    /// Returns the SVF keyword.
    pub fn name(self) -> &'static str {
        match self {
            RunClock::Tck => "TCK",
            RunClock::Sck => "SCK",
        }
    }
}

/// Direction of a `PIOMAP` pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PioDirection {
    /// Driven by the tester.
    In,
    /// Sampled by the tester.
    Out,
    /// Both.
    InOut,
}

impl PioDirection {
    /// Returns the SVF keyword.
    pub fn name(self) -> &'static str {
        match self {
            PioDirection::In => "IN",
            PioDirection::Out => "OUT",
            PioDirection::InOut => "INOUT",
        }
    }
}

impl FromStr for PioDirection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "IN" => Ok(PioDirection::In),
            "OUT" => Ok(PioDirection::Out),
            "INOUT" => Ok(PioDirection::InOut),
            _ => Err(()),
        }
    }
}

/// A shift through the instruction or data register, or a header/trailer
/// pattern.
///
/// The scan length is the length of `tdi`. `tdo`, when present, is compared
/// under `mask`; a missing mask compares every bit. A missing `smask` means
/// every TDI bit is significant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scan {
    /// Bits shifted in, bit 0 first.
    pub tdi: Bits,
    /// Bits expected out.
    pub tdo: Option<Bits>,
    /// Which TDO bits are compared.
    pub mask: Option<Bits>,
    /// Which TDI bits matter.
    pub smask: Option<Bits>,
}

impl Scan {
    /// Creates a scan that shifts `tdi` without checking TDO.
    pub fn new(tdi: Bits) -> Self {
        Self {
            tdi,
            tdo: None,
            mask: None,
            smask: None,
        }
    }

    /// Creates a scan of `value`'s low `len` bits.
    pub fn value(value: u64, len: usize) -> Self {
        Self::new(Bits::from_u64(value, len))
    }

    /// Adds an expected TDO pattern compared under `mask`.
    pub fn with_expected(mut self, tdo: Bits, mask: Bits) -> Self {
        self.tdo = Some(tdo);
        self.mask = Some(mask);
        self
    }

    /// Returns the number of bits shifted.
    pub fn length(&self) -> usize {
        self.tdi.len()
    }
}

/// A `RUNTEST` statement.
///
/// Every field is optional in SVF. At least one of `run_count` and
/// `min_time` is present in a well-formed statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunTest {
    /// State to wait in.
    pub run_state: Option<TapState>,
    /// Clock cycles to wait.
    pub run_count: Option<u32>,
    /// Clock counted by `run_count`.
    pub run_clock: Option<RunClock>,
    /// Minimum wait.
    pub min_time: Option<Duration>,
    /// Maximum wait.
    pub max_time: Option<Duration>,
    /// State entered afterwards.
    pub end_state: Option<TapState>,
}

impl RunTest {
    /// Waits in Run-Test/Idle for at least `time`.
    pub fn idle_for(time: Duration) -> Self {
        Self {
            run_state: Some(TapState::Idle),
            min_time: Some(time),
            ..Self::default()
        }
    }
}

/// One SVF statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A `//` comment line.
    Comment(String),
    /// `FREQUENCY`, in hertz; `None` runs at full speed.
    Frequency(Option<f64>),
    /// `TRST` line mode.
    Trst(TrstMode),
    /// State entered after every `SIR`.
    EndIr(TapState),
    /// State entered after every `SDR`.
    EndDr(TapState),
    /// Instruction header, shifted before every `SIR`.
    Hir(Scan),
    /// Data header, shifted before every `SDR`.
    Hdr(Scan),
    /// Instruction trailer.
    Tir(Scan),
    /// Data trailer.
    Tdr(Scan),
    /// Shift the instruction register.
    Sir(Scan),
    /// Shift the data register.
    Sdr(Scan),
    /// Wait in a stable state.
    RunTest(RunTest),
    /// Walk `path` and stop in `end`.
    State {
        /// Intermediate states, in order.
        path: Vec<TapState>,
        /// Final stable state.
        end: TapState,
    },
    /// Parallel I/O pin map.
    PioMap(Vec<(PioDirection, String)>),
    /// Parallel I/O vector, as written.
    Pio(String),
}
