//! SVF vector streams for ATF15xx in-system programming.
//!
//! The [`Event`] type models one SVF statement. [`extract`] replays a stream
//! against a minimal model of the device's ISC state machine to recover the
//! row words it programs, and [`VectorEmitter`] produces the stream that
//! erases, programs, and verifies a set of row words. [`read_svf`] and
//! [`write_svf`] convert between events and SVF text.
//!
//! # Usage
//!
//! ```
//! use atf_common::Bits;
//! use atf_fuses::WordMap;
//! use atf_svf::{extract, VectorEmitter};
//!
//! let mut words = WordMap::new();
//! words.insert(12, Bits::ones(86));
//! words.insert(256, Bits::from_u64(0xdead_beef, 32));
//!
//! let events = VectorEmitter::new(0x0150_203f).emit(&words, "");
//! assert_eq!(extract(&events), words);
//! ```

#![warn(missing_docs)]

pub mod emit;
pub mod error;
pub mod event;
pub mod extract;
pub mod reader;
pub mod writer;

pub use emit::VectorEmitter;
pub use error::SvfError;
pub use event::{Event, PioDirection, RunClock, RunTest, Scan, TapState, TrstMode};
pub use extract::{extract, Extractor};
pub use reader::read_svf;
pub use writer::write_svf;
