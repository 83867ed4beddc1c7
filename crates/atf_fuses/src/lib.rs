//! Fuse images for ATF15xx CPLDs.
//!
//! A JEDEC fuse vector and the row-keyed words programmed over JTAG carry
//! the same configuration. The [`codec`] module converts between the two for
//! a given [`DeviceLayout`](atf_device::DeviceLayout), and the [`jed`]
//! module reads and writes the JEDEC text format.

#![warn(missing_docs)]

pub mod codec;
pub mod error;
pub mod jed;

pub use codec::{check_fuse_count, to_fuse_vector, to_word_map, WordMap};
pub use error::{CodecError, JedError};
pub use jed::{fuse_checksum, read_jed, write_jed, JedFile, MAX_FUSE_COUNT};
