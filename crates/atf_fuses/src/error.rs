//! Error types for fuse conversion and JEDEC files.

use atf_device::LayoutError;

/// Errors that abort a fuse vector / row word conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The fuse vector length does not match the selected device.
    #[error("{device} has {expected} fuses, fuse vector has {actual}")]
    LayoutMismatch {
        /// Device name.
        device: &'static str,
        /// The device's fuse count.
        expected: usize,
        /// The supplied vector length.
        actual: usize,
    },

    /// A row word's length differs from the row's declared width.
    #[error("row {row} is {expected} bits wide, word has {actual}")]
    WordWidthMismatch {
        /// The row identifier.
        row: u32,
        /// The width from the device's width table.
        expected: usize,
        /// The supplied word length.
        actual: usize,
    },

    /// A lookup fell outside the device layout.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Errors that can occur when reading or writing a JEDEC file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JedError {
    /// No STX (0x02) character starts the transmission.
    #[error("missing STX before the first field")]
    MissingStx,

    /// No ETX (0x03) character ends the transmission.
    #[error("missing ETX after the last field")]
    MissingEtx,

    /// The file has no `QF` fuse count field.
    #[error("missing QF fuse count field")]
    MissingFuseCount,

    /// A field could not be parsed.
    #[error("malformed {kind} field: '{text}'")]
    Malformed {
        /// The field identifier character.
        kind: char,
        /// The field text, truncated.
        text: String,
    },

    /// An `L` field writes past the declared fuse count.
    #[error("L field at {address} with {len} fuses overruns fuse count {fuse_count}")]
    FuseOutOfRange {
        /// First fuse of the field.
        address: usize,
        /// Number of fuses in the field.
        len: usize,
        /// The declared fuse count.
        fuse_count: usize,
    },

    /// The `C` field disagrees with the fuse data.
    #[error("fuse checksum mismatch: file says {expected:04X}, fuses sum to {actual:04X}")]
    ChecksumMismatch {
        /// Checksum stored in the file.
        expected: u16,
        /// Checksum computed from the fuses.
        actual: u16,
    },

    /// The design comment contains the `*` field terminator.
    #[error("comment must not contain '*'")]
    CommentTerminator,
}
