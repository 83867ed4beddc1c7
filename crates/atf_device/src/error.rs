//! Error types for device layout lookups.

/// Errors raised when a value falls outside a device's declared layout.
///
/// The layout tables are exhaustive for the published devices, so an index
/// or row outside them means the caller handed in data for a different
/// device (or a layout table is wrong). None of these are recoverable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// A row identifier matched no entry of the width table.
    #[error("{device}: row {row} is not in the width table")]
    UnknownRow {
        /// Device name.
        device: &'static str,
        /// The offending row.
        row: u32,
    },

    /// A fuse index fell past every fuse bank.
    #[error("{device}: fuse index {index} is outside every fuse bank")]
    FuseOutOfRange {
        /// Device name.
        device: &'static str,
        /// The offending fuse index.
        index: usize,
    },

    /// A row identifier fell past every coordinate bank.
    #[error("{device}: row {row} is outside every coordinate bank")]
    RowOutOfRange {
        /// Device name.
        device: &'static str,
        /// The offending row.
        row: u32,
    },

    /// A device name did not match any supported device.
    #[error("unknown device '{0}'; supported: ATF1502AS, ATF1504AS, ATF1508AS")]
    UnknownDevice(String),
}
