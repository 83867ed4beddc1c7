//! Fuse-map layouts for the Atmel/Microchip ATF15xx CPLD family.
//!
//! A device's configuration can be addressed two ways: as a linear JEDEC
//! fuse vector, or as the row/column array that in-system programming shifts
//! through the JTAG port. The [`DeviceLayout`] trait describes the mapping
//! between the two for one device, and is implemented by [`Atf1502as`],
//! [`Atf1504as`], and [`Atf1508as`] purely through constant tables.
//!
//! # Usage
//!
//! ```
//! use atf_device::{Coord, DeviceKind};
//!
//! let layout = DeviceKind::Atf1502as.layout();
//! assert_eq!(layout.fuse_count(), 16_808);
//! assert_eq!(layout.fuse_to_coord(0).unwrap(), Some(Coord::new(12, 79)));
//! assert_eq!(layout.coord_to_fuse(12, 79).unwrap(), Some(0));
//! ```

#![warn(missing_docs)]

pub mod atf15xx;
pub mod bank;
pub mod error;

pub use atf15xx::atf1502as::Atf1502as;
pub use atf15xx::atf1504as::Atf1504as;
pub use atf15xx::atf1508as::Atf1508as;
pub use atf15xx::{Instr, ADDRESS_LENGTH, IR_LENGTH};
pub use bank::{Affine, ColumnWindow, Coord, CoordBank, FuseBank, Order, RowSpan};
pub use error::LayoutError;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The address layout of one device variant.
///
/// Implementors only supply constants; the transforms are provided methods
/// that walk the bank tables in order, first match winning. Every fuse index
/// below [`fuse_count`](Self::fuse_count) falls in exactly one fuse bank and
/// every row of the width table falls in exactly one coordinate bank.
pub trait DeviceLayout: fmt::Debug + Sync {
    /// Returns which device this layout describes.
    fn kind(&self) -> DeviceKind;

    /// Returns the 32-bit JTAG IDCODE of the device.
    fn idcode(&self) -> u32;

    /// Returns the number of fuses in the JEDEC image.
    fn fuse_count(&self) -> usize;

    /// Returns the row spans and their data word widths.
    fn width_table(&self) -> &'static [RowSpan];

    /// Returns the forward (fuse to coordinate) rules, in evaluation order.
    fn fuse_banks(&self) -> &'static [FuseBank];

    /// Returns the inverse (coordinate to fuse) rules, in evaluation order.
    fn coord_banks(&self) -> &'static [CoordBank];

    /// Returns the device part name (e.g., "ATF1504AS").
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Returns the data word width of `row`.
    fn width_of(&self, row: u32) -> Result<usize, LayoutError> {
        self.width_table()
            .iter()
            .find(|span| span.rows.contains(&row))
            .map(|span| span.width)
            .ok_or(LayoutError::UnknownRow {
                device: self.name(),
                row,
            })
    }

    /// Maps a fuse index to its JTAG coordinate.
    ///
    /// Returns `Ok(None)` for reserved fuses.
    fn fuse_to_coord(&self, index: usize) -> Result<Option<Coord>, LayoutError> {
        self.fuse_banks()
            .iter()
            .find(|bank| bank.fuses.contains(&index))
            .map(|bank| bank.coord_of(index))
            .ok_or(LayoutError::FuseOutOfRange {
                device: self.name(),
                index,
            })
    }

    /// Maps a JTAG coordinate to its fuse index.
    ///
    /// Returns `Ok(None)` for padding columns, which always read back as 1.
    fn coord_to_fuse(&self, row: u32, col: usize) -> Result<Option<usize>, LayoutError> {
        self.coord_banks()
            .iter()
            .find(|bank| bank.rows.contains(&row))
            .map(|bank| bank.fuse_of(row, col))
            .ok_or(LayoutError::RowOutOfRange {
                device: self.name(),
                row,
            })
    }
}

/// The supported device variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// ATF1502AS, 32 macrocells.
    Atf1502as,
    /// ATF1504AS, 64 macrocells.
    Atf1504as,
    /// ATF1508AS, 128 macrocells.
    Atf1508as,
}

impl DeviceKind {
    /// Every supported device, smallest first.
    pub const ALL: [DeviceKind; 3] = [
        DeviceKind::Atf1502as,
        DeviceKind::Atf1504as,
        DeviceKind::Atf1508as,
    ];

    /// Returns the part name.
    pub fn name(self) -> &'static str {
        match self {
            DeviceKind::Atf1502as => "ATF1502AS",
            DeviceKind::Atf1504as => "ATF1504AS",
            DeviceKind::Atf1508as => "ATF1508AS",
        }
    }

    /// Returns the layout for this device.
    pub fn layout(self) -> &'static dyn DeviceLayout {
        match self {
            DeviceKind::Atf1502as => &Atf1502as,
            DeviceKind::Atf1504as => &Atf1504as,
            DeviceKind::Atf1508as => &Atf1508as,
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DeviceKind {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeviceKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| LayoutError::UnknownDevice(s.to_string()))
    }
}
