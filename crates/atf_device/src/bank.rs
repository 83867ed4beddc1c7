//! Bank rules: the piecewise-affine pieces of a device's address transforms.
//!
//! A fuse bank covers a contiguous range of fuse indices; a coordinate bank
//! covers a contiguous range of JTAG rows and splits each row into column
//! windows. Both directions share [`Affine`], which describes how a run of
//! consecutive fuses walks across rows and columns. Column numbers are
//! mirrored against `col_max` because the device shifts the highest column
//! first.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// A (row, column) position in the JTAG programming array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// The row (ISC address) identifier.
    pub row: u32,
    /// The bit position within the row's data word.
    pub col: usize,
}

impl Coord {
    /// Creates a coordinate.
    pub const fn new(row: u32, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Which coordinate advances first as the fuse index increases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Order {
    /// Consecutive fuses step through rows; the column advances every
    /// `stride` fuses.
    RowFirst,
    /// Consecutive fuses step through columns; the row advances every
    /// `stride` fuses.
    ColumnFirst,
}

/// An affine mapping between a fuse offset and a (row, column) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Affine {
    /// First row covered by the mapping.
    pub row: u32,
    /// Which coordinate advances fastest.
    pub order: Order,
    /// Number of fuses before the slow coordinate advances.
    pub stride: usize,
    /// Column reached at offset zero; columns count down from here.
    pub col_max: usize,
}

impl Affine {
    /// A mapping where consecutive fuses step through `stride` rows.
    pub const fn row_first(row: u32, stride: usize, col_max: usize) -> Self {
        Self {
            row,
            order: Order::RowFirst,
            stride,
            col_max,
        }
    }

    /// A mapping where consecutive fuses step through `stride` columns.
    pub const fn column_first(row: u32, stride: usize, col_max: usize) -> Self {
        Self {
            row,
            order: Order::ColumnFirst,
            stride,
            col_max,
        }
    }

    /// Returns the coordinate reached `offset` fuses past the start.
    pub fn coord_at(&self, offset: usize) -> Coord {
        let (row_step, col_step) = match self.order {
            Order::RowFirst => (offset % self.stride, offset / self.stride),
            Order::ColumnFirst => (offset / self.stride, offset % self.stride),
        };
        Coord::new(self.row + row_step as u32, self.col_max - col_step)
    }

    /// Returns the fuse offset of a coordinate covered by this mapping.
    ///
    /// The caller guarantees `row >= self.row` and `col <= self.col_max`.
    pub fn offset_of(&self, row: u32, col: usize) -> usize {
        let row_step = (row - self.row) as usize;
        let col_step = self.col_max - col;
        match self.order {
            Order::RowFirst => row_step + col_step * self.stride,
            Order::ColumnFirst => row_step * self.stride + col_step,
        }
    }
}

/// A contiguous range of fuse indices sharing one forward rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuseBank {
    /// Fuse indices covered by this bank.
    pub fuses: Range<usize>,
    /// Mapping for the bank, or `None` for reserved fuses.
    pub map: Option<Affine>,
}

impl FuseBank {
    /// A bank of fuses that map into the JTAG array.
    pub const fn mapped(fuses: Range<usize>, map: Affine) -> Self {
        Self {
            fuses,
            map: Some(map),
        }
    }

    /// A bank of reserved fuses with no JTAG counterpart.
    pub const fn reserved(fuses: Range<usize>) -> Self {
        Self { fuses, map: None }
    }

    /// Maps a fuse index inside this bank to its coordinate.
    pub fn coord_of(&self, index: usize) -> Option<Coord> {
        self.map.map(|m| m.coord_at(index - self.fuses.start))
    }
}

/// A column range within a coordinate bank that maps onto fuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnWindow {
    /// Columns covered by the window.
    pub cols: Range<usize>,
    /// Fuse index reached at offset zero.
    pub fuse: usize,
    /// Mapping from coordinates to offsets past `fuse`.
    pub map: Affine,
}

impl ColumnWindow {
    /// Creates a column window.
    pub const fn new(cols: Range<usize>, fuse: usize, map: Affine) -> Self {
        Self { cols, fuse, map }
    }
}

/// A contiguous range of rows sharing one set of column windows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordBank {
    /// Rows covered by this bank.
    pub rows: Range<u32>,
    /// Windows evaluated in order; columns outside every window are padding.
    pub windows: &'static [ColumnWindow],
}

impl CoordBank {
    /// Creates a coordinate bank.
    pub const fn new(rows: Range<u32>, windows: &'static [ColumnWindow]) -> Self {
        Self { rows, windows }
    }

    /// Maps a coordinate inside this bank to its fuse index.
    pub fn fuse_of(&self, row: u32, col: usize) -> Option<usize> {
        self.windows
            .iter()
            .find(|w| w.cols.contains(&col))
            .map(|w| w.fuse + w.map.offset_of(row, col))
    }
}

/// A range of rows sharing one data word width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSpan {
    /// Rows covered by this span.
    pub rows: Range<u32>,
    /// Number of columns in each row's data word.
    pub width: usize,
}

impl RowSpan {
    /// Creates a row span.
    pub const fn new(rows: Range<u32>, width: usize) -> Self {
        Self { rows, width }
    }
}
