//! Conversion between linear fuse vectors and row-keyed JTAG words.
//!
//! The conversion is lossy in both directions. Reserved fuses have
//! no JTAG coordinate, so they come back as 0 after a round trip through row
//! words. Padding columns have no fuse, so they come back as 1 after a round
//! trip through a fuse vector.

use crate::error::CodecError;
use atf_common::Bits;
use atf_device::DeviceLayout;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tracing::debug;

/// Row words keyed by row identifier, iterated in ascending row order.
pub type WordMap = BTreeMap<u32, Bits>;

/// Fails unless `fuses` is exactly as long as the device's fuse vector.
pub fn check_fuse_count(fuses: &Bits, layout: &dyn DeviceLayout) -> Result<(), CodecError> {
    if fuses.len() != layout.fuse_count() {
        return Err(CodecError::LayoutMismatch {
            device: layout.name(),
            expected: layout.fuse_count(),
            actual: fuses.len(),
        });
    }
    Ok(())
}

/// Splits a fuse vector into the row words that program it.
///
/// A row's word is allocated with every bit set the first time one of its
/// fuses is seen, so columns no fuse reaches stay 1. Reserved fuses are
/// dropped. The length check runs before any fuse is mapped.
pub fn to_word_map(fuses: &Bits, layout: &dyn DeviceLayout) -> Result<WordMap, CodecError> {
    check_fuse_count(fuses, layout)?;

    let mut words = WordMap::new();
    for (index, value) in fuses.iter().enumerate() {
        let Some(coord) = layout.fuse_to_coord(index)? else {
            continue;
        };
        let word = match words.entry(coord.row) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(Bits::ones(layout.width_of(coord.row)?)),
        };
        word.set(coord.col, value);
    }

    debug!(
        device = layout.name(),
        rows = words.len(),
        "split fuse vector into row words"
    );
    Ok(words)
}

/// Assembles a fuse vector from row words.
///
/// Every fuse starts cleared; reserved fuses stay that way. Columns with no
/// fuse are ignored. Each word must be exactly as wide as its row.
pub fn to_fuse_vector(words: &WordMap, layout: &dyn DeviceLayout) -> Result<Bits, CodecError> {
    let mut fuses = Bits::new(layout.fuse_count());
    for (&row, word) in words {
        let width = layout.width_of(row)?;
        if word.len() != width {
            return Err(CodecError::WordWidthMismatch {
                row,
                expected: width,
                actual: word.len(),
            });
        }
        for (col, value) in word.iter().enumerate() {
            if let Some(index) = layout.coord_to_fuse(row, col)? {
                fuses.set(index, value);
            }
        }
    }

    debug!(
        device = layout.name(),
        rows = words.len(),
        "assembled fuse vector from row words"
    );
    Ok(fuses)
}
