//! ATF1504AS (64 macrocells, 34192 fuses).
//!
//! Rows are 166 bits wide. The logic array and global routing rows only use
//! columns 6..166; the macrocell rows 224..233 use the full width.

use crate::bank::{Affine, ColumnWindow, CoordBank, FuseBank, RowSpan};
use crate::{DeviceKind, DeviceLayout};

/// Layout model for the ATF1504AS.
#[derive(Debug, Clone, Copy, Default)]
pub struct Atf1504as;

static WIDTHS: [RowSpan; 5] = [
    RowSpan::new(0..108, 166),
    RowSpan::new(128..233, 166),
    RowSpan::new(256..257, 32),
    RowSpan::new(512..513, 4),
    RowSpan::new(768..769, 16),
];

static FUSE_BANKS: [FuseBank; 8] = [
    FuseBank::mapped(0..15360, Affine::row_first(12, 96, 165)),
    FuseBank::mapped(15360..30720, Affine::row_first(128, 96, 165)),
    FuseBank::mapped(30720..32640, Affine::column_first(0, 160, 165)),
    FuseBank::mapped(32640..34134, Affine::row_first(224, 9, 165)),
    FuseBank::mapped(34134..34166, Affine::row_first(256, 1, 31)),
    FuseBank::mapped(34166..34170, Affine::row_first(512, 1, 3)),
    FuseBank::mapped(34170..34186, Affine::row_first(768, 1, 15)),
    FuseBank::reserved(34186..34192),
];

static GLOBAL: [ColumnWindow; 1] = [
    ColumnWindow::new(6..166, 30720, Affine::column_first(0, 160, 165)),
];

static ARRAY_LOW: [ColumnWindow; 1] = [
    ColumnWindow::new(6..166, 0, Affine::row_first(12, 96, 165)),
];

static ARRAY_HIGH: [ColumnWindow; 1] = [
    ColumnWindow::new(6..166, 15360, Affine::row_first(128, 96, 165)),
];

static MACROCELL: [ColumnWindow; 1] = [
    ColumnWindow::new(0..166, 32640, Affine::row_first(224, 9, 165)),
];

static UES: [ColumnWindow; 1] = [
    ColumnWindow::new(0..32, 34134, Affine::row_first(256, 1, 31)),
];

static CONFIG_512: [ColumnWindow; 1] = [
    ColumnWindow::new(0..4, 34166, Affine::row_first(512, 1, 3)),
];

static CONFIG_768: [ColumnWindow; 1] = [
    ColumnWindow::new(0..16, 34170, Affine::row_first(768, 1, 15)),
];

static COORD_BANKS: [CoordBank; 7] = [
    CoordBank::new(0..12, &GLOBAL),
    CoordBank::new(12..108, &ARRAY_LOW),
    CoordBank::new(128..224, &ARRAY_HIGH),
    CoordBank::new(224..233, &MACROCELL),
    CoordBank::new(256..257, &UES),
    CoordBank::new(512..513, &CONFIG_512),
    CoordBank::new(768..769, &CONFIG_768),
];

impl DeviceLayout for Atf1504as {
    fn kind(&self) -> DeviceKind {
        DeviceKind::Atf1504as
    }

    fn idcode(&self) -> u32 {
        0x0150_403f
    }

    fn fuse_count(&self) -> usize {
        34_192
    }

    fn width_table(&self) -> &'static [RowSpan] {
        &WIDTHS
    }

    fn fuse_banks(&self) -> &'static [FuseBank] {
        &FUSE_BANKS
    }

    fn coord_banks(&self) -> &'static [CoordBank] {
        &COORD_BANKS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atf15xx::testing::{assert_forward_agreement, assert_inverse_agreement};
    use crate::{Coord, LayoutError};

    #[test]
    fn constants() {
        assert_eq!(Atf1504as.idcode(), 0x0150403f);
        assert_eq!(Atf1504as.fuse_count(), 34192);
    }

    #[test]
    fn width_of_each_span() {
        assert_eq!(Atf1504as.width_of(11).unwrap(), 166);
        assert_eq!(Atf1504as.width_of(232).unwrap(), 166);
        assert_eq!(Atf1504as.width_of(256).unwrap(), 32);
        assert_eq!(Atf1504as.width_of(512).unwrap(), 4);
        assert_eq!(Atf1504as.width_of(768).unwrap(), 16);
        assert!(matches!(
            Atf1504as.width_of(233),
            Err(LayoutError::UnknownRow { row: 233, .. })
        ));
    }

    #[test]
    fn forward_spot_checks() {
        let at = |i| Atf1504as.fuse_to_coord(i).unwrap();
        assert_eq!(at(0), Some(Coord::new(12, 165)));
        assert_eq!(at(15359), Some(Coord::new(107, 6)));
        assert_eq!(at(15360), Some(Coord::new(128, 165)));
        assert_eq!(at(30720), Some(Coord::new(0, 165)));
        assert_eq!(at(32639), Some(Coord::new(11, 6)));
        assert_eq!(at(32640), Some(Coord::new(224, 165)));
        assert_eq!(at(34133), Some(Coord::new(232, 0)));
        assert_eq!(at(34134), Some(Coord::new(256, 31)));
        assert_eq!(at(34185), Some(Coord::new(768, 0)));
        assert_eq!(at(34186), None);
    }

    #[test]
    fn low_columns_are_padding_outside_macrocells() {
        for col in 0..6 {
            assert_eq!(Atf1504as.coord_to_fuse(0, col).unwrap(), None);
            assert_eq!(Atf1504as.coord_to_fuse(12, col).unwrap(), None);
            assert_eq!(Atf1504as.coord_to_fuse(223, col).unwrap(), None);
        }
        assert_eq!(Atf1504as.coord_to_fuse(224, 0).unwrap(), Some(32640 + 165 * 9));
    }

    #[test]
    fn forward_and_inverse_agree() {
        assert_forward_agreement(&Atf1504as);
        assert_eq!(assert_inverse_agreement(&Atf1504as), 34186);
    }
}
