//! ATF1508AS (128 macrocells, 74136 fuses).

use crate::bank::{Affine, ColumnWindow, CoordBank, FuseBank, RowSpan};
use crate::{DeviceKind, DeviceLayout};

/// Layout model for the ATF1508AS.
#[derive(Debug, Clone, Copy, Default)]
pub struct Atf1508as;

static WIDTHS: [RowSpan; 5] = [
    RowSpan::new(0..108, 326),
    RowSpan::new(128..251, 326),
    RowSpan::new(256..257, 32),
    RowSpan::new(512..513, 4),
    RowSpan::new(768..769, 16),
];

static FUSE_BANKS: [FuseBank; 8] = [
    FuseBank::mapped(0..30720, Affine::row_first(12, 96, 325)),
    FuseBank::mapped(30720..61440, Affine::row_first(128, 96, 325)),
    FuseBank::mapped(61440..65280, Affine::column_first(0, 320, 325)),
    FuseBank::mapped(65280..74082, Affine::row_first(224, 27, 325)),
    FuseBank::mapped(74082..74114, Affine::row_first(256, 1, 31)),
    FuseBank::mapped(74114..74118, Affine::row_first(512, 1, 3)),
    FuseBank::mapped(74118..74134, Affine::row_first(768, 1, 15)),
    FuseBank::reserved(74134..74136),
];

static GLOBAL: [ColumnWindow; 1] = [
    ColumnWindow::new(6..326, 61440, Affine::column_first(0, 320, 325)),
];

static ARRAY_LOW: [ColumnWindow; 1] = [
    ColumnWindow::new(6..326, 0, Affine::row_first(12, 96, 325)),
];

static ARRAY_HIGH: [ColumnWindow; 1] = [
    ColumnWindow::new(6..326, 30720, Affine::row_first(128, 96, 325)),
];

static MACROCELL: [ColumnWindow; 1] = [
    ColumnWindow::new(0..326, 65280, Affine::row_first(224, 27, 325)),
];

static UES: [ColumnWindow; 1] = [
    ColumnWindow::new(0..32, 74082, Affine::row_first(256, 1, 31)),
];

static CONFIG_512: [ColumnWindow; 1] = [
    ColumnWindow::new(0..4, 74114, Affine::row_first(512, 1, 3)),
];

static CONFIG_768: [ColumnWindow; 1] = [
    ColumnWindow::new(0..16, 74118, Affine::row_first(768, 1, 15)),
];

static COORD_BANKS: [CoordBank; 7] = [
    CoordBank::new(0..12, &GLOBAL),
    CoordBank::new(12..108, &ARRAY_LOW),
    CoordBank::new(128..224, &ARRAY_HIGH),
    CoordBank::new(224..251, &MACROCELL),
    CoordBank::new(256..257, &UES),
    CoordBank::new(512..513, &CONFIG_512),
    CoordBank::new(768..769, &CONFIG_768),
];

impl DeviceLayout for Atf1508as {
    fn kind(&self) -> DeviceKind {
        DeviceKind::Atf1508as
    }

    fn idcode(&self) -> u32 {
        0x0150_803f
    }

    fn fuse_count(&self) -> usize {
        74_136
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
