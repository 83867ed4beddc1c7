//! ATF1502AS (32 macrocells, 16808 fuses).
//!
//! Rows are 86 bits wide. The two logic array halves occupy rows 12..108 and
//! 128..224 with columns 0..80; rows 0..12 hold the global routing fuses and
//! rows 224..229 the macrocell configuration, which is the only bank that
//! also uses columns 80..86. Row 256 is the user signature, rows 512 and 768
//! are configuration words.

use crate::bank::{Affine, ColumnWindow, CoordBank, FuseBank, RowSpan};
use crate::{DeviceKind, DeviceLayout};

/// Layout model for the ATF1502AS.
#[derive(Debug, Clone, Copy, Default)]
pub struct Atf1502as;

static WIDTHS: [RowSpan; 5] = [
    RowSpan::new(0..108, 86),
    RowSpan::new(128..229, 86),
    RowSpan::new(256..257, 32),
    RowSpan::new(512..513, 4),
    RowSpan::new(768..769, 16),
];

static FUSE_BANKS: [FuseBank; 9] = [
    FuseBank::mapped(0..7680, Affine::row_first(12, 96, 79)),
    FuseBank::mapped(7680..15360, Affine::row_first(128, 96, 79)),
    FuseBank::mapped(15360..16320, Affine::column_first(0, 80, 79)),
    FuseBank::mapped(16320..16720, Affine::row_first(224, 5, 79)),
    FuseBank::mapped(16720..16750, Affine::row_first(224, 5, 85)),
    FuseBank::mapped(16750..16782, Affine::row_first(256, 1, 31)),
    FuseBank::mapped(16782..16786, Affine::row_first(512, 1, 3)),
    FuseBank::mapped(16786..16802, Affine::row_first(768, 1, 15)),
    FuseBank::reserved(16802..16808),
];

static GLOBAL: [ColumnWindow; 1] = [
    ColumnWindow::new(0..80, 15360, Affine::column_first(0, 80, 79)),
];

static ARRAY_LOW: [ColumnWindow; 1] = [
    ColumnWindow::new(0..80, 0, Affine::row_first(12, 96, 79)),
];

static ARRAY_HIGH: [ColumnWindow; 1] = [
    ColumnWindow::new(0..80, 7680, Affine::row_first(128, 96, 79)),
];

static MACROCELL: [ColumnWindow; 2] = [
    ColumnWindow::new(0..80, 16320, Affine::row_first(224, 5, 79)),
    ColumnWindow::new(80..86, 16720, Affine::row_first(224, 5, 85)),
];

static UES: [ColumnWindow; 1] = [
    ColumnWindow::new(0..32, 16750, Affine::row_first(256, 1, 31)),
];

static CONFIG_512: [ColumnWindow; 1] = [
    ColumnWindow::new(0..4, 16782, Affine::row_first(512, 1, 3)),
];

static CONFIG_768: [ColumnWindow; 1] = [
    ColumnWindow::new(0..16, 16786, Affine::row_first(768, 1, 15)),
];

static COORD_BANKS: [CoordBank; 7] = [
    CoordBank::new(0..12, &GLOBAL),
    CoordBank::new(12..108, &ARRAY_LOW),
    CoordBank::new(128..224, &ARRAY_HIGH),
    CoordBank::new(224..229, &MACROCELL),
    CoordBank::new(256..257, &UES),
    CoordBank::new(512..513, &CONFIG_512),
    CoordBank::new(768..769, &CONFIG_768),
];

impl DeviceLayout for Atf1502as {
    fn kind(&self) -> DeviceKind {
        DeviceKind::Atf1502as
    }

    fn idcode(&self) -> u32 {
        0x0150_203f
    }

    fn fuse_count(&self) -> usize {
        16_808
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
