//! `atfconv info`: device layout summary.

use atf_device::DeviceLayout;

use crate::{resolve_device, DeviceChoice, GlobalArgs};

/// Runs the `atfconv info` command. Returns exit code 0 on success.
pub fn run(
    device: Option<DeviceChoice>,
    global: &GlobalArgs,
) -> Result<i32, Box<dyn std::error::Error>> {
    let config = global.load_config()?;
    let kind = resolve_device(device, &config);
    print!("{}", describe(kind.layout()));
    Ok(0)
}

/// Renders the device summary: identity, fuse usage, and row widths.
fn describe(layout: &dyn DeviceLayout) -> String {
    let reserved: usize = layout
        .fuse_banks()
        .iter()
        .filter(|bank| bank.map.is_none())
        .map(|bank| bank.fuses.len())
        .sum();
    let rows: usize = layout
        .width_table()
        .iter()
        .map(|span| span.rows.len())
        .sum();

    let mut out = format!(
        "device:   {}\nidcode:   0x{:08x}\nfuses:    {} ({reserved} reserved)\nrows:     {rows}\n",
        layout.name(),
        layout.idcode(),
        layout.fuse_count()
    );
    for span in layout.width_table() {
        out.push_str(&format!(
            "  {:>4}..{:<4} {:>3} bits\n",
            span.rows.start, span.rows.end, span.width
        ));
    }
    out
}
