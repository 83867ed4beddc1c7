//! `atfconv convert`: JED/SVF conversion.

use std::fs;
use std::path::Path;

use atf_device::DeviceLayout;
use atf_fuses::{
    check_fuse_count, read_jed, to_fuse_vector, to_word_map, write_jed, JedFile, WordMap,
};
use atf_svf::{extract, read_svf, write_svf, VectorEmitter};
use tracing::{debug, warn};

use crate::{resolve_device, ConvertArgs, GlobalArgs};

/// File format, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Jed,
    Svf,
}

impl FileFormat {
    fn from_path(path: &Path) -> Result<Self, String> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("jed") => Ok(FileFormat::Jed),
            Some("svf") => Ok(FileFormat::Svf),
            _ => Err(format!("{} is not a JED or SVF file", path.display())),
        }
    }
}

/// A fuse image as read, before conversion to the output representation.
#[derive(Debug)]
enum Image {
    Fuses(JedFile),
    Words(WordMap),
}

/// Runs the `atfconv convert` command. Returns exit code 0 on success.
pub fn run(args: &ConvertArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = global.load_config()?;
    let kind = resolve_device(args.device, &config);
    let layout = kind.layout();

    let input_format = FileFormat::from_path(&args.input)?;
    let output_format = FileFormat::from_path(&args.output)?;

    let text = fs::read_to_string(&args.input)
        .map_err(|e| format!("cannot read {}: {e}", args.input.display()))?;
    let image = read_image(&text, input_format, layout)?;

    let emitter = VectorEmitter::new(layout.idcode())
        .unknown_after_pulse(config.svf.unknown_after_pulse);
    let output = match (image, output_format) {
        (Image::Fuses(jed), FileFormat::Jed) => write_jed(&jed, config.jed.line_width)?,
        (Image::Fuses(jed), FileFormat::Svf) => {
            let words = to_word_map(&jed.fuses, layout)?;
            write_svf(&emitter.emit(&words, &jed.comment))
        }
        (Image::Words(words), FileFormat::Jed) => {
            let fuses = to_fuse_vector(&words, layout)?;
            write_jed(&JedFile::new(fuses, ""), config.jed.line_width)?
        }
        (Image::Words(words), FileFormat::Svf) => write_svf(&emitter.emit(&words, "")),
    };

    fs::write(&args.output, output)
        .map_err(|e| format!("cannot write {}: {e}", args.output.display()))?;

    debug!(device = kind.name(), "conversion finished");
    if !global.quiet {
        eprintln!(
            "   Converted {} -> {} ({kind})",
            args.input.display(),
            args.output.display()
        );
    }
    Ok(0)
}

fn read_image(
    text: &str,
    format: FileFormat,
    layout: &dyn DeviceLayout,
) -> Result<Image, Box<dyn std::error::Error>> {
    match format {
        FileFormat::Jed => {
            let jed = read_jed(text)?;
            check_fuse_count(&jed.fuses, layout)
                .map_err(|e| format!("{e}; wrong --device option?"))?;
            Ok(Image::Fuses(jed))
        }
        FileFormat::Svf => {
            let words = extract(&read_svf(text)?);
            if words.is_empty() {
                warn!("SVF stream programs no rows; every fuse will read as 0");
            }
            Ok(Image::Words(words))
        }
    }
}
