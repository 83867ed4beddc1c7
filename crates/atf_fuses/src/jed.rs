//! JEDEC (JESD3) fuse file reader and writer.
//!
//! Only the fields that carry fuse data are interpreted: the design comment
//! before the first `*`, `QF` (fuse count), `F` (default fuse state), `L`
//! (fuse runs), and `C` (fuse checksum). Every other field is skipped.

use crate::error::JedError;
use atf_common::Bits;
use std::num::NonZeroUsize;
use tracing::{debug, warn};

/// Start-of-text character opening a JEDEC transmission.
const STX: char = '\x02';

/// End-of-text character closing a JEDEC transmission.
const ETX: char = '\x03';

/// Longest field excerpt quoted in an error message.
const EXCERPT_LEN: usize = 32;

/// Largest `QF` fuse count accepted. ATF15xx parts need under 75 000.
pub const MAX_FUSE_COUNT: usize = 1 << 24;

/// A JEDEC fuse image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JedFile {
    /// The fuse vector; its length is the `QF` count.
    pub fuses: Bits,
    /// The free-form header text before the first field.
    pub comment: String,
}

impl JedFile {
    /// Creates a fuse image with the given comment.
    pub fn new(fuses: Bits, comment: impl Into<String>) -> Self {
        Self {
            fuses,
            comment: comment.into(),
        }
    }
}

/// Renders a fuse image as JEDEC text with `line_width` fuses per `L` field.
///
/// The output declares `F0`, writes every fuse explicitly, and closes with a
/// zero transmission checksum.
pub fn write_jed(file: &JedFile, line_width: NonZeroUsize) -> Result<String, JedError> {
    if file.comment.contains('*') {
        return Err(JedError::CommentTerminator);
    }

    let fuses = &file.fuses;
    let mut out = String::with_capacity(fuses.len() + fuses.len() / line_width.get() * 10 + 64);
    out.push(STX);
    out.push_str(&file.comment);
    out.push_str("*\n");
    out.push_str(&format!("QF{}* F0*\n", fuses.len()));
    for start in (0..fuses.len()).step_by(line_width.get()) {
        let run: String = fuses
            .iter()
            .skip(start)
            .take(line_width.get())
            .map(|b| if b { '1' } else { '0' })
            .collect();
        out.push_str(&format!("L{start:05} {run}*\n"));
    }
    out.push(ETX);
    out.push_str("0000\n");
    Ok(out)
}

/// Parses JEDEC text into a fuse image.
///
/// Fuses not covered by an `L` field take the `F` default, or 0 if the file
/// declares none.
pub fn read_jed(text: &str) -> Result<JedFile, JedError> {
    let start = text.find(STX).ok_or(JedError::MissingStx)?;
    let body = &text[start + STX.len_utf8()..];
    let end = body.find(ETX).ok_or(JedError::MissingEtx)?;
    let body = &body[..end];

    let mut fields = body.split('*');
    let comment = fields.next().unwrap_or_default().trim().to_string();

    let mut fuse_count = None;
    let mut default = None;
    let mut checksum = None;
    let mut runs: Vec<(usize, Bits)> = Vec::new();

    for field in fields {
        let field = field.trim_start();
        match field.chars().next() {
            Some('Q') if field.starts_with("QF") => {
                let count = parse_decimal('Q', &field[2..])?;
                if count > MAX_FUSE_COUNT {
                    return Err(malformed('Q', field));
                }
                fuse_count = Some(count);
            }
            Some('F') => {
                default = Some(match field[1..].trim() {
                    "0" => false,
                    "1" => true,
                    _ => return Err(malformed('F', field)),
                });
            }
            Some('L') => runs.push(parse_fuse_run(field)?),
            Some('C') => {
                let value = u16::from_str_radix(field[1..].trim(), 16)
                    .map_err(|_| malformed('C', field))?;
                checksum = Some(value);
            }
            _ => {}
        }
    }

    let fuse_count = fuse_count.ok_or(JedError::MissingFuseCount)?;
    let mut fuses = match default {
        Some(true) => Bits::ones(fuse_count),
        _ => Bits::new(fuse_count),
    };
    let mut covered = Bits::new(fuse_count);
    for (address, run) in &runs {
        let fits = address
            .checked_add(run.len())
            .is_some_and(|end| end <= fuse_count);
        if !fits {
            return Err(JedError::FuseOutOfRange {
                address: *address,
                len: run.len(),
                fuse_count,
            });
        }
        for (offset, value) in run.iter().enumerate() {
            fuses.set(address + offset, value);
            covered.set(address + offset, true);
        }
    }
    if default.is_none() && !covered.is_all_ones() {
        warn!(
            uncovered = fuse_count - covered.count_ones(),
            "JEDEC file has no F field; unlisted fuses read as 0"
        );
    }

    if let Some(expected) = checksum {
        let actual = fuse_checksum(&fuses);
        if actual != expected {
            return Err(JedError::ChecksumMismatch { expected, actual });
        }
    }

    debug!(fuse_count, runs = runs.len(), "read JEDEC fuse image");
    Ok(JedFile { fuses, comment })
}

/// Computes the JEDEC fuse checksum.
///
/// Fuses are packed eight to a byte, lowest index in the least significant
/// bit, and the bytes summed modulo 2^16.
pub fn fuse_checksum(fuses: &Bits) -> u16 {
    let mut sum = 0u16;
    let mut byte = 0u8;
    for (index, value) in fuses.iter().enumerate() {
        if value {
            byte |= 1 << (index % 8);
        }
        if index % 8 == 7 {
            sum = sum.wrapping_add(u16::from(byte));
            byte = 0;
        }
    }
    sum.wrapping_add(u16::from(byte))
}

/// Parses an `L<address> <bits>` field; whitespace may split the bits.
fn parse_fuse_run(field: &str) -> Result<(usize, Bits), JedError> {
    let rest = &field[1..];
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let address = parse_decimal('L', &rest[..digits_end])?;
    let bits: String = rest[digits_end..]
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let run = Bits::from_bit_str(&bits).ok_or_else(|| malformed('L', field))?;
    Ok((address, run))
}

fn parse_decimal(kind: char, text: &str) -> Result<usize, JedError> {
    text.trim().parse().map_err(|_| malformed(kind, text))
}

fn malformed(kind: char, text: &str) -> JedError {
    JedError::Malformed {
        kind,
        text: text.trim().chars().take(EXCERPT_LEN).collect(),
    }
}
