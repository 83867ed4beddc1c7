//! SVF text parsing.
//!
//! Comments (`//` or `!` to end of line) are discarded. Every other
//! statement becomes one [`Event`]. Scan commands follow the SVF rules for
//! omitted patterns: TDI, MASK, and SMASK repeat from the previous scan of
//! the same kind when the length is unchanged, MASK and SMASK reset when it
//! changes, and TDO is never carried over.

use crate::error::SvfError;
use crate::event::{Event, PioDirection, RunClock, RunTest, Scan, TapState};
use atf_common::Bits;
use std::time::Duration;
use tracing::debug;

/// Longest scan accepted, in bits. Far above any ATF15xx register.
const MAX_SCAN_LENGTH: usize = 1 << 20;

/// Parses SVF text into events.
pub fn read_svf(text: &str) -> Result<Vec<Event>, SvfError> {
    let stripped = strip_comments(text);
    let mut pieces: Vec<&str> = stripped.split(';').collect();
    let tail = pieces.pop().unwrap_or_default();
    if !tail.trim().is_empty() {
        return Err(SvfError::Unterminated);
    }

    let mut reader = Reader::default();
    let mut events = Vec::with_capacity(pieces.len());
    for (index, piece) in pieces.iter().enumerate() {
        let statement = index + 1;
        let tokens = tokenize(piece).map_err(|message| SvfError::Syntax {
            statement,
            message: message.to_string(),
        })?;
        if tokens.is_empty() {
            continue;
        }
        events.push(reader.statement(statement, &tokens)?);
    }

    debug!(events = events.len(), "read SVF statements");
    Ok(events)
}

fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        let end = [line.find("//"), line.find('!')]
            .into_iter()
            .flatten()
            .min()
            .unwrap_or(line.len());
        out.push_str(&line[..end]);
        out.push('\n');
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Word(&'a str),
    /// The text between a pair of parentheses.
    Group(&'a str),
}

fn tokenize(statement: &str) -> Result<Vec<Token<'_>>, &'static str> {
    let mut tokens = Vec::new();
    let mut rest = statement.trim_start();
    while !rest.is_empty() {
        if let Some(inner) = rest.strip_prefix('(') {
            let end = inner.find(')').ok_or("unbalanced '('")?;
            tokens.push(Token::Group(&inner[..end]));
            rest = &inner[end + 1..];
        } else {
            let end = rest
                .find(|c: char| c.is_whitespace() || c == '(' || c == ')')
                .unwrap_or(rest.len());
            if end == 0 {
                return Err("unbalanced ')'");
            }
            tokens.push(Token::Word(&rest[..end]));
            rest = &rest[end..];
        }
        rest = rest.trim_start();
    }
    Ok(tokens)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanKind {
    Hir,
    Hdr,
    Tir,
    Tdr,
    Sir,
    Sdr,
}

impl ScanKind {
    fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "HIR" => ScanKind::Hir,
            "HDR" => ScanKind::Hdr,
            "TIR" => ScanKind::Tir,
            "TDR" => ScanKind::Tdr,
            "SIR" => ScanKind::Sir,
            "SDR" => ScanKind::Sdr,
            _ => return None,
        })
    }

    fn into_event(self, scan: Scan) -> Event {
        match self {
            ScanKind::Hir => Event::Hir(scan),
            ScanKind::Hdr => Event::Hdr(scan),
            ScanKind::Tir => Event::Tir(scan),
            ScanKind::Tdr => Event::Tdr(scan),
            ScanKind::Sir => Event::Sir(scan),
            ScanKind::Sdr => Event::Sdr(scan),
        }
    }
}

/// Patterns remembered from the previous scan of one kind.
#[derive(Debug, Clone, Default)]
struct Sticky {
    length: Option<usize>,
    tdi: Option<Bits>,
    mask: Option<Bits>,
    smask: Option<Bits>,
}

#[derive(Debug, Default)]
struct Reader {
    sticky: [Sticky; 6],
}

impl Reader {
    fn statement(&mut self, statement: usize, tokens: &[Token<'_>]) -> Result<Event, SvfError> {
        let (keyword, rest) = match tokens {
            [Token::Word(word), rest @ ..] => (*word, rest),
            _ => {
                return Err(SvfError::Syntax {
                    statement,
                    message: "expected a command".to_string(),
                })
            }
        };
        let upper = keyword.to_ascii_uppercase();
        let mut args = Args {
            statement,
            tokens: rest,
            pos: 0,
        };

        let event = if let Some(kind) = ScanKind::from_keyword(&upper) {
            kind.into_event(self.scan(kind, &upper, &mut args)?)
        } else {
            match upper.as_str() {
                "ENDIR" => Event::EndIr(args.state()?),
                "ENDDR" => Event::EndDr(args.state()?),
                "FREQUENCY" if args.is_empty() => Event::Frequency(None),
                "FREQUENCY" => {
                    let hz = args.number()?;
                    args.keyword("HZ")?;
                    Event::Frequency(Some(hz))
                }
                "TRST" => {
                    let mode = args.word()?;
                    Event::Trst(
                        mode.parse()
                            .map_err(|()| args.error(format!("unknown TRST mode '{mode}'")))?,
                    )
                }
                "RUNTEST" => Event::RunTest(runtest(&mut args)?),
                "STATE" => {
                    let mut path = Vec::new();
                    while !args.is_empty() {
                        path.push(args.state()?);
                    }
                    let end = path
                        .pop()
                        .ok_or_else(|| args.error("STATE needs a state".to_string()))?;
                    Event::State { path, end }
                }
                "PIOMAP" => Event::PioMap(piomap(&mut args)?),
                "PIO" => Event::Pio(args.group()?.trim().to_string()),
                _ => {
                    return Err(SvfError::UnknownCommand {
                        statement,
                        keyword: keyword.to_string(),
                    })
                }
            }
        };
        args.finish()?;
        Ok(event)
    }

    fn scan(
        &mut self,
        kind: ScanKind,
        keyword: &str,
        args: &mut Args<'_>,
    ) -> Result<Scan, SvfError> {
        let length_text = args.word()?;
        let length: usize = length_text
            .parse()
            .map_err(|_| args.error(format!("bad {keyword} length '{length_text}'")))?;
        if length > MAX_SCAN_LENGTH {
            return Err(args.error(format!(
                "{keyword} length {length} exceeds {MAX_SCAN_LENGTH} bits"
            )));
        }

        let (mut tdi, mut tdo, mut mask, mut smask) = (None, None, None, None);
        while !args.is_empty() {
            let name = args.word()?.to_ascii_uppercase();
            let slot = match name.as_str() {
                "TDI" => &mut tdi,
                "TDO" => &mut tdo,
                "MASK" => &mut mask,
                "SMASK" => &mut smask,
                _ => return Err(args.error(format!("unexpected '{name}' in {keyword}"))),
            };
            *slot = Some(args.pattern(&name, length)?);
        }

        let sticky = &mut self.sticky[kind as usize];
        let same_length = sticky.length == Some(length);
        let tdi = match (tdi, &sticky.tdi) {
            (Some(bits), _) => bits,
            (None, _) if length == 0 => Bits::new(0),
            (None, Some(previous)) if same_length => previous.clone(),
            (None, _) => return Err(args.error(format!("{keyword} {length} needs TDI"))),
        };
        if !same_length {
            sticky.mask = None;
            sticky.smask = None;
        }
        let mask = mask.or_else(|| sticky.mask.clone());
        let smask = smask.or_else(|| sticky.smask.clone());
        *sticky = Sticky {
            length: Some(length),
            tdi: Some(tdi.clone()),
            mask: mask.clone(),
            smask: smask.clone(),
        };
        Ok(Scan {
            tdi,
            tdo,
            mask,
            smask,
        })
    }
}

fn runtest(args: &mut Args<'_>) -> Result<RunTest, SvfError> {
    let mut run = RunTest::default();
    if let Some(state) = args.peek_word().and_then(|w| w.parse::<TapState>().ok()) {
        args.pos += 1;
        run.run_state = Some(state);
    }
    while let Some(word) = args.peek_word() {
        match word.to_ascii_uppercase().as_str() {
            "MAXIMUM" => {
                args.pos += 1;
                run.max_time = Some(args.seconds()?);
                args.keyword("SEC")?;
            }
            "ENDSTATE" => {
                args.pos += 1;
                run.end_state = Some(args.state()?);
            }
            _ => {
                let value = args.word()?;
                match args.word()?.to_ascii_uppercase().as_str() {
                    "SEC" => {
                        let time = parse_seconds(value).ok_or_else(|| bad_number(args, value))?;
                        run.min_time = Some(time);
                    }
                    unit @ ("TCK" | "SCK") => {
                        let count = parse_count(value).ok_or_else(|| bad_number(args, value))?;
                        run.run_count = Some(count);
                        run.run_clock = Some(if unit == "TCK" {
                            RunClock::Tck
                        } else {
                            RunClock::Sck
                        });
                    }
                    unit => return Err(args.error(format!("unknown RUNTEST unit '{unit}'"))),
                }
            }
        }
    }
    if run.run_count.is_none() && run.min_time.is_none() {
        return Err(args.error("RUNTEST needs a cycle count or a time".to_string()));
    }
    Ok(run)
}

fn piomap(args: &mut Args<'_>) -> Result<Vec<(PioDirection, String)>, SvfError> {
    let group = args.group()?;
    let words: Vec<&str> = group.split_whitespace().collect();
    if words.len() % 2 != 0 {
        return Err(args.error("PIOMAP entries come in direction/name pairs".to_string()));
    }
    words
        .chunks(2)
        .map(|pair| {
            let direction = pair[0]
                .parse()
                .map_err(|()| args.error(format!("unknown PIOMAP direction '{}'", pair[0])))?;
            Ok((direction, pair[1].to_string()))
        })
        .collect()
}

fn bad_number(args: &Args<'_>, text: &str) -> SvfError {
    args.error(format!("bad number '{text}'"))
}

/// Cursor over one statement's arguments.
struct Args<'a> {
    statement: usize,
    tokens: &'a [Token<'a>],
    pos: usize,
}

impl<'a> Args<'a> {
    fn error(&self, message: String) -> SvfError {
        SvfError::Syntax {
            statement: self.statement,
            message,
        }
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek_word(&self) -> Option<&'a str> {
        match self.tokens.get(self.pos) {
            Some(Token::Word(word)) => Some(word),
            _ => None,
        }
    }

    fn word(&mut self) -> Result<&'a str, SvfError> {
        match self.tokens.get(self.pos) {
            Some(Token::Word(word)) => {
                self.pos += 1;
                Ok(word)
            }
            Some(Token::Group(_)) => Err(self.error("unexpected '('".to_string())),
            None => Err(self.error("statement ends early".to_string())),
        }
    }

    fn group(&mut self) -> Result<&'a str, SvfError> {
        match self.tokens.get(self.pos) {
            Some(Token::Group(group)) => {
                self.pos += 1;
                Ok(group)
            }
            _ => Err(self.error("expected '('".to_string())),
        }
    }

    fn keyword(&mut self, expected: &str) -> Result<(), SvfError> {
        let word = self.word()?;
        if word.eq_ignore_ascii_case(expected) {
            Ok(())
        } else {
            Err(self.error(format!("expected {expected}, found '{word}'")))
        }
    }

    fn state(&mut self) -> Result<TapState, SvfError> {
        let word = self.word()?;
        word.parse()
            .map_err(|()| self.error(format!("unknown TAP state '{word}'")))
    }

    fn number(&mut self) -> Result<f64, SvfError> {
        let word = self.word()?;
        match word.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
            _ => Err(bad_number(self, word)),
        }
    }

    fn seconds(&mut self) -> Result<Duration, SvfError> {
        let word = self.word()?;
        parse_seconds(word).ok_or_else(|| bad_number(self, word))
    }

    fn pattern(&mut self, name: &str, length: usize) -> Result<Bits, SvfError> {
        let hex: String = self.group()?.chars().filter(|c| !c.is_whitespace()).collect();
        Bits::from_hex_str(&hex, length)
            .ok_or_else(|| self.error(format!("{name} ({hex}) does not fit {length} bits")))
    }

    fn finish(&self) -> Result<(), SvfError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.error("unexpected trailing arguments".to_string()))
        }
    }
}

/// Parses an SVF real number of seconds exactly, to the nearest nanosecond.
fn parse_seconds(text: &str) -> Option<Duration> {
    let (mantissa, exponent) = match text.find(|c: char| c == 'E' || c == 'e') {
        Some(at) => (&text[..at], text[at + 1..].parse::<i32>().ok()?),
        None => (text, 0),
    };
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }

    let mut nanos: u128 = 0;
    for digit in whole.chars().chain(fraction.chars()) {
        nanos = nanos.checked_mul(10)?.checked_add(u128::from(digit.to_digit(10)?))?;
    }
    let scale = i64::from(exponent) + 9 - fraction.len() as i64;
    if scale >= 0 {
        nanos = nanos.checked_mul(10u128.checked_pow(u32::try_from(scale).ok()?)?)?;
    } else {
        let divisor = 10u128.checked_pow(u32::try_from(-scale).ok()?);
        nanos = match divisor {
            Some(divisor) => {
                let (quotient, remainder) = (nanos / divisor, nanos % divisor);
                if remainder >= divisor - remainder {
                    quotient + 1
                } else {
                    quotient
                }
            }
            None => 0,
        };
    }

    let secs = u64::try_from(nanos / 1_000_000_000).ok()?;
    Some(Duration::new(secs, (nanos % 1_000_000_000) as u32))
}

fn parse_count(text: &str) -> Option<u32> {
    let value: f64 = text.parse().ok()?;
    if value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) {
        Some(value as u32)
    } else {
        None
    }
}
