//! atfconv: converts ATF15xx fuse images between JEDEC and SVF.
//!
//! `atfconv convert` reads a `.jed` or `.svf` file and writes the other (or
//! the same) format; `atfconv info` prints a device's layout summary.

#![warn(missing_docs)]

mod convert;
mod info;

use std::path::PathBuf;
use std::process;

use atf_config::{load_config, ConfigError, ConvertConfig};
use atf_device::DeviceKind;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// atfconv: ATF15xx JED/SVF converter.
#[derive(Parser, Debug)]
#[command(name = "atfconv", version, about = "Convert between ATF15xx JED and SVF files")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to an `atfconv.toml` option file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a fuse image; formats follow the `.jed`/`.svf` extensions.
    ///
    /// SVF input drives a simplified model of the programming state machine
    /// and only converts correctly when every row is programmed at least once.
    Convert(ConvertArgs),
    /// Print the layout summary of a device.
    Info {
        /// Device to describe.
        #[arg(short, long, value_enum, ignore_case = true)]
        device: Option<DeviceChoice>,
    },
}

/// Arguments for the `atfconv convert` subcommand.
#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// Device the fuse image targets.
    #[arg(short, long, value_enum, ignore_case = true)]
    pub device: Option<DeviceChoice>,

    /// File to read fuses from.
    pub input: PathBuf,

    /// File to write fuses to.
    pub output: PathBuf,
}

/// Device selection on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DeviceChoice {
    /// ATF1502AS.
    #[value(name = "ATF1502AS")]
    Atf1502as,
    /// ATF1504AS.
    #[value(name = "ATF1504AS")]
    Atf1504as,
    /// ATF1508AS.
    #[value(name = "ATF1508AS")]
    Atf1508as,
}

impl From<DeviceChoice> for DeviceKind {
    fn from(choice: DeviceChoice) -> Self {
        match choice {
            DeviceChoice::Atf1502as => DeviceKind::Atf1502as,
            DeviceChoice::Atf1504as => DeviceKind::Atf1504as,
            DeviceChoice::Atf1508as => DeviceKind::Atf1508as,
        }
    }
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Optional path to an option file.
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    /// Loads the option file, or the defaults when none was given.
    pub fn load_config(&self) -> Result<ConvertConfig, ConfigError> {
        match &self.config {
            Some(path) => load_config(path),
            None => Ok(ConvertConfig::default()),
        }
    }
}

/// Picks the command-line device, then the configured default.
pub fn resolve_device(choice: Option<DeviceChoice>, config: &ConvertConfig) -> DeviceKind {
    choice
        .map(DeviceKind::from)
        .unwrap_or_else(|| config.device.default_kind())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    let global = GlobalArgs {
        quiet: cli.quiet,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Convert(ref args) => convert::run(args, &global),
        Command::Info { device } => info::run(device, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the stderr log subscriber.
///
/// `--quiet` and `--verbose` override `RUST_LOG`; without either, `RUST_LOG`
/// applies and defaults to `warn`.
fn init_tracing(quiet: bool, verbose: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_convert_default_device() {
        let cli = Cli::parse_from(["atfconv", "convert", "in.jed", "out.svf"]);
        match cli.command {
            Command::Convert(ref args) => {
                assert!(args.device.is_none());
                assert_eq!(args.input, PathBuf::from("in.jed"));
                assert_eq!(args.output, PathBuf::from("out.svf"));
            }
            _ => panic!("expected Convert command"),
        }
    }

    #[test]
    fn parse_convert_with_device() {
        let cli = Cli::parse_from(["atfconv", "convert", "-d", "ATF1508AS", "a.svf", "b.jed"]);
        match cli.command {
            Command::Convert(ref args) => {
                assert_eq!(args.device, Some(DeviceChoice::Atf1508as));
            }
            _ => panic!("expected Convert command"),
        }
    }

    #[test]
    fn device_names_ignore_case() {
        let cli = Cli::parse_from(["atfconv", "info", "--device", "atf1504as"]);
        match cli.command {
            Command::Info { device } => assert_eq!(device, Some(DeviceChoice::Atf1504as)),
            _ => panic!("expected Info command"),
        }
    }

    #[test]
    fn unknown_device_is_rejected() {
        assert!(Cli::try_parse_from(["atfconv", "info", "-d", "ATF1516AS"]).is_err());
    }

    #[test]
    fn convert_needs_two_paths() {
        assert!(Cli::try_parse_from(["atfconv", "convert", "in.jed"]).is_err());
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from([
            "atfconv",
            "--quiet",
            "--config",
            "/path/to/atfconv.toml",
            "info",
        ]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/atfconv.toml")));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["atfconv", "info", "--verbose"]);
        assert!(cli.verbose);
    }

    #[test]
    fn device_choice_maps_to_kind() {
        assert_eq!(DeviceKind::from(DeviceChoice::Atf1502as), DeviceKind::Atf1502as);
        assert_eq!(DeviceKind::from(DeviceChoice::Atf1504as), DeviceKind::Atf1504as);
        assert_eq!(DeviceKind::from(DeviceChoice::Atf1508as), DeviceKind::Atf1508as);
    }

    #[test]
    fn command_line_device_beats_config() {
        let config = atf_config::load_config_from_str("[device]\ndefault = \"atf1504as\"\n")
            .unwrap();
        assert_eq!(resolve_device(None, &config), DeviceKind::Atf1504as);
        assert_eq!(
            resolve_device(Some(DeviceChoice::Atf1508as), &config),
            DeviceKind::Atf1508as
        );
        assert_eq!(
            resolve_device(None, &ConvertConfig::default()),
            DeviceKind::Atf1502as
        );
    }
}
