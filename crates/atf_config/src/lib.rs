//! Parsing of `atfconv.toml` option files.
//!
//! Every section and key is optional; a missing file section falls back to
//! the same defaults the command line uses.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::*;
