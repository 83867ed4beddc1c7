//! Option file errors.

use std::path::PathBuf;

/// Why an `atfconv.toml` could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The option file exists on the command line but cannot be read.
    #[error("cannot read option file {}: {source}", path.display())]
    Read {
        /// The path given with `--config`.
        path: PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },

    /// Bad TOML, an unknown device name, or a zero `line_width`.
    #[error("invalid option file: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid() {
        let err = ConfigError::Invalid("unknown variant `atf1500`".to_string());
        assert_eq!(
            format!("{err}"),
            "invalid option file: unknown variant `atf1500`"
        );
    }

    #[test]
    fn display_read_names_path() {
        let err = ConfigError::Read {
            path: PathBuf::from("opts/atfconv.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(
            format!("{err}"),
            "cannot read option file opts/atfconv.toml: not found"
        );
    }
}
