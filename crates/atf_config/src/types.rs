//! Option types deserialized from `atfconv.toml`.

use atf_device::DeviceKind;
use serde::Deserialize;
use std::num::NonZeroUsize;

/// The full option set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConvertConfig {
    /// Device selection.
    #[serde(default)]
    pub device: DeviceConfig,
    /// JEDEC output settings.
    #[serde(default)]
    pub jed: JedConfig,
    /// SVF output settings.
    #[serde(default)]
    pub svf: SvfConfig,
}

/// The `[device]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DeviceConfig {
    /// Device used when `--device` is not given.
    #[serde(default)]
    pub default: Option<DeviceKind>,
}

impl DeviceConfig {
    /// Returns the configured default, or the ATF1502AS.
    pub fn default_kind(&self) -> DeviceKind {
        self.default.unwrap_or(DeviceKind::Atf1502as)
    }
}

/// The `[jed]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JedConfig {
    /// Fuses per `L` field.
    #[serde(default = "default_line_width")]
    pub line_width: NonZeroUsize,
}

impl Default for JedConfig {
    fn default() -> Self {
        Self {
            line_width: default_line_width(),
        }
    }
}

/// The `[svf]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SvfConfig {
    /// Emit `ISC_UNKNOWN` after every program or erase pulse.
    #[serde(default = "default_true")]
    pub unknown_after_pulse: bool,
}

impl Default for SvfConfig {
    fn default() -> Self {
        Self {
            unknown_after_pulse: true,
        }
    }
}

/// Fuses per `L` field when no width is configured.
pub const DEFAULT_LINE_WIDTH: NonZeroUsize = match NonZeroUsize::new(64) {
    Some(width) => width,
    None => NonZeroUsize::MIN,
};

fn default_line_width() -> NonZeroUsize {
    DEFAULT_LINE_WIDTH
}

fn default_true() -> bool {
    true
}
