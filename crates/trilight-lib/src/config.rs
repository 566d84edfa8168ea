//! Service configuration — TOML-based, platform-aware paths.
//!
//! Nothing here is required on real hardware: the defaults drive the
//! standard sysfs layout. The config exists to point the lights at a
//! different tree (bring-up boards, tests) and to tune the blink settle wait.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::paths::{Endpoint, EndpointPaths};

/// Header comment prepended to saved config files.
const CONFIG_HEADER: &str = "# trilight: sysfs root, blink settle wait, endpoint path overrides\n\n";

/// Shortest settle wait the blink hardware tolerates. Lower configured
/// values are rejected by [`Config::validate`] and raised to this.
pub const MIN_SETTLE_MS: u64 = 20;

/// Longest settle wait accepted by [`Config::validate`].
pub const MAX_SETTLE_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory the default sysfs layout is re-rooted under. Empty = `/`.
    #[serde(default)]
    pub sysfs_root: String,

    /// Wait between forcing the LED off and enabling blink. Default and
    /// minimum: 20 ms.
    #[serde(default = "default_settle_ms")]
    pub blink_settle_ms: u64,

    /// Per-endpoint path overrides, keyed by endpoint name.
    /// Example in TOML: `[paths]` / `red = "/sys/class/leds/r/brightness"`
    #[serde(default)]
    pub paths: BTreeMap<String, String>,
}

fn default_settle_ms() -> u64 {
    MIN_SETTLE_MS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sysfs_root: String::new(),
            blink_settle_ms: default_settle_ms(),
            paths: BTreeMap::new(),
        }
    }
}

/// Validation errors that [`Config::validate`] can return.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A `[paths]` key does not name an endpoint.
    UnknownEndpoint(String),
    /// A `[paths]` entry is empty or whitespace-only.
    EmptyPath(String),
    /// `blink_settle_ms` is below [`MIN_SETTLE_MS`].
    SettleTooShort(u64),
    /// `blink_settle_ms` is above [`MAX_SETTLE_MS`].
    SettleTooLong(u64),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnknownEndpoint(key) => {
                write!(f, "Unknown endpoint in [paths]: {key}")
            }
            ValidationError::EmptyPath(key) => write!(f, "Empty path for paths.{key}"),
            ValidationError::SettleTooShort(ms) => {
                write!(f, "blink_settle_ms {ms} is below {MIN_SETTLE_MS} ms")
            }
            ValidationError::SettleTooLong(ms) => {
                write!(f, "blink_settle_ms {ms} exceeds {MAX_SETTLE_MS} ms")
            }
        }
    }
}

impl Config {
    /// Platform-specific config directory.
    pub fn dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("trilight"))
    }

    /// Full path to config file.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("config.toml"))
    }

    /// Write the config to `path`, replacing any existing file.
    ///
    /// Goes through a `.toml.tmp` sibling and a rename so a reader never sees
    /// a half-written file.
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let serialized = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, format!("{CONFIG_HEADER}{serialized}"))?;
        std::fs::rename(&tmp, path).inspect_err(|_| {
            let _ = std::fs::remove_file(&tmp);
        })
    }

    /// Load config from an arbitrary path, returning the config and any parse warnings.
    ///
    /// Returns `(defaults, [])` if the file doesn't exist.
    /// Returns `(defaults, [warning])` if the file exists but can't be parsed.
    pub fn load_from(path: &Path) -> (Self, Vec<String>) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => (config, vec![]),
                Err(e) => {
                    let warning = format!(
                        "config parse error ({}), using defaults: {e}",
                        path.display()
                    );
                    (Self::default(), vec![warning])
                }
            },
            Err(_) => (Self::default(), vec![]),
        }
    }

    /// Load config from the default path, returning the config and any parse warnings.
    pub fn load_with_warnings() -> (Self, Vec<String>) {
        let Some(path) = Self::path() else {
            return (Self::default(), vec![]);
        };
        Self::load_from(&path)
    }

    /// Settle wait to use, never shorter than [`MIN_SETTLE_MS`].
    pub fn blink_settle(&self) -> Duration {
        Duration::from_millis(self.blink_settle_ms.max(MIN_SETTLE_MS))
    }

    /// Resolve the endpoint paths: defaults, re-rooted under `sysfs_root`
    /// if set, then `[paths]` overrides. Unknown or empty overrides are
    /// skipped; [`Config::validate`] reports them.
    pub fn endpoint_paths(&self) -> EndpointPaths {
        let root = self.sysfs_root.trim();
        let mut paths = if root.is_empty() {
            EndpointPaths::default()
        } else {
            EndpointPaths::under(Path::new(root))
        };
        for (key, value) in &self.paths {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            if let Ok(endpoint) = key.parse::<Endpoint>() {
                *paths.get_mut(endpoint) = PathBuf::from(value);
            }
        }
        paths
    }

    /// Validate the entire config, collecting all errors.
    pub fn validate(&self) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        for (key, value) in &self.paths {
            if key.parse::<Endpoint>().is_err() {
                errors.push(ValidationError::UnknownEndpoint(key.clone()));
            }
            if value.trim().is_empty() {
                errors.push(ValidationError::EmptyPath(key.clone()));
            }
        }

        if self.blink_settle_ms < MIN_SETTLE_MS {
            errors.push(ValidationError::SettleTooShort(self.blink_settle_ms));
        } else if self.blink_settle_ms > MAX_SETTLE_MS {
            errors.push(ValidationError::SettleTooLong(self.blink_settle_ms));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
