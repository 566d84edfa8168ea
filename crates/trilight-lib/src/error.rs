//! Unified error type for the trilight-lib crate.
//!
//! [`TrilightError`] covers bad caller input (`InvalidArgument`), failures on
//! a control endpoint (`Endpoint`, `Parse`) and the configuration side
//! (`Io`, `Config`, `Color`). [`TrilightError::code`] maps every variant to
//! the negative errno-style value a light service hands back to its caller.

use std::fmt;
use std::io;
use std::path::PathBuf;

const EIO: i32 = 5;
const EINVAL: i32 = 22;

/// Unified error type for trilight-lib operations.
#[derive(Debug)]
pub enum TrilightError {
    /// Unknown channel or endpoint name, or otherwise malformed request.
    InvalidArgument(String),
    /// Opening, writing or reading a control endpoint failed.
    Endpoint { path: PathBuf, source: io::Error },
    /// An endpoint held something other than a decimal integer.
    Parse { path: PathBuf, value: String },
    /// Standard I/O error (config persistence).
    Io(io::Error),
    /// Configuration validation error.
    Config(String),
    /// Color parsing error.
    Color(String),
}

impl TrilightError {
    pub(crate) fn endpoint(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TrilightError::Endpoint {
            path: path.into(),
            source,
        }
    }

    /// Negative errno-style code for this error.
    ///
    /// Endpoint failures carry the OS error number when there is one and fall
    /// back to `-EIO`; everything caused by bad input is `-EINVAL`.
    pub fn code(&self) -> i32 {
        match self {
            TrilightError::Endpoint { source, .. } | TrilightError::Io(source) => {
                -source.raw_os_error().unwrap_or(EIO)
            }
            TrilightError::InvalidArgument(_)
            | TrilightError::Parse { .. }
            | TrilightError::Config(_)
            | TrilightError::Color(_) => -EINVAL,
        }
    }
}

impl fmt::Display for TrilightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrilightError::InvalidArgument(e) => write!(f, "Invalid argument: {e}"),
            TrilightError::Endpoint { path, source } => {
                write!(f, "Endpoint {}: {source}", path.display())
            }
            TrilightError::Parse { path, value } => {
                write!(f, "Endpoint {}: not an integer: {value:?}", path.display())
            }
            TrilightError::Io(e) => write!(f, "I/O error: {e}"),
            TrilightError::Config(e) => write!(f, "Config error: {e}"),
            TrilightError::Color(e) => write!(f, "Color error: {e}"),
        }
    }
}

impl std::error::Error for TrilightError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrilightError::Endpoint { source, .. } => Some(source),
            TrilightError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TrilightError {
    fn from(e: io::Error) -> Self {
        TrilightError::Io(e)
    }
}

/// Crate-level Result alias using [`TrilightError`].
pub type Result<T> = std::result::Result<T, TrilightError>;
