//! Device file access — trait + sysfs backend.
//!
//! Every control endpoint holds one newline-terminated decimal integer.
//! Each access opens the file, does one read or write, and closes it again.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::{Result, TrilightError};

/// Longest value read back from an endpoint, newline included.
const READ_LIMIT: usize = 12;

// ── Trait ──

pub trait DevicePort {
    /// Write `value` as `"<value>\n"` to the endpoint at `path`.
    fn write_int(&self, path: &Path, value: i32) -> Result<()>;
    /// Read the integer currently held by the endpoint at `path`.
    fn read_int(&self, path: &Path) -> Result<i32>;
}

impl<P: DevicePort + ?Sized> DevicePort for &P {
    fn write_int(&self, path: &Path, value: i32) -> Result<()> {
        (**self).write_int(path, value)
    }

    fn read_int(&self, path: &Path) -> Result<i32> {
        (**self).read_int(path)
    }
}

// ── sysfs implementation ──

/// Endpoint access through the filesystem.
///
/// Failures are logged at error level only the first time for each path,
/// so a board missing an LED does not flood the log on every update.
#[derive(Debug, Default)]
pub struct SysfsPort {
    warned: Mutex<HashSet<PathBuf>>,
}

impl SysfsPort {
    pub fn new() -> Self {
        Self::default()
    }

    fn warn_once(&self, what: &str, path: &Path, err: &std::io::Error) {
        let first = self
            .warned
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_path_buf());
        if first {
            log::error!("{what} {}: {err}", path.display());
        } else {
            log::debug!("{what} {}: {err}", path.display());
        }
    }
}

impl DevicePort for SysfsPort {
    fn write_int(&self, path: &Path, value: i32) -> Result<()> {
        // Truncating is a no-op on sysfs attributes and keeps plain-file
        // stand-ins holding exactly one value.
        let mut file = match OpenOptions::new()
            .read(true)
            .write(true)
            .truncate(true)
            .open(path)
        {
            Ok(f) => f,
            Err(e) => {
                self.warn_once("write_int failed to open", path, &e);
                return Err(TrilightError::endpoint(path, e));
            }
        };
        file.write_all(format!("{value}\n").as_bytes())
            .map_err(|e| {
                self.warn_once("write_int failed to write", path, &e);
                TrilightError::endpoint(path, e)
            })
    }

    fn read_int(&self, path: &Path) -> Result<i32> {
        let mut file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                self.warn_once("read_int failed to open", path, &e);
                return Err(TrilightError::endpoint(path, e));
            }
        };
        let mut buf = [0u8; READ_LIMIT];
        let n = file
            .read(&mut buf)
            .map_err(|e| TrilightError::endpoint(path, e))?;
        // The last byte read is taken to be the newline.
        let text = String::from_utf8_lossy(&buf[..n.saturating_sub(1)]);
        text.trim().parse().map_err(|_| TrilightError::Parse {
            path: path.to_path_buf(),
            value: text.into_owned(),
        })
    }
}

// ── Mock implementation (for testing) ──

#[doc(hidden)]
pub mod mock {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory endpoints for unit tests.
    ///
    /// Successful writes update `values` and are appended to `writes` in
    /// order. Paths registered with [`MockPort::fail_path`] reject every
    /// access with `EACCES` and are recorded in `failed` instead.
    #[derive(Debug, Default)]
    pub struct MockPort {
        /// Current endpoint contents.
        pub values: RefCell<HashMap<PathBuf, i32>>,
        /// Successful writes, oldest first.
        pub writes: RefCell<Vec<(PathBuf, i32)>>,
        /// Rejected writes, oldest first.
        pub failed: RefCell<Vec<(PathBuf, i32)>>,
        failing: RefCell<HashSet<PathBuf>>,
    }

    impl MockPort {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every access to `path` fail.
        pub fn fail_path(&self, path: impl Into<PathBuf>) {
            self.failing.borrow_mut().insert(path.into());
        }

        /// Preset the value an endpoint reads back.
        pub fn set_value(&self, path: impl Into<PathBuf>, value: i32) {
            self.values.borrow_mut().insert(path.into(), value);
        }

        pub fn value(&self, path: &Path) -> Option<i32> {
            self.values.borrow().get(path).copied()
        }

        /// Snapshot of the successful write log.
        pub fn take_writes(&self) -> Vec<(PathBuf, i32)> {
            std::mem::take(&mut *self.writes.borrow_mut())
        }

        fn check(&self, path: &Path) -> Result<()> {
            if self.failing.borrow().contains(path) {
                return Err(TrilightError::endpoint(
                    path,
                    std::io::Error::from_raw_os_error(13),
                ));
            }
            Ok(())
        }
    }

    impl DevicePort for MockPort {
        fn write_int(&self, path: &Path, value: i32) -> Result<()> {
            if let Err(e) = self.check(path) {
                self.failed.borrow_mut().push((path.to_path_buf(), value));
                return Err(e);
            }
            self.values.borrow_mut().insert(path.to_path_buf(), value);
            self.writes.borrow_mut().push((path.to_path_buf(), value));
            Ok(())
        }

        fn read_int(&self, path: &Path) -> Result<i32> {
            self.check(path)?;
            self.value(path).ok_or_else(|| {
                TrilightError::endpoint(path, std::io::Error::from_raw_os_error(2))
            })
        }
    }
}
