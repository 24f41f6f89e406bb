//! Which directions a handle is opened for.

use serde::Serialize;
use std::fs::OpenOptions;

/// Requested access for [`FileHandle::open`](crate::FileHandle::open).
///
/// The default is read-only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AccessMode {
    pub read: bool,
    pub write: bool,
}

impl Default for AccessMode {
    fn default() -> Self {
        AccessMode::read_only()
    }
}

impl AccessMode {
    pub fn new(read: bool, write: bool) -> Self {
        AccessMode { read, write }
    }

    pub fn read_only() -> Self {
        AccessMode::new(true, false)
    }

    pub fn write_only() -> Self {
        AccessMode::new(false, true)
    }

    pub fn read_write() -> Self {
        AccessMode::new(true, true)
    }

    /// `false` when neither direction was requested.
    pub fn is_usable(&self) -> bool {
        self.read || self.write
    }

    /// Builds the open options for this mode.
    ///
    /// - read only: the file must exist.
    /// - write only: created if missing, truncated otherwise.
    /// - read and write: created if missing, existing bytes kept.
    pub fn open_options(&self) -> OpenOptions {
        let mut options = OpenOptions::new();
        options.read(self.read).write(self.write);
        if self.write {
            options.create(true);
            if !self.read {
                options.truncate(true);
            }
        }
        options
    }
}
