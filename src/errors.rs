//! Errors reported by the strict (`try_*`) methods of [`FileHandle`](crate::FileHandle).

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io::{Error as IoError, ErrorKind};

/// An error occurring while accessing a file through a handle.
#[derive(Debug)]
pub enum FileError {
    /// The handle has no open stream.
    NotOpen,
    /// Neither read nor write access was requested.
    NoAccessMode,
    /// The file ended before the requested bytes could be read.
    UnexpectedEof { expected: usize, read: usize },
    /// The underlying file failed.
    Io(IoError),
}

impl From<IoError> for FileError {
    fn from(error: IoError) -> Self {
        FileError::Io(error)
    }
}

impl Display for FileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            FileError::NotOpen => write!(f, "No file is open"),
            FileError::NoAccessMode => {
                write!(f, "Neither read nor write access was requested")
            }
            FileError::UnexpectedEof { expected, read } => write!(
                f,
                "End of file after {} of {} requested bytes",
                read, expected
            ),
            FileError::Io(error) => write!(f, "The underlying file failed ('{}')", error),
        }
    }
}

impl Error for FileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FileError::Io(error) => Some(error),
            _ => None,
        }
    }
}

impl From<FileError> for IoError {
    fn from(error: FileError) -> Self {
        match error {
            FileError::Io(error) => error,
            FileError::UnexpectedEof { .. } => IoError::new(ErrorKind::UnexpectedEof, error),
            FileError::NotOpen | FileError::NoAccessMode => IoError::new(ErrorKind::Other, error),
        }
    }
}
