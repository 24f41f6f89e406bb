//! Typed binary and text access to a single file.
//!
//! [`FileHandle`] owns one file and exposes line/token reads, raw writes and
//! reads/writes of fixed-layout [`Plain`] values in host byte order. Failures
//! are reported through [`StateFlags`] rather than errors, with strict `try_*`
//! variants available for callers that want a [`FileError`].

pub mod access;
pub mod errors;
pub mod file;
pub mod plain;
pub mod state;

pub use access::AccessMode;
pub use errors::FileError;
pub use file::FileHandle;
pub use plain::Plain;
pub use state::{StateFlags, StreamState};
