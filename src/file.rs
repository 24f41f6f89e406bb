//! Single file handle with typed reads and writes.
//!
//! This module provides [`FileHandle`], a wrapper around [`std::fs::File`] that
//! keeps separate read and write cursors, offers text reads split on a
//! delimiter byte and moves [`Plain`] values to and from their byte images.
//!
//! The main surface never fails loudly: operations on a closed handle are no-ops
//! or return defaults, and stream problems are recorded as [`StateFlags`] to be
//! polled through [`FileHandle::state`] and [`FileHandle::eof`]. Every fallible
//! operation also has a `try_*` twin returning a [`FileError`] instead.

use std::{
    fs::File,
    io::{self, ErrorKind, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use log::{debug, warn};

use crate::access::AccessMode;
use crate::errors::FileError;
use crate::plain::{decode_slice, encode_slice, Plain};
use crate::state::{StateFlags, StreamState};

/// Size of the scratch buffer used while scanning for a delimiter.
const TOKEN_CHUNK_SIZE: usize = 512;

/// An open (or closed) connection to one file.
///
/// The stream is released when the handle is closed, re-opened or dropped.
#[derive(Debug, Default)]
pub struct FileHandle {
    /// Path given to the last `open`, kept even when that open failed.
    path: PathBuf,
    /// The underlying file, `None` while closed.
    file: Option<File>,
    /// Access requested by the last `open`.
    access: AccessMode,
    /// Offset of the next read.
    read_cursor: u64,
    /// Offset of the next write.
    write_cursor: u64,
    state: StreamState,
}

impl FileHandle {
    /// Creates a closed handle.
    pub fn new() -> FileHandle {
        FileHandle::default()
    }

    /// Creates a handle and immediately opens `path`.
    ///
    /// Failure is not reported here; check [`FileHandle::is_open`].
    pub fn with_path<P: AsRef<Path>>(path: P, read: bool, write: bool) -> FileHandle {
        let mut handle = FileHandle::new();
        handle.open(path, read, write);
        handle
    }

    /// Opens `path` in binary mode, closing any stream opened before.
    ///
    /// Returns `true` when the file is open afterwards. A failed open raises
    /// [`StateFlags::FAIL`] and leaves the handle closed.
    pub fn open<P: AsRef<Path>>(&mut self, path: P, read: bool, write: bool) -> bool {
        match self.try_open(path, AccessMode::new(read, write)) {
            Ok(()) => true,
            Err(error) => {
                warn!("Could not open '{}': {}", self.path.display(), error);
                self.state.raise(StateFlags::FAIL);
                false
            }
        }
    }

    /// Strict variant of [`FileHandle::open`].
    pub fn try_open<P: AsRef<Path>>(&mut self, path: P, access: AccessMode) -> Result<(), FileError> {
        self.close();
        self.path = path.as_ref().to_path_buf();
        self.access = access;
        self.read_cursor = 0;
        self.write_cursor = 0;
        self.state.reset();

        if !access.is_usable() {
            return Err(FileError::NoAccessMode);
        }

        let file = access.open_options().open(&self.path)?;
        debug!(
            "Opened '{}' (read: {}, write: {})",
            self.path.display(),
            access.read,
            access.write
        );
        self.file = Some(file);
        Ok(())
    }

    /// Releases the stream. Does nothing when already closed.
    pub fn close(&mut self) {
        if let Some(file) = self.file.take() {
            debug!("Closing '{}'", self.path.display());
            drop(file);
        }
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Path given to the last open attempt.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn access(&self) -> AccessMode {
        self.access
    }

    // ===== Text reads ========================================================

    /// Reads up to the next line feed, which is consumed but not returned.
    pub fn read_line(&mut self) -> String {
        self.read_token(b'\n')
    }

    /// Reads up to the next NUL byte, which is consumed but not returned.
    pub fn read_string(&mut self) -> String {
        self.read_token(0)
    }

    /// Reads up to the next `delimiter` byte, which is consumed but not returned.
    ///
    /// Bytes are decoded as UTF-8, invalid sequences being replaced. When the
    /// file ends first, whatever was read is returned and [`StateFlags::EOF`] is
    /// raised; [`StateFlags::FAIL`] is added if nothing at all was read. On a
    /// closed handle the result is empty and `FAIL` is raised.
    pub fn read_token(&mut self, delimiter: u8) -> String {
        match self.read_until(delimiter) {
            Ok((bytes, found)) => {
                if found {
                    self.state.clear_eof();
                } else if bytes.is_empty() {
                    self.state.raise(StateFlags::EOF | StateFlags::FAIL);
                } else {
                    self.state.raise(StateFlags::EOF);
                }
                String::from_utf8_lossy(&bytes).into_owned()
            }
            Err(FileError::NotOpen) => {
                self.state.raise(StateFlags::FAIL);
                String::new()
            }
            Err(error) => {
                self.record(error);
                String::new()
            }
        }
    }

    /// Strict variant of [`FileHandle::read_token`], returning raw bytes.
    ///
    /// A final token cut short by the end of the file is returned as is; only
    /// a read that finds nothing at all is an error.
    pub fn try_read_token(&mut self, delimiter: u8) -> Result<Vec<u8>, FileError> {
        let (bytes, found) = self.read_until(delimiter)?;
        if !found && bytes.is_empty() {
            return Err(FileError::UnexpectedEof {
                expected: 1,
                read: 0,
            });
        }
        Ok(bytes)
    }

    // ===== Writes ============================================================

    /// Writes the bytes of `text` at the write cursor. No delimiter is added.
    pub fn write_str(&mut self, text: &str) {
        self.write_bytes(text.as_bytes());
    }

    /// Writes `bytes` at the write cursor.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        if let Err(error) = self.try_write_bytes(bytes) {
            self.record(error);
        }
    }

    /// Strict variant of [`FileHandle::write_bytes`].
    pub fn try_write_bytes(&mut self, bytes: &[u8]) -> Result<(), FileError> {
        self.write_at_cursor(bytes)
    }

    /// Writes the `T::SIZE` byte image of `value` at the write cursor.
    pub fn write<T: Plain>(&mut self, value: T) {
        if let Err(error) = self.try_write(value) {
            self.record(error);
        }
    }

    /// Strict variant of [`FileHandle::write`].
    pub fn try_write<T: Plain>(&mut self, value: T) -> Result<(), FileError> {
        if !self.is_open() {
            return Err(FileError::NotOpen);
        }
        self.write_at_cursor(&value.to_bytes())
    }

    /// Writes the images of all `values` back to back at the write cursor.
    pub fn write_buffer<T: Plain>(&mut self, values: &[T]) {
        if let Err(error) = self.try_write_buffer(values) {
            self.record(error);
        }
    }

    /// Strict variant of [`FileHandle::write_buffer`].
    pub fn try_write_buffer<T: Plain>(&mut self, values: &[T]) -> Result<(), FileError> {
        if !self.is_open() {
            return Err(FileError::NotOpen);
        }
        let mut bytes = vec![0u8; T::SIZE * values.len()];
        encode_slice(values, &mut bytes);
        self.write_at_cursor(&bytes)
    }

    // ===== Typed reads =======================================================

    /// Reads one `T` at the read cursor.
    ///
    /// Returns the all-zero value ([`Plain::zeroed`]) when the handle is closed
    /// or the file ends before `T::SIZE` bytes could be read (the latter raises
    /// `EOF | FAIL`).
    pub fn read<T: Plain>(&mut self) -> T {
        match self.try_read() {
            Ok(value) => value,
            Err(error) => {
                self.record(error);
                T::zeroed()
            }
        }
    }

    /// Strict variant of [`FileHandle::read`].
    pub fn try_read<T: Plain>(&mut self) -> Result<T, FileError> {
        let mut bytes = vec![0u8; T::SIZE];
        self.read_exact_at_cursor(&mut bytes)?;
        Ok(T::decode(&bytes))
    }

    /// Fills `values` with consecutive `T` images read at the read cursor.
    ///
    /// On a short read the complete leading elements are decoded and the rest
    /// of `values` is left untouched.
    pub fn read_buffer<T: Plain>(&mut self, values: &mut [T]) {
        if let Err(error) = self.try_read_buffer(values) {
            self.record(error);
        }
    }

    /// Strict variant of [`FileHandle::read_buffer`].
    pub fn try_read_buffer<T: Plain>(&mut self, values: &mut [T]) -> Result<(), FileError> {
        let expected = T::SIZE * values.len();
        let mut bytes = vec![0u8; expected];
        let read = self.read_at_cursor(&mut bytes)?;
        decode_slice(&bytes[..read], values);
        if read < expected {
            return Err(FileError::UnexpectedEof { expected, read });
        }
        self.state.clear_eof();
        Ok(())
    }

    // ===== Positions =========================================================

    /// Offset of the next write, `0` when closed.
    pub fn write_position(&self) -> u64 {
        if !self.is_open() {
            return 0;
        }
        self.write_cursor
    }

    /// Moves the write cursor. Ignored when closed.
    pub fn set_write_position(&mut self, position: u64) {
        if !self.is_open() {
            return;
        }
        self.write_cursor = position;
    }

    /// Offset of the next read, `0` when closed.
    pub fn read_position(&self) -> u64 {
        if !self.is_open() {
            return 0;
        }
        self.read_cursor
    }

    /// Moves the read cursor and clears the end-of-file indicator. Ignored when
    /// closed.
    pub fn set_read_position(&mut self, position: u64) {
        // Closed handles stay silent here, unlike text reads.
        let _ = self.try_set_read_position(position);
    }

    /// Strict variant of [`FileHandle::set_read_position`].
    pub fn try_set_read_position(&mut self, position: u64) -> Result<(), FileError> {
        if !self.is_open() {
            return Err(FileError::NotOpen);
        }
        self.read_cursor = position;
        self.state.clear_eof();
        Ok(())
    }

    // ===== Size & state ======================================================

    /// Current length of the file in bytes, `0` when closed.
    ///
    /// Seeks to the end on every call; both cursors are left where they were.
    pub fn size(&mut self) -> u64 {
        match self.try_size() {
            Ok(size) => size,
            Err(error) => {
                self.record(error);
                0
            }
        }
    }

    /// Strict variant of [`FileHandle::size`].
    pub fn try_size(&mut self) -> Result<u64, FileError> {
        let file = self.file.as_mut().ok_or(FileError::NotOpen)?;
        let saved = self.read_cursor;
        let end = file.seek(SeekFrom::End(0))?;
        self.read_cursor = saved;
        Ok(end)
    }

    /// Returns the raised flags and clears them.
    ///
    /// The end-of-file indicator seen by [`FileHandle::eof`] is not affected.
    pub fn state(&mut self) -> StateFlags {
        self.state.take()
    }

    /// Whether an input operation ran into the end of the file. Does not clear
    /// anything.
    pub fn eof(&self) -> bool {
        self.state.eof()
    }

    // ===== Internals =========================================================

    /// Folds a strict error into the flags. `NotOpen` stays silent.
    fn record(&mut self, error: FileError) {
        match error {
            FileError::NotOpen => {}
            FileError::NoAccessMode => self.state.raise(StateFlags::FAIL),
            FileError::UnexpectedEof { .. } => {
                self.state.raise(StateFlags::EOF | StateFlags::FAIL)
            }
            FileError::Io(error) => {
                warn!("I/O error on '{}': {}", self.path.display(), error);
                self.state.raise(StateFlags::BAD);
            }
        }
    }

    /// Reads into `buf` from the read cursor until it is full or the file
    /// ends. The cursor advances by the number of bytes returned.
    fn read_at_cursor(&mut self, buf: &mut [u8]) -> Result<usize, FileError> {
        let file = self.file.as_mut().ok_or(FileError::NotOpen)?;
        file.seek(SeekFrom::Start(self.read_cursor))?;

        let mut filled = 0;
        while filled < buf.len() {
            match file.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.read_cursor += filled as u64;
                    return Err(e.into());
                }
            }
        }
        self.read_cursor += filled as u64;
        Ok(filled)
    }

    fn read_exact_at_cursor(&mut self, buf: &mut [u8]) -> Result<(), FileError> {
        let read = self.read_at_cursor(buf)?;
        if read < buf.len() {
            return Err(FileError::UnexpectedEof {
                expected: buf.len(),
                read,
            });
        }
        self.state.clear_eof();
        Ok(())
    }

    /// Scans from the read cursor for `delimiter`.
    ///
    /// Returns the bytes before it and whether it was found. The delimiter is
    /// consumed; bytes after it are left for the next read.
    fn read_until(&mut self, delimiter: u8) -> Result<(Vec<u8>, bool), FileError> {
        let file = self.file.as_mut().ok_or(FileError::NotOpen)?;
        file.seek(SeekFrom::Start(self.read_cursor))?;

        let mut token = Vec::new();
        let mut chunk = [0u8; TOKEN_CHUNK_SIZE];
        loop {
            let n = match file.read(&mut chunk) {
                Ok(0) => return Ok((token, false)),
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if let Some(index) = chunk[..n].iter().position(|byte| *byte == delimiter) {
                token.extend_from_slice(&chunk[..index]);
                self.read_cursor += index as u64 + 1;
                return Ok((token, true));
            }
            token.extend_from_slice(&chunk[..n]);
            self.read_cursor += n as u64;
        }
    }

    fn write_at_cursor(&mut self, bytes: &[u8]) -> Result<(), FileError> {
        let file = self.file.as_mut().ok_or(FileError::NotOpen)?;
        file.flush()?;
        file.seek(SeekFrom::Start(self.write_cursor))?;
        file.write_all(bytes)?;
        self.write_cursor += bytes.len() as u64;
        Ok(())
    }
}

impl Drop for FileHandle {
    fn drop(&mut self) {
        self.close();
    }
}

impl Read for FileHandle {
    /// Reads at the read cursor, filling `buf` unless the file ends first.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_at_cursor(buf)?)
    }
}

impl Write for FileHandle {
    /// Writes all of `buf` at the write cursor.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_at_cursor(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Err(FileError::NotOpen.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impl_plain;
    use tempfile::TempDir;

    #[derive(Clone, Copy, Default, Debug, PartialEq)]
    #[repr(C)]
    struct Pack {
        a: i32,
        b: i32,
    }

    impl_plain!(Pack { a: i32, b: i32 });

    fn scratch(name: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(name);
        (dir, path)
    }

    #[test]
    fn test_open_missing_file_read_only_fails() {
        let (_dir, path) = scratch("missing.bin");
        let mut handle = FileHandle::new();

        assert!(!handle.open(&path, true, false));
        assert!(!handle.is_open());
        assert_eq!(handle.path(), path.as_path());
        assert!(handle.state().contains(StateFlags::FAIL));
    }

    #[test]
    fn test_open_for_write_creates_file() {
        let (_dir, path) = scratch("new.bin");
        let handle = FileHandle::with_path(&path, false, true);

        assert!(handle.is_open());
        assert!(path.exists());
        assert_eq!(handle.access(), AccessMode::write_only());
    }

    #[test]
    fn test_open_without_access_fails() {
        let (_dir, path) = scratch("none.bin");
        let mut handle = FileHandle::new();

        assert!(!handle.open(&path, false, false));
        assert!(!handle.is_open());
        assert!(matches!(
            handle.try_open(&path, AccessMode::new(false, false)),
            Err(FileError::NoAccessMode)
        ));
    }

    #[test]
    fn test_scenario_two_integers() {
        let (_dir, path) = scratch("a.bin");
        let mut handle = FileHandle::new();
        assert!(handle.open(&path, true, true));

        handle.write(42i32);
        assert_eq!(handle.write_position(), 4);
        handle.write(7i32);
        handle.set_read_position(0);

        assert_eq!(handle.read::<i32>(), 42);
        assert_eq!(handle.read::<i32>(), 7);
        assert_eq!(handle.size(), 8);
        assert!(handle.state().is_empty());
    }

    #[test]
    fn test_value_round_trip() {
        let (_dir, path) = scratch("values.bin");
        let mut handle = FileHandle::with_path(&path, true, true);

        handle.write(-1.25f64);
        handle.write(Pack { a: 3, b: -9 });
        handle.write(u128::MAX - 1);

        handle.set_read_position(0);
        assert_eq!(handle.read::<f64>(), -1.25);
        assert_eq!(handle.read::<Pack>(), Pack { a: 3, b: -9 });
        assert_eq!(handle.read::<u128>(), u128::MAX - 1);
        assert_eq!(handle.read_position(), 8 + 8 + 16);
    }

    #[test]
    fn test_buffer_round_trip() {
        let (_dir, path) = scratch("buffer.bin");
        let mut handle = FileHandle::with_path(&path, true, true);
        let packs = [Pack { a: 1, b: 2 }, Pack { a: 3, b: 4 }, Pack { a: 5, b: 6 }];

        handle.write_buffer(&packs);
        assert_eq!(handle.size(), 24);

        let mut loaded = [Pack::default(); 3];
        handle.set_read_position(0);
        handle.read_buffer(&mut loaded);
        assert_eq!(loaded, packs);
    }

    #[test]
    fn test_short_buffer_read_keeps_tail() {
        let (_dir, path) = scratch("short.bin");
        let mut handle = FileHandle::with_path(&path, true, true);
        handle.write_buffer(&[10u16, 20u16]);
        handle.write(0xffu8);

        let mut loaded = [0u16; 4];
        handle.read_buffer(&mut loaded);

        assert_eq!(loaded, [10, 20, 0, 0]);
        assert_eq!(handle.read_position(), 5);
        assert_eq!(handle.state(), StateFlags::EOF | StateFlags::FAIL);
        assert!(handle.eof());
    }

    #[test]
    fn test_short_read_returns_default() {
        let (_dir, path) = scratch("partial.bin");
        let mut handle = FileHandle::with_path(&path, true, true);
        handle.write_bytes(&[1, 2]);

        assert_eq!(handle.read::<u32>(), 0);
        assert!(handle.eof());

        handle.set_read_position(0);
        assert!(matches!(
            handle.try_read::<u32>(),
            Err(FileError::UnexpectedEof {
                expected: 4,
                read: 2
            })
        ));
    }

    #[test]
    fn test_size_restores_read_cursor() {
        let (_dir, path) = scratch("size.bin");
        let mut handle = FileHandle::with_path(&path, true, true);
        handle.write_str("0123456789");

        handle.set_read_position(3);
        assert_eq!(handle.size(), 10);
        assert_eq!(handle.read_position(), 3);
        assert_eq!(handle.read::<u8>(), b'3');
    }

    #[test]
    fn test_cursors_are_independent() {
        let (_dir, path) = scratch("cursors.bin");
        let mut handle = FileHandle::with_path(&path, true, true);

        handle.write_str("abc\n");
        assert_eq!(handle.read_position(), 0);
        assert_eq!(handle.read_line(), "abc");
        assert_eq!(handle.write_position(), 4);

        handle.write_str("def\n");
        assert_eq!(handle.read_position(), 4);
        assert_eq!(handle.read_line(), "def");

        handle.set_write_position(0);
        handle.write_str("X");
        assert_eq!(handle.read_position(), 8);
        handle.set_read_position(0);
        assert_eq!(handle.read_line(), "Xbc");
    }

    #[test]
    fn test_text_reads() {
        let (_dir, path) = scratch("text.bin");
        let mut handle = FileHandle::with_path(&path, true, true);
        handle.write_str("first line\n\nname\0a,b;tail");

        assert_eq!(handle.read_line(), "first line");
        assert_eq!(handle.read_line(), "");
        assert_eq!(handle.read_string(), "name");
        assert_eq!(handle.read_token(b','), "a");
        assert_eq!(handle.read_token(b';'), "b");
        assert!(handle.state().is_empty());

        assert_eq!(handle.read_token(b';'), "tail");
        assert_eq!(handle.state(), StateFlags::EOF);
        assert!(handle.eof());
    }

    #[test]
    fn test_long_token_spans_chunks() {
        let (_dir, path) = scratch("long.bin");
        let mut handle = FileHandle::with_path(&path, true, true);
        let long = "x".repeat(TOKEN_CHUNK_SIZE * 2 + 7);
        handle.write_str(&long);
        handle.write_str("\nnext\n");

        assert_eq!(handle.read_line(), long);
        assert_eq!(handle.read_line(), "next");
    }

    #[test]
    fn test_read_line_at_end_of_file() {
        let (_dir, path) = scratch("eof.bin");
        let mut handle = FileHandle::with_path(&path, true, true);
        handle.write_str("only\n");
        assert_eq!(handle.read_line(), "only");
        assert!(!handle.eof());

        assert_eq!(handle.read_line(), "");
        assert!(handle.eof());
        assert!(handle
            .try_read_token(b'\n')
            .is_err_and(|e| matches!(e, FileError::UnexpectedEof { .. })));
    }

    #[test]
    fn test_state_clears_but_eof_stays_until_seek() {
        let (_dir, path) = scratch("state.bin");
        let mut handle = FileHandle::with_path(&path, true, true);

        assert_eq!(handle.read_line(), "");
        assert_eq!(handle.state(), StateFlags::EOF | StateFlags::FAIL);
        assert!(handle.eof());
        assert!(handle.state().is_empty());
        assert!(handle.eof());

        handle.set_read_position(0);
        assert!(!handle.eof());
    }

    #[test]
    fn test_complete_read_clears_eof() {
        let (_dir, path) = scratch("resume.bin");
        let mut handle = FileHandle::with_path(&path, true, true);

        assert_eq!(handle.read_line(), "");
        assert!(handle.eof());
        handle.write_str("a\n");
        assert_eq!(handle.read_line(), "a");
        assert!(!handle.eof());

        assert_eq!(handle.read::<u32>(), 0);
        assert!(handle.eof());
        handle.write(99u32);
        assert_eq!(handle.read::<u32>(), 99);
        assert!(!handle.eof());

        handle.read::<u8>();
        assert!(handle.eof());
        handle.write_buffer(&[1u16, 2u16]);
        let mut pair = [0u16; 2];
        handle.read_buffer(&mut pair);
        assert_eq!(pair, [1, 2]);
        assert!(!handle.eof());
    }

    #[test]
    fn test_wide_array_round_trip() {
        let (_dir, path) = scratch("wide.bin");
        let mut handle = FileHandle::with_path(&path, true, true);
        let mut name = [0u8; 64];
        name[..8].copy_from_slice(b"volume-1");

        handle.write([7u8; 64]);
        handle.write(name);
        assert_eq!(handle.size(), 128);

        handle.set_read_position(0);
        assert_eq!(handle.read::<[u8; 64]>(), [7u8; 64]);
        assert_eq!(handle.read::<[u8; 64]>(), name);
        assert_eq!(handle.read::<[u8; 64]>(), [0u8; 64]);
        assert!(handle.eof());
    }

    #[test]
    fn test_closed_handle_defaults() {
        let mut handle = FileHandle::new();

        handle.write(5u32);
        handle.write_str("ignored");
        handle.write_buffer(&[1u8, 2, 3]);
        handle.set_write_position(9);
        handle.set_read_position(9);
        assert!(handle.state().is_empty());

        assert_eq!(handle.read::<u64>(), 0);
        let mut values = [7u8; 2];
        handle.read_buffer(&mut values);
        assert_eq!(values, [7, 7]);
        assert_eq!(handle.write_position(), 0);
        assert_eq!(handle.read_position(), 0);
        assert_eq!(handle.size(), 0);
        assert!(handle.state().is_empty());

        assert_eq!(handle.read_line(), "");
        assert_eq!(handle.state(), StateFlags::FAIL);
        assert!(matches!(handle.try_size(), Err(FileError::NotOpen)));
    }

    #[test]
    fn test_close_is_idempotent() {
        let (_dir, path) = scratch("close.bin");
        let mut handle = FileHandle::with_path(&path, true, true);
        handle.write(1u8);

        handle.close();
        handle.close();
        assert!(!handle.is_open());
        assert_eq!(handle.read::<u8>(), 0);
    }

    #[test]
    fn test_reopen_resets_cursors() {
        let (_dir, first) = scratch("first.bin");
        let second = first.with_file_name("second.bin");
        let mut handle = FileHandle::with_path(&first, true, true);
        handle.write(1u64);
        handle.set_read_position(8);
        handle.read::<u8>();

        assert!(handle.open(&second, true, true));
        assert_eq!(handle.path(), second.as_path());
        assert_eq!(handle.write_position(), 0);
        assert_eq!(handle.read_position(), 0);
        assert!(!handle.eof());
        assert_eq!(handle.size(), 0);
    }

    #[test]
    fn test_read_write_keeps_existing_bytes() {
        let (_dir, path) = scratch("keep.bin");
        {
            let mut handle = FileHandle::with_path(&path, false, true);
            handle.write(0xdead_beefu32);
        }

        let mut handle = FileHandle::with_path(&path, true, true);
        assert_eq!(handle.size(), 4);
        assert_eq!(handle.read::<u32>(), 0xdead_beef);

        let mut reader = FileHandle::with_path(&path, true, false);
        assert_eq!(reader.read::<u32>(), 0xdead_beef);
    }

    #[test]
    fn test_write_on_read_only_handle_is_bad() {
        let (_dir, path) = scratch("ro.bin");
        std::fs::write(&path, b"data").unwrap();
        let mut handle = FileHandle::with_path(&path, true, false);

        handle.write(1u32);
        assert!(handle.state().contains(StateFlags::BAD));
        assert_eq!(handle.write_position(), 0);
        assert_eq!(std::fs::read(&path).unwrap(), b"data");
    }

    #[test]
    fn test_io_traits() {
        let (_dir, path) = scratch("traits.bin");
        let mut handle = FileHandle::with_path(&path, true, true);

        handle.write_all(b"hello world").unwrap();
        handle.flush().unwrap();

        let mut text = String::new();
        handle.read_to_string(&mut text).unwrap();
        assert_eq!(text, "hello world");
        assert_eq!(handle.read_position(), 11);

        let mut closed = FileHandle::new();
        assert!(closed.flush().is_err());
    }
}
