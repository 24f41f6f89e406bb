//! Stream condition flags.
//!
//! Failures of the lenient [`FileHandle`](crate::FileHandle) surface are never
//! returned; they are recorded here and polled by the caller.

use bitflags::bitflags;
use serde::Serialize;
use std::fmt;

bitflags! {
    /// Bitmask of stream conditions. Bit values match the classic iostream ones.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
    #[serde(transparent)]
    pub struct StateFlags: u32 {
        /// Unrecoverable I/O error on the underlying file.
        const BAD = 1;
        /// End of file was reached by an input operation.
        const EOF = 2;
        /// An operation could not produce its result.
        const FAIL = 4;
    }
}

impl StateFlags {
    /// No condition raised.
    pub const GOOD: StateFlags = StateFlags::empty();
}

impl fmt::Display for StateFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("good");
        }
        bitflags::parser::to_writer(self, f)
    }
}

/// Pending flags plus a sticky end-of-file indicator.
///
/// [`StreamState::take`] consumes the pending flags, while [`StreamState::eof`]
/// only peeks at the indicator. The indicator survives `take` and is reset by a
/// successful read-cursor seek or a read that did not run into the end.
#[derive(Clone, Copy, Debug, Default)]
pub struct StreamState {
    pending: StateFlags,
    at_eof: bool,
}

impl StreamState {
    pub fn raise(&mut self, flags: StateFlags) {
        if flags.contains(StateFlags::EOF) {
            self.at_eof = true;
        }
        self.pending |= flags;
    }

    pub fn take(&mut self) -> StateFlags {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> StateFlags {
        self.pending
    }

    pub fn eof(&self) -> bool {
        self.at_eof
    }

    pub fn clear_eof(&mut self) {
        self.at_eof = false;
    }

    /// Forgets everything, used when a new stream is opened.
    pub fn reset(&mut self) {
        *self = StreamState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_bits() {
        let flags = StateFlags::EOF | StateFlags::FAIL;
        assert_eq!(flags.bits(), 6);
        assert!(flags.contains(StateFlags::EOF));
        assert!(!flags.contains(StateFlags::BAD));
        assert!(StateFlags::GOOD.is_empty());
        assert_eq!(StateFlags::from_bits_truncate(0xff).bits(), 7);
    }

    #[test]
    fn test_display() {
        assert_eq!(StateFlags::GOOD.to_string(), "good");
        assert_eq!(
            (StateFlags::FAIL | StateFlags::EOF).to_string(),
            "EOF | FAIL"
        );
        assert_eq!(StateFlags::BAD.to_string(), "BAD");
    }

    #[test]
    fn test_serializes_as_flag_names() {
        let json = serde_json::to_string(&(StateFlags::EOF | StateFlags::FAIL)).unwrap();
        assert_eq!(json, "\"EOF | FAIL\"");
    }

    #[test]
    fn test_take_consumes_but_eof_is_sticky() {
        let mut state = StreamState::default();
        state.raise(StateFlags::EOF | StateFlags::FAIL);

        assert_eq!(state.take(), StateFlags::EOF | StateFlags::FAIL);
        assert!(state.eof());
        assert!(state.take().is_empty());
        assert!(state.eof());

        state.clear_eof();
        assert!(!state.eof());
    }

    #[test]
    fn test_bad_does_not_set_eof() {
        let mut state = StreamState::default();
        state.raise(StateFlags::BAD);
        assert!(!state.eof());
        assert_eq!(state.pending(), StateFlags::BAD);
        state.reset();
        assert!(state.pending().is_empty());
    }
}
