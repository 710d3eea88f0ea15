use std::io;
use std::string::FromUtf8Error;

use thiserror::Error;

/// Errors produced while writing or reading a WAL frame stream.
///
/// The first four variants are the format errors of the codec itself. `Io`
/// wraps whatever the underlying sink or source reported, and the remaining
/// variants belong to the file glue around the codec.
#[derive(Debug, Error)]
pub enum WalError {
    /// The string's UTF-8 byte length does not fit in the 32-bit prefix.
    #[error("string of {len} bytes does not fit in a 32-bit length prefix")]
    LengthOverflow { len: usize },

    /// The stream ended part way through a length prefix.
    #[error("stream ended after {found} of 4 length prefix bytes")]
    TruncatedLengthPrefix { found: usize },

    /// The stream ended before the announced payload was complete.
    #[error("frame announced {expected} payload bytes but only {found} remain")]
    TruncatedPayload { expected: u32, found: usize },

    /// The payload bytes are not valid UTF-8.
    #[error("frame payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// The time source reported an instant before 1970-01-01.
    #[error("clock reports a time before the unix epoch")]
    ClockBeforeEpoch,

    /// A key frame was the last frame in the stream.
    #[error("key {key:?} has no value frame")]
    UnpairedKey { key: String },
}

impl WalError {
    /// True for errors that mean the byte stream itself is malformed,
    /// as opposed to an I/O failure or a caller-side problem.
    pub fn is_malformed_stream(&self) -> bool {
        matches!(
            self,
            WalError::TruncatedLengthPrefix { .. }
                | WalError::TruncatedPayload { .. }
                | WalError::InvalidUtf8(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, WalError>;
