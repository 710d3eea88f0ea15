//! Reader for decoding WAL frame streams.
//!
//! This module turns a byte source back into the sequence of strings that
//! was written to it, one frame at a time.

use std::io::{ErrorKind, Read};
use std::iter::FusedIterator;

use tracing::{trace, warn};

use crate::error::{Result, WalError};
use crate::frame_codec::FRAME_HEADER_LEN;

/// Where the reader is in the frame grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    AwaitingLength,
    AwaitingPayload(u32),
    Done,
    Failed,
}

/// Lazy decoder over a stream of length-prefixed frames.
///
/// `FrameReader` yields each frame's payload as a `String`, in the order the
/// frames appear in the source. It stops cleanly (`None`) when the source is
/// exhausted exactly on a frame boundary. Any malformed frame produces a
/// single `Err` and the reader then stays finished; there is no attempt to
/// skip ahead and resynchronise.
///
/// The reader is not restartable. To scan a file again, open it again and
/// build a new reader.
///
/// # How It Works
///
/// 1. Read up to 4 bytes. Zero bytes means clean end of stream; 1 to 3 bytes
///    means the stream was cut inside a length prefix.
/// 2. Read exactly `len` payload bytes, failing if the source runs short.
/// 3. Validate the payload as UTF-8 and yield it.
///
/// # Examples
///
/// ```
/// # use wal_frames::{write_record, FrameReader};
/// let mut data = Vec::new();
/// write_record(&mut data, "name", "James Errington").unwrap();
/// write_record(&mut data, "country", "United Kingdom").unwrap();
///
/// let strings: Vec<String> = FrameReader::new(&data[..])
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(strings, ["name", "James Errington", "country", "United Kingdom"]);
/// ```
pub struct FrameReader<R> {
    source: R,
    state: DecodeState,
    pos: u64,
    frames_read: u64,
}

impl<R: Read> FrameReader<R> {
    /// Creates a reader positioned at the start of `source`.
    pub fn new(source: R) -> Self {
        Self {
            source,
            state: DecodeState::AwaitingLength,
            pos: 0,
            frames_read: 0,
        }
    }

    /// Number of bytes consumed from the source so far.
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Number of frames successfully decoded so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Returns the underlying source.
    pub fn into_inner(self) -> R {
        self.source
    }

    /// Groups consecutive strings into `(key, value)` records.
    pub fn records(self) -> Records<R> {
        Records { frames: self }
    }

    /// Fills as much of `buf` as the source allows and returns how many
    /// bytes were read. Stops short only at end of stream.
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.source.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        self.pos += filled as u64;
        Ok(filled)
    }

    /// Reads a length prefix. `Ok(None)` is a clean end of stream.
    fn read_len(&mut self) -> Result<Option<u32>> {
        let mut prefix = [0u8; FRAME_HEADER_LEN];
        match self.fill(&mut prefix)? {
            0 => Ok(None),
            FRAME_HEADER_LEN => Ok(Some(u32::from_le_bytes(prefix))),
            found => Err(WalError::TruncatedLengthPrefix { found }),
        }
    }

    fn read_payload(&mut self, len: u32) -> Result<String> {
        // Bounded by `take` so a corrupt prefix can't demand a huge buffer
        // up front; the Vec only grows as real bytes arrive.
        let mut payload = Vec::new();
        (&mut self.source).take(len as u64).read_to_end(&mut payload)?;
        self.pos += payload.len() as u64;

        if payload.len() < len as usize {
            return Err(WalError::TruncatedPayload {
                expected: len,
                found: payload.len(),
            });
        }
        Ok(String::from_utf8(payload)?)
    }

    fn step(&mut self) -> Result<Option<String>> {
        loop {
            match self.state {
                DecodeState::AwaitingLength => match self.read_len()? {
                    Some(len) => self.state = DecodeState::AwaitingPayload(len),
                    None => {
                        self.state = DecodeState::Done;
                        return Ok(None);
                    }
                },
                DecodeState::AwaitingPayload(len) => {
                    let s = self.read_payload(len)?;
                    self.state = DecodeState::AwaitingLength;
                    self.frames_read += 1;
                    trace!(len, frame = self.frames_read, "read frame");
                    return Ok(Some(s));
                }
                DecodeState::Done | DecodeState::Failed => return Ok(None),
            }
        }
    }
}

impl<R: Read> Iterator for FrameReader<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.step() {
            Ok(s) => s.map(Ok),
            Err(e) => {
                self.state = DecodeState::Failed;
                warn!(offset = self.pos, frame = self.frames_read, error = %e, "frame stream decode failed");
                Some(Err(e))
            }
        }
    }
}

impl<R: Read> FusedIterator for FrameReader<R> {}

/// Iterator adapter pairing consecutive frames as `(key, value)`.
///
/// Created by [`FrameReader::records`]. A key with no value frame after it
/// yields [`WalError::UnpairedKey`].
pub struct Records<R> {
    frames: FrameReader<R>,
}

impl<R: Read> Iterator for Records<R> {
    type Item = Result<(String, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        let key = match self.frames.next()? {
            Ok(key) => key,
            Err(e) => return Some(Err(e)),
        };
        match self.frames.next() {
            Some(Ok(value)) => Some(Ok((key, value))),
            Some(Err(e)) => Some(Err(e)),
            None => Some(Err(WalError::UnpairedKey { key })),
        }
    }
}

impl<R: Read> FusedIterator for Records<R> {}

/// Starts a lazy decode of every string in `source`.
pub fn read_strings<R: Read>(source: R) -> FrameReader<R> {
    FrameReader::new(source)
}

/// Decodes a complete in-memory stream.
///
/// # Examples
///
/// ```
/// # use wal_frames::decode_all;
/// assert!(decode_all(&[]).unwrap().is_empty());
/// assert_eq!(decode_all(&[0, 0, 0, 0]).unwrap(), [""]);
/// ```
pub fn decode_all(bytes: &[u8]) -> Result<Vec<String>> {
    FrameReader::new(bytes).collect()
}
