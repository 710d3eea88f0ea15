//! Encoding side of the WAL frame format.
//!
//! A frame is a 4-byte little-endian length followed by that many UTF-8
//! bytes. Frames are written back to back with no separator, magic number or
//! terminator, so a stream is just `Frame*` and ends where the file ends.

use std::io::Write;

use tracing::trace;

use crate::error::{Result, WalError};

/// Size of the length prefix in bytes.
pub const FRAME_HEADER_LEN: usize = 4;

/// Converts a payload byte length into the value stored in the prefix.
///
/// Lengths of `2^32` bytes or more are rejected with
/// [`WalError::LengthOverflow`]; they are never truncated to the low 32 bits.
///
/// # Examples
///
/// ```
/// # use wal_frames::frame_codec::frame_len;
/// assert_eq!(frame_len(7).unwrap(), 7);
/// ```
#[inline]
pub fn frame_len(byte_len: usize) -> Result<u32> {
    u32::try_from(byte_len).map_err(|_| WalError::LengthOverflow { len: byte_len })
}

/// Encodes one string as a standalone frame.
///
/// The output is exactly `4 + s.len()` bytes. Note that `s.len()` is the UTF-8
/// byte length, not the character count, so `"España"` gets a prefix of 7.
///
/// # Binary Format
///
/// `[len: u32 little-endian | utf8 bytes (len)]`
///
/// # Examples
///
/// ```
/// # use wal_frames::encode_frame;
/// let frame = encode_frame("hi").unwrap();
/// assert_eq!(frame, [2, 0, 0, 0, b'h', b'i']);
///
/// // The empty string is a bare zero prefix
/// assert_eq!(encode_frame("").unwrap(), [0, 0, 0, 0]);
/// ```
pub fn encode_frame(s: &str) -> Result<Vec<u8>> {
    let len = frame_len(s.len())?;
    let mut frame = Vec::with_capacity(FRAME_HEADER_LEN + s.len());
    frame.extend_from_slice(&len.to_le_bytes());
    frame.extend_from_slice(s.as_bytes());
    Ok(frame)
}

/// Writes one frame to `sink` and returns the number of bytes written.
///
/// The length check happens before the sink is touched, so an oversized
/// string leaves the sink unchanged.
pub fn write_frame<W: Write + ?Sized>(sink: &mut W, s: &str) -> Result<usize> {
    let len = frame_len(s.len())?;
    put_frame(sink, len, s)
}

/// Writes a key/value record as two consecutive frames, key first.
///
/// Both lengths are validated up front: if either string is too large,
/// nothing at all is written. The codec has no notion of a record beyond
/// this ordering; pairing on the way back in is up to the reader.
///
/// # Examples
///
/// ```
/// # use wal_frames::{write_record, decode_all};
/// let mut buf = Vec::new();
/// write_record(&mut buf, "name", "James Errington").unwrap();
/// assert_eq!(decode_all(&buf).unwrap(), ["name", "James Errington"]);
/// ```
pub fn write_record<W: Write + ?Sized>(sink: &mut W, key: &str, value: &str) -> Result<usize> {
    let key_len = frame_len(key.len())?;
    let value_len = frame_len(value.len())?;

    let mut written = put_frame(sink, key_len, key)?;
    written += put_frame(sink, value_len, value)?;
    Ok(written)
}

fn put_frame<W: Write + ?Sized>(sink: &mut W, len: u32, s: &str) -> Result<usize> {
    sink.write_all(&len.to_le_bytes())?;
    sink.write_all(s.as_bytes())?;
    trace!(len, "wrote frame");
    Ok(FRAME_HEADER_LEN + s.len())
}
