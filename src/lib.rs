//! # WAL Frames
//!
//! A minimal length-prefixed framing codec for sequential logs of key/value
//! strings.
//!
//! Every string is written as one frame:
//!
//! ```text
//! Stream       := Frame*
//! Frame        := LengthPrefix Payload
//! LengthPrefix := u32, little-endian
//! Payload      := byte[LengthPrefix], UTF-8
//! ```
//!
//! There is no magic number, version, checksum or terminator. A stream ends
//! where its file ends, and a record is simply a key frame followed by a value
//! frame.
//!
//! ## Main Components
//!
//! * `frame_codec`: encoding strings and key/value records into frames
//! * `FrameReader`: lazy, fail-fast decoding of a frame stream
//! * `wal_clock`: injectable wall clock and `<micros>.wal` file naming
//! * `wal_file`: creating and opening WAL files on disk
//!
//! ## Quick Start
//!
//! ```
//! use wal_frames::{read_strings, WalWriter};
//!
//! let mut writer = WalWriter::new(Vec::new());
//! writer.write_record("name", "James Errington").unwrap();
//! writer.write_record("country", "United Kingdom").unwrap();
//! let data = writer.into_inner();
//!
//! for s in read_strings(&data[..]) {
//!     println!("{}", s.unwrap());
//! }
//! ```

pub mod error;
pub mod frame_codec;
pub mod frame_reader;
pub mod wal_clock;
pub mod wal_file;

pub use error::{Result, WalError};
pub use frame_codec::{encode_frame, write_frame, write_record};
pub use frame_reader::{decode_all, read_strings, FrameReader, Records};
pub use wal_clock::{ManualClock, SystemClock, TimeSource};
pub use wal_file::{create_wal_file, open_wal_file, WalConfig, WalWriter};
