//! File handling around the frame codec.
//!
//! The codec itself only knows about byte sinks and sources. This module
//! decides where WAL files live, what they are called, and wraps them in
//! buffered readers and writers.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Result;
use crate::frame_codec;
use crate::frame_reader::FrameReader;
use crate::wal_clock::{micros_since_epoch, TimeSource, WAL_EXTENSION};

/// Where WAL files are written and what they are called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalConfig {
    pub data_dir: PathBuf,
    pub extension: String,
}

impl Default for WalConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            extension: WAL_EXTENSION.to_string(),
        }
    }
}

impl WalConfig {
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Builds a config from command line arguments, program name excluded.
    /// The first argument, if present, is the data directory.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathBuf>,
    {
        let config = Self::default();
        match args.into_iter().next() {
            Some(dir) => config.with_data_dir(dir),
            None => config,
        }
    }

    /// Path for a file created now, e.g. `data/1700000000123456.wal`.
    pub fn next_path(&self, clock: &dyn TimeSource) -> Result<PathBuf> {
        let micros = micros_since_epoch(clock.now())?;
        Ok(self.data_dir.join(format!("{}.{}", micros, self.extension)))
    }
}

/// Writes key/value records to a byte sink as WAL frames.
///
/// `WalWriter` is a thin counter-keeping wrapper; every byte goes through
/// [`frame_codec::write_record`]. It does not sync to disk. `flush` only
/// drains userspace buffers.
///
/// # Examples
///
/// ```
/// # use wal_frames::{WalWriter, decode_all};
/// let mut writer = WalWriter::new(Vec::new());
/// writer.write_record("name", "James Errington").unwrap();
/// assert_eq!(writer.records_written(), 1);
///
/// let data = writer.into_inner();
/// assert_eq!(decode_all(&data).unwrap(), ["name", "James Errington"]);
/// ```
pub struct WalWriter<W: Write> {
    sink: W,
    records_written: u64,
    bytes_written: u64,
}

impl<W: Write> WalWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            records_written: 0,
            bytes_written: 0,
        }
    }

    /// Appends one record: the key frame, then the value frame.
    pub fn write_record(&mut self, key: &str, value: &str) -> Result<()> {
        let n = frame_codec::write_record(&mut self.sink, key, value)?;
        self.records_written += 1;
        self.bytes_written += n as u64;
        Ok(())
    }

    /// Appends records in iteration order, stopping at the first error.
    pub fn write_all_records<'a, I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, value) in records {
            self.write_record(key, value)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }

    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

/// Creates a new WAL file named after the current time.
///
/// The data directory is created if missing. A file with the same name is
/// truncated.
pub fn create_wal_file(
    config: &WalConfig,
    clock: &dyn TimeSource,
) -> Result<(PathBuf, WalWriter<BufWriter<File>>)> {
    fs::create_dir_all(&config.data_dir)?;
    let path = config.next_path(clock)?;
    let file = File::create(&path)?;
    info!(path = %path.display(), "created wal file");
    Ok((path, WalWriter::new(BufWriter::new(file))))
}

/// Opens a WAL file for a fresh scan from the beginning.
pub fn open_wal_file(path: impl AsRef<Path>) -> Result<FrameReader<BufReader<File>>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    debug!(path = %path.display(), "opened wal file");
    Ok(FrameReader::new(BufReader::new(file)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wal_clock::ManualClock;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_default_config() {
        let config = WalConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.extension, "wal");
    }

    #[test]
    fn test_from_args_takes_first_positional() {
        let config = WalConfig::from_args(["/tmp/wal", "ignored"]);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/wal"));

        let config = WalConfig::from_args(Vec::<String>::new());
        assert_eq!(config, WalConfig::default());
    }

    #[test]
    fn test_next_path_uses_clock() {
        let clock = ManualClock::new(UNIX_EPOCH + Duration::from_micros(1_700_000_000_000_001));
        let path = WalConfig::default().next_path(&clock).unwrap();
        assert_eq!(path, PathBuf::from("data").join("1700000000000001.wal"));
    }

    #[test]
    fn test_writer_counts_bytes() {
        let mut writer = WalWriter::new(Vec::new());
        writer
            .write_all_records([("a", "bc"), ("", "")])
            .unwrap();
        assert_eq!(writer.records_written(), 2);
        assert_eq!(writer.bytes_written(), (4 + 1 + 4 + 2) + (4 + 4));
        assert_eq!(writer.bytes_written(), writer.get_ref().len() as u64);
    }
}
