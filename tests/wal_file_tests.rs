use std::fs;
use std::time::{Duration, UNIX_EPOCH};

use tempfile::tempdir;
use wal_frames::wal_clock::wal_file_name;
use wal_frames::{create_wal_file, open_wal_file, ManualClock, WalConfig, WalError};

#[test]
fn test_write_then_read_file() {
    let dir = tempdir().unwrap();
    let config = WalConfig::default().with_data_dir(dir.path().join("data"));
    let clock = ManualClock::new(UNIX_EPOCH + Duration::from_micros(1_700_000_000_000_000));

    let (path, mut wal) = create_wal_file(&config, &clock).unwrap();
    assert_eq!(path, dir.path().join("data").join(wal_file_name(1_700_000_000_000_000)));

    wal.write_record("name", "James Errington").unwrap();
    wal.write_record("country", "United Kingdom").unwrap();
    wal.flush().unwrap();
    assert_eq!(fs::metadata(&path).unwrap().len(), wal.bytes_written());
    drop(wal);

    let strings: Vec<String> = open_wal_file(&path)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(strings, ["name", "James Errington", "country", "United Kingdom"]);
}

#[test]
fn test_files_named_by_clock_do_not_collide() {
    let dir = tempdir().unwrap();
    let config = WalConfig::default().with_data_dir(dir.path());
    let clock = ManualClock::new(UNIX_EPOCH + Duration::from_secs(1));

    let (first, _) = create_wal_file(&config, &clock).unwrap();
    clock.advance(Duration::from_micros(1));
    let (second, _) = create_wal_file(&config, &clock).unwrap();

    assert_ne!(first, second);
    assert_eq!(first.file_name().unwrap(), "1000000.wal");
    assert_eq!(second.file_name().unwrap(), "1000001.wal");
}

#[test]
fn test_empty_file_reads_as_empty_stream() {
    let dir = tempdir().unwrap();
    let config = WalConfig::default().with_data_dir(dir.path());
    let clock = ManualClock::new(UNIX_EPOCH + Duration::from_secs(5));

    let (path, wal) = create_wal_file(&config, &clock).unwrap();
    drop(wal);
    assert_eq!(open_wal_file(&path).unwrap().count(), 0);
}

#[test]
fn test_truncated_file_is_detected() {
    let dir = tempdir().unwrap();
    let config = WalConfig::default().with_data_dir(dir.path());
    let clock = ManualClock::new(UNIX_EPOCH + Duration::from_secs(7));

    let (path, mut wal) = create_wal_file(&config, &clock).unwrap();
    wal.write_record("name", "James Errington").unwrap();
    wal.flush().unwrap();
    drop(wal);

    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();

    let results: Vec<_> = open_wal_file(&path).unwrap().collect();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].as_ref().unwrap(), "name");
    assert!(matches!(
        results[1],
        Err(WalError::TruncatedPayload { expected: 15, found: 12 })
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = open_wal_file(dir.path().join("nope.wal")).err().unwrap();
    assert!(matches!(err, WalError::Io(_)));
}

#[test]
fn test_clock_before_epoch_creates_nothing() {
    let dir = tempdir().unwrap();
    let config = WalConfig::default().with_data_dir(dir.path().join("data"));
    let clock = ManualClock::new(UNIX_EPOCH - Duration::from_secs(1));

    let err = create_wal_file(&config, &clock).err().unwrap();
    assert!(matches!(err, WalError::ClockBeforeEpoch));
    assert_eq!(fs::read_dir(dir.path().join("data")).unwrap().count(), 0);
}
