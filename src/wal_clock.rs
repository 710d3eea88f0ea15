//! Wall-clock access for naming WAL files.
//!
//! Each file is named after the moment it was created, as a count of
//! microseconds since the Unix epoch. The clock is a trait so the naming can
//! be pinned down in tests.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

use crate::error::{Result, WalError};

/// File extension used for WAL files.
pub const WAL_EXTENSION: &str = "wal";

/// A source of wall-clock time.
pub trait TimeSource {
    fn now(&self) -> SystemTime;
}

/// The system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    #[inline]
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// A clock that only moves when told to.
///
/// # Examples
///
/// ```
/// # use wal_frames::wal_clock::{ManualClock, TimeSource, micros_since_epoch};
/// # use std::time::{Duration, UNIX_EPOCH};
/// let clock = ManualClock::new(UNIX_EPOCH + Duration::from_micros(10));
/// clock.advance(Duration::from_micros(5));
/// assert_eq!(micros_since_epoch(clock.now()).unwrap(), 15);
/// ```
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<SystemTime>,
}

impl ManualClock {
    pub fn new(start: SystemTime) -> Self {
        Self { now: Mutex::new(start) }
    }

    pub fn set(&self, t: SystemTime) {
        *self.now.lock() = t;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> SystemTime {
        *self.now.lock()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> SystemTime {
        (**self).now()
    }
}

/// Converts a wall-clock time to whole microseconds since the epoch.
///
/// The nanosecond count is divided by 1000 and rounded to the nearest
/// microsecond. A remainder of exactly 500 ns goes to the even neighbour,
/// so `1_500 ns -> 2 us` but `2_500 ns -> 2 us`.
///
/// Times before the epoch fail with [`WalError::ClockBeforeEpoch`].
pub fn micros_since_epoch(t: SystemTime) -> Result<u128> {
    let nanos = t
        .duration_since(UNIX_EPOCH)
        .map_err(|_| WalError::ClockBeforeEpoch)?
        .as_nanos();

    let micros = nanos / 1_000;
    let rem = nanos % 1_000;
    let round_up = rem > 500 || (rem == 500 && micros % 2 == 1);
    Ok(if round_up { micros + 1 } else { micros })
}

/// Formats a WAL file name, e.g. `1700000000000000.wal`.
pub fn wal_file_name(micros: u128) -> String {
    format!("{}.{}", micros, WAL_EXTENSION)
}
