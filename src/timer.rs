//! Elapsed time reporting around a transmission.

use std::time::Duration;

/// A monotonic instant split in whole seconds and nanoseconds, like a `timespec`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp {
    pub secs: u64,
    pub nanos: u32,
}

impl From<Duration> for Timestamp {
    fn from(d: Duration) -> Self {
        Self {
            secs: d.as_secs(),
            nanos: d.subsec_nanos(),
        }
    }
}

/// Microseconds between `start` and `end`, rounded to the nearest integer.
///
/// `end.secs` must not be smaller than `start.secs`. The nanosecond part may go backwards when a
/// second boundary was crossed.
///
/// # Examples
/// ```
/// use nrf24_demos::timer::{elapsed_micros, Timestamp};
///
/// let start = Timestamp { secs: 10, nanos: 999_999_000 };
/// let end = Timestamp { secs: 11, nanos: 1_500 };
/// assert_eq!(elapsed_micros(start, end), 3);
/// ```
pub fn elapsed_micros(start: Timestamp, end: Timestamp) -> u64 {
    let secs = end.secs.saturating_sub(start.secs) as f64;
    let micros = (end.nanos as f64 - start.nanos as f64) / 1000.0;
    (secs * 1_000_000.0 + micros).round().max(0.0) as u64
}

/// Start/stop measurement fed by a [`Clock`](crate::clock::Clock).
#[derive(Debug, Default, Clone, Copy)]
pub struct Stopwatch {
    start: Timestamp,
}

impl Stopwatch {
    pub fn start(now: Duration) -> Self {
        Self { start: now.into() }
    }

    /// Elapsed microseconds up to `now`.
    pub fn stop(&self, now: Duration) -> u64 {
        elapsed_micros(self.start, now.into())
    }
}
