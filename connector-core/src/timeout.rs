//! Timeouts for blocking waits.

use crate::error::{Error, Result};
use std::time::{Duration, Instant};

/// How long a `wait` call may block.
///
/// The native library takes the timeout as a signed millisecond count where
/// `-1` means "forever". [`Timeout::from_millis`] performs that conversion and
/// rejects anything below `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeout {
    /// Block until data is available.
    Infinite,
    /// Block at most this many milliseconds. `Millis(0)` polls.
    Millis(u32),
}

impl Timeout {
    /// Convert the native integer form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `millis < -1`.
    pub fn from_millis(millis: i32) -> Result<Self> {
        match millis {
            -1 => Ok(Timeout::Infinite),
            m if m >= 0 => Ok(Timeout::Millis(m as u32)),
            m => Err(Error::OutOfRange {
                name: "timeout",
                value: i64::from(m),
            }),
        }
    }

    /// The native integer form (`-1` for [`Timeout::Infinite`]).
    ///
    /// Values that do not fit an `i32` saturate to `i32::MAX`.
    pub fn as_millis(&self) -> i32 {
        match self {
            Timeout::Infinite => -1,
            Timeout::Millis(m) => i32::try_from(*m).unwrap_or(i32::MAX),
        }
    }

    /// The instant at which a wait started now should give up,
    /// or `None` for [`Timeout::Infinite`].
    pub fn deadline(&self) -> Option<Instant> {
        match self {
            Timeout::Infinite => None,
            Timeout::Millis(m) => Some(Instant::now() + Duration::from_millis(u64::from(*m))),
        }
    }
}

impl From<Duration> for Timeout {
    fn from(d: Duration) -> Self {
        Timeout::Millis(u32::try_from(d.as_millis()).unwrap_or(u32::MAX))
    }
}

impl From<Option<Duration>> for Timeout {
    fn from(d: Option<Duration>) -> Self {
        d.map_or(Timeout::Infinite, Timeout::from)
    }
}
