use crate::TimeSource;
#[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
use std::time::{SystemTime, UNIX_EPOCH};
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
use web_time::{SystemTime, UNIX_EPOCH};

/// The host's real wall clock, in milliseconds since the Unix epoch.
///
/// Unlike a monotonic ticker, this clock follows every adjustment made to the
/// system time, including NTP steps backwards. The generators never trust it
/// to be non-decreasing; see [`crate::Transition`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WallClock;

impl TimeSource<i64> for WallClock {
    fn current_millis(&self) -> i64 {
        unix_millis()
    }
}

/// Returns the current wall-clock time in milliseconds since the Unix epoch.
///
/// Times before 1970 come back negative. Values beyond `i64::MAX` milliseconds
/// saturate.
pub fn unix_millis() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(since) => i64::try_from(since.as_millis()).unwrap_or(i64::MAX),
        Err(before) => i64::try_from(before.duration().as_millis()).map_or(i64::MIN, |ms| -ms),
    }
}
