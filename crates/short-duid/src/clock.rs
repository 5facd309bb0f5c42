use crate::TimeSource;
use portable_atomic::{AtomicI64, Ordering};

/// A clock controller that offsets a [`TimeSource`] by a signed drift.
///
/// The drift lets tests simulate skew (including backward jumps) and lets
/// operators smooth over a known clock regression. It is owned by a single
/// generator instance rather than shared process-wide, so instances stay
/// independently testable.
///
/// The drift is stored atomically so it can be changed through `&self` on a
/// generator that is shared across threads.
///
/// # Example
///
/// ```
/// use short_duid::{DriftClock, TimeSource};
///
/// struct FixedTime;
/// impl TimeSource<i64> for FixedTime {
///     fn current_millis(&self) -> i64 {
///         1_000
///     }
/// }
///
/// let clock = DriftClock::new(FixedTime);
/// assert_eq!(clock.drift_time(-250), -250);
/// assert_eq!(clock.current_millis(), 750);
/// ```
#[derive(Debug)]
pub struct DriftClock<T> {
    source: T,
    drift: AtomicI64,
}

impl<T> DriftClock<T>
where
    T: TimeSource<i64>,
{
    /// Wraps `source` with a drift of zero.
    pub const fn new(source: T) -> Self {
        Self {
            source,
            drift: AtomicI64::new(0),
        }
    }

    /// Sets the drift to `delta` milliseconds and returns the value just set.
    ///
    /// The drift is absolute, not cumulative: calling `drift_time(-5)` twice
    /// leaves the clock 5 ms behind its source.
    pub fn drift_time(&self, delta: i64) -> i64 {
        self.drift.store(delta, Ordering::Release);
        delta
    }

    /// Returns the currently configured drift in milliseconds.
    pub fn drift(&self) -> i64 {
        self.drift.load(Ordering::Acquire)
    }

    /// Returns the undrifted time source.
    pub const fn source(&self) -> &T {
        &self.source
    }
}

impl<T> TimeSource<i64> for DriftClock<T>
where
    T: TimeSource<i64>,
{
    /// Returns the source time plus the drift. No monotonicity is implied.
    fn current_millis(&self) -> i64 {
        self.source.current_millis().saturating_add(self.drift())
    }
}
