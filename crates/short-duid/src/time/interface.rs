/// Epoch used by the reference test and benchmark suites: Monday, June 1, 2015
/// 00:00:00 UTC, in milliseconds since the Unix epoch.
pub const SHORT_DUID_EPOCH: i64 = 1_433_116_800_000;

/// The Unix epoch itself. Future epochs are clamped to this value.
pub const UNIX_EPOCH_MILLIS: i64 = 0;

/// A trait for time sources that return a wall-clock timestamp.
///
/// This abstraction allows you to plug in the real system clock, a drifted
/// clock, or a mocked time source in tests.
///
/// The timestamp type `T` is generic (the generators use `i64`), and the unit
/// is expected to be **milliseconds** since the Unix epoch.
///
/// # Example
///
/// ```
/// use short_duid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource<i64> for FixedTime {
///     fn current_millis(&self) -> i64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource<T> {
    /// Returns the current time in milliseconds.
    fn current_millis(&self) -> T;
}

impl<T, S> TimeSource<T> for &S
where
    S: TimeSource<T> + ?Sized,
{
    fn current_millis(&self) -> T {
        (**self).current_millis()
    }
}
