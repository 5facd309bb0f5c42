use core::cell::Cell;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    DriftClock, DuidConfig, DuidId, Result, ShortEncoder, TimeSource,
    generator::{DuidGenerator, next_slot},
};

/// A non-concurrent DUID generator suitable for single-threaded environments.
///
/// This generator is lightweight and fast, but **not thread-safe**: the last
/// issued slot lives in a [`Cell`].
///
/// ## Features
/// - ❌ Not thread-safe
/// - ✅ Tolerates backward clock jumps without reusing IDs
///
/// ## Recommended When
/// - Each thread or task owns its own generator (and shard ID)
/// - You want the fastest generator
///
/// ## See Also
/// - [`LockDuidGenerator`]
///
/// [`LockDuidGenerator`]: crate::LockDuidGenerator
pub struct BasicDuidGenerator<T>
where
    T: TimeSource<i64>,
{
    state: Cell<DuidId>,
    clock: DriftClock<T>,
    config: DuidConfig,
    encoder: ShortEncoder,
}

impl<T> BasicDuidGenerator<T>
where
    T: TimeSource<i64>,
{
    /// Creates a new [`BasicDuidGenerator`].
    ///
    /// # Parameters
    ///
    /// - `shard_id`: identifies this generator among others sharing the epoch.
    ///   Only the low 10 bits are kept.
    /// - `salt`: keys the short encoder.
    /// - `epoch_start`: origin in ms since the Unix epoch. Future values are
    ///   clamped to `0`.
    /// - `time`: a [`TimeSource`] such as [`crate::WallClock`].
    ///
    /// # Example
    /// ```
    /// use short_duid::{BasicDuidGenerator, DuidGenerator, SHORT_DUID_EPOCH, WallClock};
    ///
    /// let generator = BasicDuidGenerator::new(1024, "salt", SHORT_DUID_EPOCH, WallClock);
    /// assert_eq!(generator.shard_id(), 0);
    ///
    /// let id = generator.try_next_id().unwrap();
    /// assert_eq!(id.shard_id(), 0);
    /// ```
    pub fn new(shard_id: u64, salt: impl Into<String>, epoch_start: i64, time: T) -> Self {
        let config = DuidConfig::with_now(shard_id, salt, epoch_start, time.current_millis());
        Self::from_config(config, time)
    }

    /// Creates a generator from already normalized settings.
    pub fn from_config(config: DuidConfig, time: T) -> Self {
        Self::from_state(config, DuidId::default(), time)
    }

    /// Creates a generator that resumes after `last`, as if `last` had been
    /// the most recently issued ID. Its shard ID is replaced with the
    /// configured one.
    ///
    /// # ⚠️ Note
    /// Sequence state is not persisted by this crate; in typical use cases,
    /// prefer [`Self::new`].
    pub fn from_state(config: DuidConfig, last: DuidId, time: T) -> Self {
        let encoder = ShortEncoder::new(config.salt());
        let state = DuidId::from(
            last.timestamp(),
            u64::from(config.shard_id()),
            last.sequence(),
        );
        Self {
            state: Cell::new(state),
            clock: DriftClock::new(time),
            config,
            encoder,
        }
    }

    /// Issues the next ID.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::TimestampOverflow`] once virtual time no longer
    /// fits the layout.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_next_id(&self) -> Result<DuidId> {
        let next = next_slot(self.state.get(), self.elapsed_millis())?;
        self.state.set(next);
        Ok(next)
    }
}

impl<T> DuidGenerator<T> for BasicDuidGenerator<T>
where
    T: TimeSource<i64>,
{
    fn new(shard_id: u64, salt: impl Into<String>, epoch_start: i64, time: T) -> Self {
        Self::new(shard_id, salt, epoch_start, time)
    }

    fn config(&self) -> &DuidConfig {
        &self.config
    }

    fn clock(&self) -> &DriftClock<T> {
        &self.clock
    }

    fn encoder(&self) -> &ShortEncoder {
        &self.encoder
    }

    fn try_next_id(&self) -> Result<DuidId> {
        self.try_next_id()
    }
}
