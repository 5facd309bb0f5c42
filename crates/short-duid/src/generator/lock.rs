#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    DriftClock, DuidConfig, DuidId, Result, ShortEncoder, TimeSource,
    generator::{DuidGenerator, Mutex, MutexGuard, TICK_CAPACITY, next_slot},
};

/// A lock-based DUID generator suitable for multi-threaded environments.
///
/// The last issued slot is kept behind a [`Mutex`]. Reading the clock and
/// choosing the next slot happen inside one critical section, so concurrent
/// callers never observe or reissue the same `(timestamp, sequence)` pair.
/// Batches hold the lock for their whole length and therefore come out
/// contiguous.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Tolerates backward clock jumps without reusing IDs
///
/// ## Recommended When
/// - Several threads must share one shard ID
/// - Fair access across threads is important
///
/// ## See Also
/// - [`BasicDuidGenerator`]
///
/// [`BasicDuidGenerator`]: crate::BasicDuidGenerator
pub struct LockDuidGenerator<T>
where
    T: TimeSource<i64>,
{
    state: Mutex<DuidId>,
    clock: DriftClock<T>,
    config: DuidConfig,
    encoder: ShortEncoder,
}

impl<T> LockDuidGenerator<T>
where
    T: TimeSource<i64>,
{
    /// Creates a new [`LockDuidGenerator`].
    ///
    /// See [`crate::BasicDuidGenerator::new`] for the parameters.
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use short_duid::{DuidGenerator, LockDuidGenerator, SHORT_DUID_EPOCH, WallClock};
    ///
    /// let generator = Arc::new(LockDuidGenerator::new(7, "salt", SHORT_DUID_EPOCH, WallClock));
    ///
    /// let handles: Vec<_> = (0..4)
    ///     .map(|_| {
    ///         let generator = Arc::clone(&generator);
    ///         std::thread::spawn(move || generator.generate(100).unwrap())
    ///     })
    ///     .collect();
    ///
    /// let mut ids: Vec<_> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
    /// ids.sort();
    /// ids.dedup();
    /// assert_eq!(ids.len(), 400);
    /// ```
    pub fn new(shard_id: u64, salt: impl Into<String>, epoch_start: i64, time: T) -> Self {
        let config = DuidConfig::with_now(shard_id, salt, epoch_start, time.current_millis());
        Self::from_config(config, time)
    }

    /// Creates a generator from already normalized settings.
    pub fn from_config(config: DuidConfig, time: T) -> Self {
        Self::from_state(config, DuidId::default(), time)
    }

    /// Creates a generator that resumes after `last`. See
    /// [`crate::BasicDuidGenerator::from_state`].
    pub fn from_state(config: DuidConfig, last: DuidId, time: T) -> Self {
        let encoder = ShortEncoder::new(config.salt());
        let state = DuidId::from(
            last.timestamp(),
            u64::from(config.shard_id()),
            last.sequence(),
        );
        Self {
            state: Mutex::new(state),
            clock: DriftClock::new(time),
            config,
            encoder,
        }
    }

    /// Issues the next ID.
    ///
    /// # Errors
    ///
    /// - Returns an error if the underlying lock has been poisoned.
    /// - Returns [`crate::Error::TimestampOverflow`] once virtual time no
    ///   longer fits the layout.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_next_id(&self) -> Result<DuidId> {
        let mut state = self.lock_state()?;
        *state = next_slot(*state, self.elapsed_millis())?;
        Ok(*state)
    }

    /// Issues exactly `n` consecutive IDs under a single lock acquisition.
    ///
    /// # Errors
    ///
    /// See [`Self::try_next_id`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate(&self, n: usize) -> Result<Vec<DuidId>> {
        let mut state = self.lock_state()?;
        let mut ids = Vec::with_capacity(n.min(TICK_CAPACITY));
        for _ in 0..n {
            *state = next_slot(*state, self.elapsed_millis())?;
            ids.push(*state);
        }
        Ok(ids)
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, DuidId>> {
        #[cfg(feature = "parking-lot")]
        {
            Ok(self.state.lock())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            Ok(self.state.lock()?)
        }
    }
}

impl<T> DuidGenerator<T> for LockDuidGenerator<T>
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

    fn generate(&self, n: usize) -> Result<Vec<DuidId>> {
        self.generate(n)
    }
}
