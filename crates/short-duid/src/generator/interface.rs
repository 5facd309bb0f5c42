#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    DriftClock, DuidConfig, DuidId, Result, ShortEncoder, TimeSource, generator::batch_len,
};

/// The public surface shared by every DUID generator.
///
/// Implementors supply construction, storage access and [`Self::try_next_id`];
/// batching, encoding, drift control and the accessors are provided.
///
/// # Example
///
/// ```
/// use short_duid::{BasicDuidGenerator, DuidGenerator, SHORT_DUID_EPOCH, WallClock};
///
/// let generator = BasicDuidGenerator::new(123, "my salt", SHORT_DUID_EPOCH, WallClock);
///
/// let ints = generator.get_duid_int(3).unwrap();
/// assert_eq!(ints.len(), 3);
/// assert!(ints[0] < ints[1] && ints[1] < ints[2]);
///
/// let strings = generator.get_duid(2).unwrap();
/// assert_eq!(strings.len(), 2);
/// ```
pub trait DuidGenerator<T>
where
    T: TimeSource<i64>,
{
    /// Creates a generator, normalizing `shard_id` and `epoch_start` as
    /// described on [`DuidConfig`]. "Now" is read from `time`.
    fn new(shard_id: u64, salt: impl Into<String>, epoch_start: i64, time: T) -> Self
    where
        Self: Sized;

    /// Returns the normalized identity and epoch settings.
    fn config(&self) -> &DuidConfig;

    /// Returns the drift-adjusted clock.
    fn clock(&self) -> &DriftClock<T>;

    /// Returns the encoder keyed by this generator's salt.
    fn encoder(&self) -> &ShortEncoder;

    /// Issues the next ID.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::TimestampOverflow`] once virtual time no longer fits
    ///   the layout.
    /// - [`crate::Error::LockPoisoned`] for lock-based generators whose lock
    ///   was poisoned.
    fn try_next_id(&self) -> Result<DuidId>;

    /// Issues exactly `n` IDs, spanning as many virtual ticks as needed.
    ///
    /// # Errors
    ///
    /// See [`Self::try_next_id`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    fn generate(&self, n: usize) -> Result<Vec<DuidId>> {
        (0..n).map(|_| self.try_next_id()).collect()
    }

    /// Issues exactly `n` short-encoded IDs.
    ///
    /// # Errors
    ///
    /// See [`Self::try_next_id`].
    fn generate_short(&self, n: usize) -> Result<Vec<String>> {
        Ok(self.encode_all(self.generate(n)?))
    }

    /// Legacy batch call returning [`batch_len(n)`](batch_len) raw IDs.
    ///
    /// # Errors
    ///
    /// See [`Self::try_next_id`].
    fn get_duid_int(&self, n: usize) -> Result<Vec<DuidId>> {
        self.generate(batch_len(n))
    }

    /// Legacy batch call returning [`batch_len(n)`](batch_len) short-encoded
    /// IDs.
    ///
    /// # Errors
    ///
    /// See [`Self::try_next_id`].
    fn get_duid(&self, n: usize) -> Result<Vec<String>> {
        Ok(self.encode_all(self.get_duid_int(n)?))
    }

    /// Short-encodes a single ID with this generator's salt.
    fn encode(&self, id: DuidId) -> String {
        self.encoder().encode_id(id)
    }

    #[doc(hidden)]
    fn encode_all(&self, ids: Vec<DuidId>) -> Vec<String> {
        ids.into_iter().map(|id| self.encode(id)).collect()
    }

    /// The shard ID after truncation to 10 bits.
    fn shard_id(&self) -> u16 {
        self.config().shard_id()
    }

    /// The salt as supplied.
    fn salt(&self) -> &str {
        self.config().salt()
    }

    /// The epoch origin in ms since the Unix epoch, after clamping.
    fn epoch_start(&self) -> i64 {
        self.config().epoch_start()
    }

    /// The real clock plus the current drift, in ms since the Unix epoch.
    fn current_time_ms(&self) -> i64 {
        self.clock().current_millis()
    }

    /// Sets the drift and returns the value just set.
    fn drift_time(&self, delta: i64) -> i64 {
        self.clock().drift_time(delta)
    }

    /// Milliseconds elapsed since the epoch according to the drifted clock.
    /// May be smaller than an earlier reading.
    fn elapsed_millis(&self) -> i64 {
        self.current_time_ms().saturating_sub(self.epoch_start())
    }
}
