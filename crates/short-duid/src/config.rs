use crate::{DuidId, UNIX_EPOCH_MILLIS, unix_millis};

/// Identity and epoch settings for one generator instance.
///
/// Invalid values are normalized, never rejected:
///
/// - `shard_id` keeps only its low 10 bits (`1024 -> 0`, `1025 -> 1`).
/// - `epoch_start` later than "now" becomes `0` (the Unix epoch). Any epoch
///   in the past is kept as is, even 1 ms ago or before 1970. An epoch so far
///   back that elapsed time overflows the timestamp field surfaces as
///   [`crate::Error::TimestampOverflow`] when generating.
/// - `salt` is stored verbatim; empty and single-character salts are allowed.
///
/// # Example
///
/// ```
/// use short_duid::DuidConfig;
///
/// let config = DuidConfig::with_now(1024, "salt", 2_000, 1_000);
/// assert_eq!(config.shard_id(), 0);
/// assert_eq!(config.epoch_start(), 0);
/// assert_eq!(config.salt(), "salt");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DuidConfig {
    shard_id: u16,
    salt: String,
    epoch_start: i64,
}

impl DuidConfig {
    /// Normalizes the settings against the current wall-clock time.
    pub fn new(shard_id: u64, salt: impl Into<String>, epoch_start: i64) -> Self {
        Self::with_now(shard_id, salt, epoch_start, unix_millis())
    }

    /// Normalizes the settings against an explicit `now` (ms since the Unix
    /// epoch).
    pub fn with_now(shard_id: u64, salt: impl Into<String>, epoch_start: i64, now: i64) -> Self {
        Self {
            shard_id: truncate_shard_id(shard_id),
            salt: salt.into(),
            epoch_start: clamp_epoch(epoch_start, now),
        }
    }

    /// The shard ID after truncation, always in `0..=1023`.
    pub const fn shard_id(&self) -> u16 {
        self.shard_id
    }

    /// The salt exactly as supplied.
    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// The epoch origin in milliseconds since the Unix epoch, after clamping.
    pub const fn epoch_start(&self) -> i64 {
        self.epoch_start
    }
}

#[allow(clippy::cast_possible_truncation)]
fn truncate_shard_id(shard_id: u64) -> u16 {
    let truncated = shard_id & DuidId::max_shard_id();
    if truncated != shard_id {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            shard_id,
            truncated,
            "shard id does not fit in {} bits, keeping the low bits",
            DuidId::SHARD_ID_BITS
        );
    }
    // Masked to 10 bits above.
    truncated as u16
}

fn clamp_epoch(epoch_start: i64, now: i64) -> i64 {
    if epoch_start > now {
        #[cfg(feature = "tracing")]
        tracing::warn!(epoch_start, now, "epoch start is in the future, using the Unix epoch");
        return UNIX_EPOCH_MILLIS;
    }
    epoch_start
}
