use crate::EncodingError;

/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `short-duid` can emit.
///
/// Invalid configuration is normalized rather than rejected (see
/// [`crate::DuidConfig`]), so at runtime the generators only fail when the
/// packed layout would overflow or when a shared lock is poisoned.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The virtual time delta no longer fits into the 41-bit timestamp field.
    ///
    /// Packing it anyway would wrap around and reissue IDs from the start of
    /// the epoch, so generation stops instead.
    #[error("timestamp {timestamp} overflows the {bits}-bit timestamp field")]
    TimestampOverflow { timestamp: u64, bits: u32 },

    /// The operation failed because the lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, mutexes do **not** poison and this
    /// variant is never produced.
    #[error("generator lock poisoned")]
    LockPoisoned,

    /// A short-encoded ID could not be decoded.
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// A decimal string is not a valid ID.
    #[error("invalid decimal id: {input:?}")]
    ParseId { input: String },
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
// Convert all poisoned lock errors to a simplified `LockPoisoned`
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
