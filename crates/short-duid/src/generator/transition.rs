use crate::{DuidId, Result};

/// The two ways virtual time moves, plus the in-tick step between them.
///
/// Given the last issued ID and the elapsed time read from the clock, exactly
/// one transition applies:
///
/// | condition                                  | transition       | next slot            |
/// |--------------------------------------------|------------------|----------------------|
/// | `elapsed > last.timestamp`                 | [`Adopt`]        | `(elapsed, 0)`       |
/// | `elapsed <= last.timestamp`, sequence room | [`Increment`]    | `(last.ts, seq + 1)` |
/// | `elapsed <= last.timestamp`, exhausted     | [`ForceAdvance`] | `(last.ts + 1, 0)`   |
///
/// Every row yields a slot strictly greater than the previous one, whatever
/// the clock did, so a single generator never reissues a
/// `(timestamp, sequence)` pair.
///
/// [`Adopt`]: Transition::Adopt
/// [`Increment`]: Transition::Increment
/// [`ForceAdvance`]: Transition::ForceAdvance
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Real time is ahead of virtual time: adopt it and restart the sequence.
    Adopt {
        /// The elapsed milliseconds being adopted.
        timestamp: u64,
    },
    /// Real time has not moved past virtual time (equal, or the clock went
    /// backwards): stay on the current tick and take the next sequence value.
    Increment,
    /// The current tick's sequence space is exhausted: move virtual time one
    /// tick ahead of the clock and restart the sequence.
    ForceAdvance,
}

impl Transition {
    /// Picks the transition for `last` given `elapsed` milliseconds since the
    /// epoch. Negative `elapsed` values (a clock behind the epoch) are
    /// treated as a regression.
    pub fn select(last: DuidId, elapsed: i64) -> Self {
        match u64::try_from(elapsed) {
            Ok(timestamp) if timestamp > last.timestamp() => Self::Adopt { timestamp },
            _ if last.has_sequence_room() => Self::Increment,
            _ => Self::ForceAdvance,
        }
    }

    /// Applies this transition to `last`, returning the next slot.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::TimestampOverflow`] if the new virtual time
    /// does not fit the 41-bit timestamp field.
    pub fn apply(self, last: DuidId) -> Result<DuidId> {
        match self {
            Self::Adopt { timestamp } => last.rollover_to_timestamp(timestamp),
            Self::Increment => Ok(last.increment_sequence()),
            Self::ForceAdvance => last.advance_timestamp(),
        }
    }
}

/// Issues the slot following `last` for a clock reading of `elapsed`.
///
/// # Errors
///
/// See [`Transition::apply`].
pub fn next_slot(last: DuidId, elapsed: i64) -> Result<DuidId> {
    let transition = Transition::select(last, elapsed);
    #[cfg(feature = "tracing")]
    if u64::try_from(elapsed).map_or(true, |timestamp| timestamp < last.timestamp()) {
        cold_clock_behind(last, elapsed, transition);
    }
    transition.apply(last)
}

#[cfg(feature = "tracing")]
#[cold]
#[inline(never)]
fn cold_clock_behind(last: DuidId, elapsed: i64, transition: Transition) {
    tracing::debug!(
        last_timestamp = last.timestamp(),
        elapsed,
        transition = ?transition,
        "clock behind virtual time, keeping virtual time"
    );
}

/// IDs one virtual tick can hold before virtual time is forced forward.
#[allow(clippy::cast_possible_truncation)]
pub const TICK_CAPACITY: usize = DuidId::max_sequence() as usize + 1;

/// Number of IDs a legacy batch call returns when `n` are requested.
///
/// A legacy batch never spans more than one tick's worth of sequence space:
/// the request is reduced modulo 8192, except that a non-zero multiple of
/// 8192 yields a full 8192.
///
/// ```
/// use short_duid::batch_len;
///
/// assert_eq!(batch_len(0), 0);
/// assert_eq!(batch_len(1), 1);
/// assert_eq!(batch_len(8192), 8192);
/// assert_eq!(batch_len(8193), 1);
/// assert_eq!(batch_len(16_384), 8192);
/// ```
pub const fn batch_len(n: usize) -> usize {
    match n % TICK_CAPACITY {
        0 if n != 0 => TICK_CAPACITY,
        rem => rem,
    }
}
