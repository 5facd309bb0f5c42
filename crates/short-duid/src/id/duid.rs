use crate::{Error, Result};
use core::{fmt, str::FromStr};

/// A 64-bit distributed unique ID.
///
/// - 41 bits virtual time (ms since the generator's epoch)
/// - 10 bits shard ID
/// - 13 bits sequence
///
/// ```text
///  Bit Index:  63             23 22             13 12             0
///              +----------------+-----------------+---------------+
///  Field:      | timestamp (41) |  shard ID (10)  | sequence (13) |
///              +----------------+-----------------+---------------+
///              |<----- MSB ---------- 64 bits --------- LSB ----->|
/// ```
///
/// Ordering on the packed integer matches ordering on
/// `(timestamp, shard_id, sequence)`, so IDs from one generator sort in
/// issuance order. The value is always exact: use [`DuidId::to_raw`] or the
/// decimal [`fmt::Display`] form when handing it to consumers whose numbers
/// are not 64-bit safe.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DuidId {
    id: u64,
}

impl DuidId {
    /// Width of the timestamp field.
    pub const TIMESTAMP_BITS: u32 = 41;

    /// Width of the shard ID field.
    pub const SHARD_ID_BITS: u32 = 10;

    /// Width of the sequence field.
    pub const SEQUENCE_BITS: u32 = 13;

    /// Bitmask for extracting the 41-bit timestamp field. Occupies bits 23
    /// through 63.
    pub const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;

    /// Bitmask for extracting the 10-bit shard ID field. Occupies bits 13
    /// through 22.
    pub const SHARD_ID_MASK: u64 = (1 << Self::SHARD_ID_BITS) - 1;

    /// Bitmask for extracting the 13-bit sequence field. Occupies bits 0
    /// through 12.
    pub const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

    /// Number of bits to shift the timestamp to its correct position (bit 23).
    pub const TIMESTAMP_SHIFT: u32 = Self::SHARD_ID_BITS + Self::SEQUENCE_BITS;

    /// Number of bits to shift the shard ID to its correct position (bit 13).
    pub const SHARD_ID_SHIFT: u32 = Self::SEQUENCE_BITS;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u32 = 0;

    /// Packs the components, silently masking each one to its field width.
    ///
    /// Prefer [`Self::try_from_components`] whenever the timestamp comes from
    /// a clock.
    pub const fn from(timestamp: u64, shard_id: u64, sequence: u64) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let shard_id = (shard_id & Self::SHARD_ID_MASK) << Self::SHARD_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | shard_id | sequence,
        }
    }

    /// Packs the components, failing if the timestamp does not fit its field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TimestampOverflow`] if `timestamp` is wider than
    /// [`Self::TIMESTAMP_BITS`].
    ///
    /// # Example
    ///
    /// ```
    /// use short_duid::DuidId;
    ///
    /// let id = DuidId::try_from_components(1_000, 123, 7).unwrap();
    /// assert_eq!(id.timestamp(), 1_000);
    /// assert_eq!(id.shard_id(), 123);
    /// assert_eq!(id.sequence(), 7);
    ///
    /// assert!(DuidId::try_from_components(1 << 41, 0, 0).is_err());
    /// ```
    pub fn try_from_components(timestamp: u64, shard_id: u64, sequence: u64) -> Result<Self> {
        if timestamp > Self::TIMESTAMP_MASK {
            return Err(Self::cold_timestamp_overflow(timestamp));
        }
        debug_assert!(shard_id <= Self::SHARD_ID_MASK, "shard_id overflow");
        debug_assert!(sequence <= Self::SEQUENCE_MASK, "sequence overflow");
        Ok(Self::from(timestamp, shard_id, sequence))
    }

    #[cold]
    #[inline(never)]
    fn cold_timestamp_overflow(timestamp: u64) -> Error {
        Error::TimestampOverflow {
            timestamp,
            bits: Self::TIMESTAMP_BITS,
        }
    }

    /// Extracts the timestamp from the packed ID.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the shard ID from the packed ID.
    pub const fn shard_id(&self) -> u64 {
        (self.id >> Self::SHARD_ID_SHIFT) & Self::SHARD_ID_MASK
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Returns the maximum possible value for the timestamp field.
    pub const fn max_timestamp() -> u64 {
        Self::TIMESTAMP_MASK
    }

    /// Returns the maximum possible value for the shard ID field.
    pub const fn max_shard_id() -> u64 {
        Self::SHARD_ID_MASK
    }

    /// Returns the maximum possible value for the sequence field.
    pub const fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    /// Returns the packed integer.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Wraps a packed integer. Every `u64` is a valid layout.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns true if the current sequence value can be incremented.
    pub const fn has_sequence_room(&self) -> bool {
        self.sequence() < Self::max_sequence()
    }

    /// Returns a new ID with the sequence incremented.
    pub const fn increment_sequence(&self) -> Self {
        debug_assert!(self.has_sequence_room(), "sequence overflow");
        Self::from(self.timestamp(), self.shard_id(), self.sequence() + 1)
    }

    /// Returns a new ID for a newer timestamp with sequence reset to zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TimestampOverflow`] if `timestamp` does not fit.
    pub fn rollover_to_timestamp(&self, timestamp: u64) -> Result<Self> {
        Self::try_from_components(timestamp, self.shard_id(), 0)
    }

    /// Returns a new ID one tick ahead of this one with sequence reset to zero,
    /// independent of any clock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TimestampOverflow`] if the timestamp is already at its
    /// maximum.
    pub fn advance_timestamp(&self) -> Result<Self> {
        self.rollover_to_timestamp(self.timestamp() + 1)
    }

    /// Returns the ID as a zero-padded 20-digit string.
    ///
    /// Padded strings sort lexicographically in the same order as the IDs.
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }
}

impl From<DuidId> for u64 {
    fn from(id: DuidId) -> Self {
        id.to_raw()
    }
}

impl From<u64> for DuidId {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl FromStr for DuidId {
    type Err = Error;

    /// Parses the exact decimal form produced by [`fmt::Display`], with or
    /// without zero padding.
    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::ParseId {
                input: s.to_owned(),
            });
        }
        s.parse::<u64>().map(Self::from_raw).map_err(|_| Error::ParseId {
            input: s.to_owned(),
        })
    }
}

impl fmt::Display for DuidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for DuidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DuidId")
            .field("id", &format_args!("{} (0b{:064b})", self.id, self.id))
            .field("timestamp", &self.timestamp())
            .field("shard_id", &self.shard_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

const _: () = assert!(
    DuidId::TIMESTAMP_BITS + DuidId::SHARD_ID_BITS + DuidId::SEQUENCE_BITS == u64::BITS,
    "DuidId layout must fill the backing integer exactly"
);
