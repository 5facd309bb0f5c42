use crate::{
    DuidId,
    encoding::{Alphabet, EncodingError, RADIX},
};
use std::sync::Arc;

/// The longest string [`ShortEncoder::encode`] produces: `ceil(64 / log2(62))`.
pub const MAX_ENCODED_LEN: usize = 11;

const RADIX_U64: u64 = RADIX as u64;

/// Salt-keyed base62 encoder for composed IDs.
///
/// The salt shuffles a 62-character alphabet (`0-9a-zA-Z`). The least
/// significant base62 digit is written first using that alphabet; it then
/// selects one of 62 second-level alphabets, also derived from the salt, for
/// the remaining digits (most significant first). Consecutive IDs differ in
/// their first character and are spelled with different alphabets, which hides
/// the monotonic structure of the underlying integers.
///
/// Guarantees for a fixed salt:
///
/// - **Deterministic**: the same value always encodes to the same string.
/// - **Injective**: distinct values never share an encoding, and
///   [`Self::decode`] recovers the value.
/// - **Short**: the output never has more characters than the decimal form.
///
/// Encoders built from equal salts are interchangeable. Cloning is cheap; the
/// derived tables are shared.
///
/// # Example
///
/// ```
/// use short_duid::ShortEncoder;
///
/// let encoder = ShortEncoder::new("my salt");
/// let encoded = encoder.encode(1_234_567_890);
/// assert!(encoded.len() <= "1234567890".len());
/// assert_eq!(encoder.decode(&encoded), Ok(1_234_567_890));
/// assert_eq!(ShortEncoder::new("my salt").encode(1_234_567_890), encoded);
/// ```
#[derive(Clone)]
pub struct ShortEncoder {
    tables: Arc<Tables>,
}

struct Tables {
    base: Alphabet,
    derived: Vec<Alphabet>,
}

impl ShortEncoder {
    /// Derives the alphabets for `salt`.
    pub fn new(salt: &str) -> Self {
        let salt = salt.as_bytes();
        let base = Alphabet::keyed(salt);
        let derived = (0..RADIX).map(|digit| base.derive(digit, salt)).collect();
        Self {
            tables: Arc::new(Tables { base, derived }),
        }
    }

    /// Encodes `value` into its short form.
    #[allow(clippy::cast_possible_truncation)]
    pub fn encode(&self, value: u64) -> String {
        let low = (value % RADIX_U64) as usize;
        let mut rest = value / RADIX_U64;

        // Remaining digits, least significant first.
        let mut digits = [0_u8; MAX_ENCODED_LEN - 1];
        let mut len = 0;
        while rest > 0 {
            digits[len] = (rest % RADIX_U64) as u8;
            rest /= RADIX_U64;
            len += 1;
        }

        let derived = &self.tables.derived[low];
        let mut out = String::with_capacity(len + 1);
        out.push(self.tables.base.char_at(low));
        for &digit in digits[..len].iter().rev() {
            out.push(derived.char_at(usize::from(digit)));
        }
        out
    }

    /// Encodes a composed ID.
    pub fn encode_id(&self, id: DuidId) -> String {
        self.encode(id.to_raw())
    }

    /// Decodes a string produced by [`Self::encode`] with the same salt.
    ///
    /// # Errors
    ///
    /// Returns an [`EncodingError`] if the input is empty, too long, contains
    /// characters outside the alphabet, is not in canonical form, or
    /// overflows a `u64`.
    pub fn decode(&self, encoded: &str) -> Result<u64, EncodingError> {
        let bytes = encoded.as_bytes();
        if bytes.len() > MAX_ENCODED_LEN {
            return Err(EncodingError::DecodeInvalidLen { len: bytes.len() });
        }
        let Some((&first, rest)) = bytes.split_first() else {
            return Err(EncodingError::DecodeEmpty);
        };

        let low = self
            .tables
            .base
            .digit_of(first)
            .ok_or(EncodingError::DecodeInvalidAscii {
                byte: first,
                index: 0,
            })?;
        let derived = &self.tables.derived[usize::from(low)];

        let mut acc = 0_u64;
        for (offset, &b) in rest.iter().enumerate() {
            let index = offset + 1;
            let digit = derived
                .digit_of(b)
                .ok_or(EncodingError::DecodeInvalidAscii { byte: b, index })?;
            if offset == 0 && digit == 0 {
                return Err(EncodingError::DecodeNonCanonical { index });
            }
            acc = acc
                .checked_mul(RADIX_U64)
                .and_then(|acc| acc.checked_add(u64::from(digit)))
                .ok_or(EncodingError::DecodeOverflow)?;
        }

        acc.checked_mul(RADIX_U64)
            .and_then(|acc| acc.checked_add(u64::from(low)))
            .ok_or(EncodingError::DecodeOverflow)
    }

    /// Decodes a string back into a composed ID.
    ///
    /// # Errors
    ///
    /// See [`Self::decode`].
    pub fn decode_id(&self, encoded: &str) -> Result<DuidId, EncodingError> {
        self.decode(encoded).map(DuidId::from_raw)
    }
}

impl core::fmt::Debug for ShortEncoder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ShortEncoder").finish_non_exhaustive()
    }
}
