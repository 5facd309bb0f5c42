/// Reasons a short-encoded string fails to decode.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum EncodingError {
    /// The input was empty.
    #[error("empty input")]
    DecodeEmpty,

    /// The input is longer than any encoded `u64` can be.
    #[error("invalid length: {len}")]
    DecodeInvalidLen { len: usize },

    /// The input contains a byte outside the alphabet.
    #[error("invalid ascii byte {byte:#04x} at index {index}")]
    DecodeInvalidAscii { byte: u8, index: usize },

    /// The input has a leading zero digit that `encode` never produces.
    #[error("non-canonical leading zero at index {index}")]
    DecodeNonCanonical { index: usize },

    /// The decoded value does not fit in a `u64`.
    #[error("decode overflow")]
    DecodeOverflow,
}
