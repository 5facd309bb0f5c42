/// Base alphabet before any salt is applied.
pub(crate) const ALPHABET: &[u8; RADIX] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub(crate) const RADIX: usize = 62;
pub(crate) const NO_VALUE: u8 = 255;

/// A permutation of [`ALPHABET`] with its reverse lookup table.
#[derive(Clone)]
pub(crate) struct Alphabet {
    chars: [u8; RADIX],
    lookup: [u8; 256],
}

impl Alphabet {
    /// Shuffles the base alphabet with `key`. An empty key leaves it as is.
    pub(crate) fn keyed(key: &[u8]) -> Self {
        let mut chars = *ALPHABET;
        consistent_shuffle(&mut chars, key);
        Self::from_chars(chars)
    }

    /// Derives a second-level alphabet from `self`, keyed by one of its own
    /// characters followed by the salt.
    pub(crate) fn derive(&self, digit: usize, salt: &[u8]) -> Self {
        let mut key = [0_u8; RADIX];
        key[0] = self.chars[digit];
        let tail = salt.iter().chain(self.chars.iter()).take(RADIX - 1);
        for (slot, &b) in key[1..].iter_mut().zip(tail) {
            *slot = b;
        }
        let mut chars = self.chars;
        consistent_shuffle(&mut chars, &key);
        Self::from_chars(chars)
    }

    fn from_chars(chars: [u8; RADIX]) -> Self {
        let mut lookup = [NO_VALUE; 256];
        for (value, &c) in chars.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            {
                lookup[usize::from(c)] = value as u8;
            }
        }
        Self { chars, lookup }
    }

    #[inline]
    pub(crate) fn char_at(&self, digit: usize) -> char {
        char::from(self.chars[digit])
    }

    /// Returns the digit for `byte`, or `None` if it is not in the alphabet.
    #[inline]
    pub(crate) fn digit_of(&self, byte: u8) -> Option<u8> {
        match self.lookup[usize::from(byte)] {
            NO_VALUE => None,
            digit => Some(digit),
        }
    }

    #[cfg(test)]
    pub(crate) const fn chars(&self) -> &[u8; RADIX] {
        &self.chars
    }
}

/// Deterministic in-place shuffle driven by `key`.
///
/// Walks the slice from the end, swapping each position with one chosen by the
/// running key bytes. The same key always yields the same permutation.
pub(crate) fn consistent_shuffle(alphabet: &mut [u8], key: &[u8]) {
    if key.is_empty() {
        return;
    }

    let mut v = 0;
    let mut p = 0;
    for i in (1..alphabet.len()).rev() {
        v %= key.len();
        let k = usize::from(key[v]);
        p += k;
        let j = (k + v + p) % i;
        alphabet.swap(i, j);
        v += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_permutation(chars: &[u8; RADIX]) -> bool {
        let mut sorted = *chars;
        sorted.sort_unstable();
        let mut expected = *ALPHABET;
        expected.sort_unstable();
        sorted == expected
    }

    #[test]
    fn empty_key_leaves_alphabet_unchanged() {
        assert_eq!(Alphabet::keyed(b"").chars(), ALPHABET);
    }

    #[test]
    fn shuffle_is_a_deterministic_permutation() {
        let a = Alphabet::keyed(b"some salt");
        let b = Alphabet::keyed(b"some salt");
        assert_eq!(a.chars(), b.chars());
        assert!(is_permutation(a.chars()));
        assert_ne!(a.chars(), ALPHABET);
    }

    #[test]
    fn different_keys_give_different_orders() {
        let a = Alphabet::keyed(b"salt-a");
        let b = Alphabet::keyed(b"salt-b");
        assert_ne!(a.chars(), b.chars());
    }

    #[test]
    fn single_character_key_still_shuffles() {
        let a = Alphabet::keyed(b"a");
        assert!(is_permutation(a.chars()));
        assert_ne!(a.chars(), ALPHABET);
    }

    #[test]
    fn lookup_inverts_chars() {
        let a = Alphabet::keyed(b"lookup");
        for digit in 0..RADIX {
            let c = a.chars()[digit];
            assert_eq!(a.digit_of(c), Some(digit as u8));
        }
        assert_eq!(a.digit_of(b'-'), None);
        assert_eq!(a.digit_of(0xFF), None);
    }

    #[test]
    fn derived_alphabets_are_permutations_and_differ_by_digit() {
        let base = Alphabet::keyed(b"derive");
        let d0 = base.derive(0, b"derive");
        let d1 = base.derive(1, b"derive");
        assert!(is_permutation(d0.chars()));
        assert!(is_permutation(d1.chars()));
        assert_ne!(d0.chars(), d1.chars());
    }
}
