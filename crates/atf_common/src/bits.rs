//! Packed vectors of 2-state bits for fuse images and JTAG row words.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A fixed-length vector of bits packed 64 per `u64` word.
///
/// Index 0 is the first fuse of a fuse vector, and the least significant bit
/// of a scan pattern (the first bit shifted into TDI). Bits past `len` in the
/// last storage word are always zero, so derived equality and hashing are
/// exact.
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Bits {
    len: usize,
    data: Vec<u64>,
}

/// Number of bits packed per storage word.
const BITS_PER_WORD: usize = 64;

impl Bits {
    /// Creates a vector of `len` bits, all cleared.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            data: vec![0; word_count(len)],
        }
    }

    /// Creates a vector of `len` bits, all set.
    pub fn ones(len: usize) -> Self {
        let mut bits = Self {
            len,
            data: vec![u64::MAX; word_count(len)],
        };
        bits.clear_tail();
        bits
    }

    /// Creates a vector of `len` bits from the low bits of `value`.
    ///
    /// Bits of `value` at positions `>= len` are dropped.
    pub fn from_u64(value: u64, len: usize) -> Self {
        let mut bits = Self::new(len);
        if let Some(first) = bits.data.first_mut() {
            *first = value;
        }
        bits.clear_tail();
        bits
    }

    /// Returns the number of bits in this vector.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the vector holds no bits.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Gets the bit at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn get(&self, index: usize) -> bool {
        assert!(
            index < self.len,
            "index {index} out of bounds for length {}",
            self.len
        );
        (self.data[index / BITS_PER_WORD] >> (index % BITS_PER_WORD)) & 1 != 0
    }

    /// Sets the bit at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn set(&mut self, index: usize, value: bool) {
        assert!(
            index < self.len,
            "index {index} out of bounds for length {}",
            self.len
        );
        let word = &mut self.data[index / BITS_PER_WORD];
        let mask = 1u64 << (index % BITS_PER_WORD);
        if value {
            *word |= mask;
        } else {
            *word &= !mask;
        }
    }

    /// Returns an iterator over the bits in index order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| self.get(i))
    }

    /// Returns the number of set bits.
    pub fn count_ones(&self) -> usize {
        self.data.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns true if every bit is set.
    pub fn is_all_ones(&self) -> bool {
        self.count_ones() == self.len
    }

    /// Interprets the vector as an unsigned integer, bit 0 least significant.
    ///
    /// Returns `None` if any bit at position 64 or above is set.
    pub fn to_u64(&self) -> Option<u64> {
        if self.data.iter().skip(1).any(|&w| w != 0) {
            return None;
        }
        Some(self.data.first().copied().unwrap_or(0))
    }

    /// Parses an index-ordered string of `0`/`1` characters.
    ///
    /// The leftmost character is bit 0. Returns `None` on any other character.
    pub fn from_bit_str(s: &str) -> Option<Self> {
        let mut bits = Self::new(s.len());
        for (i, c) in s.chars().enumerate() {
            match c {
                '0' => {}
                '1' => bits.set(i, true),
                _ => return None,
            }
        }
        Some(bits)
    }

    /// Renders the vector as an index-ordered string of `0`/`1` characters.
    pub fn to_bit_string(&self) -> String {
        self.iter().map(|b| if b { '1' } else { '0' }).collect()
    }

    /// Parses a hex string into a vector of `len` bits.
    ///
    /// The rightmost digit holds bits 0..4. Leading digits beyond `len` are
    /// accepted only if they contribute no set bits. Returns `None` on an
    /// invalid digit or a set bit past `len`.
    pub fn from_hex_str(s: &str, len: usize) -> Option<Self> {
        let mut bits = Self::new(len);
        for (digit_idx, c) in s.chars().rev().enumerate() {
            let nibble = c.to_digit(16)?;
            for bit in 0..4 {
                if nibble & (1 << bit) == 0 {
                    continue;
                }
                let index = digit_idx * 4 + bit;
                if index >= len {
                    return None;
                }
                bits.set(index, true);
            }
        }
        Some(bits)
    }

    /// Renders the vector as lowercase hex, `ceil(len / 4)` digits wide.
    ///
    /// The rightmost digit holds bits 0..4. An empty vector renders as `""`.
    pub fn to_hex_string(&self) -> String {
        self.to_hex_string_min(self.len.div_ceil(4))
    }

    /// Renders the vector as lowercase hex, zero-padded to `min_digits`.
    ///
    /// More digits are written when a set bit lies past `min_digits * 4`.
    pub fn to_hex_string_min(&self, min_digits: usize) -> String {
        let significant = (0..self.len)
            .rev()
            .find(|&index| self.get(index))
            .map_or(0, |top| top / 4 + 1);
        let digits = min_digits.max(significant);
        let mut out = String::with_capacity(digits);
        for digit_idx in (0..digits).rev() {
            let mut nibble = 0u32;
            for bit in 0..4 {
                let index = digit_idx * 4 + bit;
                if index < self.len && self.get(index) {
                    nibble |= 1 << bit;
                }
            }
            out.push(char::from_digit(nibble, 16).unwrap_or('0'));
        }
        out
    }

    /// Zeroes the storage bits past `len` in the last word.
    fn clear_tail(&mut self) {
        let used = self.len % BITS_PER_WORD;
        if used != 0 {
            if let Some(last) = self.data.last_mut() {
                *last &= (1u64 << used) - 1;
            }
        }
    }
}

impl FromIterator<bool> for Bits {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut bits = Self::default();
        for value in iter {
            if bits.len % BITS_PER_WORD == 0 {
                bits.data.push(0);
            }
            bits.len += 1;
            bits.set(bits.len - 1, value);
        }
        bits
    }
}

impl fmt::Display for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_bit_string())
    }
}

impl fmt::Debug for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bits({}'h{})", self.len, self.to_hex_string())
    }
}

/// Returns the number of u64 words needed to store `len` bits.
fn word_count(len: usize) -> usize {
    len.div_ceil(BITS_PER_WORD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_all_clear() {
        let b = Bits::new(100);
        assert_eq!(b.len(), 100);
        assert_eq!(b.count_ones(), 0);
        assert!(!b.is_empty());
    }

    #[test]
    fn ones_masks_tail() {
        let b = Bits::ones(70);
        assert_eq!(b.count_ones(), 70);
        assert!(b.is_all_ones());
        assert_eq!(b, Bits::from_bit_str(&"1".repeat(70)).unwrap());
    }

    #[test]
    fn set_get_across_words() {
        let mut b = Bits::new(130);
        b.set(0, true);
        b.set(64, true);
        b.set(129, true);
        assert!(b.get(0));
        assert!(b.get(64));
        assert!(b.get(129));
        assert!(!b.get(1));
        b.set(64, false);
        assert!(!b.get(64));
        assert_eq!(b.count_ones(), 2);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn get_out_of_bounds_panics() {
        Bits::new(4).get(4);
    }

    #[test]
    fn u64_conversion() {
        let b = Bits::from_u64(0x1b9, 10);
        assert_eq!(b.to_u64(), Some(0x1b9));
        assert!(b.get(0));
        assert!(!b.get(1));
    }

    #[test]
    fn from_u64_truncates() {
        let b = Bits::from_u64(0xfff, 4);
        assert_eq!(b.to_u64(), Some(0xf));
    }

    #[test]
    fn to_u64_rejects_high_bits() {
        let mut b = Bits::new(80);
        b.set(3, true);
        assert_eq!(b.to_u64(), Some(8));
        b.set(70, true);
        assert_eq!(b.to_u64(), None);
    }

    #[test]
    fn bit_str_is_index_ordered() {
        let b = Bits::from_bit_str("1000").unwrap();
        assert!(b.get(0));
        assert!(!b.get(3));
        assert_eq!(b.to_bit_string(), "1000");
        assert_eq!(format!("{b}"), "1000");
    }

    #[test]
    fn bit_str_invalid() {
        assert!(Bits::from_bit_str("10x1").is_none());
    }

    #[test]
    fn hex_is_lsb_last() {
        let b = Bits::from_hex_str("059", 10).unwrap();
        assert_eq!(b.to_u64(), Some(0x059));
        assert_eq!(b.to_hex_string(), "059");
    }

    #[test]
    fn hex_width_rounds_up() {
        let b = Bits::from_u64(0x5, 11);
        assert_eq!(b.to_hex_string(), "005");
        assert_eq!(Bits::ones(6).to_hex_string(), "3f");
        assert_eq!(Bits::new(0).to_hex_string(), "");
    }

    #[test]
    fn hex_min_width_grows_for_set_bits() {
        assert_eq!(Bits::from_u64(0x5, 10).to_hex_string_min(2), "05");
        assert_eq!(Bits::from_u64(0x205, 10).to_hex_string_min(2), "205");
        assert_eq!(Bits::new(10).to_hex_string_min(0), "");
        assert_eq!(Bits::from_u64(0x1, 10).to_hex_string_min(5), "00001");
    }

    #[test]
    fn hex_rejects_bits_past_len() {
        assert!(Bits::from_hex_str("3ff", 10).is_some());
        assert!(Bits::from_hex_str("7ff", 10).is_none());
        assert!(Bits::from_hex_str("0059", 10).is_some());
        assert!(Bits::from_hex_str("zz", 8).is_none());
    }

    #[test]
    fn from_iterator() {
        let b: Bits = [true, false, true].into_iter().collect();
        assert_eq!(b.len(), 3);
        assert_eq!(b.to_bit_string(), "101");
        let long: Bits = std::iter::repeat(true).take(65).collect();
        assert_eq!(long, Bits::ones(65));
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", Bits::from_u64(0xa, 4)), "Bits(4'ha)");
    }

    #[test]
    fn serde_roundtrip() {
        let b = Bits::from_hex_str("2aaaaaaaaaaaaaaaaaaaa5", 86).unwrap();
        let json = serde_json::to_string(&b).unwrap();
        let back: Bits = serde_json::from_str(&json).unwrap();
        assert_eq!(b, back);
    }
}
