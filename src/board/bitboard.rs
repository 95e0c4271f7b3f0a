//! Bitboard implementation for fast line matching

use super::MAX_CELLS;

const WORDS: usize = MAX_CELLS / 64;

/// Cell mask for one board.
/// Uses 4 x u64 to represent up to 256 cells (a 4x4x4 board fills one word)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitboard {
    bits: [u64; WORDS],
}

impl Bitboard {
    /// Create empty bitboard
    pub const fn new() -> Self {
        Self { bits: [0; WORDS] }
    }

    /// Set a bit at cell index
    #[inline]
    pub fn set(&mut self, idx: usize) {
        self.bits[idx / 64] |= 1u64 << (idx % 64);
    }

    /// Clear a bit at cell index
    #[inline]
    pub fn clear(&mut self, idx: usize) {
        self.bits[idx / 64] &= !(1u64 << (idx % 64));
    }

    /// Check if bit is set at cell index
    #[inline]
    pub fn get(&self, idx: usize) -> bool {
        (self.bits[idx / 64] >> (idx % 64)) & 1 == 1
    }

    /// Count total set bits (popcount)
    #[inline]
    pub fn count(&self) -> u32 {
        self.bits.iter().map(|b| b.count_ones()).sum()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&b| b == 0)
    }

    /// True if every bit of `mask` is set in `self`
    #[inline]
    pub fn contains_all(&self, mask: &Bitboard) -> bool {
        self.bits
            .iter()
            .zip(mask.bits.iter())
            .all(|(&have, &want)| have & want == want)
    }

    /// True if `self` and `mask` share at least one bit
    #[inline]
    pub fn intersects(&self, mask: &Bitboard) -> bool {
        self.bits
            .iter()
            .zip(mask.bits.iter())
            .any(|(&a, &b)| a & b != 0)
    }

    /// Bitwise union
    #[inline]
    pub fn union(&self, other: &Bitboard) -> Bitboard {
        let mut bits = self.bits;
        for (word, &o) in bits.iter_mut().zip(other.bits.iter()) {
            *word |= o;
        }
        Bitboard { bits }
    }

    /// Iterate over set bit indices
    pub fn iter_ones(&self) -> BitboardIter {
        BitboardIter {
            bits: self.bits,
            word_idx: 0,
            current_word: self.bits[0],
        }
    }
}

/// Iterator over set bits in a Bitboard
pub struct BitboardIter {
    bits: [u64; WORDS],
    word_idx: usize,
    current_word: u64,
}

impl Iterator for BitboardIter {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        while self.current_word == 0 {
            self.word_idx += 1;
            if self.word_idx >= WORDS {
                return None;
            }
            self.current_word = self.bits[self.word_idx];
        }

        let bit_pos = self.current_word.trailing_zeros() as usize;
        self.current_word &= self.current_word - 1;
        Some(self.word_idx * 64 + bit_pos)
    }
}
