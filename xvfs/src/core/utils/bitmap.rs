// SPDX-License-Identifier: MIT

//! Bit access over byte slices used as allocation bitmaps.
//!
//! Bits are counted low-bit-first: bit 0 is the LSB of byte 0, bit 8 the
//! LSB of byte 1.

pub trait BitmapOps {
    /// Sets or clears bit `bit`. Out-of-range bits are ignored.
    fn set_bit(&mut self, bit: usize, value: bool);

    /// Returns bit `bit`, or `false` when out of range.
    fn get_bit(&self, bit: usize) -> bool;

    /// Number of set bits in `[start, end)`.
    fn count_ones_in_range(&self, start: usize, end: usize) -> usize;

    /// First clear bit at or after `start`, below `limit`.
    fn find_first_zero(&self, start: usize, limit: usize) -> Option<usize>;
}

impl BitmapOps for [u8] {
    #[inline]
    fn set_bit(&mut self, bit: usize, value: bool) {
        if let Some(byte) = self.get_mut(bit / 8) {
            let mask = 1u8 << (bit % 8);
            if value {
                *byte |= mask;
            } else {
                *byte &= !mask;
            }
        }
    }

    #[inline]
    fn get_bit(&self, bit: usize) -> bool {
        self.get(bit / 8)
            .is_some_and(|b| (b & (1 << (bit % 8))) != 0)
    }

    fn count_ones_in_range(&self, start: usize, end: usize) -> usize {
        let end = end.min(self.len() * 8);
        if start >= end {
            return 0;
        }
        // Whole bytes are counted at once; the ragged edges bit by bit.
        let first_full = start.div_ceil(8);
        let last_full = end / 8;
        if first_full >= last_full {
            return (start..end).filter(|&i| self.get_bit(i)).count();
        }
        let head = (start..first_full * 8).filter(|&i| self.get_bit(i)).count();
        let body: usize = self[first_full..last_full]
            .iter()
            .map(|b| b.count_ones() as usize)
            .sum();
        let tail = (last_full * 8..end).filter(|&i| self.get_bit(i)).count();
        head + body + tail
    }

    fn find_first_zero(&self, start: usize, limit: usize) -> Option<usize> {
        let limit = limit.min(self.len() * 8);
        let mut bit = start;
        while bit < limit {
            if bit % 8 == 0 && self[bit / 8] == 0xFF {
                bit += 8;
                continue;
            }
            if !self.get_bit(bit) {
                return Some(bit);
            }
            bit += 1;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_bit() {
        let mut bitmap = [0u8; 4];

        bitmap.set_bit(0, true);
        bitmap.set_bit(7, true);
        bitmap.set_bit(8, true);
        assert_eq!(bitmap[0], 0b1000_0001);
        assert_eq!(bitmap[1], 0b0000_0001);

        bitmap.set_bit(0, false);
        assert!(!bitmap.get_bit(0));
        assert!(bitmap.get_bit(7));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut bitmap = [0u8; 2];
        bitmap.set_bit(100, true);
        assert_eq!(bitmap, [0, 0]);
        assert!(!bitmap.get_bit(100));
    }

    #[test]
    fn test_count_ones_in_range() {
        let bitmap = [0b1010_1010u8, 0b1111_0000, 0b0000_1111];

        assert_eq!(bitmap.count_ones_in_range(0, 24), 12);
        assert_eq!(bitmap.count_ones_in_range(0, 8), 4);
        assert_eq!(bitmap.count_ones_in_range(1, 2), 1);
        assert_eq!(bitmap.count_ones_in_range(3, 20), 3 + 4 + 4);
        assert_eq!(bitmap.count_ones_in_range(20, 100), 0);
    }

    #[test]
    fn test_find_first_zero() {
        let bitmap = [0xFFu8, 0b1111_1101, 0];
        assert_eq!(bitmap.find_first_zero(0, 24), Some(9));
        assert_eq!(bitmap.find_first_zero(10, 24), Some(16));
        assert_eq!(bitmap.find_first_zero(0, 9), None);

        let full = [0xFFu8; 4];
        assert_eq!(full.find_first_zero(0, 32), None);
    }
}
