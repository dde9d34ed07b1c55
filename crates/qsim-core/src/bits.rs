//! Bit-index algebra on basis-state indices.
//!
//! Qubit `p` of a basis state is bit `p` of its index, with bit 0 the least
//! significant. The scalar helpers do no range checking: callers guarantee
//! that every bit position is below `usize::BITS` and that `width ≥ 1`.
//!
//! The same operations are available as [`BitOp`] values so they can be
//! mapped over a whole [`IndexArray`](crate::index::IndexArray).

use serde::{Deserialize, Serialize};

/// Mask with the `width` least-significant bits set.
#[inline]
pub fn low_mask(width: u32) -> usize {
    if width >= usize::BITS {
        usize::MAX
    } else {
        (1usize << width) - 1
    }
}

/// Mask with only bit `p` set.
#[inline]
pub fn bit_mask(p: u32) -> usize {
    1usize << p
}

/// Set bit `p` of `n`.
#[inline]
pub fn set_bit(n: usize, p: u32) -> usize {
    n | bit_mask(p)
}

/// Clear bit `p` of `n`.
#[inline]
pub fn clear_bit(n: usize, p: u32) -> usize {
    n & !bit_mask(p)
}

/// Value (0 or 1) of bit `i` of `n`.
#[inline]
pub fn bit_at(n: usize, i: u32) -> usize {
    (n >> i) & 1
}

/// Number of set bits among the `width` least-significant bits of `n`.
#[inline]
pub fn pop_count(n: usize, width: u32) -> u32 {
    (n & low_mask(width)).count_ones()
}

/// Exchange bits `i` and `j` of `n`.
#[inline]
pub fn swap_bits(n: usize, i: u32, j: u32) -> usize {
    let differ = ((n >> i) ^ (n >> j)) & 1;
    n ^ ((differ << i) | (differ << j))
}

/// Cyclically rotate the `width`-bit window of `n` by `d` positions.
///
/// Bit `p` moves to bit `(p + d) mod width`. Read as a qubit string with
/// qubit 0 written first, this is a cyclic shift to the right. Bits above
/// the window are discarded.
#[inline]
pub fn translate(n: usize, d: u32, width: u32) -> usize {
    let mask = low_mask(width);
    let n = n & mask;
    let d = d % width;
    if d == 0 {
        return n;
    }
    (n >> (width - d)) | ((n << d) & mask)
}

/// Bitwise complement restricted to the `width`-bit window.
#[inline]
pub fn invert(n: usize, width: u32) -> usize {
    !n & low_mask(width)
}

/// Reverse the bit order within the `width`-bit window.
#[inline]
pub fn reflect(n: usize, width: u32) -> usize {
    (0..width).fold(0, |acc, i| acc | (bit_at(n, i) << (width - 1 - i)))
}

/// A single index transformation, applicable to one index or an index array.
///
/// `SetBit` and `ClearBit` are projections; every other variant is a
/// bijection on `[0, 2^L)` for a register of at least the referenced width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BitOp {
    /// Leave the index unchanged.
    Identity,
    /// Set one bit.
    SetBit(u32),
    /// Clear one bit.
    ClearBit(u32),
    /// XOR with a fixed mask (one or more bit flips).
    Flip(usize),
    /// Flip `target` when `control` is set.
    ControlledFlip {
        /// Control bit.
        control: u32,
        /// Bit flipped when the control is set.
        target: u32,
    },
    /// Exchange two bits.
    SwapBits(u32, u32),
    /// Cyclic rotation within a window, see [`translate`].
    Translate {
        /// Rotation distance (taken modulo `width`).
        shift: u32,
        /// Window width in bits.
        width: u32,
    },
    /// Complement within a window.
    Invert {
        /// Window width in bits.
        width: u32,
    },
    /// Bit reversal within a window.
    Reflect {
        /// Window width in bits.
        width: u32,
    },
}

impl BitOp {
    /// Apply the transformation to a single index.
    #[inline]
    pub fn apply(self, n: usize) -> usize {
        match self {
            BitOp::Identity => n,
            BitOp::SetBit(p) => set_bit(n, p),
            BitOp::ClearBit(p) => clear_bit(n, p),
            BitOp::Flip(mask) => n ^ mask,
            BitOp::ControlledFlip { control, target } => n ^ (bit_at(n, control) << target),
            BitOp::SwapBits(i, j) => swap_bits(n, i, j),
            BitOp::Translate { shift, width } => translate(n, shift, width),
            BitOp::Invert { width } => invert(n, width),
            BitOp::Reflect { width } => reflect(n, width),
        }
    }

    /// True if the transformation permutes `[0, 2^width)`.
    pub fn is_bijection(self) -> bool {
        !matches!(self, BitOp::SetBit(_) | BitOp::ClearBit(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_clear_bit() {
        assert_eq!(set_bit(0b0100, 0), 0b0101);
        assert_eq!(set_bit(0b0101, 0), 0b0101);
        assert_eq!(clear_bit(0b0101, 2), 0b0001);
        assert_eq!(clear_bit(0b0001, 2), 0b0001);
        assert_eq!(bit_at(0b0100, 2), 1);
        assert_eq!(bit_at(0b0100, 1), 0);
    }

    #[test]
    fn test_pop_count_restricted_to_window() {
        assert_eq!(pop_count(0b1011, 4), 3);
        assert_eq!(pop_count(0b1011, 2), 2);
        assert_eq!(pop_count(0, 8), 0);
    }

    #[test]
    fn test_swap_bits() {
        assert_eq!(swap_bits(0b01, 0, 1), 0b10);
        assert_eq!(swap_bits(0b11, 0, 1), 0b11);
        assert_eq!(swap_bits(0b1000, 3, 0), 0b0001);
    }

    #[test]
    fn test_translate() {
        assert_eq!(translate(0b001, 1, 3), 0b010);
        assert_eq!(translate(0b100, 1, 3), 0b001);
        assert_eq!(translate(0b011, 4, 3), 0b110);
        assert_eq!(translate(0b101, 0, 3), 0b101);
        assert_eq!(translate(0b101, 3, 3), 0b101);
    }

    #[test]
    fn test_invert_and_reflect() {
        assert_eq!(invert(0b0101, 4), 0b1010);
        assert_eq!(invert(0, 3), 0b111);
        assert_eq!(reflect(0b0001, 4), 0b1000);
        assert_eq!(reflect(0b0110, 4), 0b0110);
        assert_eq!(reflect(0b0011, 3), 0b0110);
    }

    #[test]
    fn test_symmetry_ops_are_bijections() {
        let width = 5;
        let ops = [
            BitOp::SwapBits(1, 3),
            BitOp::Translate { shift: 2, width },
            BitOp::Invert { width },
            BitOp::Reflect { width },
            BitOp::ControlledFlip { control: 0, target: 4 },
        ];
        for op in ops {
            assert!(op.is_bijection());
            let mut seen = vec![false; 1 << width];
            for n in 0..(1usize << width) {
                let m = op.apply(n);
                assert!(m < (1 << width), "{op:?} left the window");
                assert!(!seen[m], "{op:?} is not injective");
                seen[m] = true;
            }
        }
    }

    #[test]
    fn test_controlled_flip() {
        let op = BitOp::ControlledFlip { control: 0, target: 1 };
        assert_eq!(op.apply(0b00), 0b00);
        assert_eq!(op.apply(0b01), 0b11);
        assert_eq!(op.apply(0b10), 0b10);
        assert_eq!(op.apply(0b11), 0b01);
    }
}
