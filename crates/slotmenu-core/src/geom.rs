//! Slot geometry: [`SlotPos`] and the flat-index arithmetic of a menu grid.
//!
//! Every surface is a row-major grid [`ROW_WIDTH`] slots wide. A slot is
//! addressed either by its flat index or by its `(x, z)` coordinate, where
//! `x` is the column and `z` the row, with `index = z * ROW_WIDTH + x`.

use std::fmt;
use std::ops::Range;

/// Number of slots in one surface row.
pub const ROW_WIDTH: usize = 9;

/// Flat index of the slot at column `x`, row `z`.
#[inline]
pub const fn slot_index(x: usize, z: usize) -> usize {
    z * ROW_WIDTH + x
}

/// Number of whole rows needed to hold `size` slots.
#[inline]
pub const fn rows_for(size: usize) -> usize {
    size.div_ceil(ROW_WIDTH)
}

/// Flat indices covered by row `z`.
#[inline]
pub const fn row_slots(z: usize) -> Range<usize> {
    slot_index(0, z)..slot_index(0, z + 1)
}

/// Whether `size` is a usable surface size (a positive multiple of
/// [`ROW_WIDTH`]).
#[inline]
pub const fn is_valid_size(size: usize) -> bool {
    size > 0 && size % ROW_WIDTH == 0
}

// ---------------------------------------------------------------------------
// SlotPos
// ---------------------------------------------------------------------------

/// A slot coordinate. `x` grows right, `z` grows down.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotPos {
    pub x: usize,
    pub z: usize,
}

impl SlotPos {
    #[inline]
    pub const fn new(x: usize, z: usize) -> Self {
        Self { x, z }
    }

    /// Coordinate of flat slot `index`.
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        Self {
            x: index % ROW_WIDTH,
            z: index / ROW_WIDTH,
        }
    }

    /// Flat index of this coordinate.
    #[inline]
    pub const fn index(self) -> usize {
        slot_index(self.x, self.z)
    }
}

impl fmt::Display for SlotPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}
