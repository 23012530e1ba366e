//! Packed occupancy masks.
//!
//! A bitboard is a plain `u32` where bit `i` is set if cell `i` belongs to
//! the described set. Cell indices are assigned row-major by
//! [`Geometry::index`](crate::geometry::Geometry::index), so a puzzle may
//! have at most 32 cells.

/// Bitmask where bit `x + y * width` is set if cell `(x, y)` is occupied.
pub type Bitboard = u32;

/// Number of cells a bitboard can address.
pub const MAX_CELLS: usize = Bitboard::BITS as usize;

/// Returns true if the two masks share at least one cell.
#[inline(always)]
pub const fn overlap(a: Bitboard, b: Bitboard) -> bool {
    (a & b) != 0
}

/// Bitwise OR of all masks.
#[inline]
pub fn combine<I>(masks: I) -> Bitboard
where
    I: IntoIterator<Item = Bitboard>,
{
    masks.into_iter().fold(0, |acc, mask| acc | mask)
}

/// Shifts a mask by a signed cell offset.
///
/// Positive offsets move bits towards higher indices. Bits shifted past
/// either end are dropped; an offset of 32 or more clears the mask.
#[inline(always)]
pub fn shift(mask: Bitboard, offset: i32) -> Bitboard {
    if offset >= 0 {
        mask.checked_shl(offset as u32).unwrap_or(0)
    } else {
        mask.checked_shr(offset.unsigned_abs()).unwrap_or(0)
    }
}

/// Iterates over the indices of the set bits, lowest first.
#[inline]
pub fn cells(mask: Bitboard) -> impl Iterator<Item = usize> {
    let mut remaining = mask;
    std::iter::from_fn(move || {
        if remaining == 0 {
            return None;
        }
        let index = remaining.trailing_zeros() as usize;
        // clear the lowest set bit
        remaining &= remaining - 1;
        Some(index)
    })
}
