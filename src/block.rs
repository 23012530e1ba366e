//! Rigid sliding blocks.
//!
//! A block is a fixed shape of unit cells at some position on the board.
//! Names are owned by the [`Puzzle`](crate::puzzle::Puzzle); a block only
//! carries its mask and the top-left corner of its bounding box.

use crate::bitboard::{self, Bitboard};
use crate::geometry::{Direction, Geometry};

/// Index of a block within its puzzle. Ids follow the sorted block names.
pub type BlockId = usize;

/// A block placed on the board.
///
/// The anchor is `(min x, min y)` over the block's cells, which for
/// non-rectangular shapes need not be a cell of the block itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    mask: Bitboard,
    anchor_x: i32,
    anchor_y: i32,
}

impl Block {
    /// Builds a block from the cells it occupies.
    ///
    /// Returns `None` for an empty mask.
    pub fn from_mask(mask: Bitboard, geometry: &Geometry) -> Option<Self> {
        let (anchor_x, anchor_y) = bitboard::cells(mask)
            .map(|index| geometry.coord(index))
            .fold(None, |min: Option<(usize, usize)>, (x, y)| match min {
                None => Some((x, y)),
                Some((mx, my)) => Some((mx.min(x), my.min(y))),
            })?;

        Some(Self {
            mask,
            anchor_x: anchor_x as i32,
            anchor_y: anchor_y as i32,
        })
    }

    #[inline]
    pub const fn mask(&self) -> Bitboard {
        self.mask
    }

    #[inline]
    pub const fn anchor(&self) -> (i32, i32) {
        (self.anchor_x, self.anchor_y)
    }

    /// Number of cells in the block.
    #[inline]
    pub const fn size(&self) -> u32 {
        self.mask.count_ones()
    }

    /// The mask this block would occupy after translating by `(dx, dy)`.
    ///
    /// No bounds check is done here; rows wrap into each other if the caller
    /// has not already rejected the move against the board edges.
    #[inline(always)]
    pub fn attempt_move(&self, dx: i32, dy: i32, geometry: &Geometry) -> Bitboard {
        bitboard::shift(self.mask, geometry.offset(dx, dy))
    }

    /// Returns a copy of this block translated by `(dx, dy)`.
    #[inline]
    pub fn translated(&self, dx: i32, dy: i32, geometry: &Geometry) -> Self {
        Self {
            mask: self.attempt_move(dx, dy, geometry),
            anchor_x: self.anchor_x + dx,
            anchor_y: self.anchor_y + dy,
        }
    }

    /// Returns a copy of this block moved one step in `direction`.
    #[inline]
    pub fn moved(&self, direction: Direction, geometry: &Geometry) -> Self {
        let (dx, dy) = direction.delta();
        self.translated(dx, dy, geometry)
    }

    /// Index of the block's lowest cell.
    #[inline]
    pub const fn lowest_cell(&self) -> usize {
        self.mask.trailing_zeros() as usize
    }

    /// Returns a copy of this block translated so that its lowest cell is
    /// `lowest`.
    ///
    /// Translations preserve the order of cell indices, so the lowest cell
    /// alone determines where a rigid shape sits.
    pub fn relocated(&self, lowest: usize, geometry: &Geometry) -> Self {
        let (from_x, from_y) = geometry.coord(self.lowest_cell());
        let (to_x, to_y) = geometry.coord(lowest);
        self.translated(
            to_x as i32 - from_x as i32,
            to_y as i32 - from_y as i32,
            geometry,
        )
    }

    /// Places this block's shape with its anchor at `(x, y)`.
    ///
    /// Unlike [`translated`](Self::translated) this checks every cell, and
    /// returns `None` if any of them would fall off the board.
    pub fn placed_at(&self, x: i32, y: i32, geometry: &Geometry) -> Option<Self> {
        let (dx, dy) = (x - self.anchor_x, y - self.anchor_y);
        let mut mask = 0;
        for index in bitboard::cells(self.mask) {
            let (cx, cy) = geometry.coord(index);
            let (nx, ny) = (cx as i32 + dx, cy as i32 + dy);
            if !geometry.contains(nx, ny) {
                return None;
            }
            mask |= geometry.mask(nx as usize, ny as usize);
        }

        Some(Self {
            mask,
            anchor_x: x,
            anchor_y: y,
        })
    }
}
