//! Board dimensions, cell indexing and unit directions.
//!
//! Cell `(x, y)` has index `x + y * width`. The four edge masks are derived
//! once from the dimensions and used to reject moves that would leave the
//! board before any shifting happens.

use std::fmt;
use std::ops::Neg;

use crate::bitboard::{Bitboard, MAX_CELLS};

/// Immutable board dimensions together with the derived edge masks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Geometry {
    width: usize,
    height: usize,
    /// All cells with `y = 0`.
    top: Bitboard,
    /// All cells with `y = height - 1`.
    bottom: Bitboard,
    /// All cells with `x = 0`.
    left: Bitboard,
    /// All cells with `x = width - 1`.
    right: Bitboard,
}

impl Geometry {
    /// Creates the geometry for a `width x height` board.
    ///
    /// Returns `None` if either dimension is zero or the board does not fit
    /// in a single bitboard.
    pub fn new(width: usize, height: usize) -> Option<Self> {
        if width == 0 || height == 0 || width.checked_mul(height)? > MAX_CELLS {
            return None;
        }

        let mut geometry = Self {
            width,
            height,
            top: 0,
            bottom: 0,
            left: 0,
            right: 0,
        };
        geometry.top = geometry.draw_rect(0, 0, width, 1);
        geometry.bottom = geometry.draw_rect(0, height - 1, width, 1);
        geometry.left = geometry.draw_rect(0, 0, 1, height);
        geometry.right = geometry.draw_rect(width - 1, 0, 1, height);
        Some(geometry)
    }

    #[inline]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells on the board.
    #[inline]
    pub const fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Mask with every cell of the board set.
    #[inline]
    pub fn full(&self) -> Bitboard {
        self.draw_rect(0, 0, self.width, self.height)
    }

    #[inline]
    pub const fn top(&self) -> Bitboard {
        self.top
    }

    #[inline]
    pub const fn bottom(&self) -> Bitboard {
        self.bottom
    }

    #[inline]
    pub const fn left(&self) -> Bitboard {
        self.left
    }

    #[inline]
    pub const fn right(&self) -> Bitboard {
        self.right
    }

    /// Returns true if `(x, y)` lies on the board.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        (0..self.width as i32).contains(&x) && (0..self.height as i32).contains(&y)
    }

    /// Converts `(x, y)` to a linear cell index.
    #[inline(always)]
    pub const fn index(&self, x: usize, y: usize) -> usize {
        x + y * self.width
    }

    /// Converts a linear cell index back to `(x, y)`.
    #[inline(always)]
    pub const fn coord(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    /// Single-cell mask for `(x, y)`.
    #[inline(always)]
    pub const fn mask(&self, x: usize, y: usize) -> Bitboard {
        1 << self.index(x, y)
    }

    /// Mask with the `w x h` rectangle anchored at `(x, y)` set.
    pub fn draw_rect(&self, x: usize, y: usize, w: usize, h: usize) -> Bitboard {
        let mut mask = 0;
        for cy in y..y + h {
            for cx in x..x + w {
                mask |= self.mask(cx, cy);
            }
        }
        mask
    }

    /// Linear index offset for a translation by `(dx, dy)`.
    #[inline(always)]
    pub const fn offset(&self, dx: i32, dy: i32) -> i32 {
        dx + dy * self.width as i32
    }

    /// The edge a block must not touch to move in `direction`.
    #[inline]
    pub const fn edge(&self, direction: Direction) -> Bitboard {
        match direction {
            Direction::Up => self.top,
            Direction::Right => self.right,
            Direction::Down => self.bottom,
            Direction::Left => self.left,
        }
    }
}

/// A unit move direction. Diagonal moves do not exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All directions in successor generation order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// The `(dx, dy)` translation of a single step.
    #[inline]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }
}

impl Neg for Direction {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.opposite()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        })
    }
}
