//! Puzzle definitions and the text format they are read from.
//!
//! A [`Puzzle`] is the immutable context every board is bound to: the grid
//! dimensions, the block names, the goal, and the starting placement.
//!
//! ```text
//! 4 3          <- width and height
//! A A C .      <- `height` rows of `width` cells
//! A B C .
//! B B . .
//! B            <- target block
//! 1 0          <- target anchor (top-left corner of the bounding box)
//! ```
//!
//! A cell holding a single `.` is empty. Every other token names a block, and
//! all cells with the same name form one rigid block.

use std::collections::BTreeMap;
use std::str::FromStr;

use rustc_hash::FxHashMap;

use crate::bitboard::Bitboard;
use crate::block::{Block, BlockId};
use crate::board::{Board, BoardKey};
use crate::error::ParseError;
use crate::geometry::Geometry;

/// The fixed parameters of one puzzle.
#[derive(Clone, Debug)]
pub struct Puzzle {
    geometry: Geometry,
    /// Block names in sorted order; a block's id is its index here.
    names: Vec<String>,
    ids: FxHashMap<String, BlockId>,
    target: BlockId,
    /// The mask the target block must match for the puzzle to be solved.
    target_mask: Bitboard,
    target_anchor: (i32, i32),
    initial: Vec<Block>,
}

impl Puzzle {
    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.geometry.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.geometry.height()
    }

    /// Block names, indexed by [`BlockId`].
    #[inline]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[inline]
    pub fn name(&self, id: BlockId) -> &str {
        &self.names[id]
    }

    #[inline]
    pub fn block_id(&self, name: &str) -> Option<BlockId> {
        self.ids.get(name).copied()
    }

    #[inline]
    pub fn num_blocks(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn target(&self) -> BlockId {
        self.target
    }

    #[inline]
    pub fn target_name(&self) -> &str {
        self.name(self.target)
    }

    #[inline]
    pub fn target_mask(&self) -> Bitboard {
        self.target_mask
    }

    /// The anchor the target block has to reach.
    #[inline]
    pub fn target_anchor(&self) -> (i32, i32) {
        self.target_anchor
    }

    /// The starting placement, indexed by [`BlockId`].
    #[inline]
    pub fn initial_blocks(&self) -> &[Block] {
        &self.initial
    }

    /// The root board of the search.
    pub fn initial_board(&self) -> Board<'_> {
        Board::new(self, self.initial.clone().into_boxed_slice())
    }

    /// Rebuilds the board a [`BoardKey`] was taken from.
    pub fn board_from_key(&self, key: &BoardKey) -> Board<'_> {
        let blocks = self
            .initial
            .iter()
            .zip(key.iter())
            .map(|(block, &lowest)| block.relocated(lowest as usize, &self.geometry))
            .collect();
        Board::new(self, blocks)
    }
}

/// Line-numbered access to the puzzle text.
struct Lines<'a> {
    inner: std::str::Lines<'a>,
    number: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.lines(),
            number: 0,
        }
    }

    /// Returns the next line, or `None` at end of input.
    fn next(&mut self) -> Option<&'a str> {
        let line = self.inner.next()?;
        self.number += 1;
        Some(line.trim_end_matches('\r'))
    }

    /// Line number a missing line would have had.
    fn upcoming(&self) -> usize {
        self.number + 1
    }
}

fn is_empty_cell(token: &str) -> bool {
    token == "."
}

fn parse_pair<T: FromStr>(line: &str) -> Option<(T, T)> {
    let mut fields = line.split_whitespace();
    let first = fields.next()?.parse().ok()?;
    let second = fields.next()?.parse().ok()?;
    fields.next().is_none().then_some((first, second))
}

impl FromStr for Puzzle {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut lines = Lines::new(text);

        let header = lines.next().ok_or(ParseError::MalformedHeader { line: 1 })?;
        let (width, height): (usize, usize) =
            parse_pair(header).ok_or(ParseError::MalformedHeader { line: lines.number })?;
        if width == 0 || height == 0 {
            return Err(ParseError::MalformedHeader { line: lines.number });
        }
        let geometry = Geometry::new(width, height).ok_or(ParseError::BoardTooLarge {
            line: lines.number,
            width,
            height,
        })?;

        // sorted so that block ids follow name order
        let mut cells: BTreeMap<&str, Bitboard> = BTreeMap::new();
        for y in 0..height {
            let row = lines.next().ok_or(ParseError::MissingRow {
                line: lines.upcoming(),
                row: y,
            })?;
            let tokens: Vec<&str> = row.split_whitespace().collect();
            if tokens.len() != width {
                return Err(ParseError::RowWidth {
                    line: lines.number,
                    expected: width,
                    found: tokens.len(),
                });
            }

            for (x, token) in tokens.into_iter().enumerate() {
                if !is_empty_cell(token) {
                    *cells.entry(token).or_default() |= geometry.mask(x, y);
                }
            }
        }

        let target_line = lines.upcoming();
        let target_name = lines
            .next()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(ParseError::MissingTarget { line: target_line })?;

        let names: Vec<String> = cells.keys().map(|name| name.to_string()).collect();
        let initial: Vec<Block> = cells
            .values()
            .filter_map(|&mask| Block::from_mask(mask, &geometry))
            .collect();
        let ids: FxHashMap<String, BlockId> = names
            .iter()
            .enumerate()
            .map(|(id, name)| (name.clone(), id))
            .collect();

        let target = *ids.get(target_name).ok_or_else(|| ParseError::UnknownTarget {
            line: lines.number,
            name: target_name.to_string(),
        })?;

        let position = lines.next().ok_or(ParseError::MalformedTargetPosition {
            line: lines.upcoming(),
        })?;
        let (x, y): (i64, i64) = parse_pair(position)
            .ok_or(ParseError::MalformedTargetPosition { line: lines.number })?;
        let on_board = (0..width as i64).contains(&x) && (0..height as i64).contains(&y);
        if !on_board {
            return Err(ParseError::TargetOffBoard {
                line: lines.number,
                x,
                y,
            });
        }

        let goal = initial[target]
            .placed_at(x as i32, y as i32, &geometry)
            .ok_or_else(|| ParseError::TargetDoesNotFit {
                line: lines.number,
                name: target_name.to_string(),
                x,
                y,
            })?;

        Ok(Self {
            geometry,
            names,
            ids,
            target,
            target_mask: goal.mask(),
            target_anchor: goal.anchor(),
            initial,
        })
    }
}
