//! Board configurations and unit moves.
//!
//! A [`Board`] is one placement of every block of a [`Puzzle`]. Boards are
//! never mutated: a move produces a new board. The search keeps explored
//! boards only as [`BoardKey`]s and rebuilds them with
//! [`Puzzle::board_from_key`].

use std::fmt;

use crate::bitboard::{self, Bitboard, MAX_CELLS};
use crate::block::{Block, BlockId};
use crate::geometry::Direction;
use crate::puzzle::Puzzle;

/// Exact identity of a configuration within its puzzle.
///
/// Entry `id` is the index of block `id`'s lowest cell. A block's shape never
/// changes, so that index pins down its mask. Entries past the last block
/// are zero.
pub type BoardKey = [u8; MAX_CELLS];

/// One configuration of a puzzle.
#[derive(Clone, Debug)]
pub struct Board<'p> {
    puzzle: &'p Puzzle,
    /// Indexed by [`BlockId`].
    blocks: Box<[Block]>,
    occupied: Bitboard,
    hash: u32,
}

impl<'p> Board<'p> {
    pub(crate) fn new(puzzle: &'p Puzzle, blocks: Box<[Block]>) -> Self {
        let occupied = bitboard::combine(blocks.iter().map(Block::mask));
        let hash = fold_hash(blocks.iter().map(Block::mask));
        Self {
            puzzle,
            blocks,
            occupied,
            hash,
        }
    }

    #[inline]
    pub fn puzzle(&self) -> &'p Puzzle {
        self.puzzle
    }

    /// All blocks, indexed by [`BlockId`].
    #[inline]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    #[inline]
    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id]
    }

    pub fn block_named(&self, name: &str) -> Option<&Block> {
        self.puzzle.block_id(name).map(|id| &self.blocks[id])
    }

    /// Union of all block masks.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    /// 32-bit fingerprint of the configuration.
    ///
    /// Folds `h = h * 31 + mask` over the blocks in name order with wrapping
    /// arithmetic, so it depends only on the `(name, mask)` pairs.
    #[inline]
    pub fn hash(&self) -> u32 {
        self.hash
    }

    /// Exact key for deduplication, see [`BoardKey`].
    pub fn key(&self) -> BoardKey {
        let mut key = [0; MAX_CELLS];
        for (entry, block) in key.iter_mut().zip(self.blocks.iter()) {
            *entry = block.lowest_cell() as u8;
        }
        key
    }

    #[inline]
    pub fn is_solved(&self) -> bool {
        self.blocks[self.puzzle.target()].mask() == self.puzzle.target_mask()
    }

    /// Returns true if block `id` can slide one cell in `direction`.
    ///
    /// The block may not touch the edge it moves towards, and its moved mask
    /// must not overlap any other block. Works for any rigid shape.
    #[inline]
    pub fn can_move(&self, id: BlockId, direction: Direction) -> bool {
        let geometry = self.puzzle.geometry();
        let block = &self.blocks[id];
        if bitboard::overlap(block.mask(), geometry.edge(direction)) {
            return false;
        }

        let others = self.occupied & !block.mask();
        let (dx, dy) = direction.delta();
        !bitboard::overlap(others, block.attempt_move(dx, dy, geometry))
    }

    /// Like [`can_move`](Self::can_move), by block name. Unknown names
    /// cannot move.
    pub fn can_move_named(&self, name: &str, direction: Direction) -> bool {
        self.puzzle
            .block_id(name)
            .is_some_and(|id| self.can_move(id, direction))
    }

    /// Returns the board with block `id` moved one cell in `direction`.
    ///
    /// The move must be legal; see [`can_move`](Self::can_move).
    pub fn move_block(&self, id: BlockId, direction: Direction) -> Board<'p> {
        debug_assert!(
            self.can_move(id, direction),
            "illegal move of {} {}",
            self.puzzle.name(id),
            direction
        );

        let mut blocks = self.blocks.clone();
        blocks[id] = blocks[id].moved(direction, self.puzzle.geometry());
        Board::new(self.puzzle, blocks)
    }

    /// All legal moves, blocks in name order and directions in
    /// [`Direction::ALL`] order.
    pub fn legal_moves(&self) -> impl Iterator<Item = (BlockId, Direction)> + '_ {
        (0..self.blocks.len()).flat_map(move |id| {
            Direction::ALL
                .into_iter()
                .filter(move |&direction| self.can_move(id, direction))
                .map(move |direction| (id, direction))
        })
    }

    /// Every board one legal move away, in [`legal_moves`](Self::legal_moves)
    /// order.
    pub fn successors(&self) -> impl Iterator<Item = Board<'p>> + '_ {
        self.legal_moves()
            .map(move |(id, direction)| self.move_block(id, direction))
    }

    /// Finds the single unit move that turns `self` into `other`.
    ///
    /// Returns `None` unless exactly one block differs and it moved by one
    /// legal step.
    pub fn move_to(&self, other: &Board<'_>) -> Option<(BlockId, Direction)> {
        if self.puzzle.names() != other.puzzle.names() {
            return None;
        }

        let mut changed = self
            .blocks
            .iter()
            .zip(other.blocks.iter())
            .enumerate()
            .filter(|(_, (a, b))| a.mask() != b.mask());
        let (id, (from, to)) = changed.next()?;
        if changed.next().is_some() {
            return None;
        }

        Direction::ALL
            .into_iter()
            .find(|&direction| {
                self.can_move(id, direction)
                    && from.moved(direction, self.puzzle.geometry()).mask() == to.mask()
            })
            .map(|direction| (id, direction))
    }
}

/// Same block names and the same mask for every name.
///
/// Anchors follow from masks and are not compared.
impl PartialEq for Board<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.puzzle.names() == other.puzzle.names()
            && self
                .blocks
                .iter()
                .zip(other.blocks.iter())
                .all(|(a, b)| a.mask() == b.mask())
    }
}

impl Eq for Board<'_> {}

/// Renders `height` rows of space-prefixed cell tokens, `.` for empty cells.
impl fmt::Display for Board<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let geometry = self.puzzle.geometry();
        let mut cells: Vec<&str> = vec!["."; geometry.cell_count()];
        for (id, block) in self.blocks.iter().enumerate() {
            for index in bitboard::cells(block.mask()) {
                cells[index] = self.puzzle.name(id);
            }
        }

        for row in cells.chunks(geometry.width()) {
            for token in row {
                write!(f, " {token}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn fold_hash(masks: impl Iterator<Item = Bitboard>) -> u32 {
    masks.fold(0u32, |h, mask| h.wrapping_mul(31).wrapping_add(mask))
}
