//! Klotski Solver Library
//!
//! Finds shortest solutions to sliding-block puzzles on grids of up to 32
//! cells. Boards are bitboards over the grid; the search is a plain
//! breadth-first search where every step slides one block by one cell.

pub mod bitboard;
pub mod block;
pub mod board;
pub mod error;
pub mod geometry;
pub mod persistence;
pub mod puzzle;
pub mod solver;

pub use block::{Block, BlockId};
pub use board::{Board, BoardKey};
pub use error::{Error, ParseError, Result, SolveError};
pub use geometry::{Direction, Geometry};
pub use puzzle::Puzzle;
pub use solver::{solve, Dedup, SearchStats, Solution, Solver, SolverConfig};
