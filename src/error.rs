//! Error types for parsing, solving and file I/O.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A malformed puzzle description. Line numbers are 1-based.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: expected \"W H\" header")]
    MalformedHeader { line: usize },
    #[error("line {line}: board of {width}x{height} cells does not fit in 32 bits")]
    BoardTooLarge {
        line: usize,
        width: usize,
        height: usize,
    },
    #[error("line {line}: missing board row {row}")]
    MissingRow { line: usize, row: usize },
    #[error("line {line}: expected {expected} cells, found {found}")]
    RowWidth {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: missing target block name")]
    MissingTarget { line: usize },
    #[error("line {line}: unknown target block {name:?}")]
    UnknownTarget { line: usize, name: String },
    #[error("line {line}: expected \"X Y\" target position")]
    MalformedTargetPosition { line: usize },
    #[error("line {line}: target position ({x}, {y}) is off the board")]
    TargetOffBoard { line: usize, x: i64, y: i64 },
    #[error("line {line}: block {name:?} does not fit on the board at ({x}, {y})")]
    TargetDoesNotFit {
        line: usize,
        name: String,
        x: i64,
        y: i64,
    },
}

/// Reasons a search ends without a solution.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum SolveError {
    #[error("no solution exists ({explored} states explored)")]
    NoSolution { explored: usize },
    #[error("gave up after visiting {limit} states")]
    StateLimit { limit: usize },
    #[error("search cancelled")]
    Cancelled,
}

/// Any failure surfaced to the driver.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    InputIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid puzzle: {0}")]
    InputFormat(#[from] ParseError),
    #[error(transparent)]
    Solve(#[from] SolveError),
    #[error("failed to write {}: {source}", path.display())]
    OutputIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
