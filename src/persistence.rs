//! Reading puzzle files and writing solution files.
//!
//! Solution file format (UTF-8):
//! - the banner line `Solution`
//! - repeat per board, numbered from 1:
//!   - `<i>.`
//!   - the board rendering, one line per row
//!   - an empty line

use std::fs;
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};
use crate::puzzle::Puzzle;
use crate::solver::Solution;

/// Reads and parses a puzzle file.
pub fn read_puzzle(path: &Path) -> Result<Puzzle> {
    let text = fs::read_to_string(path).map_err(|source| Error::InputIo {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("read {} bytes from {}", text.len(), path.display());
    Ok(text.parse()?)
}

/// Formats a solution in the solution file format.
pub fn format_solution(solution: &Solution<'_>) -> String {
    let mut output = String::from("Solution\n");
    for (i, board) in solution.boards().iter().enumerate() {
        output.push_str(&format!("{}.\n{}\n", i + 1, board));
    }
    output
}

/// Writes a solution file, replacing any existing file.
pub fn write_solution(path: &Path, solution: &Solution<'_>) -> Result<()> {
    fs::write(path, format_solution(solution)).map_err(|source| Error::OutputIo {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("wrote {} boards to {}", solution.boards().len(), path.display());
    Ok(())
}
