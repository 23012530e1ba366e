//! Breadth-first search for a shortest solution.
//!
//! Key points:
//! - Every enqueued successor is exactly one unit move of one block, so the
//!   first solved board popped from the FIFO frontier is at minimum depth
//! - Explored boards are kept only as fixed-size [`BoardKey`]s plus a parent
//!   index in an arena; boards are rebuilt when the path is reconstructed
//! - FxHashSet for the visited set, keyed either by the exact board key or
//!   by the 32-bit board hash

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info};
use rustc_hash::FxHashSet;

use crate::block::BlockId;
use crate::board::{Board, BoardKey};
use crate::error::SolveError;
use crate::geometry::Direction;
use crate::puzzle::Puzzle;

/// How the visited set recognises boards it has already seen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Dedup {
    /// Compare complete configurations. Never drops a new board.
    #[default]
    Exact,
    /// Compare 32-bit board hashes only. Uses less memory, but a collision
    /// discards a board that was never explored and can lengthen or lose the
    /// solution.
    Hash32,
}

/// Search parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SolverConfig {
    pub dedup: Dedup,
    /// Give up once more than this many distinct boards have been seen.
    pub max_states: Option<usize>,
}

/// Counters collected during one search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Boards popped from the frontier.
    pub explored: usize,
    /// Distinct boards recorded in the visited set.
    pub visited: usize,
    /// Largest frontier size seen.
    pub peak_frontier: usize,
    /// Deepest level popped from the frontier.
    pub depth: usize,
}

/// A shortest path from the initial board to a solved board.
#[derive(Clone, Debug)]
pub struct Solution<'p> {
    boards: Vec<Board<'p>>,
    stats: SearchStats,
}

impl<'p> Solution<'p> {
    /// Boards from the initial one to the solved one, inclusive.
    #[inline]
    pub fn boards(&self) -> &[Board<'p>] {
        &self.boards
    }

    /// Number of unit moves.
    #[inline]
    pub fn steps(&self) -> usize {
        self.boards.len() - 1
    }

    #[inline]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// The unit move between each consecutive pair of boards.
    pub fn moves(&self) -> Vec<(BlockId, Direction)> {
        self.boards
            .windows(2)
            .filter_map(|pair| pair[0].move_to(&pair[1]))
            .collect()
    }
}

/// Index into the search arena.
type NodeId = u32;

/// Parent of the initial board.
const ROOT: NodeId = NodeId::MAX;

/// An explored board and the board it was reached from.
struct Node {
    key: BoardKey,
    parent: NodeId,
}

/// A board waiting in the frontier.
struct Pending<'p> {
    node: NodeId,
    depth: usize,
    board: Board<'p>,
}

enum Visited {
    Exact(FxHashSet<BoardKey>),
    Hash32(FxHashSet<u32>),
}

impl Visited {
    fn new(dedup: Dedup) -> Self {
        match dedup {
            Dedup::Exact => Visited::Exact(FxHashSet::default()),
            Dedup::Hash32 => Visited::Hash32(FxHashSet::default()),
        }
    }

    /// Records the board, returning false if it was already seen.
    #[inline]
    fn insert(&mut self, board: &Board<'_>) -> bool {
        match self {
            Visited::Exact(keys) => keys.insert(board.key()),
            Visited::Hash32(hashes) => hashes.insert(board.hash()),
        }
    }

    fn len(&self) -> usize {
        match self {
            Visited::Exact(keys) => keys.len(),
            Visited::Hash32(hashes) => hashes.len(),
        }
    }
}

/// Where a finished search stopped.
struct Outcome {
    /// The first solved board, if the search was looking for one.
    solved: Option<NodeId>,
    nodes: Vec<Node>,
    stats: SearchStats,
}

/// Breadth-first solver for one puzzle.
pub struct Solver<'p> {
    puzzle: &'p Puzzle,
    config: SolverConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'p> Solver<'p> {
    pub fn new(puzzle: &'p Puzzle) -> Self {
        Self {
            puzzle,
            config: SolverConfig::default(),
            cancel: None,
        }
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Stops the search with [`SolveError::Cancelled`] once `flag` is set.
    /// The flag is checked between frontier pops.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Finds a shortest sequence of unit moves that solves the puzzle.
    pub fn solve(&self) -> Result<Solution<'p>, SolveError> {
        info!(
            "solving {}x{} puzzle with {} blocks, target {} at {:?}",
            self.puzzle.width(),
            self.puzzle.height(),
            self.puzzle.num_blocks(),
            self.puzzle.target_name(),
            self.puzzle.target_anchor()
        );

        let outcome = self.search(true)?;
        let Some(solved) = outcome.solved else {
            info!("no solution after exploring {} states", outcome.stats.explored);
            return Err(SolveError::NoSolution {
                explored: outcome.stats.explored,
            });
        };

        let boards = self.reconstruct(&outcome.nodes, solved);
        info!(
            "solved in {} moves: explored {}, visited {}, peak frontier {}",
            boards.len() - 1,
            outcome.stats.explored,
            outcome.stats.visited,
            outcome.stats.peak_frontier
        );

        Ok(Solution {
            boards,
            stats: outcome.stats,
        })
    }

    /// Counts the distinct boards reachable from the initial board.
    ///
    /// With [`Dedup::Hash32`] this counts distinct hashes instead.
    pub fn count_reachable(&self) -> Result<usize, SolveError> {
        let outcome = self.search(false)?;
        info!(
            "{} reachable states, deepest at {} moves",
            outcome.stats.visited, outcome.stats.depth
        );
        Ok(outcome.stats.visited)
    }

    fn search(&self, stop_when_solved: bool) -> Result<Outcome, SolveError> {
        let start = self.puzzle.initial_board();
        let mut visited = Visited::new(self.config.dedup);
        visited.insert(&start);

        let mut nodes = vec![Node {
            key: start.key(),
            parent: ROOT,
        }];
        let mut frontier = VecDeque::from([Pending {
            node: 0,
            depth: 0,
            board: start,
        }]);
        let mut stats = SearchStats {
            visited: 1,
            peak_frontier: 1,
            ..SearchStats::default()
        };

        while let Some(current) = frontier.pop_front() {
            if self.is_cancelled() {
                return Err(SolveError::Cancelled);
            }

            stats.explored += 1;
            if current.depth > stats.depth {
                debug!(
                    "depth {}: explored {}, frontier {}",
                    current.depth,
                    stats.explored,
                    frontier.len() + 1
                );
                stats.depth = current.depth;
            }

            if stop_when_solved && current.board.is_solved() {
                return Ok(Outcome {
                    solved: Some(current.node),
                    nodes,
                    stats,
                });
            }

            for next in current.board.successors() {
                if !visited.insert(&next) {
                    continue;
                }

                stats.visited = visited.len();
                if let Some(limit) = self.config.max_states {
                    if stats.visited > limit {
                        return Err(SolveError::StateLimit { limit });
                    }
                }

                let node = NodeId::try_from(nodes.len())
                    .ok()
                    .filter(|&id| id != ROOT)
                    .ok_or(SolveError::StateLimit { limit: nodes.len() })?;
                nodes.push(Node {
                    key: next.key(),
                    parent: current.node,
                });
                frontier.push_back(Pending {
                    node,
                    depth: current.depth + 1,
                    board: next,
                });
            }
            stats.peak_frontier = stats.peak_frontier.max(frontier.len());
        }

        Ok(Outcome {
            solved: None,
            nodes,
            stats,
        })
    }

    /// Walks parent links from `last` back to the initial board.
    fn reconstruct(&self, nodes: &[Node], last: NodeId) -> Vec<Board<'p>> {
        let mut boards = Vec::new();
        let mut current = last;
        while current != ROOT {
            let node = &nodes[current as usize];
            boards.push(self.puzzle.board_from_key(&node.key));
            current = node.parent;
        }
        boards.reverse();
        boards
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Solves a puzzle with the default configuration.
pub fn solve(puzzle: &Puzzle) -> Result<Solution<'_>, SolveError> {
    Solver::new(puzzle).solve()
}

#[cfg(test)]
mod tests {
    use rustc_hash::FxHashMap;

    use super::*;

    const SMALL: &str = include_str!("../puzzles/small.txt");
    const SOLVED: &str = include_str!("../puzzles/solved.txt");
    const JAMMED: &str = include_str!("../puzzles/jammed.txt");
    const BOXED: &str = include_str!("../puzzles/boxed.txt");
    const LABELS: &str = include_str!("../puzzles/labels.txt");
    const MINI_HUARONG: &str = include_str!("../puzzles/mini_huarong.txt");
    const HUARONG_DAO: &str = include_str!("../puzzles/huarong_dao.txt");

    fn parse(text: &str) -> Puzzle {
        text.parse().unwrap()
    }

    /// Every consecutive pair of boards must be one legal unit move apart.
    fn assert_valid(solution: &Solution<'_>) {
        let boards = solution.boards();
        assert_eq!(boards[0], boards[0].puzzle().initial_board());
        for pair in boards.windows(2) {
            assert!(
                pair[0].move_to(&pair[1]).is_some(),
                "not a unit move:\n{}\n{}",
                pair[0],
                pair[1]
            );
        }
        assert!(boards.last().unwrap().is_solved());
        assert!(boards[..boards.len() - 1].iter().all(|b| !b.is_solved()));
        assert_eq!(solution.moves().len(), solution.steps());
    }

    /// Distance from the start to the nearest solved board, computed with a
    /// plain map instead of the solver's arena.
    fn shortest_distance(puzzle: &Puzzle) -> Option<usize> {
        let start = puzzle.initial_board();
        let mut distance: FxHashMap<BoardKey, usize> = FxHashMap::default();
        distance.insert(start.key(), 0);
        let mut queue = VecDeque::from([start]);

        while let Some(board) = queue.pop_front() {
            let d = distance[&board.key()];
            if board.is_solved() {
                return Some(d);
            }
            for next in board.successors() {
                distance.entry(next.key()).or_insert_with(|| {
                    queue.push_back(next.clone());
                    d + 1
                });
            }
        }
        None
    }

    #[test]
    fn test_small_puzzle_moves() {
        let puzzle = parse(SMALL);
        let solution = solve(&puzzle).unwrap();
        assert_valid(&solution);
        assert_eq!(solution.steps(), 3);

        let b = puzzle.block_id("B").unwrap();
        let c = puzzle.block_id("C").unwrap();
        assert_eq!(
            solution.moves(),
            vec![
                (c, Direction::Right),
                (b, Direction::Right),
                (b, Direction::Up)
            ]
        );

        let last = solution.boards().last().unwrap();
        assert_eq!(last.block(b).anchor(), (1, 0));
        assert_eq!(last.block(b).mask(), puzzle.target_mask());
    }

    #[test]
    fn test_already_solved_is_single_board() {
        let puzzle = parse(SOLVED);
        let solution = solve(&puzzle).unwrap();
        assert_eq!(solution.steps(), 0);
        assert_eq!(solution.boards().len(), 1);
        assert_eq!(solution.boards()[0], puzzle.initial_board());
        assert_eq!(solution.stats().explored, 1);
    }

    #[test]
    fn test_jammed_board_has_no_solution() {
        let puzzle = parse(JAMMED);
        assert_eq!(
            solve(&puzzle).unwrap_err(),
            SolveError::NoSolution { explored: 1 }
        );
    }

    #[test]
    fn test_exhausts_reachable_states_before_giving_up() {
        let puzzle = parse(BOXED);
        assert_eq!(
            solve(&puzzle).unwrap_err(),
            SolveError::NoSolution { explored: 24 }
        );
        assert_eq!(Solver::new(&puzzle).count_reachable().unwrap(), 24);
    }

    #[test]
    fn test_labels_are_part_of_identity() {
        // two 1x1 blocks on a 2x2 board: 12 labelled placements, 6 unlabelled
        let puzzle = parse(LABELS);
        assert_eq!(Solver::new(&puzzle).count_reachable().unwrap(), 12);

        let solution = solve(&puzzle).unwrap();
        assert_valid(&solution);
        assert_eq!(solution.steps(), 2);
    }

    #[test]
    fn test_mini_huarong_is_shortest() {
        let puzzle = parse(MINI_HUARONG);
        let solution = solve(&puzzle).unwrap();
        assert_valid(&solution);
        assert_eq!(solution.steps(), 10);
        assert_eq!(Some(solution.steps()), shortest_distance(&puzzle));
        assert_eq!(solution.stats().depth, solution.steps());

        let geometry = puzzle.geometry();
        let last = solution.boards().last().unwrap();
        assert_eq!(last.block_named("A").unwrap().mask(), geometry.draw_rect(1, 3, 2, 2));
    }

    #[test]
    fn test_optimal_on_every_sample() {
        for text in [SMALL, SOLVED, LABELS, MINI_HUARONG] {
            let puzzle = parse(text);
            let solution = solve(&puzzle).unwrap();
            assert_eq!(Some(solution.steps()), shortest_distance(&puzzle));
        }
        assert_eq!(shortest_distance(&parse(BOXED)), None);
    }

    #[test]
    fn test_reachable_count_mini_huarong() {
        let puzzle = parse(MINI_HUARONG);
        assert_eq!(Solver::new(&puzzle).count_reachable().unwrap(), 6764);
    }

    #[test]
    fn test_hash_dedup_solves_small_puzzles() {
        let config = SolverConfig {
            dedup: Dedup::Hash32,
            ..SolverConfig::default()
        };
        for (text, steps) in [(SMALL, 3), (LABELS, 2), (SOLVED, 0)] {
            let puzzle = parse(text);
            let solution = Solver::new(&puzzle).with_config(config).solve().unwrap();
            assert_valid(&solution);
            assert_eq!(solution.steps(), steps);
        }
    }

    #[test]
    fn test_state_limit() {
        let puzzle = parse(MINI_HUARONG);
        let config = SolverConfig {
            max_states: Some(100),
            ..SolverConfig::default()
        };
        let result = Solver::new(&puzzle).with_config(config).solve();
        assert_eq!(result.unwrap_err(), SolveError::StateLimit { limit: 100 });

        let config = SolverConfig {
            max_states: Some(10_000),
            ..SolverConfig::default()
        };
        let solution = Solver::new(&puzzle).with_config(config).solve().unwrap();
        assert_eq!(solution.steps(), 10);
    }

    #[test]
    fn test_cancelled_search() {
        let puzzle = parse(MINI_HUARONG);
        let flag = Arc::new(AtomicBool::new(true));
        let result = Solver::new(&puzzle).with_cancel_flag(flag).solve();
        assert_eq!(result.unwrap_err(), SolveError::Cancelled);
    }

    #[test]
    fn test_stats_are_consistent() {
        let puzzle = parse(MINI_HUARONG);
        let stats = *solve(&puzzle).unwrap().stats();
        assert!(stats.explored <= stats.visited);
        assert!(stats.peak_frontier <= stats.visited);
        assert!(stats.visited <= 6764);
    }

    #[test]
    fn test_huarong_dao_opening() {
        let puzzle = parse(HUARONG_DAO);
        assert_eq!(puzzle.num_blocks(), 10);
        assert_eq!(puzzle.target_name(), "A");
        assert_eq!(puzzle.target_mask(), puzzle.geometry().draw_rect(1, 3, 2, 2));

        let start = puzzle.initial_board();
        assert!(!start.is_solved());
        let id = |name| puzzle.block_id(name).unwrap();
        let moves: Vec<(BlockId, Direction)> = start.legal_moves().collect();
        assert_eq!(
            moves,
            vec![
                (id("H"), Direction::Down),
                (id("I"), Direction::Down),
                (id("J"), Direction::Right),
                (id("K"), Direction::Left),
            ]
        );

        // the first levels of the real search stay valid and bounded
        let config = SolverConfig {
            max_states: Some(5_000),
            ..SolverConfig::default()
        };
        let result = Solver::new(&puzzle).with_config(config).solve();
        assert_eq!(result.unwrap_err(), SolveError::StateLimit { limit: 5_000 });
    }

    #[test]
    #[ignore = "explores about eleven million states; run with cargo test --release -- --ignored"]
    fn test_huarong_dao() {
        let puzzle = parse(HUARONG_DAO);
        let solution = solve(&puzzle).unwrap();
        assert_valid(&solution);
        assert_eq!(solution.steps(), 116);

        let geometry = puzzle.geometry();
        let last = solution.boards().last().unwrap();
        assert_eq!(last.block_named("A").unwrap().mask(), geometry.draw_rect(1, 3, 2, 2));
    }
}
