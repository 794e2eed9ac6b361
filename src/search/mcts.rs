//! Monte Carlo tree search over an arena tree
//!
//! Each iteration runs four phases:
//! 1. Selection: descend by UCT while the node is fully expanded and not terminal
//! 2. Expansion: add one child following the heuristic move order
//! 3. Rollout: play uniformly random moves to the end of the game
//! 4. Backpropagation: credit every node on the path whose mover won
//!
//! The loop always completes one iteration, then stops when the root's visit
//! count reaches `max_simulations` or the wall-clock budget runs out.
//!
//! # Example
//!
//! ```
//! use gomoku::board::{Board, Pos, Stone};
//! use gomoku::config::SearchConfig;
//! use gomoku::search::Searcher;
//!
//! let config = SearchConfig::default().with_simulations(200).without_time_limit();
//! let mut searcher = Searcher::seeded(config, 7);
//!
//! let mut board = Board::square(5, 4).unwrap();
//! board.apply_move(Pos::new(2, 2), Stone::Black).unwrap();
//!
//! let outcome = searcher.search(&board, Stone::Black, Some(Pos::new(2, 2))).unwrap();
//! assert!(board.is_empty(outcome.best_move));
//! ```

use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::board::{Board, Pos, Stone};
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::rules::has_run_at;

use super::node::{NodeId, SearchNode};
use super::tree::SearchTree;

/// Statistics of one root child after the search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChildStats {
    pub position: Pos,
    pub visits: u32,
    pub wins: u32,
}

/// Result of a completed search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Position of the root child chosen by UCT
    pub best_move: Pos,
    /// Completed iterations (root visit count)
    pub simulations: u32,
    /// Nodes allocated in the tree
    pub nodes: usize,
    /// Win rate of the chosen child for the side to move
    pub win_rate: f64,
    pub elapsed: Duration,
    /// Root children in expansion order
    pub children: Vec<ChildStats>,
}

/// Result of a single random playout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rollout {
    /// Side that completed a run, `None` for a draw
    pub winner: Option<Stone>,
    /// Moves played before the game ended
    pub plies: usize,
}

/// Play uniformly random moves from `board` until the game ends.
///
/// `last_mover` made the move that produced `board`, so its opponent plays
/// first. The board must not already be decided.
pub fn rollout<R: Rng + ?Sized>(
    board: &Board,
    last_mover: Stone,
    rng: &mut R,
) -> Result<Rollout, SearchError> {
    let mut scratch = board.clone();
    let mut mover = last_mover;
    let mut plies = 0;

    while !scratch.is_full() {
        let pick = rng.gen_range(0..scratch.available_count());
        let idx = scratch
            .available_set()
            .nth(pick)
            .ok_or(SearchError::NoAvailableMoves)?;
        let pos = scratch.pos_of(idx);

        mover = mover.opponent();
        scratch.apply_move(pos, mover)?;
        plies += 1;
        if has_run_at(&scratch, pos, mover) {
            return Ok(Rollout {
                winner: Some(mover),
                plies,
            });
        }
    }

    Ok(Rollout {
        winner: None,
        plies,
    })
}

/// MCTS searcher with an injectable random source.
pub struct Searcher<R = ChaCha8Rng> {
    config: SearchConfig,
    rng: R,
}

impl Searcher<ChaCha8Rng> {
    /// Searcher seeded from `config.seed`, or from entropy when unset.
    pub fn from_config(config: SearchConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::new(config, rng)
    }

    pub fn seeded(config: SearchConfig, seed: u64) -> Self {
        Self::new(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Searcher<R> {
    pub fn new(config: SearchConfig, rng: R) -> Self {
        Self { config, rng }
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SearchConfig) {
        self.config = config;
    }

    /// Choose a move for the opponent of `last_mover`.
    ///
    /// `last_move` is recorded on the root for reporting only. The caller's
    /// board is never modified.
    pub fn search(
        &mut self,
        board: &Board,
        last_mover: Stone,
        last_move: Option<Pos>,
    ) -> Result<SearchOutcome, SearchError> {
        self.check_config()?;
        if board.available_count() == 0 {
            return Err(SearchError::NoAvailableMoves);
        }
        let root = SearchNode::root(
            board.clone(),
            last_mover,
            last_move,
            self.config.max_children,
        );
        if root.is_terminal() {
            return Err(SearchError::GameOver);
        }

        let start = Instant::now();
        let time_limit = self.config.think_time();
        debug!(
            rows = board.rows(),
            cols = board.cols(),
            available = board.available_count(),
            max_simulations = self.config.max_simulations,
            ?time_limit,
            "mcts search start"
        );

        let mut tree = SearchTree::new(root);
        loop {
            self.iterate(&mut tree)?;
            if self.exhausted(&tree, start, time_limit) {
                break;
            }
        }

        let exploration = self.config.exploration;
        let root_visits = tree.root().visited_times();
        let best = tree.best_child(NodeId::ROOT, |n| n.uct(root_visits, exploration))?;
        let chosen = tree.get(best);
        let best_move = chosen.position().ok_or(SearchError::NoChildren)?;

        let children = tree
            .root()
            .children()
            .iter()
            .filter_map(|&id| {
                let node = tree.get(id);
                node.position().map(|position| ChildStats {
                    position,
                    visits: node.visited_times(),
                    wins: node.win_times(),
                })
            })
            .collect();

        let outcome = SearchOutcome {
            best_move,
            simulations: root_visits,
            nodes: tree.len(),
            win_rate: chosen.win_rate(),
            elapsed: start.elapsed(),
            children,
        };
        debug!(
            best = %outcome.best_move,
            simulations = outcome.simulations,
            nodes = outcome.nodes,
            win_rate = outcome.win_rate,
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            "mcts search done"
        );
        Ok(outcome)
    }

    /// Reject settings the loop cannot honour, such as a zero branching cap
    /// or a NaN exploration constant.
    pub(crate) fn check_config(&self) -> Result<(), SearchError> {
        self.config
            .validate()
            .map_err(|e| SearchError::InvalidConfig(e.to_string()))
    }

    /// One select / expand / rollout / backpropagate cycle.
    fn iterate(&mut self, tree: &mut SearchTree) -> Result<(), SearchError> {
        let selected = self.select(tree)?;

        let leaf = if tree.get(selected).is_terminal() {
            selected
        } else {
            tree.expand_child(selected, self.config.max_children, &mut self.rng)?
        };

        let node = tree.get(leaf);
        let winner = if node.is_terminal() {
            node.outcome().winner()
        } else {
            let playout = rollout(node.board(), node.mover(), &mut self.rng)?;
            trace!(leaf = leaf.index(), plies = playout.plies, winner = ?playout.winner, "rollout");
            playout.winner
        };

        tree.backpropagate(leaf, winner);
        Ok(())
    }

    fn select(&self, tree: &SearchTree) -> Result<NodeId, SearchError> {
        let exploration = self.config.exploration;
        let mut current = NodeId::ROOT;
        while tree.fully_expanded(current) && !tree.get(current).is_terminal() {
            let parent_visits = tree.get(current).visited_times();
            current = tree.best_child(current, |n| n.uct(parent_visits, exploration))?;
        }
        Ok(current)
    }

    fn exhausted(&self, tree: &SearchTree, start: Instant, time_limit: Option<Duration>) -> bool {
        if tree.root().visited_times() >= self.config.max_simulations {
            return true;
        }
        time_limit.is_some_and(|limit| start.elapsed() >= limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim_config(n: u32) -> SearchConfig {
        SearchConfig::default()
            .with_simulations(n)
            .without_time_limit()
    }

    fn board_with(size: usize, n: usize, stones: &[(u8, u8, Stone)]) -> Board {
        let mut board = Board::square(size, n).unwrap();
        for &(r, c, stone) in stones {
            board.apply_move(Pos::new(r, c), stone).unwrap();
        }
        board
    }

    #[test]
    fn test_rollout_terminates() {
        let board = Board::square(5, 4).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..50 {
            let result = rollout(&board, Stone::White, &mut rng).unwrap();
            assert!(result.plies <= board.available_count());
            assert!(result.plies >= 7 || result.winner.is_none());
        }
    }

    #[test]
    fn test_rollout_first_mover_is_opponent() {
        // Only one cell left: the next mover completes a run through it
        let board = Board::from_rows(&[vec![1, 1, 0], vec![-1, -1, 1], vec![1, -1, -1]], 3)
            .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let result = rollout(&board, Stone::White, &mut rng).unwrap();
        assert_eq!(result.winner, Some(Stone::Black));
        assert_eq!(result.plies, 1);

        let result = rollout(&board, Stone::Black, &mut rng).unwrap();
        assert_eq!(result.winner, None);
        assert_eq!(result.plies, 1);
    }

    #[test]
    fn test_single_simulation() {
        let board = Board::square(4, 3).unwrap();
        let mut searcher = Searcher::seeded(sim_config(1), 1);
        let outcome = searcher.search(&board, Stone::White, None).unwrap();
        assert_eq!(outcome.simulations, 1);
        assert_eq!(outcome.nodes, 2);
        assert!(board.is_empty(outcome.best_move));
    }

    #[test]
    fn test_zero_budget_still_iterates_once() {
        let board = Board::square(4, 3).unwrap();
        let mut searcher = Searcher::seeded(sim_config(0), 1);
        let outcome = searcher.search(&board, Stone::White, None).unwrap();
        assert_eq!(outcome.simulations, 1);
    }

    #[test]
    fn test_children_visits_sum_to_simulations() {
        let board = board_with(6, 4, &[(2, 2, Stone::Black), (3, 3, Stone::White)]);
        let mut searcher = Searcher::seeded(sim_config(300), 5);
        let outcome = searcher.search(&board, Stone::White, Some(Pos::new(3, 3))).unwrap();

        let total: u32 = outcome.children.iter().map(|c| c.visits).sum();
        assert_eq!(outcome.simulations, 300);
        assert_eq!(total, 300);
        assert!(outcome.children.len() <= 10);
        assert!(outcome.children.iter().all(|c| c.wins <= c.visits));
    }

    #[test]
    fn test_search_takes_winning_move() {
        let board = board_with(
            5,
            4,
            &[
                (0, 0, Stone::Black),
                (0, 1, Stone::Black),
                (0, 2, Stone::Black),
                (4, 0, Stone::White),
                (4, 1, Stone::White),
            ],
        );
        // Greedy scoring: the winning child is expanded first and keeps a perfect record
        let mut searcher = Searcher::seeded(sim_config(400).with_exploration(0.0), 11);
        let outcome = searcher.search(&board, Stone::White, Some(Pos::new(4, 1))).unwrap();
        assert_eq!(outcome.best_move, Pos::new(0, 3));
    }

    #[test]
    fn test_search_is_deterministic() {
        let board = board_with(7, 5, &[(3, 3, Stone::Black), (3, 4, Stone::White)]);
        let run = |seed| {
            Searcher::seeded(sim_config(200), seed)
                .search(&board, Stone::White, None)
                .unwrap()
                .best_move
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_search_does_not_touch_board() {
        let board = board_with(5, 4, &[(1, 1, Stone::Black)]);
        let before = board.clone();
        let mut searcher = Searcher::seeded(sim_config(50), 2);
        searcher.search(&board, Stone::Black, Some(Pos::new(1, 1))).unwrap();
        assert_eq!(board, before);
    }

    #[test]
    fn test_search_rejects_finished_board() {
        let board = board_with(
            5,
            3,
            &[(0, 0, Stone::Black), (0, 1, Stone::Black), (0, 2, Stone::Black)],
        );
        let mut searcher = Searcher::seeded(sim_config(10), 0);
        assert_eq!(
            searcher.search(&board, Stone::Black, None).unwrap_err(),
            SearchError::GameOver
        );

        let full = Board::from_rows(&[vec![1, -1], vec![-1, 1]], 2).unwrap();
        assert_eq!(
            searcher.search(&full, Stone::Black, None).unwrap_err(),
            SearchError::NoAvailableMoves
        );
    }

    #[test]
    fn test_search_rejects_invalid_config() {
        let board = Board::square(5, 4).unwrap();

        let mut searcher = Searcher::seeded(sim_config(50).with_max_children(0), 1);
        assert!(matches!(
            searcher.search(&board, Stone::White, None),
            Err(SearchError::InvalidConfig(_))
        ));

        let mut searcher = Searcher::seeded(sim_config(50).with_exploration(f64::NAN), 1);
        assert!(matches!(
            searcher.search(&board, Stone::White, None),
            Err(SearchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_time_budget_stops_search() {
        let board = Board::square(9, 5).unwrap();
        let config = SearchConfig::default()
            .with_simulations(u32::MAX)
            .with_think_time(0.05);
        let mut searcher = Searcher::seeded(config, 4);
        let outcome = searcher.search(&board, Stone::White, None).unwrap();
        assert!(outcome.simulations >= 1);
        assert!(outcome.simulations < u32::MAX);
        assert!(board.is_empty(outcome.best_move));
    }
}
