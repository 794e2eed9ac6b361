//! Search tree nodes.
//!
//! Nodes live in an arena ([`super::SearchTree`]) and refer to each other by
//! [`NodeId`]. A node owns the board reached by its move; that board never
//! changes after construction, only the counters and the child list do.

use std::collections::VecDeque;

use crate::board::{Board, Pos, Stone};
use crate::rules::{has_run_at, Outcome};

/// Index into the node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node in the search tree.
#[derive(Debug, Clone)]
pub struct SearchNode {
    board: Board,
    /// Side whose move produced `board`
    mover: Stone,
    parent: Option<NodeId>,
    /// Move that produced `board` (the caller's last move for the root)
    position: Option<Pos>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) win_times: u32,
    pub(crate) visited_times: u32,
    max_children: usize,
    /// Expansion order, materialised on first expansion
    pub(crate) untried: Option<VecDeque<Pos>>,
    outcome: Outcome,
}

impl SearchNode {
    /// Create the root for a position where `mover` just played `position`.
    pub fn root(board: Board, mover: Stone, position: Option<Pos>, max_children: usize) -> Self {
        let outcome = board.check_result();
        Self::build(board, mover, None, position, max_children, outcome)
    }

    /// Create a child whose board is the parent's board plus `mover` at `position`.
    ///
    /// The parent must not be terminal, so only the new stone can have made a run.
    pub(crate) fn child(
        board: Board,
        mover: Stone,
        parent: NodeId,
        position: Pos,
        max_children: usize,
    ) -> Self {
        let outcome = if has_run_at(&board, position, mover) {
            Outcome::Win(mover)
        } else if board.is_full() {
            Outcome::Draw
        } else {
            Outcome::Ongoing
        };
        Self::build(board, mover, Some(parent), Some(position), max_children, outcome)
    }

    fn build(
        board: Board,
        mover: Stone,
        parent: Option<NodeId>,
        position: Option<Pos>,
        max_children: usize,
        outcome: Outcome,
    ) -> Self {
        let max_children = max_children.min(board.available_count());
        Self {
            board,
            mover,
            parent,
            position,
            children: Vec::new(),
            win_times: 0,
            visited_times: 0,
            max_children,
            untried: None,
            outcome,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn mover(&self) -> Stone {
        self.mover
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn position(&self) -> Option<Pos> {
        self.position
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    pub fn win_times(&self) -> u32 {
        self.win_times
    }

    #[inline]
    pub fn visited_times(&self) -> u32 {
        self.visited_times
    }

    /// Branching cap: `min(configured cap, empty cells at creation)`
    #[inline]
    pub fn max_children(&self) -> usize {
        self.max_children
    }

    #[inline]
    pub fn fully_expanded(&self) -> bool {
        self.children.len() == self.max_children
    }

    /// Terminal status of this node's board
    #[inline]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_over()
    }

    /// Fraction of visits won by `mover`; 0 for an unvisited node.
    pub fn win_rate(&self) -> f64 {
        if self.visited_times == 0 {
            0.0
        } else {
            f64::from(self.win_times) / f64::from(self.visited_times)
        }
    }

    /// UCT score relative to a parent visited `parent_visits` times.
    ///
    /// `wins / visits + c * sqrt(ln(parent_visits) / visits)`. Must only be
    /// called on visited nodes.
    #[inline]
    pub fn uct(&self, parent_visits: u32, exploration: f64) -> f64 {
        debug_assert!(self.visited_times > 0, "UCT on an unvisited node");
        let visits = f64::from(self.visited_times);
        let exploit = f64::from(self.win_times) / visits;
        let explore = (f64::from(parent_visits).ln() / visits).sqrt();
        exploit + exploration * explore
    }
}
