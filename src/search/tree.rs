//! Arena-allocated search tree.
//!
//! Nodes are stored in a contiguous `Vec` and linked by index: each node
//! keeps its parent's [`NodeId`] and the ids of its children. The whole tree
//! is built for one decision and dropped afterwards.

use rand::Rng;
use tracing::trace;

use crate::board::Stone;
use crate::error::SearchError;

use super::node::{NodeId, SearchNode};

/// Search tree with arena-based node storage.
#[derive(Debug)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    /// Create a tree holding only `root`.
    pub fn new(root: SearchNode) -> Self {
        Self { nodes: vec![root] }
    }

    #[inline]
    pub fn root(&self) -> &SearchNode {
        &self.nodes[NodeId::ROOT.0]
    }

    /// Get a reference to a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId does not belong to this tree.
    #[inline]
    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.0]
    }

    /// Get the number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn fully_expanded(&self, id: NodeId) -> bool {
        self.get(id).fully_expanded()
    }

    /// Child of `id` with the highest `score`; the first one wins ties.
    pub fn best_child<F>(&self, id: NodeId, mut score: F) -> Result<NodeId, SearchError>
    where
        F: FnMut(&SearchNode) -> f64,
    {
        let mut best: Option<(NodeId, f64)> = None;
        for &child in self.get(id).children() {
            let value = score(self.get(child));
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((child, value)),
            }
        }
        best.map(|(child, _)| child).ok_or(SearchError::NoChildren)
    }

    /// Add one child to `id` using the next untried move.
    ///
    /// The untried queue is built from the node's heuristic ordering on the
    /// first call. The child's mover is the opponent of `id`'s mover.
    pub fn expand_child<R: Rng + ?Sized>(
        &mut self,
        id: NodeId,
        max_children: usize,
        rng: &mut R,
    ) -> Result<NodeId, SearchError> {
        let child_id = NodeId(self.nodes.len());
        let node = self.get_mut(id);
        if node.fully_expanded() {
            return Err(SearchError::AtCapacity);
        }

        if node.untried.is_none() {
            let queue = node.board().heuristic_moves().into_queue(rng);
            node.untried = Some(queue);
        }
        let position = node
            .untried
            .as_mut()
            .and_then(|queue| queue.pop_front())
            .ok_or(SearchError::AtCapacity)?;

        let mover = node.mover().opponent();
        let mut board = node.board().clone();
        board.apply_move(position, mover)?;
        node.children.push(child_id);

        trace!(parent = id.0, child = child_id.0, %position, "expanded");
        self.nodes
            .push(SearchNode::child(board, mover, id, position, max_children));
        Ok(child_id)
    }

    /// Record a simulation result on every node from `leaf` up to the root.
    pub fn backpropagate(&mut self, leaf: NodeId, winner: Option<Stone>) {
        let mut current = Some(leaf);
        while let Some(id) = current {
            let node = self.get_mut(id);
            node.visited_times += 1;
            if winner == Some(node.mover()) {
                node.win_times += 1;
            }
            current = node.parent();
        }
    }
}
