//! Search module for the MCTS engine
//!
//! Contains:
//! - Tree nodes with UCT scoring
//! - Arena tree with expansion and backpropagation
//! - The select / expand / rollout / backpropagate loop

pub mod mcts;
pub mod node;
pub mod tree;

pub use mcts::{rollout, ChildStats, Rollout, SearchOutcome, Searcher};
pub use node::{NodeId, SearchNode};
pub use tree::SearchTree;
