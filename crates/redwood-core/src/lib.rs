//! Redwood Core - Red-black tree engine
//!
//! This crate provides a red-black tree over integer keys in which every
//! absent child is an explicit black sentinel leaf. Sentinels are real nodes
//! with parent links, so the tree's coloring invariants can be checked by
//! walking its leaves.

mod arena;
pub mod config;
pub mod error;
pub mod invariants;
pub mod limits;
pub mod node;
pub mod node_ref;
pub mod traversal;
pub mod tree;

#[cfg(test)]
mod testing;

pub use config::TreeConfig;
pub use error::{Error, Result};
pub use invariants::InvariantViolation;
pub use limits::{ConfigError, MAX_KEYS, MAX_NODE_SLOTS};
pub use node::{Color, Direction, Key, NodeId};
pub use node_ref::NodeRef;
pub use traversal::{Keys, Nodes, TreeStats};
pub use tree::RedBlackTree;
