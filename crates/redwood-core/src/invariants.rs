//! Structural invariant checks
//!
//! [`check`] walks the whole tree once and verifies:
//! - the root has no parent and is black
//! - every sentinel leaf is black
//! - no red node has a red child
//! - every root-to-leaf path has the same number of black nodes
//! - keys are strictly ordered (which also rules out duplicates)
//! - every child's parent link points back at the node holding it
//! - the key count matches the tree's length

use crate::node::{Key, NodeId, NodeKind};
use crate::tree::RedBlackTree;

/// A broken structural invariant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    RedRoot { root: NodeId },
    RedLeaf { leaf: NodeId },
    RedRed { parent: NodeId, child: NodeId },
    BlackHeightMismatch { leaf: NodeId, expected: usize, found: usize },
    OutOfOrder { node: NodeId, key: Key, lower: Option<Key>, upper: Option<Key> },
    BrokenParentLink { node: NodeId, expected: Option<NodeId>, found: Option<NodeId> },
    LengthMismatch { expected: usize, found: usize },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RedRoot { root } => write!(f, "root {} is red", root),
            Self::RedLeaf { leaf } => write!(f, "sentinel leaf {} is red", leaf),
            Self::RedRed { parent, child } => {
                write!(f, "red node {} has red child {}", parent, child)
            }
            Self::BlackHeightMismatch {
                leaf,
                expected,
                found,
            } => write!(
                f,
                "path to leaf {} has {} black nodes (expected {})",
                leaf, found, expected
            ),
            Self::OutOfOrder {
                node,
                key,
                lower,
                upper,
            } => write!(
                f,
                "key {} at {} is outside ({:?}, {:?})",
                key, node, lower, upper
            ),
            Self::BrokenParentLink {
                node,
                expected,
                found,
            } => write!(
                f,
                "node {} has parent {:?} (expected {:?})",
                node, found, expected
            ),
            Self::LengthMismatch { expected, found } => {
                write!(f, "tree reports {} keys but holds {}", expected, found)
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// Pending node in the validation walk
struct Frame {
    node: NodeId,
    parent: Option<NodeId>,
    /// Black key-bearing nodes above this one
    blacks_above: usize,
    lower: Option<Key>,
    upper: Option<Key>,
}

/// Validates `tree`, returning its black-height
///
/// The black-height counts black key-bearing nodes on a root-to-leaf path,
/// leaving out the sentinel itself; it is 0 for an empty tree.
pub fn check(tree: &RedBlackTree) -> Result<usize, InvariantViolation> {
    let root = tree.root_id();
    if tree.raw(root).color.is_red() {
        return Err(InvariantViolation::RedRoot { root });
    }

    let mut black_height: Option<usize> = None;
    let mut keys = 0usize;
    let mut stack = vec![Frame {
        node: root,
        parent: None,
        blacks_above: 0,
        lower: None,
        upper: None,
    }];

    while let Some(frame) = stack.pop() {
        let node = tree.raw(frame.node);

        if node.parent != frame.parent {
            return Err(InvariantViolation::BrokenParentLink {
                node: frame.node,
                expected: frame.parent,
                found: node.parent,
            });
        }

        match node.kind {
            NodeKind::Leaf => {
                if node.color.is_red() {
                    return Err(InvariantViolation::RedLeaf { leaf: frame.node });
                }
                match black_height {
                    None => black_height = Some(frame.blacks_above),
                    Some(expected) if expected != frame.blacks_above => {
                        return Err(InvariantViolation::BlackHeightMismatch {
                            leaf: frame.node,
                            expected,
                            found: frame.blacks_above,
                        });
                    }
                    Some(_) => {}
                }
            }
            NodeKind::Internal { key, left, right } => {
                let below_lower = frame.lower.is_some_and(|lower| key <= lower);
                let above_upper = frame.upper.is_some_and(|upper| key >= upper);
                if below_lower || above_upper {
                    return Err(InvariantViolation::OutOfOrder {
                        node: frame.node,
                        key,
                        lower: frame.lower,
                        upper: frame.upper,
                    });
                }
                keys += 1;

                if node.color.is_red() {
                    for child in [left, right] {
                        if tree.raw(child).color.is_red() {
                            return Err(InvariantViolation::RedRed {
                                parent: frame.node,
                                child,
                            });
                        }
                    }
                }

                let blacks_above = frame.blacks_above + usize::from(node.color.is_black());
                stack.push(Frame {
                    node: right,
                    parent: Some(frame.node),
                    blacks_above,
                    lower: Some(key),
                    upper: frame.upper,
                });
                stack.push(Frame {
                    node: left,
                    parent: Some(frame.node),
                    blacks_above,
                    lower: frame.lower,
                    upper: Some(key),
                });
            }
        }
    }

    if keys != tree.len() {
        return Err(InvariantViolation::LengthMismatch {
            expected: tree.len(),
            found: keys,
        });
    }

    Ok(black_height.unwrap_or(0))
}

impl RedBlackTree {
    /// Checks every structural invariant, returning the black-height
    pub fn validate(&self) -> Result<usize, InvariantViolation> {
        check(self)
    }
}
