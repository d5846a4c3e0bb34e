//! Whole-tree traversal and introspection

use crate::node::{Key, NodeId, NodeKind};
use crate::node_ref::NodeRef;
use crate::tree::RedBlackTree;

/// Pre-order walk over every node, sentinels included
///
/// A node is yielded before its left subtree, which comes before its right
/// subtree. The walk is iterative and restarts from the root each time it
/// is created.
pub struct Nodes<'a> {
    tree: &'a RedBlackTree,
    stack: Vec<NodeId>,
}

impl<'a> Nodes<'a> {
    fn new(tree: &'a RedBlackTree) -> Self {
        Self {
            tree,
            stack: vec![tree.root_id()],
        }
    }
}

impl<'a> Iterator for Nodes<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        if let NodeKind::Internal { left, right, .. } = self.tree.raw(id).kind {
            self.stack.push(right);
            self.stack.push(left);
        }
        Some(NodeRef::new(self.tree, id))
    }
}

/// In-order walk over the keys, ascending
pub struct Keys<'a> {
    tree: &'a RedBlackTree,
    /// Key-bearing ancestors whose key has not been yielded yet
    pending: Vec<NodeId>,
}

impl<'a> Keys<'a> {
    fn new(tree: &'a RedBlackTree) -> Self {
        let mut keys = Self {
            tree,
            pending: Vec::new(),
        };
        keys.descend_left(tree.root_id());
        keys
    }

    fn descend_left(&mut self, mut id: NodeId) {
        while let NodeKind::Internal { left, .. } = self.tree.raw(id).kind {
            self.pending.push(id);
            id = left;
        }
    }
}

impl Iterator for Keys<'_> {
    type Item = Key;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.pending.pop()?;
        match self.tree.raw(id).kind {
            NodeKind::Internal { key, right, .. } => {
                self.descend_left(right);
                Some(key)
            }
            NodeKind::Leaf => None,
        }
    }
}

/// Shape statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Key-bearing nodes
    pub keys: usize,
    /// Sentinel leaves
    pub leaves: usize,
    /// Key-bearing nodes on the longest root-to-leaf path
    pub height: usize,
    /// Black key-bearing nodes on the leftmost root-to-leaf path
    pub black_height: usize,
}

impl RedBlackTree {
    /// Lazy pre-order walk over every node
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes::new(self)
    }

    /// Every node, key-bearing and sentinel, in pre-order
    pub fn all_nodes(&self) -> Vec<NodeRef<'_>> {
        self.nodes().collect()
    }

    /// Key-bearing nodes in pre-order
    pub fn non_leaf_nodes(&self) -> Vec<NodeRef<'_>> {
        self.nodes().filter(|node| !node.is_leaf()).collect()
    }

    /// Sentinel leaves in pre-order, which is left to right
    pub fn leaf_nodes(&self) -> Vec<NodeRef<'_>> {
        self.nodes().filter(|node| node.is_leaf()).collect()
    }

    /// Keys in ascending order
    pub fn keys(&self) -> Keys<'_> {
        Keys::new(self)
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        let mut stack: Vec<(NodeId, usize)> = vec![(self.root_id(), 0)];

        while let Some((id, depth)) = stack.pop() {
            match self.raw(id).kind {
                NodeKind::Leaf => {
                    stats.leaves += 1;
                    stats.height = stats.height.max(depth);
                }
                NodeKind::Internal { left, right, .. } => {
                    stats.keys += 1;
                    stack.push((right, depth + 1));
                    stack.push((left, depth + 1));
                }
            }
        }

        let mut current = self.root();
        while !current.is_leaf() {
            if current.color().is_black() {
                stats.black_height += 1;
            }
            match current.left() {
                Some(left) => current = left,
                None => break,
            }
        }

        tracing::trace!(
            "Tree stats: keys={}, leaves={}, height={}, black_height={}",
            stats.keys,
            stats.leaves,
            stats.height,
            stats.black_height
        );

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Color;
    use std::collections::BTreeSet;

    fn sample_tree() -> RedBlackTree {
        let mut tree = RedBlackTree::new();
        tree.insert_many([1, 3, 5, 2, 4, 7, 6]);
        tree
    }

    #[test]
    fn test_empty_tree_traversal() {
        let tree = RedBlackTree::new();

        let all = tree.all_nodes();
        assert_eq!(all.len(), 1);
        assert!(all[0].is_leaf());
        assert!(tree.non_leaf_nodes().is_empty());
        assert_eq!(tree.leaf_nodes().len(), 1);
        assert_eq!(tree.keys().next(), None);
    }

    #[test]
    fn test_partition_of_all_nodes() {
        let tree = sample_tree();

        let all = tree.all_nodes();
        let non_leaf = tree.non_leaf_nodes();
        let leaves = tree.leaf_nodes();

        assert_eq!(all.len(), 15);
        assert_eq!(non_leaf.len(), 7);
        assert_eq!(leaves.len(), 8);
        assert!(leaves.iter().all(|leaf| leaf.color() == Color::Black));

        let keys: BTreeSet<Key> = non_leaf.iter().filter_map(|n| n.key()).collect();
        assert_eq!(keys, (1..=7).collect());
    }

    #[test]
    fn test_pre_order_starts_at_root() {
        let tree = sample_tree();
        let first = tree.nodes().next().unwrap();
        assert_eq!(first, tree.root());
    }

    #[test]
    fn test_traversal_is_deterministic() {
        let tree = sample_tree();
        let first: Vec<NodeId> = tree.nodes().map(|n| n.id()).collect();
        let second: Vec<NodeId> = tree.nodes().map(|n| n.id()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_keys_ascending() {
        let mut tree = RedBlackTree::new();
        tree.insert_many([50, -3, 17, 8, 99, 0, 23]);

        let keys: Vec<Key> = tree.keys().collect();
        assert_eq!(keys, vec![-3, 0, 8, 17, 23, 50, 99]);
    }

    #[test]
    fn test_leaf_to_root_black_counts_match() {
        let mut tree = RedBlackTree::new();
        tree.insert_many([2, 3, 4, 6, 7, 8, 9, 5, 1]);

        let depths: BTreeSet<usize> = tree
            .leaf_nodes()
            .iter()
            .map(|leaf| leaf.black_depth())
            .collect();
        assert_eq!(depths.len(), 1);
    }

    #[test]
    fn test_stats() {
        let tree = sample_tree();
        let stats = tree.stats();

        assert_eq!(stats.keys, 7);
        assert_eq!(stats.leaves, 8);
        assert!(stats.height >= 3 && stats.height <= 6);
        assert_eq!(stats.black_height + 1, tree.leaf_nodes()[0].black_depth());

        assert_eq!(RedBlackTree::new().stats(), TreeStats {
            keys: 0,
            leaves: 1,
            height: 0,
            black_height: 0,
        });
    }
}
