//! Read-only node views

use crate::node::{Color, Direction, Key, Node, NodeId};
use crate::tree::RedBlackTree;

/// Borrowed view of a node, key-bearing or sentinel
///
/// A view borrows the tree, so it cannot outlive the next mutation.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a RedBlackTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(tree: &'a RedBlackTree, id: NodeId) -> Self {
        Self { tree, id }
    }

    fn raw(&self) -> &'a Node {
        self.tree.raw(self.id)
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The node's key; `None` for sentinel leaves
    pub fn key(&self) -> Option<Key> {
        self.raw().key()
    }

    pub fn color(&self) -> Color {
        self.raw().color
    }

    pub fn is_leaf(&self) -> bool {
        self.raw().is_leaf()
    }

    pub fn is_root(&self) -> bool {
        self.raw().parent.is_none()
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.raw().parent.map(|id| NodeRef::new(self.tree, id))
    }

    /// Child on `dir`; always present on key-bearing nodes, `None` on sentinels
    pub fn child(&self, dir: Direction) -> Option<NodeRef<'a>> {
        self.raw().child(dir).map(|id| NodeRef::new(self.tree, id))
    }

    pub fn left(&self) -> Option<NodeRef<'a>> {
        self.child(Direction::Left)
    }

    pub fn right(&self) -> Option<NodeRef<'a>> {
        self.child(Direction::Right)
    }

    /// Black nodes on the path from this node up to the root, both included
    pub fn black_depth(&self) -> usize {
        let mut count = 0;
        let mut current = Some(*self);
        while let Some(node) = current {
            if node.color().is_black() {
                count += 1;
            }
            current = node.parent();
        }
        count
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.tree, other.tree)
    }
}

impl Eq for NodeRef<'_> {}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.key() {
            Some(key) => f
                .debug_struct("Node")
                .field("id", &self.id)
                .field("key", &key)
                .field("color", &self.color())
                .finish(),
            None => f
                .debug_struct("Leaf")
                .field("id", &self.id)
                .field("parent", &self.raw().parent)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation() {
        let mut tree = RedBlackTree::new();
        tree.insert_many([2, 1, 3]);

        let root = tree.root();
        assert!(root.is_root());
        assert_eq!(root.key(), Some(2));

        let left = root.left().unwrap();
        let right = root.right().unwrap();
        assert_eq!(left.key(), Some(1));
        assert_eq!(right.key(), Some(3));
        assert_eq!(left.parent(), Some(root));
        assert_eq!(left.color(), Color::Red);

        let leaf = left.left().unwrap();
        assert!(leaf.is_leaf());
        assert!(leaf.left().is_none());
        assert!(leaf.right().is_none());
        assert_eq!(leaf.parent(), Some(left));
    }

    #[test]
    fn test_black_depth() {
        let mut tree = RedBlackTree::new();
        tree.insert_many([2, 1, 3]);

        // leaf (black) -> 1 (red) -> 2 (black)
        let leaf = tree.find(1).and_then(|n| n.left()).unwrap();
        assert_eq!(leaf.black_depth(), 2);
        assert_eq!(tree.root().black_depth(), 1);
    }

    #[test]
    fn test_debug_output() {
        let mut tree = RedBlackTree::new();
        tree.insert(7).unwrap();

        let node = format!("{:?}", tree.root());
        assert!(node.contains("key: 7"));
        assert!(node.contains("Black"));

        let leaf = format!("{:?}", tree.root().left().unwrap());
        assert!(leaf.starts_with("Leaf"));
    }

    #[test]
    fn test_views_from_different_trees_differ() {
        let a = RedBlackTree::new();
        let b = RedBlackTree::new();
        assert_eq!(a.root().id(), b.root().id());
        assert_ne!(a.root(), b.root());
    }
}
