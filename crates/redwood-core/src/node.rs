//! Node types stored in the tree's arena

/// Key type held by the tree
pub type Key = i64;

/// Handle to a node slot
///
/// Handles are plain indices. A slot is reused once its node is removed, so a
/// handle kept across a mutation may later name a different node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(index < crate::limits::MAX_NODE_SLOTS);
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Node color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    pub fn is_red(self) -> bool {
        self == Color::Red
    }

    pub fn is_black(self) -> bool {
        self == Color::Black
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::Red => write!(f, "RED"),
            Color::Black => write!(f, "BLACK"),
        }
    }
}

/// Child side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    /// Sentinel standing in for an absent child
    Leaf,
    Internal { key: Key, left: NodeId, right: NodeId },
}

/// A live arena slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Node {
    pub color: Color,
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

impl Node {
    /// Sentinel leaves are always black
    pub fn leaf(parent: Option<NodeId>) -> Self {
        Self {
            color: Color::Black,
            parent,
            kind: NodeKind::Leaf,
        }
    }

    /// Fresh key-bearing nodes start red
    pub fn internal(key: Key, parent: Option<NodeId>, left: NodeId, right: NodeId) -> Self {
        Self {
            color: Color::Red,
            parent,
            kind: NodeKind::Internal { key, left, right },
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf)
    }

    pub fn key(&self) -> Option<Key> {
        match self.kind {
            NodeKind::Leaf => None,
            NodeKind::Internal { key, .. } => Some(key),
        }
    }

    pub fn child(&self, dir: Direction) -> Option<NodeId> {
        match (self.kind, dir) {
            (NodeKind::Leaf, _) => None,
            (NodeKind::Internal { left, .. }, Direction::Left) => Some(left),
            (NodeKind::Internal { right, .. }, Direction::Right) => Some(right),
        }
    }
}
