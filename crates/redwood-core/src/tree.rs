//! Red-black tree with explicit sentinel leaves
//!
//! Every absent child is a real, black, keyless node with its own parent
//! link, so leaves can be enumerated and walked like any other node. All
//! nodes live in an arena owned by the tree.

use std::cmp::Ordering;

use crate::arena::Arena;
use crate::config::TreeConfig;
use crate::error::{Error, Result};
use crate::invariants;
use crate::limits::SLOTS_PER_INSERT;
use crate::node::{Color, Direction, Key, Node, NodeId, NodeKind};
use crate::node_ref::NodeRef;

/// Outcome of a key descent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Search {
    Found(NodeId),
    /// The sentinel where the key would be inserted
    Vacant(NodeId),
}

/// Red-black tree over integer keys
#[derive(Debug)]
pub struct RedBlackTree {
    arena: Arena,
    root: NodeId,
    len: usize,
    config: TreeConfig,
}

impl Default for RedBlackTree {
    fn default() -> Self {
        Self::new()
    }
}

impl RedBlackTree {
    /// Creates an empty tree whose root is a single sentinel
    pub fn new() -> Self {
        let config = TreeConfig::default();
        let mut arena = Arena::new(config.max_nodes);
        let root = arena.alloc(Node::leaf(None));
        Self {
            arena,
            root,
            len: 0,
            config,
        }
    }

    pub fn with_config(config: TreeConfig) -> Result<Self> {
        config.validate()?;

        let mut arena = Arena::with_capacity(config.initial_capacity, config.max_nodes)?;
        arena.reserve(1)?;
        let root = arena.alloc(Node::leaf(None));

        tracing::debug!(
            "Created tree: capacity={}, max_nodes={}, check_invariants={}",
            config.initial_capacity,
            config.max_nodes,
            config.check_invariants
        );

        Ok(Self {
            arena,
            root,
            len: 0,
            config,
        })
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Number of keys in the tree
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of live nodes, sentinels included
    pub fn node_count(&self) -> usize {
        self.arena.live()
    }

    /// Remaining node slots before the configured limit is reached
    pub fn remaining_slots(&self) -> usize {
        self.arena.limit() - self.arena.live()
    }

    /// The root node; a sentinel when the tree is empty
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef::new(self, self.root)
    }

    /// Re-fetches a view of a node by handle, if the slot is still live
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.arena.get(id).map(|_| NodeRef::new(self, id))
    }

    pub(crate) fn root_id(&self) -> NodeId {
        self.root
    }

    pub(crate) fn raw(&self, id: NodeId) -> &Node {
        self.arena.node(id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lookup
    // ─────────────────────────────────────────────────────────────────────────

    /// Finds the node holding `key`
    pub fn find(&self, key: Key) -> Option<NodeRef<'_>> {
        match self.search(key) {
            Search::Found(id) => Some(NodeRef::new(self, id)),
            Search::Vacant(_) => None,
        }
    }

    pub fn contains(&self, key: Key) -> bool {
        matches!(self.search(key), Search::Found(_))
    }

    /// Smallest key, if any
    pub fn min(&self) -> Option<Key> {
        self.extreme(Direction::Left)
    }

    /// Largest key, if any
    pub fn max(&self) -> Option<Key> {
        self.extreme(Direction::Right)
    }

    fn extreme(&self, dir: Direction) -> Option<Key> {
        if self.is_leaf(self.root) {
            return None;
        }
        let mut current = self.root;
        loop {
            let next = self.child(current, dir);
            if self.is_leaf(next) {
                return self.raw(current).key();
            }
            current = next;
        }
    }

    fn search(&self, key: Key) -> Search {
        let mut current = self.root;
        loop {
            match self.raw(current).kind {
                NodeKind::Leaf => return Search::Vacant(current),
                NodeKind::Internal {
                    key: node_key,
                    left,
                    right,
                } => match key.cmp(&node_key) {
                    Ordering::Less => current = left,
                    Ordering::Greater => current = right,
                    Ordering::Equal => return Search::Found(current),
                },
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Insertion
    // ─────────────────────────────────────────────────────────────────────────

    /// Inserts `key`
    ///
    /// Returns `(true, node)` for a new key and `(false, existing)` when the
    /// key is already present. Allocation failure and the node limit are
    /// reported before any link changes, so the tree is left untouched.
    /// With `check_invariants` enabled, `Error::InvariantViolated` is
    /// returned after the insertion has been applied.
    pub fn insert(&mut self, key: Key) -> Result<(bool, NodeRef<'_>)> {
        let (inserted, id) = self.insert_id(key)?;
        Ok((inserted, NodeRef::new(self, id)))
    }

    /// Inserts every key in order, one outcome per key
    ///
    /// The batch is not atomic: a duplicate or a failed key does not stop
    /// the keys after it, and keys inserted before a failure stay in the
    /// tree.
    pub fn insert_many<I>(&mut self, keys: I) -> Vec<Result<(bool, NodeRef<'_>)>>
    where
        I: IntoIterator<Item = Key>,
    {
        let outcomes: Vec<Result<(bool, NodeId)>> =
            keys.into_iter().map(|key| self.insert_id(key)).collect();

        tracing::debug!(
            "Batch insert: {} keys, {} new, {} failed",
            outcomes.len(),
            outcomes
                .iter()
                .filter(|outcome| matches!(outcome, Ok((true, _))))
                .count(),
            outcomes.iter().filter(|outcome| outcome.is_err()).count()
        );

        let tree: &Self = self;
        outcomes
            .into_iter()
            .map(|outcome| outcome.map(|(inserted, id)| (inserted, NodeRef::new(tree, id))))
            .collect()
    }

    fn insert_id(&mut self, key: Key) -> Result<(bool, NodeId)> {
        let slot = match self.search(key) {
            Search::Found(existing) => {
                tracing::debug!("Insert {}: already present at {}", key, existing);
                return Ok((false, existing));
            }
            Search::Vacant(slot) => slot,
        };

        // Allocate both sentinel children before touching any link.
        self.arena.reserve(SLOTS_PER_INSERT)?;
        let left = self.arena.alloc(Node::leaf(Some(slot)));
        let right = self.arena.alloc(Node::leaf(Some(slot)));

        let parent = self.parent(slot);
        *self.arena.node_mut(slot) = Node::internal(key, parent, left, right);
        self.len += 1;

        self.insert_fixup(slot);
        tracing::debug!("Insert {}: new node {}", key, slot);

        self.check_after("insert")?;
        Ok((true, slot))
    }

    /// Restores the red-red constraint after `node` was linked in red
    fn insert_fixup(&mut self, mut node: NodeId) {
        loop {
            let Some(parent) = self.parent(node) else {
                self.set_color(node, Color::Black);
                return;
            };
            if self.color(parent).is_black() {
                return;
            }
            let Some(grandparent) = self.parent(parent) else {
                self.set_color(parent, Color::Black);
                return;
            };

            let parent_side = self.side_of(grandparent, parent);
            let uncle = self.child(grandparent, parent_side.opposite());

            if self.color(uncle).is_red() {
                tracing::trace!("Insert fixup at {}: red uncle, recolor", node);
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            let mut top = parent;
            if self.side_of(parent, node) != parent_side {
                tracing::trace!("Insert fixup at {}: inner grandchild", node);
                self.rotate(parent, parent_side);
                top = node;
            }

            tracing::trace!("Insert fixup at {}: rotate grandparent {}", node, grandparent);
            self.rotate(grandparent, parent_side.opposite());
            self.set_color(top, Color::Black);
            self.set_color(grandparent, Color::Red);
            return;
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Deletion
    // ─────────────────────────────────────────────────────────────────────────

    /// Removes `key`, returning whether it was present
    ///
    /// Removal never allocates. With `check_invariants` enabled,
    /// `Error::InvariantViolated` is returned after the removal has been
    /// applied.
    pub fn delete(&mut self, key: Key) -> Result<bool> {
        let target = match self.search(key) {
            Search::Found(id) => id,
            Search::Vacant(_) => {
                tracing::debug!("Delete {}: not present", key);
                return Ok(false);
            }
        };

        let right = self.child(target, Direction::Right);
        let removed = if self.is_leaf(self.child(target, Direction::Left)) || self.is_leaf(right) {
            target
        } else {
            let successor = self.leftmost(right);
            if let Some(successor_key) = self.raw(successor).key() {
                self.set_key(target, successor_key);
            }
            successor
        };

        // `removed` has at most one key-bearing child; it takes its place.
        let left = self.child(removed, Direction::Left);
        let right = self.child(removed, Direction::Right);
        let (replacement, discarded) = if self.is_leaf(left) {
            (right, left)
        } else {
            (left, right)
        };

        let removed_color = self.color(removed);
        self.replace_in_parent(removed, replacement);
        self.arena.release(discarded);
        self.arena.release(removed);
        self.len -= 1;

        if removed_color.is_black() {
            self.delete_fixup(replacement);
        }
        tracing::debug!("Delete {}: removed node {}", key, removed);

        self.check_after("delete")?;
        Ok(true)
    }

    /// Resolves the missing black on paths through `node`
    fn delete_fixup(&mut self, mut node: NodeId) {
        while node != self.root && self.color(node).is_black() {
            let Some(parent) = self.parent(node) else {
                break;
            };
            let side = self.side_of(parent, node);
            let mut sibling = self.child(parent, side.opposite());

            if self.color(sibling).is_red() {
                tracing::trace!("Delete fixup at {}: red sibling {}", node, sibling);
                self.set_color(sibling, Color::Black);
                self.set_color(parent, Color::Red);
                self.rotate(parent, side);
                sibling = self.child(parent, side.opposite());
            }

            let near = self.child(sibling, side);
            let far = self.child(sibling, side.opposite());

            if self.color(near).is_black() && self.color(far).is_black() {
                tracing::trace!("Delete fixup at {}: black nephews, move up", node);
                self.set_color(sibling, Color::Red);
                node = parent;
                continue;
            }

            if self.color(far).is_black() {
                tracing::trace!("Delete fixup at {}: red near nephew {}", node, near);
                self.set_color(near, Color::Black);
                self.set_color(sibling, Color::Red);
                self.rotate(sibling, side.opposite());
                sibling = self.child(parent, side.opposite());
            }

            tracing::trace!("Delete fixup at {}: red far nephew, rotate {}", node, parent);
            let far = self.child(sibling, side.opposite());
            self.set_color(sibling, self.color(parent));
            self.set_color(parent, Color::Black);
            self.set_color(far, Color::Black);
            self.rotate(parent, side);
            node = self.root;
        }

        self.set_color(node, Color::Black);
    }

    /// Drops every key, leaving a single sentinel root
    pub fn clear(&mut self) {
        tracing::debug!("Clearing tree with {} keys", self.len);
        self.root = self.arena.reset();
        self.len = 0;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Structural primitives
    // ─────────────────────────────────────────────────────────────────────────

    /// Rotates `node` down toward `dir`; its child on the other side rises
    ///
    /// Colors are left alone.
    pub(crate) fn rotate(&mut self, node: NodeId, dir: Direction) {
        let riser = self.child(node, dir.opposite());
        let middle = self.child(riser, dir);

        self.set_child(node, dir.opposite(), middle);
        self.set_parent(middle, Some(node));

        self.replace_in_parent(node, riser);

        self.set_child(riser, dir, node);
        self.set_parent(node, Some(riser));
    }

    /// Puts `new` where `old` hangs under its parent (or at the root)
    fn replace_in_parent(&mut self, old: NodeId, new: NodeId) {
        let parent = self.parent(old);
        self.set_parent(new, parent);
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.side_of(parent, old);
                self.set_child(parent, side, new);
            }
        }
    }

    fn leftmost(&self, mut node: NodeId) -> NodeId {
        loop {
            let left = self.child(node, Direction::Left);
            if self.is_leaf(left) {
                return node;
            }
            node = left;
        }
    }

    fn check_after(&self, operation: &str) -> Result<()> {
        if !self.config.check_invariants {
            return Ok(());
        }
        if let Err(violation) = invariants::check(self) {
            tracing::error!("Invariant check failed after {}: {}", operation, violation);
            return Err(Error::InvariantViolated(violation));
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Link accessors
    // ─────────────────────────────────────────────────────────────────────────

    fn is_leaf(&self, id: NodeId) -> bool {
        self.raw(id).is_leaf()
    }

    fn color(&self, id: NodeId) -> Color {
        self.raw(id).color
    }

    fn set_color(&mut self, id: NodeId, color: Color) {
        self.arena.node_mut(id).color = color;
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.raw(id).parent
    }

    fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        self.arena.node_mut(id).parent = parent;
    }

    /// Callers only ask key-bearing nodes for children.
    fn child(&self, id: NodeId, dir: Direction) -> NodeId {
        match self.raw(id).child(dir) {
            Some(child) => child,
            None => unreachable!("sentinel {} has no children; only key-bearing nodes are descended", id),
        }
    }

    fn set_child(&mut self, id: NodeId, dir: Direction, child: NodeId) {
        match (&mut self.arena.node_mut(id).kind, dir) {
            (NodeKind::Internal { left, .. }, Direction::Left) => *left = child,
            (NodeKind::Internal { right, .. }, Direction::Right) => *right = child,
            (NodeKind::Leaf, _) => {
                unreachable!("sentinel {} cannot take children; rotations only link key-bearing nodes", id)
            }
        }
    }

    fn set_key(&mut self, id: NodeId, new_key: Key) {
        if let NodeKind::Internal { key, .. } = &mut self.arena.node_mut(id).kind {
            *key = new_key;
        }
    }

    /// Which side of `parent` holds `child`
    fn side_of(&self, parent: NodeId, child: NodeId) -> Direction {
        if self.raw(parent).child(Direction::Left) == Some(child) {
            Direction::Left
        } else {
            Direction::Right
        }
    }
}
