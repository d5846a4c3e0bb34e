//! Slot arena owning every node of a tree
//!
//! Nodes are addressed by [`NodeId`] indices instead of pointers, so parent
//! links are plain navigation data and ownership stays with the arena.
//! Removed slots are threaded onto an intrusive free list and reused by
//! later allocations; releasing a slot never allocates.

use crate::error::{Error, Result};
use crate::node::{Node, NodeId};

#[derive(Debug, Clone)]
enum Slot {
    Occupied(Node),
    Vacant { next_free: Option<NodeId> },
}

/// Node arena with a free list and a hard slot limit
#[derive(Debug)]
pub(crate) struct Arena {
    slots: Vec<Slot>,
    free_head: Option<NodeId>,
    free_count: usize,
    live: usize,
    limit: usize,
}

impl Arena {
    pub fn new(limit: usize) -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            free_count: 0,
            live: 0,
            limit,
        }
    }

    /// Creates an arena with `capacity` slots reserved up front
    pub fn with_capacity(capacity: usize, limit: usize) -> Result<Self> {
        let mut arena = Self::new(limit);
        arena
            .slots
            .try_reserve_exact(capacity)
            .map_err(|source| Error::AllocationFailed {
                requested: capacity,
                source,
            })?;
        Ok(arena)
    }

    /// Number of live nodes
    pub fn live(&self) -> usize {
        self.live
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Makes room for `additional` allocations
    ///
    /// After this returns `Ok`, the next `additional` calls to [`Arena::alloc`]
    /// neither fail nor reallocate.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        let wanted = self.live.saturating_add(additional);
        if wanted > self.limit {
            tracing::warn!(
                "Node limit reached: {} live, {} requested, limit {}",
                self.live,
                additional,
                self.limit
            );
            return Err(Error::CapacityExceeded {
                live: self.live,
                requested: additional,
                limit: self.limit,
            });
        }

        let fresh = additional.saturating_sub(self.free_count);
        self.slots.try_reserve(fresh).map_err(|source| {
            tracing::warn!("Failed to reserve {} node slots: {}", fresh, source);
            Error::AllocationFailed {
                requested: fresh,
                source,
            }
        })
    }

    /// Stores a node, reusing a vacant slot when one exists
    pub fn alloc(&mut self, node: Node) -> NodeId {
        self.live += 1;

        if let Some(id) = self.free_head {
            let slot = &mut self.slots[id.index()];
            let next_free = match slot {
                Slot::Vacant { next_free } => *next_free,
                Slot::Occupied(_) => unreachable!("free list points at live node {}", id),
            };
            *slot = Slot::Occupied(node);
            self.free_head = next_free;
            self.free_count -= 1;
            return id;
        }

        let id = NodeId::from_index(self.slots.len());
        self.slots.push(Slot::Occupied(node));
        id
    }

    /// Removes a node and returns it
    ///
    /// # Panics
    ///
    /// Panics if the slot is already vacant.
    pub fn release(&mut self, id: NodeId) -> Node {
        let vacant = Slot::Vacant {
            next_free: self.free_head,
        };
        match std::mem::replace(&mut self.slots[id.index()], vacant) {
            Slot::Occupied(node) => {
                self.free_head = Some(id);
                self.free_count += 1;
                self.live -= 1;
                node
            }
            Slot::Vacant { .. } => panic!("node {} released twice", id),
        }
    }

    /// Returns the node in a slot, or `None` if the slot is vacant or unknown
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        match self.slots.get(id.index()) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    /// # Panics
    ///
    /// Panics if `id` does not name a live node.
    pub fn node(&self, id: NodeId) -> &Node {
        match self.slots.get(id.index()) {
            Some(Slot::Occupied(node)) => node,
            _ => panic!("node {} is not live", id),
        }
    }

    /// # Panics
    ///
    /// Panics if `id` does not name a live node.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        match self.slots.get_mut(id.index()) {
            Some(Slot::Occupied(node)) => node,
            _ => panic!("node {} is not live", id),
        }
    }

    /// Drops every node and stores a single root sentinel
    ///
    /// Capacity is kept, so this does not allocate.
    pub fn reset(&mut self) -> NodeId {
        self.slots.clear();
        self.free_head = None;
        self.free_count = 0;
        self.live = 0;
        self.alloc(Node::leaf(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_and_release_reuses_slots() {
        let mut arena = Arena::new(16);
        let a = arena.alloc(Node::leaf(None));
        let b = arena.alloc(Node::leaf(Some(a)));
        assert_eq!(arena.live(), 2);

        let released = arena.release(b);
        assert_eq!(released.parent, Some(a));
        assert_eq!(arena.live(), 1);
        assert!(arena.get(b).is_none());

        let c = arena.alloc(Node::internal(7, None, a, a));
        assert_eq!(c, b);
        assert_eq!(arena.node(c).key(), Some(7));
    }

    #[test]
    fn test_free_list_is_lifo() {
        let mut arena = Arena::new(16);
        let ids: Vec<NodeId> = (0..4).map(|_| arena.alloc(Node::leaf(None))).collect();
        arena.release(ids[1]);
        arena.release(ids[3]);

        assert_eq!(arena.alloc(Node::leaf(None)), ids[3]);
        assert_eq!(arena.alloc(Node::leaf(None)), ids[1]);
        assert_eq!(arena.alloc(Node::leaf(None)).index(), 4);
    }

    #[test]
    fn test_reserve_respects_limit() {
        let mut arena = Arena::new(3);
        arena.alloc(Node::leaf(None));
        assert!(arena.reserve(2).is_ok());

        match arena.reserve(3) {
            Err(Error::CapacityExceeded {
                live,
                requested,
                limit,
            }) => {
                assert_eq!((live, requested, limit), (1, 3, 3));
            }
            other => panic!("expected CapacityExceeded, got {:?}", other),
        }
    }

    #[test]
    fn test_oversized_capacity_reports_allocation_failure() {
        match Arena::with_capacity(usize::MAX, usize::MAX) {
            Err(err @ Error::AllocationFailed { requested, .. }) => {
                assert_eq!(requested, usize::MAX);
                assert!(std::error::Error::source(&err).is_some());
            }
            other => panic!("expected AllocationFailed, got {:?}", other.map(|a| a.live())),
        }
    }

    #[test]
    fn test_failed_reserve_leaves_arena_untouched() {
        let mut arena = Arena::new(usize::MAX);
        let root = arena.alloc(Node::leaf(None));

        match arena.reserve(usize::MAX) {
            Err(Error::AllocationFailed { source, .. }) => {
                assert!(!source.to_string().is_empty());
            }
            other => panic!("expected AllocationFailed, got {:?}", other),
        }

        assert_eq!(arena.live(), 1);
        assert!(arena.node(root).is_leaf());
        assert!(arena.reserve(2).is_ok());
    }

    #[test]
    fn test_reset_leaves_single_sentinel() {
        let mut arena = Arena::with_capacity(8, 8).unwrap();
        for _ in 0..5 {
            arena.alloc(Node::leaf(None));
        }
        let root = arena.reset();
        assert_eq!(arena.live(), 1);
        assert_eq!(root.index(), 0);
        assert!(arena.node(root).is_leaf());
    }

    #[test]
    #[should_panic(expected = "released twice")]
    fn test_double_release_panics() {
        let mut arena = Arena::new(4);
        let id = arena.alloc(Node::leaf(None));
        arena.release(id);
        arena.release(id);
    }
}
