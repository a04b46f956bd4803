//! Node storage: an index arena with a free list.
//!
//! Child links are `Option<NodeId>` rather than boxes so that rotations and
//! the successor splice only ever rewrite links. A node is never copied, and
//! dropping the tree drops one flat `Vec` regardless of its shape.

use std::ops::{Index, IndexMut};

/// Stable handle to a node slot.
///
/// A `NodeId` names a node object, not a key. Deleting a key with two
/// children relocates the in-order successor node into the vacated position,
/// so the id found at a given position may change across unrelated
/// deletions. `compact` reassigns every id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Slot index within the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

pub(crate) type Link = Option<NodeId>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

#[derive(Clone, Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Link,
    pub(crate) right: Link,
}

impl<K, V> Node<K, V> {
    pub(crate) fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Link {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, link: Link) {
        match side {
            Side::Left => self.left = link,
            Side::Right => self.right = link,
        }
    }
}

/// Slab of nodes. Vacant slots are recycled LIFO.
#[derive(Clone, Debug)]
pub(crate) struct NodeArena<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<NodeId>,
    live: usize,
}

impl<K, V> NodeArena<K, V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            live: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.live
    }

    /// Number of slots, live or vacant.
    #[inline]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn alloc(&mut self, key: K, value: V) -> NodeId {
        let node = Node::new(key, value);
        self.live += 1;
        if let Some(id) = self.free.pop() {
            debug_assert!(self.slots[id.0].is_none());
            self.slots[id.0] = Some(node);
            id
        } else {
            self.slots.push(Some(node));
            NodeId(self.slots.len() - 1)
        }
    }

    /// Vacates `id` and hands back the node. `None` if already vacant.
    pub(crate) fn free(&mut self, id: NodeId) -> Option<Node<K, V>> {
        let node = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id);
        self.live -= 1;
        Some(node)
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> Option<&Node<K, V>> {
        self.slots.get(id.0)?.as_ref()
    }

    pub(crate) fn memory_usage(&self) -> usize {
        self.slots.capacity() * std::mem::size_of::<Option<Node<K, V>>>()
            + self.free.capacity() * std::mem::size_of::<NodeId>()
    }

    /// Trims trailing vacant slots, then releases spare capacity.
    pub(crate) fn shrink_to_fit(&mut self) {
        while matches!(self.slots.last(), Some(None)) {
            self.slots.pop();
        }
        let end = self.slots.len();
        self.free.retain(|id| id.0 < end);
        self.slots.shrink_to_fit();
        self.free.shrink_to_fit();
    }
}

impl<K, V> Index<NodeId> for NodeArena<K, V> {
    type Output = Node<K, V>;

    #[inline]
    fn index(&self, id: NodeId) -> &Node<K, V> {
        match self.slots[id.0] {
            Some(ref node) => node,
            None => panic!("node {id:?} is vacant"),
        }
    }
}

impl<K, V> IndexMut<NodeId> for NodeArena<K, V> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        match self.slots[id.0] {
            Some(ref mut node) => node,
            None => panic!("node {id:?} is vacant"),
        }
    }
}

/// Read-only view of one node, for walking the tree without promoting.
pub struct NodeRef<'a, K, V> {
    arena: &'a NodeArena<K, V>,
    id: NodeId,
}

impl<'a, K, V> NodeRef<'a, K, V> {
    pub(crate) fn new(arena: &'a NodeArena<K, V>, id: NodeId) -> Self {
        Self { arena, id }
    }

    /// Identity of the underlying node object.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Key stored in this node.
    pub fn key(&self) -> &'a K {
        &self.arena[self.id].key
    }

    /// Value stored in this node.
    pub fn value(&self) -> &'a V {
        &self.arena[self.id].value
    }

    /// Left child, holding strictly smaller keys.
    pub fn left(&self) -> Option<NodeRef<'a, K, V>> {
        self.arena[self.id].left.map(|id| NodeRef::new(self.arena, id))
    }

    /// Right child, holding strictly greater keys.
    pub fn right(&self) -> Option<NodeRef<'a, K, V>> {
        self.arena[self.id].right.map(|id| NodeRef::new(self.arena, id))
    }
}

impl<K, V> Clone for NodeRef<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for NodeRef<'_, K, V> {}

impl<K: std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for NodeRef<'_, K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("key", self.key())
            .field("value", self.value())
            .finish()
    }
}
