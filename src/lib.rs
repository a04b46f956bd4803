//! # bubble-tree
//!
//! An ordered map on an unbalanced binary search tree that moves every key it
//! finds to the root. Recently or repeatedly touched keys therefore stay cheap
//! to reach again.
//!
//! Every successful access funnels through one promotion step: `put` and
//! `remove` first do their structural work and then promote the key, while
//! `get` and `contains` promote first and then read. Promotion walks back up
//! the search path doing one single rotation per ancestor, so a found key
//! always ends at the root and a missing key leaves the tree untouched.
//!
//! There is no balance guarantee. Height can grow to the number of keys, so
//! every walk here uses an explicit stack instead of recursion.
//!
//! ## Example
//!
//! ```rust
//! use bubble_tree::BubbleTree;
//!
//! let mut tree: BubbleTree<u32, &str> = BubbleTree::new();
//! tree.put(5, "five");
//! tree.put(3, "three");
//! tree.put(8, "eight");
//! assert_eq!(tree.root_key(), Some(&8));
//!
//! assert_eq!(tree.get(&3), Some(&"three"));
//! assert_eq!(tree.root_key(), Some(&3));
//!
//! // A miss does not move anything.
//! assert_eq!(tree.get(&4), None);
//! assert_eq!(tree.root_key(), Some(&3));
//!
//! assert_eq!(tree.remove(&5), Some("five"));
//! assert_eq!(tree.len(), 2);
//! assert!(tree.keeps_invariant());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod debug;
mod error;
mod node;
mod promote;

pub use debug::Diagram;
pub use error::InvariantError;
pub use node::{NodeId, NodeRef};

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::mem;

use log::debug;

use node::{Link, NodeArena, Side};
use promote::Path;

/// Configuration for a [`BubbleTree`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Node slots to reserve up front.
    pub initial_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: 64,
        }
    }
}

/// Self-adjusting ordered map. See the [crate docs](crate).
///
/// Keys are unique and strictly ordered by `K: Ord`. Lookups that find their
/// key restructure the tree, so they take `&mut self`; use [`peek`] for a
/// read-only lookup that leaves the shape alone.
///
/// [`peek`]: BubbleTree::peek
#[derive(Clone)]
pub struct BubbleTree<K, V> {
    pub(crate) nodes: NodeArena<K, V>,
    pub(crate) root: Link,
}

impl<K, V> BubbleTree<K, V> {
    /// Create an empty tree with the default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create an empty tree with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(Config {
            initial_capacity: capacity,
        })
    }

    /// Create an empty tree with the given configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            nodes: NodeArena::with_capacity(config.initial_capacity),
            root: None,
        }
    }

    /// O(1).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of keys. O(1); [`validate`](Self::validate) cross-checks it
    /// against the number of nodes reachable from the root.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Number of nodes on the longest root-to-leaf path; 0 when empty.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|id| (id, 1)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            height = height.max(depth);
            let node = &self.nodes[id];
            stack.extend(node.left.map(|c| (c, depth + 1)));
            stack.extend(node.right.map(|c| (c, depth + 1)));
        }
        height
    }

    /// Key currently at the root.
    #[inline]
    pub fn root_key(&self) -> Option<&K> {
        self.root.map(|id| &self.nodes[id].key)
    }

    /// Read-only handle on the root, for walking the tree node by node.
    pub fn root_node(&self) -> Option<NodeRef<'_, K, V>> {
        self.root.map(|id| NodeRef::new(&self.nodes, id))
    }

    /// Approximate heap bytes held by the node arena.
    pub fn memory_usage(&self) -> usize {
        self.nodes.memory_usage()
    }

    /// Release spare arena capacity. Does not move any node.
    pub fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
    }

    /// Rewrite all live nodes into a fresh arena without holes.
    ///
    /// The tree shape is unchanged but every [`NodeId`] is reassigned.
    /// Returns the number of nodes rewritten.
    pub fn compact(&mut self) -> usize {
        let live = self.nodes.len();
        let mut old = mem::replace(&mut self.nodes, NodeArena::with_capacity(live));
        let mut stack: Vec<(NodeId, Option<(NodeId, Side)>)> =
            self.root.take().map(|id| (id, None)).into_iter().collect();

        let mut rewritten = 0;
        while let Some((old_id, parent)) = stack.pop() {
            let Some(node) = old.free(old_id) else {
                continue;
            };
            let new_id = self.nodes.alloc(node.key, node.value);
            match parent {
                Some((p, side)) => self.nodes[p].set_child(side, Some(new_id)),
                None => self.root = Some(new_id),
            }
            stack.extend(node.right.map(|c| (c, Some((new_id, Side::Right)))));
            stack.extend(node.left.map(|c| (c, Some((new_id, Side::Left)))));
            rewritten += 1;
        }

        debug!("compacted {rewritten} nodes out of {} slots", old.slot_count());
        rewritten
    }
}

impl<K: Ord, V> BubbleTree<K, V> {
    /// Build a tree by `put`ting `keys` and `values` pairwise, in order.
    ///
    /// If one sequence is longer, its extra elements are ignored.
    pub fn from_pairs<I, J>(keys: I, values: J) -> Self
    where
        I: IntoIterator<Item = K>,
        J: IntoIterator<Item = V>,
    {
        keys.into_iter().zip(values).collect()
    }

    /// Plain ordered descent. Never restructures the tree.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cur = self.root;
        while let Some(id) = cur {
            let node = &self.nodes[id];
            match key.cmp(node.key.borrow()) {
                Ordering::Less => cur = node.left,
                Ordering::Greater => cur = node.right,
                Ordering::Equal => return Some(&node.value),
            }
        }
        None
    }

    /// Value for `key`, promoting the key to the root if present.
    ///
    /// A miss leaves the tree exactly as it was.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if !self.bubble_up(key) {
            return None;
        }
        let root = self.root?;
        Some(&self.nodes[root].value)
    }

    /// Like [`get`](Self::get), but the value is mutable.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if !self.bubble_up(key) {
            return None;
        }
        let root = self.root?;
        Some(&mut self.nodes[root].value)
    }

    /// Whether `key` is present. Promotes it on a hit, like `get`.
    pub fn contains<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Insert or overwrite, then promote `key` to the root.
    ///
    /// Returns the previous value if the key was already present, in which
    /// case the node is updated in place and the size is unchanged.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let mut path = Path::new();
        let mut cur = self.root;
        while let Some(id) = cur {
            let node = &mut self.nodes[id];
            match key.cmp(&node.key) {
                Ordering::Less => {
                    path.push((id, Side::Left));
                    cur = node.left;
                }
                Ordering::Greater => {
                    path.push((id, Side::Right));
                    cur = node.right;
                }
                Ordering::Equal => {
                    let old = mem::replace(&mut node.value, value);
                    self.promote_path(path, id);
                    return Some(old);
                }
            }
        }

        let id = self.nodes.alloc(key, value);
        match path.last() {
            Some(&(parent, side)) => self.nodes[parent].set_child(side, Some(id)),
            None => self.root = Some(id),
        }
        // The descent above is the search path promotion would take for the
        // key just written.
        self.promote_path(path, id);
        None
    }

    /// Remove `key` and return its value. No-op if absent.
    ///
    /// A node with two children is replaced by its in-order successor node,
    /// moved rather than copied, so [`NodeId`]s seen before the call may now
    /// sit at a different position.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let removed = self.unlink(key);
        // Always a no-op: the key is gone by now.
        let promoted = self.bubble_up(key);
        debug_assert!(!promoted, "removed key still reachable");
        removed
    }

    fn unlink<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (target, path) = self.search_path(key)?;
        let (left, right) = {
            let node = &self.nodes[target];
            (node.left, node.right)
        };

        let replacement = match (left, right) {
            (_, None) => left,
            (None, Some(_)) => right,
            (Some(left), Some(right)) => Some(self.splice_successor(target, left, right)),
        };
        match path.last() {
            Some(&(parent, side)) => self.nodes[parent].set_child(side, replacement),
            None => self.root = replacement,
        }

        self.nodes.free(target).map(|node| node.value)
    }

    /// Detach the leftmost node of `right` and make it the parent of `left`
    /// and of whatever remains of `right`. Returns the relocated node.
    fn splice_successor(&mut self, target: NodeId, left: NodeId, right: NodeId) -> NodeId {
        let mut parent = None;
        let mut min = right;
        while let Some(next) = self.nodes[min].left {
            parent = Some(min);
            min = next;
        }

        if let Some(parent) = parent {
            let detached = self.nodes[min].right.take();
            self.nodes[parent].left = detached;
            self.nodes[min].right = Some(right);
        }
        self.nodes[min].left = Some(left);

        debug!("relocated successor {min:?} into the slot of {target:?}");
        min
    }
}

impl<K, V> Default for BubbleTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for BubbleTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord, V> Extend<(K, V)> for BubbleTree<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K: std::fmt::Debug, V> std::fmt::Debug for BubbleTree<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BubbleTree")
            .field("len", &self.len())
            .field("root", &self.root_key())
            .finish()
    }
}


#[cfg(test)]
mod proptests;
