//! Promotion ("bubble-up") and the two single rotations it is built from.
//!
//! Promotion is a search that, once the key is found, unwinds the search path
//! from the deepest ancestor upward. At each ancestor it reattaches the subtree
//! promoted so far as that ancestor's child, then lifts it one level with a
//! single rotation. The key therefore always finishes at the root. This is the
//! plain "rotate to root" scheme: one single rotation per ancestor, never the
//! paired zig-zig/zig-zag steps of a splay tree.
//!
//! When the key is absent nothing is rotated and no link is written.
//!
//! The path is kept on an explicit stack so that degenerate trees, whose
//! height approaches their size, cannot exhaust the call stack.

use std::borrow::Borrow;
use std::cmp::Ordering;

use log::trace;

use crate::node::{NodeId, Side};
use crate::BubbleTree;

/// Root-to-target search path: each ancestor with the side the search left it by.
pub(crate) type Path = Vec<(NodeId, Side)>;

impl<K, V> BubbleTree<K, V> {
    /// `l` must be the left child of `r`. Returns the new subtree root, `l`.
    #[inline]
    pub(crate) fn rotate_right(&mut self, r: NodeId, l: NodeId) -> NodeId {
        debug_assert_eq!(self.nodes[r].left, Some(l));
        let inner = self.nodes[l].right.take();
        self.nodes[r].left = inner;
        self.nodes[l].right = Some(r);
        l
    }

    /// `r` must be the right child of `l`. Returns the new subtree root, `r`.
    #[inline]
    pub(crate) fn rotate_left(&mut self, l: NodeId, r: NodeId) -> NodeId {
        debug_assert_eq!(self.nodes[l].right, Some(r));
        let inner = self.nodes[r].left.take();
        self.nodes[l].right = inner;
        self.nodes[r].left = Some(l);
        r
    }

    /// Descends from the root looking for `key`, recording every ancestor.
    ///
    /// Returns the node holding `key` with its path, or `None` if absent.
    pub(crate) fn search_path<Q>(&self, key: &Q) -> Option<(NodeId, Path)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut path = Path::new();
        let mut cur = self.root;
        while let Some(id) = cur {
            let node = &self.nodes[id];
            match key.cmp(node.key.borrow()) {
                Ordering::Less => {
                    path.push((id, Side::Left));
                    cur = node.left;
                }
                Ordering::Greater => {
                    path.push((id, Side::Right));
                    cur = node.right;
                }
                Ordering::Equal => return Some((id, path)),
            }
        }
        None
    }

    /// Promotes `key` to the root if present. Returns whether it was found.
    pub(crate) fn bubble_up<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.search_path(key) {
            Some((target, path)) => {
                self.promote_path(path, target);
                true
            }
            None => false,
        }
    }

    /// Rotates `target` up through `path` until it is the root.
    ///
    /// `path` must be the exact root-to-`target` search path.
    pub(crate) fn promote_path(&mut self, mut path: Path, target: NodeId) {
        let rotations = path.len();
        let mut top = target;
        while let Some((ancestor, side)) = path.pop() {
            self.nodes[ancestor].set_child(side, Some(top));
            top = match side {
                Side::Left => self.rotate_right(ancestor, top),
                Side::Right => self.rotate_left(ancestor, top),
            };
        }
        self.root = Some(top);
        if rotations > 0 {
            trace!("promoted node {target:?} to root in {rotations} rotations");
        }
    }
}
