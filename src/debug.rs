//! Diagnostics: structural validation and a text diagram of the tree.

use std::fmt;

use crate::error::InvariantError;
use crate::node::{NodeId, Side};
use crate::BubbleTree;

const EMPTY_DIAGRAM: &str = "(empty tree)";

impl<K: Ord, V> BubbleTree<K, V> {
    /// Check every structural invariant, reporting the first defect found.
    ///
    /// Each key must lie strictly between the open bounds inherited from its
    /// ancestors, every link must name a live node, no node may be reachable
    /// twice, and the reachable count must equal [`len`](Self::len).
    pub fn validate(&self) -> Result<(), InvariantError> {
        let mut seen = vec![false; self.nodes.slot_count()];
        let mut reachable = 0usize;
        let mut stack: Vec<(NodeId, Option<&K>, Option<&K>, usize)> =
            self.root.map(|id| (id, None, None, 0)).into_iter().collect();

        while let Some((id, lower, upper, depth)) = stack.pop() {
            let node = self
                .nodes
                .get(id)
                .ok_or(InvariantError::DanglingLink { node: id })?;
            if std::mem::replace(&mut seen[id.index()], true) {
                return Err(InvariantError::SharedNode { node: id });
            }
            reachable += 1;

            let above_lower = lower.map_or(true, |lo| node.key > *lo);
            let below_upper = upper.map_or(true, |hi| node.key < *hi);
            if !(above_lower && below_upper) {
                return Err(InvariantError::OutOfOrder { node: id, depth });
            }

            if let Some(right) = node.child(Side::Right) {
                stack.push((right, Some(&node.key), upper, depth + 1));
            }
            if let Some(left) = node.child(Side::Left) {
                stack.push((left, lower, Some(&node.key), depth + 1));
            }
        }

        if reachable != self.nodes.len() {
            return Err(InvariantError::CountMismatch {
                reachable,
                live: self.nodes.len(),
            });
        }
        Ok(())
    }

    /// `true` iff [`validate`](Self::validate) finds nothing wrong.
    pub fn keeps_invariant(&self) -> bool {
        self.validate().is_ok()
    }
}

impl<K, V> BubbleTree<K, V> {
    /// Sideways diagram of the tree, right subtree on top, one value per line.
    pub fn diagram(&self) -> Diagram<'_, K, V> {
        Diagram { tree: self }
    }
}

/// [`Display`](fmt::Display) adapter returned by [`BubbleTree::diagram`].
///
/// ```text
/// │   ┌── c
/// └── b
///     └── a
/// ```
pub struct Diagram<'a, K, V> {
    tree: &'a BubbleTree<K, V>,
}

enum Step {
    Expand { id: NodeId, prefix: String, tail: bool },
    Emit { id: NodeId, prefix: String, tail: bool },
}

impl<K, V: fmt::Display> fmt::Display for Diagram<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(root) = self.tree.root else {
            return writeln!(f, "{EMPTY_DIAGRAM}");
        };

        let nodes = &self.tree.nodes;
        let mut stack = vec![Step::Expand {
            id: root,
            prefix: String::new(),
            tail: true,
        }];
        while let Some(step) = stack.pop() {
            match step {
                Step::Expand { id, prefix, tail } => {
                    let node = &nodes[id];
                    // Pushed in reverse: right subtree, node, then left subtree.
                    if let Some(left) = node.left {
                        stack.push(Step::Expand {
                            id: left,
                            prefix: format!("{prefix}{}", if tail { "    " } else { "│   " }),
                            tail: true,
                        });
                    }
                    let right_prefix = format!("{prefix}{}", if tail { "│   " } else { "    " });
                    stack.push(Step::Emit { id, prefix, tail });
                    if let Some(right) = node.right {
                        stack.push(Step::Expand {
                            id: right,
                            prefix: right_prefix,
                            tail: false,
                        });
                    }
                }
                Step::Emit { id, prefix, tail } => {
                    let branch = if tail { "└── " } else { "┌── " };
                    writeln!(f, "{prefix}{branch}{}", nodes[id].value)?;
                }
            }
        }
        Ok(())
    }
}

impl<K, V: fmt::Display> fmt::Display for BubbleTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.diagram(), f)
    }
}
