// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural checks and summary statistics.

use alloc::vec::Vec;

use crate::node::{NodeIdx, RChild};
use crate::tree::RStarTree;
use crate::types::Scalar;

/// A broken structural invariant found by [`RStarTree::validate`].
///
/// Trees built only through the public API never report one of these; an
/// error points at a bug in the tree itself.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvariantError {
    /// A node's bound differs from the union of its children's bounds.
    #[error("node at depth {depth} has a bound that is not the union of its children")]
    LooseBound {
        /// Distance from the root.
        depth: usize,
    },
    /// A node holds too many children, or a non-root node too few.
    #[error("node at depth {depth} holds {children} children, outside [{min}, {max}]")]
    FanOut {
        /// Distance from the root.
        depth: usize,
        /// Observed child count.
        children: usize,
        /// Required minimum.
        min: usize,
        /// Allowed maximum.
        max: usize,
    },
    /// Leaf-level nodes were found at different depths.
    #[error("leaf-level node at depth {found}, expected {expected}")]
    UnevenDepth {
        /// Depth implied by the root level.
        expected: usize,
        /// Depth actually observed.
        found: usize,
    },
    /// A node mixes entries and sub-nodes, or its leaf flag disagrees with its children.
    #[error("node at depth {depth} holds children of the wrong kind")]
    MixedChildren {
        /// Distance from the root.
        depth: usize,
    },
    /// The running entry count disagrees with the entries reachable from the root.
    #[error("tree reports {reported} entries but {found} are reachable")]
    SizeMismatch {
        /// Value of [`RStarTree::len`].
        reported: usize,
        /// Entries found by walking the tree.
        found: usize,
    },
    /// The arena holds nodes that are not reachable from the root.
    #[error("{live} nodes allocated but {reachable} reachable")]
    LeakedNodes {
        /// Allocated nodes.
        live: usize,
        /// Nodes reachable from the root.
        reachable: usize,
    },
}

/// Shape summary returned by [`RStarTree::stats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Number of node levels.
    pub height: usize,
    /// Nodes reachable from the root.
    pub nodes: usize,
    /// Leaf-level nodes.
    pub leaf_nodes: usize,
    /// Stored entries.
    pub entries: usize,
}

impl<T: Scalar, P, const D: usize> RStarTree<T, P, D> {
    /// Check every structural invariant and return the tree's shape.
    ///
    /// Covers tight bounds, fan-out, uniform leaf depth, child kinds, the
    /// entry count, and arena bookkeeping.
    pub fn validate(&self) -> Result<TreeStats, InvariantError> {
        let Some(root) = self.root else {
            if self.len != 0 {
                return Err(InvariantError::SizeMismatch {
                    reported: self.len,
                    found: 0,
                });
            }
            return Ok(TreeStats::default());
        };
        let mut stats = TreeStats {
            height: self.height(),
            ..TreeStats::default()
        };
        self.check(root, 0, &mut stats)?;
        if stats.entries != self.len {
            return Err(InvariantError::SizeMismatch {
                reported: self.len,
                found: stats.entries,
            });
        }
        if stats.nodes != self.arena.live() {
            return Err(InvariantError::LeakedNodes {
                live: self.arena.live(),
                reachable: stats.nodes,
            });
        }
        Ok(stats)
    }

    /// Count nodes and entries.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            height: self.height(),
            ..TreeStats::default()
        };
        let mut stack: Vec<NodeIdx> = self.root.into_iter().collect();
        while let Some(idx) = stack.pop() {
            let node = &self.arena[idx];
            stats.nodes += 1;
            if node.leaf {
                stats.leaf_nodes += 1;
            }
            for child in &node.children {
                match child {
                    RChild::Node(next) => stack.push(*next),
                    RChild::Entry(_) => stats.entries += 1,
                }
            }
        }
        stats
    }

    fn check(
        &self,
        idx: NodeIdx,
        depth: usize,
        stats: &mut TreeStats,
    ) -> Result<(), InvariantError> {
        let node = &self.arena[idx];
        stats.nodes += 1;

        let is_root = depth == 0;
        let (min, max) = (self.params.min_children(), self.params.max_children());
        let n = node.children.len();
        // An empty root is legal; any other root needs a child.
        let floor = if is_root { usize::from(n > 0 || !node.leaf) } else { min };
        if n < floor || n > max {
            return Err(InvariantError::FanOut {
                depth,
                children: n,
                min: floor,
                max,
            });
        }
        if node.bound != self.arena.union_of(&node.children) {
            return Err(InvariantError::LooseBound { depth });
        }

        if node.leaf {
            if depth != self.root_level {
                return Err(InvariantError::UnevenDepth {
                    expected: self.root_level,
                    found: depth,
                });
            }
            stats.leaf_nodes += 1;
        }
        for child in &node.children {
            match (node.leaf, child) {
                (true, RChild::Entry(_)) => stats.entries += 1,
                (false, RChild::Node(next)) => self.check(*next, depth + 1, stats)?,
                _ => return Err(InvariantError::MixedChildren { depth }),
            }
        }
        Ok(())
    }
}
