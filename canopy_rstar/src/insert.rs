// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Insertion: subtree choice, overflow treatment, split, and forced reinsertion.

use alloc::vec;
use alloc::vec::Vec;

use log::{debug, trace};

use crate::node::{NodeIdx, RChild, RNode};
use crate::params::ReinsertOrder;
use crate::split::{choose_split, sort_by_key_f64};
use crate::tree::RStarTree;
use crate::types::{BoundingBox, Entry, Scalar};

/// Whether an overflow may still be relieved by forced reinsertion.
///
/// A top-level insertion starts in `FirstPass`. The children evicted by a
/// forced reinsertion go back in with `ReinsertionPass`, where every overflow
/// splits, so one insertion triggers at most one reinsertion cascade.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum PassMode {
    FirstPass,
    ReinsertionPass,
}

/// What a subtree reports to its parent after an insertion.
enum InsertOutcome<T, P, const D: usize> {
    Complete,
    /// The node split; the new sibling must be attached to the parent.
    Split(NodeIdx),
    /// Children evicted from a node at `level`, to be re-inserted at that level.
    Reinsert {
        children: Vec<RChild<T, P, D>>,
        level: usize,
    },
}

impl<T: Scalar, P, const D: usize> RStarTree<T, P, D> {
    /// Insert a box with its payload.
    pub fn insert(&mut self, bound: BoundingBox<T, D>, payload: P) {
        self.insert_child(RChild::Entry(Entry { bound, payload }), 0, PassMode::FirstPass);
        self.len += 1;
    }

    /// Place `child` into a node at `target_level` (leaf-level nodes are level 0).
    pub(crate) fn insert_child(
        &mut self,
        child: RChild<T, P, D>,
        target_level: usize,
        mode: PassMode,
    ) {
        let root = match self.root {
            Some(root) => root,
            None => {
                let root = self.arena.alloc(RNode::new(true, Vec::new()));
                self.root = Some(root);
                self.root_level = 0;
                root
            }
        };
        debug_assert!(target_level <= self.root_level, "target level above the root");

        match self.insert_at(root, self.root_level, child, target_level, mode) {
            InsertOutcome::Complete => {}
            InsertOutcome::Split(sibling) => self.grow_root(root, sibling),
            InsertOutcome::Reinsert { children, level } => {
                debug_assert_eq!(mode, PassMode::FirstPass);
                for child in children {
                    self.insert_child(child, level, PassMode::ReinsertionPass);
                }
            }
        }
    }

    fn insert_at(
        &mut self,
        idx: NodeIdx,
        level: usize,
        child: RChild<T, P, D>,
        target_level: usize,
        mode: PassMode,
    ) -> InsertOutcome<T, P, D> {
        let child_bound = self.arena.bound_of(&child);
        self.arena[idx].bound.stretch(&child_bound);

        if level == target_level {
            self.arena[idx].children.push(child);
        } else {
            let pick = self.choose_subtree(idx, level, &child_bound);
            let next = match &self.arena[idx].children[pick] {
                RChild::Node(next) => *next,
                RChild::Entry(_) => unreachable!("entries only live in leaf-level nodes"),
            };
            match self.insert_at(next, level - 1, child, target_level, mode) {
                InsertOutcome::Complete => return InsertOutcome::Complete,
                InsertOutcome::Split(sibling) => {
                    self.arena[idx].children.push(RChild::Node(sibling));
                }
                reinsert @ InsertOutcome::Reinsert { .. } => {
                    // Evictions below may have shrunk this node.
                    self.arena.refit(idx);
                    return reinsert;
                }
            }
        }

        if self.arena[idx].children.len() > self.params.max_children() {
            self.overflow(idx, level, mode)
        } else {
            InsertOutcome::Complete
        }
    }

    /// Pick the child of `idx` that should receive a box `bound`.
    ///
    /// One level above the leaves this minimizes overlap enlargement (restricted
    /// to the best area-enlargement candidates when the node is large); higher
    /// up it minimizes area enlargement. Ties go to the earliest child.
    pub(crate) fn choose_subtree(
        &self,
        idx: NodeIdx,
        level: usize,
        bound: &BoundingBox<T, D>,
    ) -> usize {
        let bounds: Vec<BoundingBox<T, D>> = self.arena[idx]
            .children
            .iter()
            .map(|c| self.arena.bound_of(c))
            .collect();
        let enlargement = |b: &BoundingBox<T, D>| b.union(bound).area() - b.area();

        if level != 1 {
            return first_min((0..bounds.len()).map(|i| enlargement(&bounds[i])));
        }

        let mut candidates: Vec<usize> = (0..bounds.len()).collect();
        if self.params.prunes_candidates(bounds.len()) {
            let mut keyed: Vec<(f64, usize)> = candidates
                .iter()
                .map(|&i| (enlargement(&bounds[i]), i))
                .collect();
            sort_by_key_f64(&mut keyed);
            keyed.truncate(self.params.choose_subtree_candidates());
            candidates = keyed.into_iter().map(|(_, i)| i).collect();
        }

        let overlap_enlargement = |i: usize| {
            let grown = bounds[i].union(bound);
            bounds
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, other)| grown.overlap(other) - bounds[i].overlap(other))
                .sum::<f64>()
        };
        candidates[first_min(candidates.iter().map(|&i| overlap_enlargement(i)))]
    }

    fn overflow(&mut self, idx: NodeIdx, level: usize, mode: PassMode) -> InsertOutcome<T, P, D> {
        if Some(idx) != self.root && mode == PassMode::FirstPass {
            let children = self.evict_for_reinsertion(idx);
            trace!(
                "forced reinsertion at level {level}: evicting {} children",
                children.len()
            );
            return InsertOutcome::Reinsert { children, level };
        }
        InsertOutcome::Split(self.split(idx, level))
    }

    /// Split an overflowing node in place; returns the new sibling holding the second group.
    pub(crate) fn split(&mut self, idx: NodeIdx, level: usize) -> NodeIdx {
        let children = core::mem::take(&mut self.arena[idx].children);
        let mut keyed: Vec<(BoundingBox<T, D>, RChild<T, P, D>)> = children
            .into_iter()
            .map(|c| (self.arena.bound_of(&c), c))
            .collect();
        let choice = choose_split(&mut keyed, self.params.min_children());
        let second: Vec<RChild<T, P, D>> =
            keyed.split_off(choice.index).into_iter().map(|(_, c)| c).collect();
        let first: Vec<RChild<T, P, D>> = keyed.into_iter().map(|(_, c)| c).collect();
        trace!(
            "split at level {level}: axis {} {:?} edge, {} + {} children",
            choice.axis,
            choice.edge,
            first.len(),
            second.len()
        );

        let leaf = self.arena[idx].leaf;
        self.arena[idx].children = first;
        self.arena.refit(idx);
        self.arena.alloc(RNode::new(leaf, second))
    }

    /// Remove the `p` children ranked farthest from the node's center, shrinking its bound.
    fn evict_for_reinsertion(&mut self, idx: NodeIdx) -> Vec<RChild<T, P, D>> {
        let p = self.params.reinsert_count();
        let center = self.arena[idx].bound;
        let order = self.params.reinsert_order();
        let children = core::mem::take(&mut self.arena[idx].children);
        let mut keyed: Vec<(f64, RChild<T, P, D>)> = children
            .into_iter()
            .map(|c| {
                let b = self.arena.bound_of(&c);
                let key = match order {
                    ReinsertOrder::CenterSum => b.distance_from_center(&center),
                    ReinsertOrder::CenterDistance => b.center_distance(&center),
                };
                (key, c)
            })
            .collect();
        sort_by_key_f64(&mut keyed);
        let evicted = keyed.split_off(keyed.len() - p);
        self.arena[idx].children = keyed.into_iter().map(|(_, c)| c).collect();
        self.arena.refit(idx);
        evicted.into_iter().map(|(_, c)| c).collect()
    }

    fn grow_root(&mut self, old_root: NodeIdx, sibling: NodeIdx) {
        let root = self.arena.alloc(RNode::new(
            false,
            vec![RChild::Node(old_root), RChild::Node(sibling)],
        ));
        self.root = Some(root);
        self.root_level += 1;
        debug!("root split; height is now {}", self.root_level + 1);
    }
}

/// Index of the first smallest value.
fn first_min(values: impl Iterator<Item = f64>) -> usize {
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in values.enumerate() {
        if best.map(|(_, b)| v < b).unwrap_or(true) {
            best = Some((i, v));
        }
    }
    best.map_or(0, |(i, _)| i)
}
