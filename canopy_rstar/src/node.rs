// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena storage for tree nodes.

use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use crate::types::{BoundingBox, Entry, Scalar};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeIdx(usize);

/// A child slot: either a sub-node or, in a leaf-level node, a stored entry.
#[derive(Clone, Debug)]
pub(crate) enum RChild<T, P, const D: usize> {
    Node(NodeIdx),
    Entry(Entry<T, P, D>),
}

#[derive(Clone, Debug)]
pub(crate) struct RNode<T, P, const D: usize> {
    pub(crate) bound: BoundingBox<T, D>,
    /// Children are entries (leaf level) rather than nodes.
    pub(crate) leaf: bool,
    pub(crate) children: Vec<RChild<T, P, D>>,
}

impl<T: Scalar, P, const D: usize> RNode<T, P, D> {
    pub(crate) fn new(leaf: bool, children: Vec<RChild<T, P, D>>) -> Self {
        Self {
            bound: BoundingBox::empty(),
            leaf,
            children,
        }
    }
}

/// Node arena with a free list; released slots are recycled by later allocations.
#[derive(Clone, Debug)]
pub(crate) struct Arena<T, P, const D: usize> {
    nodes: Vec<RNode<T, P, D>>,
    free: Vec<NodeIdx>,
}

impl<T, P, const D: usize> Default for Arena<T, P, D> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<T: Scalar, P, const D: usize> Arena<T, P, D> {
    /// Store `node`, computing its bound from its children.
    pub(crate) fn alloc(&mut self, mut node: RNode<T, P, D>) -> NodeIdx {
        node.bound = self.union_of(&node.children);
        if let Some(idx) = self.free.pop() {
            self.nodes[idx.0] = node;
            idx
        } else {
            self.nodes.push(node);
            NodeIdx(self.nodes.len() - 1)
        }
    }

    /// Return a slot to the free list. Its children must already have been moved out or released.
    pub(crate) fn release(&mut self, idx: NodeIdx) {
        let node = &mut self.nodes[idx.0];
        node.children = Vec::new();
        node.bound = BoundingBox::empty();
        self.free.push(idx);
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
    }

    /// Number of allocated, non-released nodes.
    pub(crate) fn live(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub(crate) fn bound_of(&self, child: &RChild<T, P, D>) -> BoundingBox<T, D> {
        match child {
            RChild::Node(idx) => self[*idx].bound,
            RChild::Entry(entry) => entry.bound,
        }
    }

    /// Tightest box around `children`; the reset box when there are none.
    pub(crate) fn union_of(&self, children: &[RChild<T, P, D>]) -> BoundingBox<T, D> {
        children
            .iter()
            .fold(BoundingBox::empty(), |mut acc, c| {
                acc.stretch(&self.bound_of(c));
                acc
            })
    }

    /// Recompute a node's bound from its children.
    pub(crate) fn refit(&mut self, idx: NodeIdx) {
        let bound = self.union_of(&self[idx].children);
        self[idx].bound = bound;
    }
}

impl<T, P, const D: usize> Index<NodeIdx> for Arena<T, P, D> {
    type Output = RNode<T, P, D>;

    fn index(&self, idx: NodeIdx) -> &Self::Output {
        &self.nodes[idx.0]
    }
}

impl<T, P, const D: usize> IndexMut<NodeIdx> for Arena<T, P, D> {
    fn index_mut(&mut self, idx: NodeIdx) -> &mut Self::Output {
        &mut self.nodes[idx.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn item(x: i32, payload: u8) -> RChild<i32, u8, 2> {
        RChild::Entry(Entry {
            bound: BoundingBox::from_origin_extent([x, x], [1, 1]),
            payload,
        })
    }

    #[test]
    fn alloc_computes_bound_and_release_recycles() {
        let mut arena = Arena::<i32, u8, 2>::default();
        let a = arena.alloc(RNode::new(true, vec![item(0, 0), item(4, 1)]));
        assert_eq!(arena[a].bound, BoundingBox::new([0, 0], [5, 5]));
        assert_eq!(arena.live(), 1);

        let b = arena.alloc(RNode::new(false, vec![RChild::Node(a)]));
        assert_eq!(arena[b].bound, arena[a].bound);

        arena.release(b);
        assert_eq!(arena.live(), 1);
        let c = arena.alloc(RNode::new(true, Vec::new()));
        assert_eq!(c, b, "released slot is reused");
        assert!(arena[c].bound.is_reset());
    }

    #[test]
    fn refit_shrinks_to_children() {
        let mut arena = Arena::<i32, u8, 2>::default();
        let a = arena.alloc(RNode::new(true, vec![item(0, 0), item(9, 1)]));
        arena[a].children.pop();
        arena.refit(a);
        assert_eq!(arena[a].bound, BoundingBox::new([0, 0], [1, 1]));
    }
}
