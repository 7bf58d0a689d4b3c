// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The R*-tree container and its read-only traversals.

use alloc::vec::Vec;
use core::fmt::{self, Debug};
use core::ops::ControlFlow;

use crate::node::{Arena, NodeIdx, RChild};
use crate::params::RTreeParams;
use crate::types::{Entry, Scalar};
use crate::visit::{Acceptor, Visitor};

/// An in-memory R*-tree over `D`-dimensional boxes carrying payloads of type `P`.
///
/// Entries are inserted one at a time. Overflowing nodes are first relieved by
/// forced reinsertion (once per insertion) and otherwise split along the axis
/// with the smallest total margin. Every leaf sits at the same depth and every
/// node's bound is the tightest box around its children whenever a public
/// method returns.
///
/// ```
/// use canopy_rstar::{Accept, BoundingBox, RStarTree, RTreeParams};
///
/// let params = RTreeParams::new(1, 2).unwrap();
/// let mut tree: RStarTree<i32, &str, 2> = RStarTree::with_params(params);
/// tree.insert(BoundingBox::from_origin_extent([0, 0], [1, 1]), "a");
/// tree.insert(BoundingBox::from_origin_extent([5, 5], [1, 1]), "b");
/// tree.insert(BoundingBox::from_origin_extent([100, 100], [1, 1]), "c");
///
/// let near = Accept::Overlapping(BoundingBox::from_origin_extent([0, 0], [10, 10]));
/// let mut hits: Vec<_> = tree.locate(&near).into_iter().map(|e| *e.payload()).collect();
/// hits.sort();
/// assert_eq!(hits, ["a", "b"]);
///
/// assert_eq!(tree.remove_item(&"b", false), 1);
/// assert_eq!(tree.len(), 2);
/// ```
pub struct RStarTree<T: Scalar, P, const D: usize> {
    pub(crate) params: RTreeParams,
    pub(crate) arena: Arena<T, P, D>,
    pub(crate) root: Option<NodeIdx>,
    /// Level of the root; leaf-level nodes are level 0.
    pub(crate) root_level: usize,
    pub(crate) len: usize,
}

impl<T: Scalar, P, const D: usize> RStarTree<T, P, D> {
    /// Create an empty tree with [`RTreeParams::default`].
    pub fn new() -> Self {
        Self::with_params(RTreeParams::default())
    }

    /// Create an empty tree with the given parameters.
    pub fn with_params(params: RTreeParams) -> Self {
        const { assert!(D > 0, "an R*-tree needs at least one dimension") };
        Self {
            params,
            arena: Arena::default(),
            root: None,
            root_level: 0,
            len: 0,
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree stores no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of axes of every box.
    pub const fn dimensions(&self) -> usize {
        D
    }

    /// Number of node levels; `0` before the first insertion or after [`clear`](Self::clear).
    pub fn height(&self) -> usize {
        self.root.map_or(0, |_| self.root_level + 1)
    }

    /// Parameters the tree was built with.
    pub fn params(&self) -> &RTreeParams {
        &self.params
    }

    /// Drop every entry and node.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.root_level = 0;
        self.len = 0;
    }

    /// Visit every entry accepted by `acceptor`, depth-first, and hand the visitor back.
    ///
    /// Subtrees whose bound the acceptor rejects are skipped. The traversal stops
    /// as soon as the visitor returns [`ControlFlow::Break`].
    pub fn query<A, V>(&self, acceptor: &A, mut visitor: V) -> V
    where
        A: Acceptor<T, P, D>,
        V: Visitor<T, P, D>,
    {
        if let Some(root) = self.root {
            let _ = self.walk(root, acceptor, &mut |entry| visitor.visit(entry));
        }
        visitor
    }

    /// Collect every entry accepted by `acceptor`.
    pub fn locate<A>(&self, acceptor: &A) -> Vec<&Entry<T, P, D>>
    where
        A: Acceptor<T, P, D>,
    {
        let mut out = Vec::new();
        if let Some(root) = self.root {
            let _ = self.walk(root, acceptor, &mut |entry| {
                out.push(entry);
                ControlFlow::Continue(())
            });
        }
        out
    }

    /// Iterate over every entry, depth-first.
    pub fn iter(&self) -> Iter<'_, T, P, D> {
        let mut stack = Vec::new();
        if let Some(root) = self.root {
            stack.push(self.arena[root].children.iter());
        }
        Iter {
            arena: &self.arena,
            stack,
            remaining: self.len,
        }
    }

    fn walk<'a, A, F>(&'a self, idx: NodeIdx, acceptor: &A, f: &mut F) -> ControlFlow<()>
    where
        A: Acceptor<T, P, D>,
        F: FnMut(&'a Entry<T, P, D>) -> ControlFlow<()>,
    {
        let node = &self.arena[idx];
        if !acceptor.accept_node(&node.bound) {
            return ControlFlow::Continue(());
        }
        for child in &node.children {
            match child {
                RChild::Entry(entry) => {
                    if acceptor.accept_entry(entry) {
                        f(entry)?;
                    }
                }
                RChild::Node(next) => self.walk(*next, acceptor, f)?,
            }
        }
        ControlFlow::Continue(())
    }
}

impl<T: Scalar, P, const D: usize> Default for RStarTree<T, P, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar, P, const D: usize> Debug for RStarTree<T, P, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RStarTree")
            .field("dimensions", &D)
            .field("min_children", &self.params.min_children())
            .field("max_children", &self.params.max_children())
            .field("len", &self.len)
            .field("height", &self.height())
            .field("arena_nodes", &self.arena.live())
            .finish_non_exhaustive()
    }
}

impl<'a, T: Scalar, P, const D: usize> IntoIterator for &'a RStarTree<T, P, D> {
    type Item = &'a Entry<T, P, D>;
    type IntoIter = Iter<'a, T, P, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Depth-first iterator over the entries of an [`RStarTree`].
pub struct Iter<'a, T, P, const D: usize> {
    arena: &'a Arena<T, P, D>,
    stack: Vec<core::slice::Iter<'a, RChild<T, P, D>>>,
    remaining: usize,
}

impl<'a, T, P, const D: usize> Iterator for Iter<'a, T, P, D> {
    type Item = &'a Entry<T, P, D>;

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        loop {
            let next = self.stack.last_mut()?.next();
            match next {
                Some(RChild::Entry(entry)) => {
                    self.remaining = self.remaining.saturating_sub(1);
                    return Some(entry);
                }
                Some(RChild::Node(idx)) => self.stack.push(arena[*idx].children.iter()),
                None => {
                    self.stack.pop();
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, P, const D: usize> ExactSizeIterator for Iter<'_, T, P, D> {}

impl<T, P, const D: usize> Debug for Iter<'_, T, P, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}

/// R*-tree with `i32` coordinates.
pub type RStarTreeI32<P, const D: usize> = RStarTree<i32, P, D>;

/// R*-tree with `i64` coordinates.
pub type RStarTreeI64<P, const D: usize> = RStarTree<i64, P, D>;

/// R*-tree with `f32` coordinates.
pub type RStarTreeF32<P, const D: usize> = RStarTree<f32, P, D>;

/// R*-tree with `f64` coordinates.
pub type RStarTreeF64<P, const D: usize> = RStarTree<f64, P, D>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundingBox;
    use crate::visit::{Accept, Count, VisitWith};
    use alloc::vec;

    fn bounds(x: i32, y: i32, w: i32, h: i32) -> BoundingBox<i32, 2> {
        BoundingBox::from_origin_extent([x, y], [w, h])
    }

    fn grid(n: i32) -> RStarTree<i32, i32, 2> {
        let mut tree = RStarTree::new();
        for y in 0..n {
            for x in 0..n {
                tree.insert(bounds(x * 10, y * 10, 5, 5), y * n + x);
            }
        }
        tree
    }

    #[test]
    fn empty_tree_queries_are_no_ops() {
        let tree: RStarTree<i32, u8, 2> = RStarTree::new();
        assert_eq!(tree.query(&Accept::Any, Count::default()).count, 0);
        assert!(tree.locate(&Accept::Any).is_empty());
        assert_eq!(tree.iter().count(), 0);
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.dimensions(), 2);
    }

    #[test]
    fn overlapping_query_visits_first_two_of_three() {
        let mut tree: RStarTree<i32, u8, 2> =
            RStarTree::with_params(RTreeParams::new(1, 2).unwrap());
        tree.insert(bounds(0, 0, 1, 1), 1);
        tree.insert(bounds(5, 5, 1, 1), 2);
        tree.insert(bounds(100, 100, 1, 1), 3);

        let mut seen = Vec::new();
        let visitor = tree.query(
            &Accept::Overlapping(bounds(0, 0, 10, 10)),
            VisitWith(|e: &Entry<i32, u8, 2>| {
                seen.push(*e.payload());
                ControlFlow::Continue(())
            }),
        );
        drop(visitor);
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn accept_any_visits_every_entry_once() {
        let tree = grid(12);
        assert_eq!(tree.len(), 144);
        let mut payloads: Vec<i32> = tree.iter().map(|e| *e.payload()).collect();
        payloads.sort_unstable();
        assert_eq!(payloads, (0..144).collect::<Vec<_>>());
        assert_eq!(tree.query(&Accept::Any, Count::default()).count, 144);
        assert_eq!(tree.iter().len(), 144);
    }

    #[test]
    fn repeated_queries_agree() {
        let tree = grid(10);
        let area = Accept::Enclosing(bounds(0, 0, 45, 45));
        let mut first: Vec<i32> = tree.locate(&area).iter().map(|e| *e.payload()).collect();
        let mut second: Vec<i32> = tree.locate(&area).iter().map(|e| *e.payload()).collect();
        first.sort_unstable();
        second.sort_unstable();
        assert_eq!(first.len(), 25);
        assert_eq!(first, second);
    }

    #[test]
    fn break_stops_traversal() {
        let tree = grid(8);
        let mut visited = 0;
        let _ = tree.query(
            &Accept::Any,
            VisitWith(|_: &Entry<i32, i32, 2>| {
                visited += 1;
                if visited == 5 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            }),
        );
        assert_eq!(visited, 5);
    }

    #[test]
    fn clear_resets_everything() {
        let mut tree = grid(5);
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.iter().count(), 0);
        tree.insert(bounds(0, 0, 1, 1), 7);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.height(), 1);
    }
}
