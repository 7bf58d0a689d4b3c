// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Traversal strategies: acceptors prune, visitors observe, removers delete.
//!
//! A query or removal walks the tree depth-first. At every node the
//! [`Acceptor`] decides whether the subtree is worth descending into, and at
//! every entry it decides whether the entry matches. Matching entries are then
//! handed to a [`Visitor`] (queries) or a [`Remover`] (removals).

use core::ops::ControlFlow;

use crate::types::{BoundingBox, Entry, Scalar};

/// Predicate over node bounds and entries that drives a traversal.
pub trait Acceptor<T: Scalar, P, const D: usize> {
    /// Whether the subtree with this bound may contain matching entries.
    fn accept_node(&self, bound: &BoundingBox<T, D>) -> bool;

    /// Whether the entry matches.
    fn accept_entry(&self, entry: &Entry<T, P, D>) -> bool;
}

/// The stock acceptors.
///
/// ```
/// use canopy_rstar::{Accept, BoundingBox, Count, RStarTree};
///
/// let mut tree: RStarTree<i32, u32, 2> = RStarTree::new();
/// tree.insert(BoundingBox::from_origin_extent([0, 0], [1, 1]), 1);
/// tree.insert(BoundingBox::from_origin_extent([5, 5], [1, 1]), 2);
///
/// let area = BoundingBox::new([0, 0], [3, 3]);
/// assert_eq!(tree.query(&Accept::Overlapping(area), Count::default()).count, 1);
/// assert_eq!(tree.query(&Accept::Any, Count::default()).count, 2);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Accept<T, const D: usize> {
    /// Every node and every entry.
    Any,
    /// Nodes and entries whose bound overlaps the given box.
    Overlapping(BoundingBox<T, D>),
    /// Entries the given box fully encloses.
    ///
    /// Nodes are pruned unless they touch the box, so degenerate entries lying
    /// on its boundary are still found.
    Enclosing(BoundingBox<T, D>),
}

impl<T: Scalar, P, const D: usize> Acceptor<T, P, D> for Accept<T, D> {
    fn accept_node(&self, bound: &BoundingBox<T, D>) -> bool {
        match self {
            Self::Any => true,
            Self::Overlapping(area) => area.overlaps(bound),
            Self::Enclosing(area) => area.intersects(bound),
        }
    }

    fn accept_entry(&self, entry: &Entry<T, P, D>) -> bool {
        match self {
            Self::Any => true,
            Self::Overlapping(area) => area.overlaps(&entry.bound),
            Self::Enclosing(area) => area.encloses(&entry.bound),
        }
    }
}

/// Callback invoked once per accepted entry during a query.
///
/// Returning [`ControlFlow::Break`] stops the traversal immediately.
pub trait Visitor<T, P, const D: usize> {
    /// Observe one accepted entry.
    fn visit(&mut self, entry: &Entry<T, P, D>) -> ControlFlow<()>;
}

/// Visitor counting the accepted entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Count {
    /// Entries visited so far.
    pub count: usize,
}

impl<T, P, const D: usize> Visitor<T, P, D> for Count {
    fn visit(&mut self, _entry: &Entry<T, P, D>) -> ControlFlow<()> {
        self.count += 1;
        ControlFlow::Continue(())
    }
}

/// Visitor adapter for a closure.
///
/// ```
/// use core::ops::ControlFlow;
/// use canopy_rstar::{Accept, BoundingBox, RStarTree, VisitWith};
///
/// let mut tree: RStarTree<i32, u32, 2> = RStarTree::new();
/// for i in 0..10 {
///     tree.insert(BoundingBox::from_origin_extent([i, i], [1, 1]), i as u32);
/// }
///
/// // Stop after the first three entries.
/// let mut seen = Vec::new();
/// tree.query(&Accept::Any, VisitWith(|e: &canopy_rstar::Entry<i32, u32, 2>| {
///     seen.push(*e.payload());
///     if seen.len() == 3 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
/// }));
/// assert_eq!(seen.len(), 3);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct VisitWith<F>(pub F);

impl<T, P, const D: usize, F> Visitor<T, P, D> for VisitWith<F>
where
    F: FnMut(&Entry<T, P, D>) -> ControlFlow<()>,
{
    fn visit(&mut self, entry: &Entry<T, P, D>) -> ControlFlow<()> {
        (self.0)(entry)
    }
}

/// Decides, per accepted entry, whether a removal traversal deletes it.
pub trait Remover<T, P, const D: usize> {
    /// Whether to delete this entry.
    fn remove(&mut self, entry: &Entry<T, P, D>) -> bool;

    /// Whether the remover will reject every further entry, letting the
    /// traversal skip the rest of the tree.
    fn is_done(&self) -> bool {
        false
    }
}

/// Remover deleting every accepted entry.
#[derive(Clone, Copy, Debug, Default)]
pub struct RemoveAll;

impl<T, P, const D: usize> Remover<T, P, D> for RemoveAll {
    fn remove(&mut self, _entry: &Entry<T, P, D>) -> bool {
        true
    }
}

/// Remover deleting entries whose payload equals a given value.
///
/// Without `remove_duplicates` it stops after the first match, so at most one
/// entry is removed even when equal payloads are stored several times.
#[derive(Clone, Copy, Debug)]
pub struct RemovePayload<'a, P> {
    payload: &'a P,
    remove_duplicates: bool,
    done: bool,
}

impl<'a, P> RemovePayload<'a, P> {
    /// Match `payload`; remove every copy when `remove_duplicates` is set.
    pub const fn new(payload: &'a P, remove_duplicates: bool) -> Self {
        Self {
            payload,
            remove_duplicates,
            done: false,
        }
    }
}

impl<T, P: PartialEq, const D: usize> Remover<T, P, D> for RemovePayload<'_, P> {
    fn remove(&mut self, entry: &Entry<T, P, D>) -> bool {
        if self.done || entry.payload != *self.payload {
            return false;
        }
        if !self.remove_duplicates {
            self.done = true;
        }
        true
    }

    fn is_done(&self) -> bool {
        self.done
    }
}

/// Remover adapter for a closure.
#[derive(Clone, Copy, Debug)]
pub struct RemoveWith<F>(pub F);

impl<T, P, const D: usize, F> Remover<T, P, D> for RemoveWith<F>
where
    F: FnMut(&Entry<T, P, D>) -> bool,
{
    fn remove(&mut self, entry: &Entry<T, P, D>) -> bool {
        (self.0)(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(x: i32, payload: u8) -> Entry<i32, u8, 2> {
        Entry {
            bound: BoundingBox::from_origin_extent([x, x], [1, 1]),
            payload,
        }
    }

    #[test]
    fn accept_variants() {
        let area = BoundingBox::new([0, 0], [10, 10]);
        let inside = entry(2, 0);
        let straddling = entry(9, 0);
        let outside = entry(20, 0);

        let any = Accept::Any;
        assert!(Acceptor::<i32, u8, 2>::accept_node(&any, &outside.bound));
        assert!(any.accept_entry(&outside));

        let overlapping = Accept::Overlapping(area);
        assert!(overlapping.accept_entry(&inside));
        assert!(overlapping.accept_entry(&straddling));
        assert!(!overlapping.accept_entry(&outside));

        let enclosing = Accept::Enclosing(area);
        assert!(Acceptor::<i32, u8, 2>::accept_node(&enclosing, &straddling.bound));
        assert!(enclosing.accept_entry(&inside));
        assert!(!enclosing.accept_entry(&straddling));
    }

    #[test]
    fn remove_payload_stops_after_first_match() {
        let target = 7_u8;
        let mut once = RemovePayload::new(&target, false);
        assert!(!once.remove(&entry(0, 1)));
        assert!(!Remover::<i32, u8, 2>::is_done(&once));
        assert!(once.remove(&entry(0, 7)));
        assert!(Remover::<i32, u8, 2>::is_done(&once));
        assert!(!once.remove(&entry(1, 7)));

        let mut all = RemovePayload::new(&target, true);
        assert!(all.remove(&entry(0, 7)));
        assert!(all.remove(&entry(1, 7)));
        assert!(!Remover::<i32, u8, 2>::is_done(&all));
    }

    #[test]
    fn count_visitor() {
        let mut count = Count::default();
        let _ = count.visit(&entry(0, 0));
        let _ = count.visit(&entry(1, 0));
        assert_eq!(count.count, 2);
    }
}
