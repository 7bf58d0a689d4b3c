// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Removal with post-order condensation of underfull nodes.

use alloc::vec::Vec;

use log::debug;

use crate::insert::PassMode;
use crate::node::{NodeIdx, RChild};
use crate::tree::RStarTree;
use crate::types::{BoundingBox, Entry, Scalar};
use crate::visit::{Accept, Acceptor, RemoveAll, RemovePayload, Remover};

impl<T: Scalar, P, const D: usize> RStarTree<T, P, D> {
    /// Delete every entry accepted by `acceptor` that `remover` agrees to remove.
    ///
    /// Nodes left with fewer than `m` children are dissolved and their entries
    /// re-inserted, so the fan-out and depth invariants hold when this returns.
    /// Returns the number of entries removed; removing nothing is not an error.
    pub fn remove<A, R>(&mut self, acceptor: &A, mut remover: R) -> usize
    where
        A: Acceptor<T, P, D>,
        R: Remover<T, P, D>,
    {
        let Some(root) = self.root else {
            return 0;
        };
        let mut orphans = Vec::new();
        let removed = self.remove_in(root, acceptor, &mut remover, &mut orphans);
        if removed == 0 {
            return 0;
        }
        self.len -= removed;

        if self.arena[root].children.is_empty() {
            // The root survives as an empty leaf.
            let node = &mut self.arena[root];
            node.leaf = true;
            node.bound.reset();
            self.root_level = 0;
        }
        self.collapse_root();

        if !orphans.is_empty() {
            debug!("reinserting {} entries from dissolved nodes", orphans.len());
        }
        for entry in orphans {
            self.insert_child(RChild::Entry(entry), 0, PassMode::FirstPass);
        }
        debug!("removed {removed} entries; {} remain", self.len);
        removed
    }

    /// Delete every entry whose box lies inside `area`.
    ///
    /// ```
    /// use canopy_rstar::{BoundingBox, RStarTree};
    ///
    /// let mut tree: RStarTree<i32, u32, 2> = RStarTree::new();
    /// for i in 0..20 {
    ///     tree.insert(BoundingBox::from_origin_extent([i * 10, 0], [5, 5]), i as u32);
    /// }
    /// let removed = tree.remove_bounded_area(&BoundingBox::new([0, 0], [45, 5]));
    /// assert_eq!(removed, 5);
    /// assert_eq!(tree.len(), 15);
    /// ```
    pub fn remove_bounded_area(&mut self, area: &BoundingBox<T, D>) -> usize {
        self.remove(&Accept::Enclosing(*area), RemoveAll)
    }

    /// Delete the entry carrying `payload`, or every such entry when `remove_duplicates` is set.
    pub fn remove_item(&mut self, payload: &P, remove_duplicates: bool) -> usize
    where
        P: PartialEq,
    {
        self.remove(&Accept::Any, RemovePayload::new(payload, remove_duplicates))
    }

    fn remove_in<A, R>(
        &mut self,
        idx: NodeIdx,
        acceptor: &A,
        remover: &mut R,
        orphans: &mut Vec<Entry<T, P, D>>,
    ) -> usize
    where
        A: Acceptor<T, P, D>,
        R: Remover<T, P, D>,
    {
        if !acceptor.accept_node(&self.arena[idx].bound) {
            return 0;
        }
        let mut removed = 0;

        if self.arena[idx].leaf {
            let children = core::mem::take(&mut self.arena[idx].children);
            let mut kept = Vec::with_capacity(children.len());
            for child in children {
                if let RChild::Entry(entry) = &child
                    && !remover.is_done()
                    && acceptor.accept_entry(entry)
                    && remover.remove(entry)
                {
                    removed += 1;
                    continue;
                }
                kept.push(child);
            }
            self.arena[idx].children = kept;
        } else {
            let min = self.params.min_children();
            let mut i = 0;
            while i < self.arena[idx].children.len() && !remover.is_done() {
                let child = match &self.arena[idx].children[i] {
                    RChild::Node(child) => *child,
                    RChild::Entry(_) => unreachable!("internal nodes only hold nodes"),
                };
                let n = self.remove_in(child, acceptor, remover, orphans);
                removed += n;
                if n > 0 {
                    let left = self.arena[child].children.len();
                    if left < min {
                        // An empty child flattens to nothing.
                        self.flatten_into(child, orphans);
                        self.arena[idx].children.remove(i);
                        continue;
                    }
                }
                i += 1;
            }
        }

        if removed > 0 {
            self.arena.refit(idx);
        }
        removed
    }

    /// Move every entry below `idx` into `out` and release the subtree's nodes.
    fn flatten_into(&mut self, idx: NodeIdx, out: &mut Vec<Entry<T, P, D>>) {
        let children = core::mem::take(&mut self.arena[idx].children);
        for child in children {
            match child {
                RChild::Entry(entry) => out.push(entry),
                RChild::Node(next) => self.flatten_into(next, out),
            }
        }
        self.arena.release(idx);
    }

    /// Replace an internal root holding a single child by that child, repeatedly.
    fn collapse_root(&mut self) {
        while let Some(root) = self.root {
            let node = &self.arena[root];
            if node.leaf || node.children.len() != 1 {
                break;
            }
            let child = match &node.children[0] {
                RChild::Node(child) => *child,
                RChild::Entry(_) => unreachable!("internal nodes only hold nodes"),
            };
            self.arena[root].children.clear();
            self.arena.release(root);
            self.root = Some(child);
            self.root_level -= 1;
            debug!("collapsed root; height is now {}", self.root_level + 1);
        }
    }
}
