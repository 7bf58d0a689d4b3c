// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy R*-tree: an in-memory spatial index over `D`-dimensional boxes.
//!
//! - Insert axis-aligned boxes with user payloads, one at a time.
//! - Query with an [`Acceptor`] that prunes subtrees and selects entries, and a
//!   [`Visitor`] that observes matches and may stop the traversal early.
//! - Remove with an acceptor and a [`Remover`]; underfull nodes are dissolved
//!   and their entries re-inserted.
//!
//! Overflowing nodes are handled the R*-tree way: the first overflow met by an
//! insertion below the root evicts the children farthest from the node's
//! center and re-inserts them; every other overflow splits the node along the
//! axis with the smallest total margin, at the cut with the least overlap.
//!
//! The tree is generic over the coordinate type (`i32`, `i64`, `f32`, `f64`)
//! and the dimension count. All metrics are accumulated in `f64`.
//!
//! # Example
//!
//! ```rust
//! use canopy_rstar::{Accept, BoundingBox, Count, RStarTree, RTreeParams};
//!
//! let params = RTreeParams::new(2, 6)?;
//! let mut tree: RStarTree<i64, u32, 3> = RStarTree::with_params(params);
//! for i in 0..100 {
//!     tree.insert(BoundingBox::from_origin_extent([i, i, i], [2, 2, 2]), i as u32);
//! }
//!
//! let area = BoundingBox::new([0, 0, 0], [10, 10, 10]);
//! assert_eq!(tree.query(&Accept::Enclosing(area), Count::default()).count, 9);
//!
//! assert_eq!(tree.remove_bounded_area(&area), 9);
//! assert_eq!(tree.len(), 91);
//! assert!(tree.validate().is_ok());
//! # Ok::<(), canopy_rstar::ParamsError>(())
//! ```
//!
//! ### Float semantics
//!
//! Floating-point coordinates are assumed to be free of NaNs. Comparisons
//! involving NaN treat the values as equal and never panic.

#![no_std]

extern crate alloc;

mod insert;
mod node;
mod remove;
mod split;

pub mod params;
pub mod tree;
pub mod types;
pub mod validate;
pub mod visit;

pub use params::{ParamsError, RTreeParams, ReinsertOrder};
pub use tree::{Iter, RStarTree, RStarTreeF32, RStarTreeF64, RStarTreeI32, RStarTreeI64};
pub use types::{BoundingBox, Entry, Scalar};
pub use validate::{InvariantError, TreeStats};
pub use visit::{
    Accept, Acceptor, Count, RemoveAll, RemovePayload, RemoveWith, Remover, VisitWith, Visitor,
};
