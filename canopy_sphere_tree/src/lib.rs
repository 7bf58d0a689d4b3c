// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Sphere Tree: a fixed-shape hierarchy of bounding spheres.
//!
//! A [`SphereTree`] is a complete k-ary tree stored row by row in one array,
//! so parents and children are found by index arithmetic alone. Each slot holds
//! a [`Sphere`] approximating part of an object; deeper rows give tighter
//! approximations, which suits level-of-detail selection and coarse collision
//! tests. Unused slots carry [`Sphere::INVALID`].
//!
//! The tree does not build its spheres; callers fill the rows and use
//! [`bounding_sphere`] to derive a parent from its children.
//!
//! ```rust
//! use canopy_sphere_tree::{Sphere, SphereTree, bounding_sphere};
//! use glam::DVec3;
//!
//! let mut tree = SphereTree::new(2, 2)?;
//! for (n, i) in tree.children(0).enumerate() {
//!     tree.get_mut(i).unwrap().sphere = Sphere::new(DVec3::new(n as f64 * 4.0, 0.0, 0.0), 1.0);
//! }
//! let root = bounding_sphere(&tree.level(1)).unwrap();
//! tree.get_mut(0).unwrap().sphere = root;
//! assert_eq!(root.radius, 3.0);
//! # Ok::<(), canopy_sphere_tree::SphereTreeError>(())
//! ```
//!
//! This crate is `no_std` and uses `alloc`. Enable either the `std` (default)
//! or the `libm` feature.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("canopy_sphere_tree requires either the `std` or `libm` feature");

pub mod sphere;
pub mod tree;

pub use sphere::{EPSILON, Sphere};
pub use tree::{KTree, SphereTree, SphereTreeError, TreeSphere, bounding_sphere};
