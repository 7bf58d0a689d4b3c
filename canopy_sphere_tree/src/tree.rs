// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Complete k-ary trees stored row by row in a flat array.

use alloc::vec::Vec;
use core::ops::Range;

use glam::DVec3;

use crate::sphere::Sphere;

/// Errors reported while shaping a [`KTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SphereTreeError {
    /// Every node needs at least one child slot.
    #[error("tree degree must be at least 1")]
    ZeroDegree,
    /// A tree has at least its root level.
    #[error("tree must have at least 1 level")]
    ZeroLevels,
    /// The slot count does not fit in `usize`.
    #[error("a tree of degree {degree} with {levels} levels is too large")]
    TooLarge {
        /// Requested degree.
        degree: usize,
        /// Requested level count.
        levels: usize,
    },
}

/// A complete tree of fixed degree whose nodes live in one array.
///
/// The root is slot `0`; the children of slot `i` are the `degree` slots
/// starting at `i * degree + 1`. Level `l` occupies the contiguous range
/// returned by [`row`](Self::row).
///
/// ```
/// use canopy_sphere_tree::KTree;
///
/// let tree: KTree<u8> = KTree::new(3, 3)?;
/// assert_eq!(tree.len(), 1 + 3 + 9);
/// assert_eq!(tree.children(0), 1..4);
/// assert_eq!(tree.parent(5), Some(1));
/// assert_eq!(tree.row(2), 4..13);
/// # Ok::<(), canopy_sphere_tree::SphereTreeError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct KTree<T> {
    degree: usize,
    levels: usize,
    nodes: Vec<T>,
}

impl<T: Default> KTree<T> {
    /// Create a tree with every slot set to `T::default()`.
    pub fn new(degree: usize, levels: usize) -> Result<Self, SphereTreeError> {
        let mut tree = Self {
            degree: 1,
            levels: 0,
            nodes: Vec::new(),
        };
        tree.setup(degree, levels)?;
        Ok(tree)
    }

    /// Reshape the tree and reset every slot.
    pub fn setup(&mut self, degree: usize, levels: usize) -> Result<(), SphereTreeError> {
        let total = checked_node_count(degree, levels)?;
        self.degree = degree;
        self.levels = levels;
        self.nodes.clear();
        self.nodes.resize_with(total, T::default);
        Ok(())
    }

    /// Change the level count, keeping existing slots. New slots are `T::default()`.
    ///
    /// Fewer levels than before drops the deepest rows.
    pub fn grow(&mut self, levels: usize) -> Result<(), SphereTreeError> {
        let total = checked_node_count(self.degree, levels)?;
        self.nodes.resize_with(total, T::default);
        self.levels = levels;
        Ok(())
    }
}

impl<T> KTree<T> {
    /// Number of slots in a tree of `degree` with `levels` levels: `sum(degree^l for l < levels)`.
    ///
    /// Saturates at `usize::MAX`.
    pub fn node_count(degree: usize, levels: usize) -> usize {
        count(degree, levels).unwrap_or(usize::MAX)
    }

    /// Children per node.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Number of levels, the root included.
    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no slots.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All slots, row by row.
    pub fn nodes(&self) -> &[T] {
        &self.nodes
    }

    /// All slots, mutably.
    pub fn nodes_mut(&mut self) -> &mut [T] {
        &mut self.nodes
    }

    /// Slot `i`.
    pub fn get(&self, i: usize) -> Option<&T> {
        self.nodes.get(i)
    }

    /// Slot `i`, mutably.
    pub fn get_mut(&mut self, i: usize) -> Option<&mut T> {
        self.nodes.get_mut(i)
    }

    /// Parent of slot `i`; `None` for the root.
    pub fn parent(&self, i: usize) -> Option<usize> {
        (i > 0).then(|| (i - 1) / self.degree)
    }

    /// First child slot of `i`, whether or not it exists.
    pub fn first_child(&self, i: usize) -> usize {
        i * self.degree + 1
    }

    /// Child slots of `i`; empty for slots on the deepest row.
    pub fn children(&self, i: usize) -> Range<usize> {
        let first = self.first_child(i);
        if first >= self.nodes.len() {
            return first..first;
        }
        first..first + self.degree
    }

    /// Slots of level `level`; the root is level `0`.
    pub fn row(&self, level: usize) -> Range<usize> {
        let mut start = 0_usize;
        let mut width = 1_usize;
        for _ in 0..level {
            start = start.saturating_add(width);
            width = width.saturating_mul(self.degree);
        }
        start..start.saturating_add(width)
    }

    /// Level of slot `i`, or `None` when the slot does not exist.
    pub fn level_of(&self, i: usize) -> Option<usize> {
        if i >= self.nodes.len() {
            return None;
        }
        (0..self.levels).find(|&level| self.row(level).contains(&i))
    }
}

fn count(degree: usize, levels: usize) -> Option<usize> {
    let mut total = 0_usize;
    let mut width = 1_usize;
    for level in 0..levels {
        total = total.checked_add(width)?;
        if level + 1 < levels {
            width = width.checked_mul(degree)?;
        }
    }
    Some(total)
}

fn checked_node_count(degree: usize, levels: usize) -> Result<usize, SphereTreeError> {
    if degree == 0 {
        return Err(SphereTreeError::ZeroDegree);
    }
    if levels == 0 {
        return Err(SphereTreeError::ZeroLevels);
    }
    count(degree, levels).ok_or(SphereTreeError::TooLarge { degree, levels })
}

/// One slot of a [`SphereTree`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TreeSphere {
    /// Bounding sphere of the slot; [`Sphere::INVALID`] when unused.
    pub sphere: Sphere,
    /// Alternative sphere kept alongside the main one.
    pub aux: Option<Sphere>,
    /// Error reduction achieved by refining this slot, once measured.
    pub error_decrease: Option<f64>,
    /// Fraction of the sphere covered by the approximated object.
    pub occupancy: f64,
}

impl Default for TreeSphere {
    fn default() -> Self {
        Self {
            sphere: Sphere::INVALID,
            aux: None,
            error_decrease: None,
            occupancy: 1.0,
        }
    }
}

/// Sphere hierarchy: each slot bounds the spheres of its children.
///
/// ```
/// use canopy_sphere_tree::{Sphere, SphereTree};
/// use glam::DVec3;
///
/// let mut tree = SphereTree::new(8, 3)?;
/// tree.get_mut(0).unwrap().sphere = Sphere::new(DVec3::ZERO, 10.0);
/// for i in tree.children(0).take(2) {
///     tree.get_mut(i).unwrap().sphere = Sphere::new(DVec3::new(i as f64, 0.0, 0.0), 1.0);
/// }
/// assert_eq!(tree.level(1).len(), 2);
/// assert!(tree.level(2).is_empty());
/// # Ok::<(), canopy_sphere_tree::SphereTreeError>(())
/// ```
pub type SphereTree = KTree<TreeSphere>;

impl KTree<TreeSphere> {
    /// Valid spheres on row `level`, in slot order.
    pub fn level(&self, level: usize) -> Vec<Sphere> {
        if level >= self.levels {
            return Vec::new();
        }
        let row = self.row(level);
        let end = row.end.min(self.nodes.len());
        self.nodes[row.start.min(end)..end]
            .iter()
            .map(|slot| slot.sphere)
            .filter(Sphere::is_valid)
            .collect()
    }
}

/// Sphere centered on the centroid of the valid `spheres` and enclosing all of them.
///
/// Returns `None` when no sphere is valid.
///
/// ```
/// use canopy_sphere_tree::{Sphere, bounding_sphere};
/// use glam::DVec3;
///
/// let parts = [
///     Sphere::new(DVec3::new(-2.0, 0.0, 0.0), 1.0),
///     Sphere::new(DVec3::new(2.0, 0.0, 0.0), 1.0),
///     Sphere::INVALID,
/// ];
/// let bound = bounding_sphere(&parts).unwrap();
/// assert_eq!(bound.center, DVec3::ZERO);
/// assert_eq!(bound.radius, 3.0);
/// ```
pub fn bounding_sphere(spheres: &[Sphere]) -> Option<Sphere> {
    let mut sum = DVec3::ZERO;
    let mut valid = 0_u32;
    for s in spheres.iter().filter(|s| s.is_valid()) {
        sum += s.center;
        valid += 1;
    }
    if valid == 0 {
        return None;
    }
    let center = sum / f64::from(valid);
    let radius = spheres
        .iter()
        .filter(|s| s.is_valid())
        .map(|s| center.distance(s.center) + s.radius)
        .fold(0.0, f64::max);
    Some(Sphere::new(center, radius))
}
