// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types: the scalar abstraction, D-dimensional boxes, and entries.

use core::cmp::Ordering;
use core::fmt::{self, Debug, Display};

/// Numeric scalar abstraction for box coordinates.
///
/// Metrics (area, margin, overlap, center distances) are always accumulated in
/// `f64`, so integer coordinates never overflow while ranking split candidates,
/// whatever the dimension count.
pub trait Scalar: Copy + PartialOrd + Debug {
    /// Largest representable value. Lower edge of a reset box.
    const UPPER: Self;

    /// Smallest representable value. Upper edge of a reset box.
    const LOWER: Self;

    /// Add two scalar values (saturating for integers).
    fn add(a: Self, b: Self) -> Self;

    /// Convert a scalar to the metric accumulator.
    fn widen(v: Self) -> f64;
}

impl Scalar for i32 {
    const UPPER: Self = Self::MAX;
    const LOWER: Self = Self::MIN;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a.saturating_add(b)
    }

    #[inline]
    fn widen(v: Self) -> f64 {
        f64::from(v)
    }
}

impl Scalar for i64 {
    const UPPER: Self = Self::MAX;
    const LOWER: Self = Self::MIN;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a.saturating_add(b)
    }

    #[inline]
    #[allow(
        clippy::cast_precision_loss,
        reason = "Metrics are ranking keys; precision loss above 2^53 is acceptable."
    )]
    fn widen(v: Self) -> f64 {
        v as f64
    }
}

impl Scalar for f32 {
    const UPPER: Self = Self::INFINITY;
    const LOWER: Self = Self::NEG_INFINITY;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a + b
    }

    #[inline]
    fn widen(v: Self) -> f64 {
        f64::from(v)
    }
}

impl Scalar for f64 {
    const UPPER: Self = Self::INFINITY;
    const LOWER: Self = Self::NEG_INFINITY;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a + b
    }

    #[inline]
    fn widen(v: Self) -> f64 {
        v
    }
}

/// Axis-aligned bounding box over `D` axes.
///
/// A box is valid while `min[axis] <= max[axis]` on every axis. The reset state
/// produced by [`BoundingBox::empty`] has `min = UPPER` and `max = LOWER` on every
/// axis and is the identity element of [`BoundingBox::stretch`].
///
/// ```
/// use canopy_rstar::BoundingBox;
///
/// let a = BoundingBox::new([0, 0], [10, 10]);
/// let b = BoundingBox::from_origin_extent([5, 5], [10, 10]);
/// assert!(a.overlaps(&b));
/// assert_eq!(a.overlap(&b), 25.0);
/// assert!(a.union(&b).encloses(&b));
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox<T, const D: usize> {
    /// Lower edge per axis.
    pub min: [T; D],
    /// Upper edge per axis.
    pub max: [T; D],
}

impl<T, const D: usize> BoundingBox<T, D> {
    /// Create a box from its lower and upper corners.
    pub const fn new(min: [T; D], max: [T; D]) -> Self {
        Self { min, max }
    }
}

impl<T: Scalar, const D: usize> BoundingBox<T, D> {
    /// The reset box: identity for [`stretch`](Self::stretch) and [`union`](Self::union).
    pub const fn empty() -> Self {
        Self {
            min: [T::UPPER; D],
            max: [T::LOWER; D],
        }
    }

    /// Create a box from an origin corner and a per-axis extent.
    pub fn from_origin_extent(origin: [T; D], extent: [T; D]) -> Self {
        let mut max = origin;
        for (hi, ext) in max.iter_mut().zip(extent) {
            *hi = T::add(*hi, ext);
        }
        Self { min: origin, max }
    }

    /// Put the box back into the reset state.
    pub fn reset(&mut self) {
        *self = Self::empty();
    }

    /// Whether the box has any inverted axis (the reset state included).
    pub fn is_reset(&self) -> bool {
        self.min.iter().zip(&self.max).any(|(lo, hi)| lt(*hi, *lo))
    }

    /// Grow the box in place to cover `other`. Returns whether any edge moved.
    pub fn stretch(&mut self, other: &Self) -> bool {
        let mut grew = false;
        for axis in 0..D {
            if lt(other.min[axis], self.min[axis]) {
                self.min[axis] = other.min[axis];
                grew = true;
            }
            if lt(self.max[axis], other.max[axis]) {
                self.max[axis] = other.max[axis];
                grew = true;
            }
        }
        grew
    }

    /// The smallest box covering both `self` and `other`.
    pub fn union(&self, other: &Self) -> Self {
        let mut out = *self;
        out.stretch(other);
        out
    }

    /// Product of the per-axis extents.
    ///
    /// Degenerate or inverted axes make the product zero or negative; callers
    /// only compare areas, so such values are passed through unchanged.
    pub fn area(&self) -> f64 {
        self.min
            .iter()
            .zip(&self.max)
            .fold(1.0, |acc, (lo, hi)| acc * (T::widen(*hi) - T::widen(*lo)))
    }

    /// Sum of the per-axis extents ("edge deltas"), a linear proxy for the perimeter.
    pub fn margin(&self) -> f64 {
        self.min
            .iter()
            .zip(&self.max)
            .map(|(lo, hi)| T::widen(*hi) - T::widen(*lo))
            .sum()
    }

    /// Whether `other` lies inside this box (edges may touch).
    pub fn encloses(&self, other: &Self) -> bool {
        (0..D).all(|axis| {
            !lt(other.min[axis], self.min[axis]) && !lt(self.max[axis], other.max[axis])
        })
    }

    /// Whether the interiors of the two boxes intersect on every axis.
    pub fn overlaps(&self, other: &Self) -> bool {
        (0..D).all(|axis| lt(self.min[axis], other.max[axis]) && lt(other.min[axis], self.max[axis]))
    }

    /// Whether the two boxes share at least one point; touching edges count.
    pub fn intersects(&self, other: &Self) -> bool {
        (0..D).all(|axis| {
            !lt(other.max[axis], self.min[axis]) && !lt(self.max[axis], other.min[axis])
        })
    }

    /// Volume of the intersection of the two boxes, `0.0` when they are disjoint.
    pub fn overlap(&self, other: &Self) -> f64 {
        let mut volume = 1.0;
        for axis in 0..D {
            let lo = max_t(self.min[axis], other.min[axis]);
            let hi = min_t(self.max[axis], other.max[axis]);
            if !lt(lo, hi) {
                return 0.0;
            }
            volume *= T::widen(hi) - T::widen(lo);
        }
        volume
    }

    /// Midpoint of the box along `axis`.
    pub fn center(&self, axis: usize) -> f64 {
        0.5 * (T::widen(self.min[axis]) + T::widen(self.max[axis]))
    }

    /// Reinsertion ranking key relative to `other`.
    ///
    /// Sums `((a1 + a2 + b1 + b2) / 2)^2` over the axes. This is not a distance
    /// between the two centers; see [`center_distance`](Self::center_distance) for that.
    pub fn distance_from_center(&self, other: &Self) -> f64 {
        (0..D)
            .map(|axis| {
                let t = (T::widen(self.min[axis])
                    + T::widen(self.max[axis])
                    + T::widen(other.min[axis])
                    + T::widen(other.max[axis]))
                    / 2.0;
                t * t
            })
            .sum()
    }

    /// Squared Euclidean distance between the centers of the two boxes.
    pub fn center_distance(&self, other: &Self) -> f64 {
        (0..D)
            .map(|axis| {
                let d = self.center(axis) - other.center(axis);
                d * d
            })
            .sum()
    }
}

impl<T: Scalar, const D: usize> Default for BoundingBox<T, D> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Display, const D: usize> Display for BoundingBox<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for axis in 0..D {
            if axis > 0 {
                f.write_str(",")?;
            }
            write!(f, "({},{})", self.min[axis], self.max[axis])?;
        }
        f.write_str("]")
    }
}

/// A stored item: a bounding box and the caller's payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry<T, P, const D: usize> {
    pub(crate) bound: BoundingBox<T, D>,
    pub(crate) payload: P,
}

impl<T, P, const D: usize> Entry<T, P, D> {
    /// The entry's bounding box.
    pub const fn bound(&self) -> &BoundingBox<T, D> {
        &self.bound
    }

    /// The payload supplied at insertion.
    pub const fn payload(&self) -> &P {
        &self.payload
    }
}

pub(crate) fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

pub(crate) fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}

pub(crate) fn lt<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o == Ordering::Less)
        .unwrap_or(false)
}

/// Total order on `f64` metrics; NaN sorts as equal.
pub(crate) fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
