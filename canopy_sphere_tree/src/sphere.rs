// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounding spheres in three dimensions.

use core::f64::consts::PI;

use glam::DVec3;

/// Default tolerance for the containment and overlap tests.
pub const EPSILON: f64 = 1e-6;

/// A sphere given by its center and radius.
///
/// A sphere with a non-positive radius marks an unused slot in a
/// [`SphereTree`](crate::SphereTree); see [`Sphere::INVALID`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sphere {
    /// Center point.
    pub center: DVec3,
    /// Radius; non-positive for an unused slot.
    pub radius: f64,
}

impl Sphere {
    /// Degenerate sphere at the origin.
    pub const ZERO: Self = Self::new(DVec3::ZERO, 0.0);

    /// Unit sphere at the origin.
    pub const UNIT: Self = Self::new(DVec3::ZERO, 1.0);

    /// Marker for an unused slot.
    pub const INVALID: Self = Self::new(DVec3::ZERO, -1.0);

    /// Create a sphere.
    pub const fn new(center: DVec3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Whether the sphere holds a positive radius.
    pub fn is_valid(&self) -> bool {
        self.radius > 0.0
    }

    /// Whether `point` lies inside the sphere, allowing `tol` slack on the squared radius.
    pub fn contains_point(&self, point: DVec3, tol: f64) -> bool {
        point.distance_squared(self.center) <= self.radius * self.radius + tol
    }

    /// Whether the two spheres touch or intersect, allowing `tol` slack.
    pub fn overlaps(&self, other: &Self, tol: f64) -> bool {
        let reach = self.radius + other.radius;
        self.center.distance_squared(other.center) <= reach * reach + tol
    }

    /// Enclosed volume.
    pub fn volume(&self) -> f64 {
        4.0 / 3.0 * PI * self.radius * self.radius * self.radius
    }

    /// Volume of the lens shared by the two spheres.
    pub fn overlap_volume(&self, other: &Self) -> f64 {
        let (r1, r2) = (self.radius, other.radius);
        let d = self.center.distance(other.center);
        if d >= r1 + r2 {
            return 0.0;
        }
        let spread = r1 - r2;
        if d <= spread.max(-spread) {
            let r = r1.min(r2);
            return Self::new(DVec3::ZERO, r).volume();
        }
        let gap = r1 + r2 - d;
        PI * gap * gap * (d * d + 2.0 * d * (r1 + r2) - 3.0 * spread * spread) / (12.0 * d)
    }

    /// Parameters `t0 <= t1` at which the ray `origin + t * dir` crosses the sphere.
    ///
    /// Either value may be negative when the sphere lies partly or wholly
    /// behind the origin. Returns `None` when the ray misses or `dir` is zero.
    pub fn intersect_ray(&self, origin: DVec3, dir: DVec3) -> Option<(f64, f64)> {
        let a = dir.length_squared();
        if a == 0.0 {
            return None;
        }
        let offset = origin - self.center;
        let b = 2.0 * dir.dot(offset);
        let c = offset.length_squared() - self.radius * self.radius;
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
            return None;
        }
        let root = sqrt(disc);
        Some(((-b - root) / (2.0 * a), (-b + root) / (2.0 * a)))
    }

    /// Whether the sphere intersects the box spanned by `min` and `max` (`min <= max` per axis).
    pub fn intersects_aabb(&self, min: DVec3, max: DVec3) -> bool {
        let nearest = self.center.clamp(min, max);
        nearest.distance_squared(self.center) <= self.radius * self.radius
    }
}

impl Default for Sphere {
    fn default() -> Self {
        Self::INVALID
    }
}

#[cfg(feature = "std")]
fn sqrt(x: f64) -> f64 {
    x.sqrt()
}

#[cfg(all(not(feature = "std"), feature = "libm"))]
fn sqrt(x: f64) -> f64 {
    libm::sqrt(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn validity_follows_radius() {
        assert!(Sphere::UNIT.is_valid());
        assert!(!Sphere::ZERO.is_valid());
        assert!(!Sphere::INVALID.is_valid());
        assert_eq!(Sphere::default(), Sphere::INVALID);
    }

    #[test]
    fn containment_and_overlap() {
        let s = Sphere::new(DVec3::new(1.0, 0.0, 0.0), 2.0);
        assert!(s.contains_point(DVec3::new(3.0, 0.0, 0.0), EPSILON));
        assert!(!s.contains_point(DVec3::new(3.1, 0.0, 0.0), EPSILON));

        let touching = Sphere::new(DVec3::new(4.0, 0.0, 0.0), 1.0);
        assert!(s.overlaps(&touching, EPSILON));
        let apart = Sphere::new(DVec3::new(4.5, 0.0, 0.0), 1.0);
        assert!(!s.overlaps(&apart, EPSILON));
    }

    #[test]
    fn lens_volume() {
        let a = Sphere::UNIT;
        assert!(close(a.overlap_volume(&a), a.volume()));

        let far = Sphere::new(DVec3::new(3.0, 0.0, 0.0), 1.0);
        assert_eq!(a.overlap_volume(&far), 0.0);

        let inner = Sphere::new(DVec3::new(0.2, 0.0, 0.0), 0.5);
        let big = Sphere::new(DVec3::ZERO, 2.0);
        assert!(close(big.overlap_volume(&inner), inner.volume()));

        // Two unit spheres one radius apart share 5/12 pi.
        let half = Sphere::new(DVec3::new(1.0, 0.0, 0.0), 1.0);
        assert!(close(a.overlap_volume(&half), 5.0 * PI / 12.0));
        assert!(close(a.overlap_volume(&half), half.overlap_volume(&a)));
    }

    #[test]
    fn ray_hits() {
        let s = Sphere::new(DVec3::new(5.0, 0.0, 0.0), 1.0);
        let (t0, t1) = s.intersect_ray(DVec3::ZERO, DVec3::X).unwrap();
        assert!(close(t0, 4.0) && close(t1, 6.0));

        // Origin inside: one hit behind, one ahead.
        let (t0, t1) = s
            .intersect_ray(DVec3::new(5.0, 0.0, 0.0), DVec3::new(2.0, 0.0, 0.0))
            .unwrap();
        assert!(close(t0, -0.5) && close(t1, 0.5));

        assert!(s.intersect_ray(DVec3::ZERO, DVec3::Y).is_none());
        assert!(s.intersect_ray(DVec3::ZERO, DVec3::ZERO).is_none());
    }

    #[test]
    fn box_intersection() {
        let s = Sphere::new(DVec3::new(0.0, 0.0, 0.0), 1.0);
        assert!(s.intersects_aabb(DVec3::splat(-0.5), DVec3::splat(0.5)));
        assert!(s.intersects_aabb(DVec3::new(0.9, -1.0, -1.0), DVec3::new(2.0, 1.0, 1.0)));
        // The corner at (0.8, 0.8, 0.8) lies outside the unit sphere.
        assert!(!s.intersects_aabb(DVec3::splat(0.8), DVec3::splat(2.0)));
    }
}
