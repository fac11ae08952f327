//! Bounding-box collision for lane entities
//!
//! Everything in the runner is tested as an axis-aligned box: enemies and the
//! player are boxes already, gates are thin frames, and projectiles and
//! power-ups use the box around their sphere/octahedron.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box of the given full size centered on `center`
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Box around a sphere
    pub fn around_sphere(center: Vec3, radius: f32) -> Self {
        Self::from_center_size(center, Vec3::splat(radius * 2.0))
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Overlap test (touching faces count as a hit)
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        self.min.cmple(point).all() && self.max.cmpge(point).all()
    }

    /// Grow every face outward by `amount`
    pub fn expanded_by_scalar(&self, amount: f32) -> Self {
        self.expanded_by_vector(Vec3::splat(amount))
    }

    /// Grow each axis outward by the matching component on both sides
    pub fn expanded_by_vector(&self, amount: Vec3) -> Self {
        Self {
            min: self.min - amount,
            max: self.max + amount,
        }
    }

    /// Scale the box about its own center
    pub fn scaled_about_center(&self, factor: f32) -> Self {
        Self::from_center_size(self.center(), self.size() * factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersects() {
        let a = Aabb::from_center_size(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::from_center_size(Vec3::new(0.9, 0.0, 0.0), Vec3::ONE);
        let c = Aabb::from_center_size(Vec3::new(1.1, 0.0, 0.0), Vec3::ONE);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));

        // Touching faces
        let d = Aabb::from_center_size(Vec3::new(1.0, 0.0, 0.0), Vec3::ONE);
        assert!(a.intersects(&d));
    }

    #[test]
    fn test_expand_and_shrink() {
        let a = Aabb::from_center_size(Vec3::new(2.0, 1.0, 0.0), Vec3::new(1.0, 2.0, 1.0));
        let grown = a.expanded_by_scalar(0.5);
        assert_eq!(grown.size(), Vec3::new(2.0, 3.0, 2.0));
        assert_eq!(grown.center(), a.center());

        let grown = a.expanded_by_vector(a.size() * 1.5);
        assert_eq!(grown.size(), a.size() * 4.0);

        let shrunk = a.scaled_about_center(0.8);
        assert!((shrunk.size() - Vec3::new(0.8, 1.6, 0.8)).length() < 1e-6);
        assert_eq!(shrunk.center(), a.center());
    }

    #[test]
    fn test_contains_point() {
        let a = Aabb::around_sphere(Vec3::ZERO, 0.5);
        assert!(a.contains_point(Vec3::new(0.5, 0.0, -0.5)));
        assert!(!a.contains_point(Vec3::new(0.6, 0.0, 0.0)));
    }
}
