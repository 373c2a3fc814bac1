//! Axis-aligned bounding box

use serde::{Deserialize, Serialize};

use crate::core::types::Vec3;

/// Axis-aligned bounding box defined by min and max corners
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// The unit cube `[0,1]^3`
    pub const UNIT: Aabb = Aabb { min: Vec3::ZERO, max: Vec3::ONE };

    /// Create AABB from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create AABB from center and half-extents
    pub fn from_center_half_extent(center: Vec3, half_extent: Vec3) -> Self {
        Self {
            min: center - half_extent,
            max: center + half_extent,
        }
    }

    /// Get center point
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get size (max - min)
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// True when both corners are finite and `min < max` on every axis
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min.cmplt(self.max).all()
    }

    /// Check if point is inside AABB (faces included)
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.x >= self.min.x && p.x <= self.max.x &&
        p.y >= self.min.y && p.y <= self.max.y &&
        p.z >= self.min.z && p.z <= self.max.z
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::UNIT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_accessors() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert_eq!(aabb.center(), Vec3::splat(0.5));
        assert_eq!(aabb.size(), Vec3::ONE);
    }

    #[test]
    fn test_from_center_half_extent() {
        let aabb = Aabb::from_center_half_extent(Vec3::splat(1.0), Vec3::splat(0.5));
        assert_eq!(aabb.min, Vec3::splat(0.5));
        assert_eq!(aabb.max, Vec3::splat(1.5));
    }

    #[test]
    fn test_contains_point() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert!(aabb.contains_point(Vec3::splat(0.5)));
        assert!(aabb.contains_point(Vec3::ONE));
        assert!(!aabb.contains_point(Vec3::splat(2.0)));
        assert!(!aabb.contains_point(Vec3::splat(f32::NAN)));
    }

    #[test]
    fn test_is_valid() {
        assert!(Aabb::UNIT.is_valid());
        assert!(!Aabb::new(Vec3::ONE, Vec3::ONE).is_valid());
        assert!(!Aabb::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.5, 1.0)).is_valid());
        assert!(!Aabb::new(Vec3::ZERO, Vec3::new(1.0, f32::INFINITY, 1.0)).is_valid());
        assert!(!Aabb::new(Vec3::new(f32::NAN, 0.0, 0.0), Vec3::ONE).is_valid());
    }
}
