//! Index-space footprint of a brush stamp.
//!
//! A stamp is two nested axis-aligned boxes rather than spheres: the outer
//! box (radius `r`) drives the "enabled" channel, the inner box
//! (radius `0.4 * r`) additionally drives the "directional" channel. The
//! shading side samples these flat-topped regions as-is, so the box shape is
//! the defined approximation and not a stand-in for a distance test.
//!
//! Bounds are clamped to the grid, which means a brush far outside the
//! domain still collapses onto the nearest boundary voxels instead of
//! touching nothing. A NaN coordinate would truncate to index 0, so
//! non-finite positions and radii are rejected before a footprint is built.

use crate::core::types::{UVec3, Vec3};
use crate::math::Grid;

/// Inner (directional) radius as a fraction of the outer radius
pub const INNER_RADIUS_RATIO: f32 = 0.4;

/// Inclusive box of voxel indices
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexBox {
    pub min: UVec3,
    pub max: UVec3,
}

impl IndexBox {
    /// Box covering `[center - radius, center + radius]` mapped through the
    /// grid's domain→index transform and clamped to valid indices.
    pub fn around(grid: &Grid, center: Vec3, radius: f32) -> Self {
        let mut min = UVec3::ZERO;
        let mut max = UVec3::ZERO;
        for axis in 0..3 {
            min[axis] = grid.clamp_axis(axis, grid.axis_index(axis, center[axis] - radius));
            max[axis] = grid.clamp_axis(axis, grid.axis_index(axis, center[axis] + radius));
        }
        Self { min, max }
    }

    /// Check if voxel `(x, y, z)` lies inside the box
    #[inline]
    pub fn contains(&self, x: u32, y: u32, z: u32) -> bool {
        x >= self.min.x && x <= self.max.x &&
        y >= self.min.y && y <= self.max.y &&
        z >= self.min.z && z <= self.max.z
    }

    /// Number of voxels covered; zero if the box is inverted on any axis
    pub fn voxel_count(&self) -> usize {
        (0..3)
            .map(|axis| (self.max[axis] as i64 - self.min[axis] as i64 + 1).max(0) as usize)
            .product()
    }
}

/// Outer and inner footprints of one brush stamp
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StampFootprint {
    pub outer: IndexBox,
    pub inner: IndexBox,
}

impl StampFootprint {
    pub fn new(grid: &Grid, center: Vec3, outer_radius: f32) -> Self {
        Self {
            outer: IndexBox::around(grid, center, outer_radius),
            inner: IndexBox::around(grid, center, INNER_RADIUS_RATIO * outer_radius),
        }
    }
}

/// What a single stamp did to the mask
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StampReport {
    /// `None` when the stamp was skipped for a non-finite position or radius
    pub footprint: Option<StampFootprint>,
    /// Voxels whose "enabled" channel was written
    pub touched: usize,
    /// Mask version after the stamp
    pub version: u64,
}
