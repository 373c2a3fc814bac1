//! Regular 3D sampling grids over an axis-aligned domain.
//!
//! Both the brush mask and the raw vector field are dense, row-major grids
//! with x varying fastest. [`Grid`] owns the validated `(dims, domain)` pair
//! and the coordinate mapping between world space and cell indices.

use crate::core::types::{Result, UVec3, Vec3};
use crate::core::Error;
use super::Aabb;

/// Validated grid layout: cell counts per axis plus the spatial domain they cover.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grid {
    dims: UVec3,
    domain: Aabb,
    len: usize,
}

impl Grid {
    /// Create a grid, rejecting empty axes, overflowing cell counts and degenerate domains.
    pub fn new(dims: UVec3, domain: Aabb) -> Result<Self> {
        let len = dims
            .to_array()
            .iter()
            .try_fold(1usize, |acc, &d| if d == 0 { None } else { acc.checked_mul(d as usize) })
            .ok_or(Error::InvalidDimensions(dims))?;

        if !domain.is_valid() {
            return Err(Error::InvalidDomain { min: domain.min, max: domain.max });
        }

        Ok(Self { dims, domain, len })
    }

    /// Cubic grid of `n` cells per axis over the unit cube, checked at compile time
    pub(crate) const fn unit_cube<const N: u32>() -> Self {
        const { assert!(N > 0 && (N as usize).checked_pow(3).is_some()) };
        Self {
            dims: UVec3::splat(N),
            domain: Aabb::UNIT,
            len: (N as usize).pow(3),
        }
    }

    /// Cubic grid of `n` cells per axis over the unit cube
    pub fn cube(n: u32) -> Result<Self> {
        Self::new(UVec3::splat(n), Aabb::UNIT)
    }

    pub fn dims(&self) -> UVec3 {
        self.dims
    }

    pub fn domain(&self) -> Aabb {
        self.domain
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; a valid grid has at least one cell
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Diagonal length of a single cell
    pub fn cell_size(&self) -> f32 {
        (self.domain.size() / self.dims.as_vec3()).length()
    }

    /// Row-major address of cell `(x, y, z)`, x fastest
    #[inline]
    pub fn linear_index(&self, x: u32, y: u32, z: u32) -> usize {
        let (nx, ny) = (self.dims.x as usize, self.dims.y as usize);
        (z as usize * ny + y as usize) * nx + x as usize
    }

    /// Inverse of [`Grid::linear_index`]
    #[inline]
    pub fn cell_coords(&self, index: usize) -> UVec3 {
        let (nx, ny) = (self.dims.x as usize, self.dims.y as usize);
        UVec3::new((index % nx) as u32, ((index / nx) % ny) as u32, (index / (nx * ny)) as u32)
    }

    /// Unclamped index of `coord` along `axis`: `trunc(dims * (coord - min) / extent)`.
    ///
    /// Non-finite input maps to 0; huge values saturate.
    #[inline]
    pub fn axis_index(&self, axis: usize, coord: f32) -> i64 {
        let min = self.domain.min[axis] as f64;
        let extent = self.domain.max[axis] as f64 - min;
        (self.dims[axis] as f64 * (coord as f64 - min) / extent) as i64
    }

    /// Clamp an axis index into `[0, dims[axis] - 1]`
    #[inline]
    pub fn clamp_axis(&self, axis: usize, index: i64) -> u32 {
        index.clamp(0, self.dims[axis] as i64 - 1) as u32
    }

    /// Cell enclosing `p`, or `None` when `p` lies outside the domain.
    ///
    /// Points on the max face belong to the last cell.
    pub fn cell_at(&self, p: Vec3) -> Option<UVec3> {
        if !self.domain.contains_point(p) {
            return None;
        }
        let mut cell = UVec3::ZERO;
        for axis in 0..3 {
            cell[axis] = self.clamp_axis(axis, self.axis_index(axis, p[axis]));
        }
        Some(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid() {
        let grid = Grid::new(UVec3::new(2, 3, 4), Aabb::UNIT).unwrap();
        assert_eq!(grid.len(), 24);
        assert!(!grid.is_empty());
    }

    #[test]
    fn test_unit_cube_matches_checked_cube() {
        assert_eq!(Grid::unit_cube::<8>(), Grid::cube(8).unwrap());
        assert_eq!(Grid::unit_cube::<1>().len(), 1);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let err = Grid::new(UVec3::new(4, 0, 4), Aabb::UNIT).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions(d) if d.y == 0));
    }

    #[test]
    fn test_overflowing_dimensions_rejected() {
        let err = Grid::new(UVec3::splat(u32::MAX), Aabb::UNIT).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions(_)));
    }

    #[test]
    fn test_degenerate_domain_rejected() {
        let flat = Aabb::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0));
        assert!(matches!(Grid::new(UVec3::splat(4), flat), Err(Error::InvalidDomain { .. })));
    }

    #[test]
    fn test_cell_size() {
        let grid = Grid::cube(64).unwrap();
        let expected = (3.0_f32).sqrt() / 64.0;
        assert!((grid.cell_size() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_linear_index_x_fastest() {
        let grid = Grid::new(UVec3::new(4, 3, 2), Aabb::UNIT).unwrap();
        assert_eq!(grid.linear_index(0, 0, 0), 0);
        assert_eq!(grid.linear_index(1, 0, 0), 1);
        assert_eq!(grid.linear_index(0, 1, 0), 4);
        assert_eq!(grid.linear_index(0, 0, 1), 12);
        assert_eq!(grid.linear_index(3, 2, 1), 23);
        assert_eq!(grid.cell_coords(23), UVec3::new(3, 2, 1));
    }

    #[test]
    fn test_axis_index_truncates() {
        let grid = Grid::cube(4).unwrap();
        assert_eq!(grid.axis_index(0, 0.3), 1);
        assert_eq!(grid.axis_index(0, 0.7), 2);
        assert_eq!(grid.axis_index(0, -0.1), 0);
        assert_eq!(grid.axis_index(0, -0.3), -1);
        assert_eq!(grid.axis_index(0, f32::NAN), 0);
    }

    #[test]
    fn test_cell_at() {
        let grid = Grid::cube(4).unwrap();
        assert_eq!(grid.cell_at(Vec3::splat(0.5)), Some(UVec3::splat(2)));
        assert_eq!(grid.cell_at(Vec3::ONE), Some(UVec3::splat(3)));
        assert_eq!(grid.cell_at(Vec3::ZERO), Some(UVec3::ZERO));
        assert_eq!(grid.cell_at(Vec3::new(1.5, 0.5, 0.5)), None);
    }
}
