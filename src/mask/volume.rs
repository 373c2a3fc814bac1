//! Dense two-channel voxel mask painted by the brush tool.

use bytemuck::{Pod, Zeroable};
use half::f16;

use crate::core::types::{Result, UVec3, Vec3};
use crate::math::{Aabb, Grid};
use crate::sync::{ProducerId, VersionStamp, Versioned};
use super::stamp::{StampFootprint, StampReport};

/// Default mask resolution per axis
pub const DEFAULT_MASK_SIZE: u32 = 64;

/// Per-voxel mask state.
///
/// `enabled` gates participation in the convolution, `directional` gates the
/// secondary directional pass. Both stay in `[0, 1]`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MaskVoxel {
    pub enabled: f32,
    pub directional: f32,
}

impl MaskVoxel {
    /// Both channels off; also the out-of-domain sample value
    pub const EMPTY: Self = Self { enabled: 0.0, directional: 0.0 };
    /// Both channels on
    pub const FULL: Self = Self { enabled: 1.0, directional: 1.0 };
}

/// Resizable 3D mask over a spatial domain, with a version counter that bumps
/// on every mutation.
#[derive(Debug)]
pub struct VolumeMask {
    grid: Grid,
    voxels: Vec<MaskVoxel>,
    version: u64,
    id: ProducerId,
}

impl VolumeMask {
    /// Create a 64x64x64 mask over the unit cube
    pub fn new() -> Self {
        Self::with_grid(Grid::unit_cube::<DEFAULT_MASK_SIZE>())
    }

    /// Create an all-zero mask with the given layout
    pub fn with_grid(grid: Grid) -> Self {
        Self {
            grid,
            voxels: vec![MaskVoxel::EMPTY; grid.len()],
            version: 0,
            id: ProducerId::next(),
        }
    }

    /// 1x1x1 mask with both channels on, covering `domain`.
    ///
    /// Sampled by the renderer when no painted mask is attached.
    pub fn fully_enabled(domain: Aabb) -> Result<Self> {
        let mut mask = Self::with_grid(Grid::new(UVec3::ONE, domain)?);
        mask.fill(MaskVoxel::FULL);
        Ok(mask)
    }

    /// Replace the layout, discarding all voxel contents.
    ///
    /// Validation happens before anything is touched, so on error the mask
    /// (contents and version) is unchanged.
    pub fn resize(&mut self, dims: UVec3, domain: Aabb) -> Result<()> {
        let grid = Grid::new(dims, domain)?;

        self.voxels = vec![MaskVoxel::EMPTY; grid.len()];
        self.grid = grid;
        self.bump_version();

        log::info!(
            "Mask resized to {}x{}x{} over [{}, {}], cell size {:.5}",
            dims.x, dims.y, dims.z, domain.min, domain.max, grid.cell_size()
        );
        Ok(())
    }

    /// Paint a dual-radius box stamp centered at `position`.
    ///
    /// Every voxel in the outer box gets `enabled = value`; those also inside
    /// the `0.4 * outer_radius` box get `directional = value`. The version
    /// bumps exactly once, even if nothing changed.
    ///
    /// A non-finite position or radius paints nothing but still bumps the version.
    pub fn stamp_brush(&mut self, position: Vec3, outer_radius: f32, value: f32) -> StampReport {
        let value = channel_value(value);
        if !(position.is_finite() && outer_radius.is_finite()) {
            self.bump_version();
            log::warn!("Brush stamp skipped: non-finite position {} or radius {}", position, outer_radius);
            return StampReport { footprint: None, touched: 0, version: self.version };
        }

        let footprint = StampFootprint::new(&self.grid, position, outer_radius);
        let (outer, inner) = (footprint.outer, footprint.inner);

        let mut touched = 0;
        for z in outer.min.z..=outer.max.z {
            for y in outer.min.y..=outer.max.y {
                for x in outer.min.x..=outer.max.x {
                    let voxel = &mut self.voxels[self.grid.linear_index(x, y, z)];
                    voxel.enabled = value;
                    if inner.contains(x, y, z) {
                        voxel.directional = value;
                    }
                    touched += 1;
                }
            }
        }
        self.bump_version();

        log::debug!(
            "Brush stamp at {} r={} value={}: {} voxels, version {}",
            position, outer_radius, value, touched, self.version
        );

        StampReport { footprint: Some(footprint), touched, version: self.version }
    }

    /// Channels of the voxel enclosing `position`; [`MaskVoxel::EMPTY`] outside the domain.
    pub fn sample_at(&self, position: Vec3) -> MaskVoxel {
        self.grid
            .cell_at(position)
            .map(|c| self.voxels[self.grid.linear_index(c.x, c.y, c.z)])
            .unwrap_or(MaskVoxel::EMPTY)
    }

    /// Procedural fill: enable both channels on the lower half along x.
    pub fn fill_half_x(&mut self) {
        let half = self.grid.dims().x / 2;
        for (index, voxel) in self.voxels.iter_mut().enumerate() {
            if self.grid.cell_coords(index).x < half {
                *voxel = MaskVoxel::FULL;
            }
        }
        self.bump_version();
    }

    /// Set every voxel to `voxel`
    pub fn fill(&mut self, voxel: MaskVoxel) {
        let voxel = MaskVoxel {
            enabled: channel_value(voxel.enabled),
            directional: channel_value(voxel.directional),
        };
        self.voxels.fill(voxel);
        self.bump_version();
    }

    /// Reset every voxel to zero, keeping the layout
    pub fn clear(&mut self) {
        self.fill(MaskVoxel::EMPTY);
    }

    /// Voxel at integer coordinates, `None` if out of range
    pub fn voxel(&self, x: u32, y: u32, z: u32) -> Option<MaskVoxel> {
        let dims = self.grid.dims();
        if x >= dims.x || y >= dims.y || z >= dims.z {
            return None;
        }
        Some(self.voxels[self.grid.linear_index(x, y, z)])
    }

    /// All voxels in row-major order, x fastest
    pub fn voxels(&self) -> &[MaskVoxel] {
        &self.voxels
    }

    /// Two half-float channels per voxel, ready for an RG16F volume upload
    pub fn texels_rg16f(&self) -> Vec<f16> {
        let floats: &[f32] = bytemuck::cast_slice(&self.voxels);
        floats.iter().map(|&v| f16::from_f32(v)).collect()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn dims(&self) -> UVec3 {
        self.grid.dims()
    }

    pub fn domain(&self) -> Aabb {
        self.grid.domain()
    }

    /// Diagonal length of one voxel
    pub fn cell_size(&self) -> f32 {
        self.grid.cell_size()
    }

    /// Current data version; only ever increases (wrapping)
    pub fn version(&self) -> u64 {
        self.version
    }

    fn bump_version(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}

/// Clamp into `[0, 1]`, mapping NaN to 0
fn channel_value(value: f32) -> f32 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

impl Default for VolumeMask {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for VolumeMask {
    /// Copies get their own producer identity so caches never confuse them
    /// with the mask they came from.
    fn clone(&self) -> Self {
        Self {
            grid: self.grid,
            voxels: self.voxels.clone(),
            version: self.version,
            id: ProducerId::next(),
        }
    }
}

impl Versioned for VolumeMask {
    fn version_stamp(&self) -> VersionStamp {
        VersionStamp { producer: self.id, version: self.version }
    }
}
