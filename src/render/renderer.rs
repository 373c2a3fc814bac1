//! Per-frame orchestration of the LIC volume inputs.
//!
//! [`LicVolumeRenderer`] holds what is shared by every rendering context:
//! the grid, the static assets, the LIC settings and the appearance. Each
//! context (window, eye, device) owns a [`LicContext`] with its own caches,
//! so contexts re-encode and re-upload independently.

use crate::assets::{AssetProvider, BuiltinAssets, KernelProfile, NoiseVolume};
use crate::config::LicConfig;
use crate::core::types::{Result, UVec3, Vec3};
use crate::core::Error;
use crate::field::{FieldEncoder, VectorField};
use crate::mask::{MaskVoxel, VolumeMask};
use crate::math::Grid;
use crate::sync::{Frozen, ProducerId, VersionStamp, Versioned, VersionedCache};
use super::backend::{ParamValue, RenderBackend, ResourceHandle, Slot, TextureFormat, TextureUpload, WrapMode};
use super::color_map::{ColorMap, COLOR_MAP_SIZE};
use super::params::{LicParams, LicSettings};

/// Which static asset a setup warning refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Noise,
    Kernel,
}

/// A static asset that failed to load and was replaced by the built-in version
#[derive(Debug)]
pub struct SetupWarning {
    pub asset: AssetKind,
    pub error: Error,
}

/// Outcome of renderer setup
#[derive(Debug, Default)]
pub struct SetupReport {
    pub warnings: Vec<SetupWarning>,
}

impl SetupReport {
    /// True if any asset fell back to its procedural replacement
    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Inputs of the color map upload
#[derive(Debug)]
struct Appearance {
    color_map: ColorMap,
    step_size: f32,
    transparency_gamma: f32,
    version: u64,
    id: ProducerId,
}

impl Appearance {
    fn touch(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    /// Step-size-adjusted copy with premultiplied alpha
    fn adjusted_color_map(&self) -> ColorMap {
        let mut map = self.color_map.clone();
        map.change_transparency(self.step_size * self.transparency_gamma);
        map.premultiply_alpha();
        map
    }
}

impl Versioned for Appearance {
    fn version_stamp(&self) -> VersionStamp {
        VersionStamp { producer: self.id, version: self.version }
    }
}

/// Backend copy of the encoded field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeResource {
    pub handle: ResourceHandle,
    pub source_version: u64,
    pub max_magnitude: f32,
}

/// Per-context upload state
#[derive(Debug, Default)]
pub struct LicContext {
    volume: VersionedCache<VolumeResource>,
    mask: VersionedCache<ResourceHandle>,
    noise: VersionedCache<ResourceHandle>,
    kernel: VersionedCache<ResourceHandle>,
    color_map: VersionedCache<ResourceHandle>,
}

impl LicContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times this context has run the field encoder
    pub fn encode_count(&self) -> u64 {
        self.volume.refresh_count()
    }

    /// How many times this context has uploaded a mask
    pub fn mask_upload_count(&self) -> u64 {
        self.mask.refresh_count()
    }

    /// Current backend copy of the encoded field, if any
    pub fn volume(&self) -> Option<&VolumeResource> {
        self.volume.resource()
    }

    /// Drop all cached state, e.g. after the backend lost its resources
    pub fn invalidate(&mut self) {
        self.volume.invalidate();
        self.mask.invalidate();
        self.noise.invalidate();
        self.kernel.invalidate();
        self.color_map.invalidate();
    }
}

/// Backend handles bound for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameHandles {
    pub volume: ResourceHandle,
    pub mask: ResourceHandle,
    pub noise: ResourceHandle,
    pub kernel: ResourceHandle,
    pub color_map: ResourceHandle,
}

/// Which slots were re-uploaded this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshedSlots {
    pub volume: bool,
    pub mask: bool,
    pub noise: bool,
    pub kernel: bool,
    pub color_map: bool,
}

/// Everything handed to the backend for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameDescription {
    pub handles: FrameHandles,
    pub params: LicParams,
    pub refreshed: RefreshedSlots,
    /// False when the fully-enabled fallback mask was bound
    pub mask_attached: bool,
}

/// LIC volume renderer shared by all rendering contexts
#[derive(Debug)]
pub struct LicVolumeRenderer {
    grid: Grid,
    settings: LicSettings,
    inv_kernel_area: f32,
    noise: Frozen<NoiseVolume>,
    kernel: Frozen<KernelProfile>,
    appearance: Appearance,
    fallback_mask: VolumeMask,
}

impl LicVolumeRenderer {
    /// Set up the renderer for fields on `grid`.
    ///
    /// Static assets are loaded once here. An asset that fails to load is
    /// logged, recorded in the [`SetupReport`] and replaced by its built-in
    /// version; only invalid configuration fails setup.
    pub fn new(grid: Grid, config: &LicConfig, assets: &dyn AssetProvider) -> Result<(Self, SetupReport)> {
        config.validate()?;
        let builtin = BuiltinAssets::default();
        let mut report = SetupReport::default();

        let noise = match assets.noise_volume(&config.noise_asset) {
            Ok(noise) => noise,
            Err(error) => {
                log::warn!("Noise volume '{}' unavailable ({}), using procedural noise", config.noise_asset, error);
                report.warnings.push(SetupWarning { asset: AssetKind::Noise, error });
                builtin.noise_volume(&config.noise_asset)?
            }
        };

        let kernel = match assets.kernel_profile(&config.kernel_asset) {
            Ok(kernel) => kernel,
            Err(error) => {
                log::warn!("Kernel profile '{}' unavailable ({}), using triangle kernel", config.kernel_asset, error);
                report.warnings.push(SetupWarning { asset: AssetKind::Kernel, error });
                builtin.kernel_profile(&config.kernel_asset)?
            }
        };

        let inv_kernel_area = kernel.inv_kernel_area();
        let dims = grid.dims();
        log::info!(
            "LIC renderer ready: grid {}x{}x{}, noise {}, kernel width {}, inverse kernel area {:.4}",
            dims.x, dims.y, dims.z, noise.dims(), kernel.width(), inv_kernel_area
        );

        let renderer = Self {
            grid,
            settings: config.lic,
            inv_kernel_area,
            noise: Frozen::new(noise),
            kernel: Frozen::new(kernel),
            appearance: Appearance {
                color_map: ColorMap::default(),
                step_size: config.step_size,
                transparency_gamma: config.transparency_gamma,
                version: 0,
                id: ProducerId::next(),
            },
            fallback_mask: VolumeMask::fully_enabled(grid.domain())?,
        };
        Ok((renderer, report))
    }

    /// Fresh per-context state
    pub fn create_context(&self) -> LicContext {
        LicContext::new()
    }

    /// Resize `mask` to this renderer's grid so voxels line up with field cells.
    ///
    /// Discards the mask contents.
    pub fn attach_mask(&self, mask: &mut VolumeMask) -> Result<()> {
        mask.resize(self.grid.dims(), self.grid.domain())
    }

    /// Mask channels at `position`, treating a missing mask as fully enabled
    pub fn mask_value_at(mask: Option<&VolumeMask>, position: Vec3) -> MaskVoxel {
        match mask {
            Some(mask) => mask.sample_at(position),
            None => MaskVoxel::FULL,
        }
    }

    /// Bring `ctx` up to date and emit one frame's resources and parameters.
    ///
    /// The field is only re-encoded and the mask only re-uploaded when their
    /// versions moved since this context last saw them.
    pub fn render_frame(
        &self,
        ctx: &mut LicContext,
        field: &VectorField,
        mask: Option<&VolumeMask>,
        backend: &mut dyn RenderBackend,
    ) -> Result<FrameDescription> {
        if *field.grid() != self.grid {
            return Err(Error::GridMismatch { expected: self.grid, actual: *field.grid() });
        }

        let mut refreshed = RefreshedSlots::default();

        refreshed.volume = ctx.volume.sync(field, |field| {
            let encoded = FieldEncoder::encode_field(field)?;
            let texels = encoded.texels_rgba16f();
            let handle = backend.upload(&TextureUpload {
                slot: Slot::Volume,
                dims: encoded.dims,
                format: TextureFormat::Rgba16Float,
                wrap: WrapMode::Clamp,
                bytes: bytemuck::cast_slice(&texels),
            })?;
            log::debug!(
                "Uploaded encoded volume (field version {}, max magnitude {})",
                encoded.source_version, encoded.max_magnitude
            );
            Ok(VolumeResource {
                handle,
                source_version: encoded.source_version,
                max_magnitude: encoded.max_magnitude,
            })
        })?;

        let mask_source = mask.unwrap_or(&self.fallback_mask);
        refreshed.mask = ctx.mask.sync(mask_source, |mask| {
            let texels = mask.texels_rg16f();
            let handle = backend.upload(&TextureUpload {
                slot: Slot::Mask,
                dims: mask.dims(),
                format: TextureFormat::Rg16Float,
                wrap: WrapMode::Clamp,
                bytes: bytemuck::cast_slice(&texels),
            })?;
            log::debug!("Uploaded mask version {}", mask.version());
            Ok(handle)
        })?;

        refreshed.noise = ctx.noise.sync(&self.noise, |noise| {
            let noise = noise.get();
            backend.upload(&TextureUpload {
                slot: Slot::Noise,
                dims: noise.dims(),
                format: TextureFormat::R8Unorm,
                wrap: WrapMode::Repeat,
                bytes: noise.data(),
            })
        })?;

        refreshed.kernel = ctx.kernel.sync(&self.kernel, |kernel| {
            let kernel = kernel.get();
            backend.upload(&TextureUpload {
                slot: Slot::Kernel,
                dims: UVec3::new(kernel.width() as u32, 1, 1),
                format: TextureFormat::R8Unorm,
                wrap: WrapMode::Clamp,
                bytes: kernel.samples(),
            })
        })?;

        refreshed.color_map = ctx.color_map.sync(&self.appearance, |appearance| {
            let map = appearance.adjusted_color_map();
            backend.upload(&TextureUpload {
                slot: Slot::ColorMap,
                dims: UVec3::new(COLOR_MAP_SIZE as u32, 1, 1),
                format: TextureFormat::Rgba32Float,
                wrap: WrapMode::ClampToEdge,
                bytes: bytemuck::cast_slice(map.entries()),
            })
        })?;

        let handles = FrameHandles {
            volume: cached(&ctx.volume, Slot::Volume)?.handle,
            mask: *cached(&ctx.mask, Slot::Mask)?,
            noise: *cached(&ctx.noise, Slot::Noise)?,
            kernel: *cached(&ctx.kernel, Slot::Kernel)?,
            color_map: *cached(&ctx.color_map, Slot::ColorMap)?,
        };

        let params = self.params();
        emit_params(backend, &params);

        Ok(FrameDescription {
            handles,
            params,
            refreshed,
            mask_attached: mask.is_some(),
        })
    }

    /// Parameter set for the current settings
    pub fn params(&self) -> LicParams {
        LicParams::derive(
            &self.settings,
            self.inv_kernel_area,
            self.appearance.step_size,
            self.appearance.transparency_gamma,
        )
    }

    pub fn set_step_size(&mut self, step_size: f32) -> Result<()> {
        if !(step_size.is_finite() && step_size > 0.0) {
            return Err(Error::InvalidConfig(format!("step size must be positive, got {}", step_size)));
        }
        self.appearance.step_size = step_size;
        self.appearance.touch();
        Ok(())
    }

    pub fn set_transparency_gamma(&mut self, gamma: f32) -> Result<()> {
        if !(gamma.is_finite() && gamma >= 0.0) {
            return Err(Error::InvalidConfig(format!("transparency gamma must be non-negative, got {}", gamma)));
        }
        self.appearance.transparency_gamma = gamma;
        self.appearance.touch();
        Ok(())
    }

    pub fn set_color_map(&mut self, color_map: ColorMap) {
        self.appearance.color_map = color_map;
        self.appearance.touch();
    }

    pub fn set_lic_step_size(&mut self, lic_step_size: f32) -> Result<()> {
        let settings = LicSettings { lic_step_size, ..self.settings };
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    pub fn set_lic_steps(&mut self, forward_steps: u32, backward_steps: u32) -> Result<()> {
        let settings = LicSettings { forward_steps, backward_steps, ..self.settings };
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    pub fn set_gradient(&mut self, gradient: [f32; 3]) -> Result<()> {
        let settings = LicSettings { gradient, ..self.settings };
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn settings(&self) -> &LicSettings {
        &self.settings
    }

    pub fn inv_kernel_area(&self) -> f32 {
        self.inv_kernel_area
    }

    pub fn step_size(&self) -> f32 {
        self.appearance.step_size
    }

    pub fn transparency_gamma(&self) -> f32 {
        self.appearance.transparency_gamma
    }

    pub fn color_map(&self) -> &ColorMap {
        &self.appearance.color_map
    }

    pub fn noise(&self) -> &NoiseVolume {
        self.noise.get()
    }

    pub fn kernel(&self) -> &KernelProfile {
        self.kernel.get()
    }
}

fn cached<R>(cache: &VersionedCache<R>, slot: Slot) -> Result<&R> {
    cache
        .resource()
        .ok_or_else(|| Error::Backend(format!("{:?} resource missing after sync", slot)))
}

fn emit_params(backend: &mut dyn RenderBackend, params: &LicParams) {
    backend.set_param("gradient", ParamValue::Vec3(params.gradient));
    backend.set_param("licKernel", ParamValue::Vec3(params.lic_kernel));
    backend.set_param("licParams", ParamValue::Vec3(params.lic_params));
    backend.set_param("stepSize", ParamValue::Float(params.step_size));
    backend.set_param("transparencyGamma", ParamValue::Float(params.transparency_gamma));
    for slot in Slot::ALL {
        backend.set_param(slot.sampler_name(), ParamValue::Sampler(slot.texture_unit()));
    }
    backend.set_uniform_block(bytemuck::bytes_of(&params.to_uniforms()));
}
