//! Graphics-API-neutral rendering backend interface.
//!
//! The LIC renderer only ever needs two things from a graphics backend:
//! "upload this buffer to that texture slot" and "set this shader parameter".
//! A wgpu or OpenGL host implements [`RenderBackend`]; [`RecordingBackend`]
//! keeps everything in memory for tests and headless runs.

use std::collections::HashMap;

use crate::core::types::{Result, UVec3};
use crate::core::Error;

/// Logical texture slots sampled by the LIC shader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Encoded direction + magnitude volume
    Volume,
    /// Brush mask volume
    Mask,
    /// Noise volume being convolved
    Noise,
    /// Kernel profile lookup
    Kernel,
    /// Transfer function
    ColorMap,
}

impl Slot {
    pub const ALL: [Slot; 5] = [Slot::Volume, Slot::Mask, Slot::Noise, Slot::Kernel, Slot::ColorMap];

    /// Texture unit the shader sampler is bound to; unit 0 belongs to the
    /// host raycaster's depth texture.
    pub fn texture_unit(self) -> u32 {
        match self {
            Slot::Volume => 1,
            Slot::Mask => 2,
            Slot::Noise => 3,
            Slot::Kernel => 4,
            Slot::ColorMap => 5,
        }
    }

    /// Name of the shader sampler uniform
    pub fn sampler_name(self) -> &'static str {
        match self {
            Slot::Volume => "volumeSampler",
            Slot::Mask => "maskSampler",
            Slot::Noise => "noiseSampler",
            Slot::Kernel => "licKernelSampler",
            Slot::ColorMap => "colorMapSampler",
        }
    }
}

/// Texel formats used by the uploads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    R8Unorm,
    Rg16Float,
    Rgba16Float,
    Rgba32Float,
}

impl TextureFormat {
    pub fn bytes_per_texel(self) -> usize {
        match self {
            TextureFormat::R8Unorm => 1,
            TextureFormat::Rg16Float => 4,
            TextureFormat::Rgba16Float => 8,
            TextureFormat::Rgba32Float => 16,
        }
    }
}

/// Sampler addressing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapMode {
    /// Clamp to the border texels
    Clamp,
    /// Tile the texture
    Repeat,
    /// Clamp to the edge texel centers
    ClampToEdge,
}

/// One buffer to place into a slot
#[derive(Debug, Clone, Copy)]
pub struct TextureUpload<'a> {
    pub slot: Slot,
    /// Texel counts; 1D and 2D data use 1 for the unused axes
    pub dims: UVec3,
    pub format: TextureFormat,
    pub wrap: WrapMode,
    pub bytes: &'a [u8],
}

impl TextureUpload<'_> {
    /// Check that the payload size matches `dims` and `format`
    pub fn validate(&self) -> Result<()> {
        let texels = self.dims.x as usize * self.dims.y as usize * self.dims.z as usize;
        let expected = texels * self.format.bytes_per_texel();
        if self.bytes.len() != expected {
            return Err(Error::Backend(format!(
                "{:?} upload of {}x{}x{} {:?} needs {} bytes, got {}",
                self.slot, self.dims.x, self.dims.y, self.dims.z, self.format, expected, self.bytes.len()
            )));
        }
        Ok(())
    }
}

/// Opaque backend resource id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceHandle(pub u64);

/// Shader parameter values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Float(f32),
    Vec3([f32; 3]),
    /// Texture unit index for a sampler uniform
    Sampler(u32),
}

/// Minimal surface a graphics backend must provide
pub trait RenderBackend {
    /// Upload `upload.bytes` into the texture behind `upload.slot`
    fn upload(&mut self, upload: &TextureUpload<'_>) -> Result<ResourceHandle>;

    /// Set a named shader parameter
    fn set_param(&mut self, name: &str, value: ParamValue);

    /// Set the packed uniform block; backends using named parameters only may ignore it
    fn set_uniform_block(&mut self, _bytes: &[u8]) {}
}

/// Metadata of one recorded upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRecord {
    pub slot: Slot,
    pub dims: UVec3,
    pub format: TextureFormat,
    pub wrap: WrapMode,
    pub byte_len: usize,
    pub handle: ResourceHandle,
}

/// In-memory backend that records every call.
///
/// Each slot keeps one handle for its lifetime, mirroring a texture object
/// that is created once and updated in place.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    uploads: Vec<UploadRecord>,
    last_payloads: HashMap<Slot, Vec<u8>>,
    handles: HashMap<Slot, ResourceHandle>,
    params: HashMap<String, ParamValue>,
    uniform_block: Vec<u8>,
    failing: Option<Slot>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every upload to `slot` fail until cleared with `None`
    pub fn fail_uploads_to(&mut self, slot: Option<Slot>) {
        self.failing = slot;
    }

    pub fn uploads(&self) -> &[UploadRecord] {
        &self.uploads
    }

    /// Number of uploads made to `slot` so far
    pub fn upload_count(&self, slot: Slot) -> usize {
        self.uploads.iter().filter(|u| u.slot == slot).count()
    }

    /// Bytes of the most recent upload to `slot`
    pub fn last_payload(&self, slot: Slot) -> Option<&[u8]> {
        self.last_payloads.get(&slot).map(Vec::as_slice)
    }

    pub fn param(&self, name: &str) -> Option<ParamValue> {
        self.params.get(name).copied()
    }

    pub fn uniform_block(&self) -> &[u8] {
        &self.uniform_block
    }
}

impl RenderBackend for RecordingBackend {
    fn upload(&mut self, upload: &TextureUpload<'_>) -> Result<ResourceHandle> {
        if self.failing == Some(upload.slot) {
            return Err(Error::Backend(format!("simulated {:?} upload failure", upload.slot)));
        }
        upload.validate()?;

        let next = ResourceHandle(self.handles.len() as u64 + 1);
        let handle = *self.handles.entry(upload.slot).or_insert(next);
        self.uploads.push(UploadRecord {
            slot: upload.slot,
            dims: upload.dims,
            format: upload.format,
            wrap: upload.wrap,
            byte_len: upload.bytes.len(),
            handle,
        });
        self.last_payloads.insert(upload.slot, upload.bytes.to_vec());
        Ok(handle)
    }

    fn set_param(&mut self, name: &str, value: ParamValue) {
        self.params.insert(name.to_string(), value);
    }

    fn set_uniform_block(&mut self, bytes: &[u8]) {
        self.uniform_block = bytes.to_vec();
    }
}
