//! LIC rendering inputs: backend seam, parameters, color map and per-frame orchestration

pub mod backend;
pub mod color_map;
pub mod params;
pub mod renderer;

pub use backend::{
    ParamValue, RecordingBackend, RenderBackend, ResourceHandle, Slot, TextureFormat, TextureUpload, UploadRecord,
    WrapMode,
};
pub use color_map::{ColorMap, COLOR_MAP_SIZE};
pub use params::{LicParams, LicSettings, LicUniforms};
pub use renderer::{
    AssetKind, FrameDescription, FrameHandles, LicContext, LicVolumeRenderer, RefreshedSlots, SetupReport,
    SetupWarning, VolumeResource,
};
