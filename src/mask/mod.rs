//! Brush-painted voxel masks gating the LIC passes.
//!
//! A [`VolumeMask`] is a dense grid with two channels per voxel: "enabled"
//! (voxel takes part in the convolution) and "directional" (voxel also takes
//! part in the directional pass). Every mutation bumps the mask version so
//! renderers can skip re-uploading an unchanged mask.

pub mod volume;
pub mod stamp;

pub use volume::{MaskVoxel, VolumeMask, DEFAULT_MASK_SIZE};
pub use stamp::{IndexBox, StampFootprint, StampReport, INNER_RADIUS_RATIO};
