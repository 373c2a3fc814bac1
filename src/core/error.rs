//! Error types for licvol

use glam::{UVec3, Vec3};
use thiserror::Error;

use crate::math::Grid;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid grid dimensions {0}: every axis needs at least one cell")]
    InvalidDimensions(UVec3),

    #[error("Invalid domain [{min}, {max}]: bounds must be finite with min < max on every axis")]
    InvalidDomain { min: Vec3, max: Vec3 },

    #[error("Invalid brush radius {0}: must be positive and finite")]
    InvalidBrushRadius(f32),

    #[error("Field size mismatch: expected {expected} samples, got {actual}")]
    FieldSizeMismatch { expected: usize, actual: usize },

    #[error(
        "Grid mismatch: renderer uses {}x{}x{} cells over [{}, {}], field has {}x{}x{} over [{}, {}]",
        .expected.dims().x, .expected.dims().y, .expected.dims().z, .expected.domain().min, .expected.domain().max,
        .actual.dims().x, .actual.dims().y, .actual.dims().z, .actual.domain().min, .actual.domain().max
    )]
    GridMismatch { expected: Grid, actual: Grid },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Asset error: {0}")]
    Asset(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}
