//! Licvol - brush-painted masks and 3D line integral convolution volumes

pub mod core;
pub mod math;
pub mod sync;
pub mod mask;
pub mod brush;
pub mod field;
pub mod assets;
pub mod render;
pub mod config;

pub use core::{Error, Result};
