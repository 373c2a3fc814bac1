//! 1D convolution kernel profile.
//!
//! Only one scalar from the profile reaches the shader directly: the inverse
//! kernel area `0.5 * width * 255 / sum(samples)`, which rescales the
//! accumulated convolution back to unit weight. The profile itself is
//! uploaded as a lookup texture.

use std::path::Path;

use image::DynamicImage;

use crate::core::types::Result;
use crate::core::Error;

/// Width of the built-in triangle kernel
pub const DEFAULT_KERNEL_WIDTH: usize = 64;

/// Intensity samples of the kernel, 0..=255
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelProfile {
    samples: Vec<u8>,
}

impl KernelProfile {
    /// Wrap raw samples; an empty or all-zero profile has no area and is rejected
    pub fn from_samples(samples: Vec<u8>) -> Result<Self> {
        if samples.iter().all(|&s| s == 0) {
            return Err(Error::Asset("kernel profile has zero area".into()));
        }
        Ok(Self { samples })
    }

    /// Red channel of the first image row
    pub fn from_image(image: &DynamicImage) -> Result<Self> {
        let rgb = image.to_rgb8();
        if rgb.height() == 0 {
            return Err(Error::Asset("kernel image is empty".into()));
        }
        let samples = (0..rgb.width()).map(|x| rgb.get_pixel(x, 0)[0]).collect();
        Self::from_samples(samples)
    }

    /// Load a kernel image (PNG, PPM, ...) from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let image = image::open(path.as_ref())?;
        let kernel = Self::from_image(&image)?;
        log::info!(
            "Loaded kernel profile from {} (width {}, inverse area {:.4})",
            path.as_ref().display(), kernel.width(), kernel.inv_kernel_area()
        );
        Ok(kernel)
    }

    /// Symmetric tent peaking at 255 in the middle
    pub fn triangle(width: usize) -> Result<Self> {
        let w = width as f32;
        let samples = (0..width)
            .map(|i| {
                let t = 2.0 * (i as f32 + 0.5) / w - 1.0;
                (255.0 * (1.0 - t.abs())).round() as u8
            })
            .collect();
        Self::from_samples(samples)
    }

    /// `0.5 * width * 255 / sum(samples)`
    pub fn inv_kernel_area(&self) -> f32 {
        let sum: u64 = self.samples.iter().map(|&s| s as u64).sum();
        0.5 * self.width() as f32 * 255.0 / sum as f32
    }

    pub fn width(&self) -> usize {
        self.samples.len()
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }
}
