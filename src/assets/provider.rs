//! Sources for the static LIC assets

use std::path::PathBuf;

use crate::core::types::{Result, UVec3};
use super::kernel::{KernelProfile, DEFAULT_KERNEL_WIDTH};
use super::noise::{NoiseVolume, DEFAULT_NOISE_SIZE};

/// Logical name of the standard noise volume
pub const NOISE_ASSET: &str = "Noise/noise-256";

/// Logical name of the standard kernel profile
pub const KERNEL_ASSET: &str = "Kernel/triangleKernel.png";

/// Supplies static assets by logical name
pub trait AssetProvider {
    fn noise_volume(&self, name: &str) -> Result<NoiseVolume>;
    fn kernel_profile(&self, name: &str) -> Result<KernelProfile>;
}

/// Resolves logical names as paths relative to a shared data directory
#[derive(Debug, Clone)]
pub struct DirAssetProvider {
    root: PathBuf,
}

impl DirAssetProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

impl AssetProvider for DirAssetProvider {
    fn noise_volume(&self, name: &str) -> Result<NoiseVolume> {
        NoiseVolume::load(self.root.join(name))
    }

    fn kernel_profile(&self, name: &str) -> Result<KernelProfile> {
        KernelProfile::load(self.root.join(name))
    }
}

/// Procedural assets; never fails. Also the renderer's fallback.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinAssets {
    pub noise_size: u32,
    pub noise_seed: u32,
    pub kernel_width: usize,
}

impl Default for BuiltinAssets {
    fn default() -> Self {
        Self {
            noise_size: DEFAULT_NOISE_SIZE,
            noise_seed: 0x5eed,
            kernel_width: DEFAULT_KERNEL_WIDTH,
        }
    }
}

impl AssetProvider for BuiltinAssets {
    fn noise_volume(&self, _name: &str) -> Result<NoiseVolume> {
        NoiseVolume::white(UVec3::splat(self.noise_size), self.noise_seed)
    }

    fn kernel_profile(&self, _name: &str) -> Result<KernelProfile> {
        KernelProfile::triangle(self.kernel_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;

    #[test]
    fn test_builtin_assets() {
        let assets = BuiltinAssets::default();
        let noise = assets.noise_volume(NOISE_ASSET).unwrap();
        assert_eq!(noise.dims(), UVec3::splat(DEFAULT_NOISE_SIZE));
        let kernel = assets.kernel_profile(KERNEL_ASSET).unwrap();
        assert_eq!(kernel.width(), DEFAULT_KERNEL_WIDTH);
    }

    #[test]
    fn test_dir_provider_resolves_names() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("Noise")).unwrap();
        let noise = NoiseVolume::white(UVec3::splat(4), 3).unwrap();
        std::fs::write(dir.path().join(NOISE_ASSET), noise.to_bytes()).unwrap();

        let provider = DirAssetProvider::new(dir.path());
        assert_eq!(provider.noise_volume(NOISE_ASSET).unwrap(), noise);
        assert!(provider.kernel_profile(KERNEL_ASSET).is_err());
    }

    #[test]
    fn test_dir_provider_missing_noise() {
        let dir = tempfile::tempdir().unwrap();
        let provider = DirAssetProvider::new(dir.path());
        assert!(matches!(provider.noise_volume(NOISE_ASSET), Err(Error::Io(_))));
    }
}
