//! Static LIC inputs: the noise volume being convolved and the kernel profile.
//!
//! Both are loaded once before the render loop. Loading sits behind
//! [`AssetProvider`]; the renderer falls back to procedural versions when a
//! provider fails.

pub mod noise;
pub mod kernel;
pub mod provider;

pub use noise::{NoiseVolume, DEFAULT_NOISE_SIZE};
pub use kernel::{KernelProfile, DEFAULT_KERNEL_WIDTH};
pub use provider::{AssetProvider, BuiltinAssets, DirAssetProvider, KERNEL_ASSET, NOISE_ASSET};
