//! 3D scalar noise volume.
//!
//! File layout: three little-endian `u32` dimensions followed by
//! `dims.x * dims.y * dims.z` intensity bytes, x fastest.

use std::path::Path;

use crate::core::types::{Result, UVec3};
use crate::core::Error;

/// Edge length of the procedural fallback volume
pub const DEFAULT_NOISE_SIZE: u32 = 64;

const HEADER_LEN: usize = 12;

/// Intensity noise sampled with repeat wrapping by the LIC shader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoiseVolume {
    dims: UVec3,
    data: Vec<u8>,
}

impl NoiseVolume {
    pub fn new(dims: UVec3, data: Vec<u8>) -> Result<Self> {
        let expected = voxel_count(dims)?;
        if data.len() != expected {
            return Err(Error::Asset(format!(
                "noise volume {}x{}x{} needs {} bytes, got {}",
                dims.x, dims.y, dims.z, expected, data.len()
            )));
        }
        Ok(Self { dims, data })
    }

    /// Parse the header + payload layout
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(Error::Asset(format!(
                "noise header truncated: {} of {} bytes", bytes.len(), HEADER_LEN
            )));
        }

        let mut dims = UVec3::ZERO;
        for (axis, chunk) in bytes[..HEADER_LEN].chunks_exact(4).enumerate() {
            dims[axis] = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }

        let expected = voxel_count(dims)?;
        let payload = &bytes[HEADER_LEN..];
        if payload.len() < expected {
            return Err(Error::Asset(format!(
                "noise payload truncated: {} of {} bytes", payload.len(), expected
            )));
        }
        if payload.len() > expected {
            log::debug!("Ignoring {} trailing bytes after noise payload", payload.len() - expected);
        }

        Ok(Self { dims, data: payload[..expected].to_vec() })
    }

    /// Serialize to the header + payload layout
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_LEN + self.data.len());
        for d in self.dims.to_array() {
            bytes.extend_from_slice(&d.to_le_bytes());
        }
        bytes.extend_from_slice(&self.data);
        bytes
    }

    /// Read a noise file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        let noise = Self::from_bytes(&bytes)?;
        log::info!(
            "Loaded noise volume {}x{}x{} from {}",
            noise.dims.x, noise.dims.y, noise.dims.z, path.as_ref().display()
        );
        Ok(noise)
    }

    /// Deterministic white noise, used when no noise file is available
    pub fn white(dims: UVec3, seed: u32) -> Result<Self> {
        let len = voxel_count(dims)?;
        let (nx, ny) = (dims.x as usize, dims.y as usize);
        let data = (0..len)
            .map(|i| {
                let (x, y, z) = (i % nx, (i / nx) % ny, i / (nx * ny));
                (hash_3d(x as u32, y as u32, z as u32, seed) >> 24) as u8
            })
            .collect();
        Ok(Self { dims, data })
    }

    pub fn dims(&self) -> UVec3 {
        self.dims
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

fn voxel_count(dims: UVec3) -> Result<usize> {
    dims.to_array()
        .iter()
        .try_fold(1usize, |acc, &d| if d == 0 { None } else { acc.checked_mul(d as usize) })
        .ok_or(Error::InvalidDimensions(dims))
}

/// Integer hash for per-voxel noise
fn hash_3d(x: u32, y: u32, z: u32, seed: u32) -> u32 {
    let mut h = seed;
    h ^= x;
    h = h.wrapping_mul(0x45d9f3b);
    h ^= h >> 16;
    h ^= y;
    h = h.wrapping_mul(0x45d9f3b);
    h ^= h >> 16;
    h ^= z;
    h = h.wrapping_mul(0x45d9f3b);
    h ^= h >> 16;
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip_header() {
        let noise = NoiseVolume::new(UVec3::new(2, 3, 1), vec![1, 2, 3, 4, 5, 6]).unwrap();
        let bytes = noise.to_bytes();
        assert_eq!(&bytes[..4], &2u32.to_le_bytes());
        assert_eq!(bytes.len(), 12 + 6);
        assert_eq!(NoiseVolume::from_bytes(&bytes).unwrap(), noise);
    }

    #[test]
    fn test_truncated_header() {
        assert!(matches!(NoiseVolume::from_bytes(&[0u8; 8]), Err(Error::Asset(_))));
    }

    #[test]
    fn test_truncated_payload() {
        let mut bytes = Vec::new();
        for d in [4u32, 4, 4] {
            bytes.extend_from_slice(&d.to_le_bytes());
        }
        bytes.extend_from_slice(&[0u8; 63]);
        assert!(matches!(NoiseVolume::from_bytes(&bytes), Err(Error::Asset(_))));
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut bytes = NoiseVolume::new(UVec3::ONE, vec![9]).unwrap().to_bytes();
        bytes.extend_from_slice(&[1, 2, 3]);
        assert_eq!(NoiseVolume::from_bytes(&bytes).unwrap().data(), &[9]);
    }

    #[test]
    fn test_zero_dims_rejected() {
        let mut bytes = Vec::new();
        for d in [4u32, 0, 4] {
            bytes.extend_from_slice(&d.to_le_bytes());
        }
        assert!(matches!(NoiseVolume::from_bytes(&bytes), Err(Error::InvalidDimensions(_))));
    }

    #[test]
    fn test_white_noise_deterministic_and_varied() {
        let a = NoiseVolume::white(UVec3::splat(8), 7).unwrap();
        let b = NoiseVolume::white(UVec3::splat(8), 7).unwrap();
        let c = NoiseVolume::white(UVec3::splat(8), 8).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.data().len(), 512);
        let distinct: std::collections::HashSet<u8> = a.data().iter().copied().collect();
        assert!(distinct.len() > 32);
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise-4");
        let noise = NoiseVolume::white(UVec3::splat(4), 1).unwrap();
        std::fs::write(&path, noise.to_bytes()).unwrap();
        assert_eq!(NoiseVolume::load(&path).unwrap(), noise);
        assert!(matches!(NoiseVolume::load(dir.path().join("missing")), Err(Error::Io(_))));
    }
}
