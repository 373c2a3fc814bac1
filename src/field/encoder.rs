//! Vector field → RGBA texture encoding.
//!
//! Each cell becomes `[dx, dy, dz, m]`: the unit direction remapped from
//! `[-1, 1]` to `[0, 1]`, and the magnitude divided by the largest magnitude
//! in the whole field. The global normalization needs the maximum before any
//! magnitude can be finalized, so encoding is always two full passes.

use half::f16;
use rayon::prelude::*;

use crate::core::types::{Result, UVec3, Vec3};
use crate::core::Error;
use super::source::VectorField;

/// Vectors shorter than this encode as "no direction"
pub const NEAR_ZERO_MAGNITUDE: f32 = 1e-5;

/// Direction channels of a cell without direction
pub const NEUTRAL_DIRECTION: [f32; 3] = [0.5, 0.5, 0.5];

/// Direction + normalized magnitude per cell, row-major like the source grid
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedField {
    pub dims: UVec3,
    pub samples: Vec<[f32; 4]>,
    /// Version of the raw field this was derived from
    pub source_version: u64,
    /// Largest raw magnitude seen (the normalization divisor)
    pub max_magnitude: f32,
}

impl EncodedField {
    /// Four half-float channels per cell, ready for an RGBA16F volume upload
    pub fn texels_rgba16f(&self) -> Vec<f16> {
        let floats: &[f32] = bytemuck::cast_slice(&self.samples);
        floats.iter().map(|&v| f16::from_f32(v)).collect()
    }
}

/// Stateless encoder; output depends only on the input samples.
pub struct FieldEncoder;

impl FieldEncoder {
    /// Encode `raw` laid out on a grid of `dims` cells.
    pub fn encode(raw: &[Vec3], dims: UVec3) -> Result<EncodedField> {
        let expected = dims
            .to_array()
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d as usize))
            .ok_or(Error::InvalidDimensions(dims))?;
        if raw.len() != expected {
            return Err(Error::FieldSizeMismatch { expected, actual: raw.len() });
        }

        let mut samples = vec![[0.0f32; 4]; raw.len()];

        // Pass 1: directions, raw magnitudes, global maximum
        let max_magnitude = samples
            .par_iter_mut()
            .zip(raw.par_iter())
            .map(|(out, v)| encode_direction(*v, out))
            .reduce(|| 0.0, f32::max);

        // Pass 2: normalize magnitudes by the maximum
        if max_magnitude > 0.0 {
            samples.par_iter_mut().for_each(|out| {
                out[3] = (out[3] / max_magnitude).clamp(0.0, 1.0);
            });
        } else {
            samples.par_iter_mut().for_each(|out| out[3] = 0.0);
        }

        Ok(EncodedField {
            dims,
            samples,
            source_version: 0,
            max_magnitude,
        })
    }

    /// Encode a versioned field, stamping the result with the field's version
    pub fn encode_field(field: &VectorField) -> Result<EncodedField> {
        let mut encoded = Self::encode(field.samples(), field.grid().dims())?;
        encoded.source_version = field.version();
        Ok(encoded)
    }
}

/// Write the remapped direction and raw magnitude of `v` into `out`, returning the magnitude.
///
/// Non-finite vectors are treated like zero vectors.
#[inline]
fn encode_direction(v: Vec3, out: &mut [f32; 4]) -> f32 {
    let len = v.length();
    if !(len >= NEAR_ZERO_MAGNITUDE && len.is_finite()) {
        out[..3].copy_from_slice(&NEUTRAL_DIRECTION);
        out[3] = 0.0;
        return 0.0;
    }

    let dir = (0.5 * v / len + 0.5).clamp(Vec3::ZERO, Vec3::ONE);
    out[..3].copy_from_slice(&dir.to_array());
    out[3] = len;
    len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Grid;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_uniform_field_has_unit_magnitude() {
        let raw = vec![Vec3::new(2.0, -1.0, 0.5); 27];
        let encoded = FieldEncoder::encode(&raw, UVec3::splat(3)).unwrap();
        let dir = Vec3::new(2.0, -1.0, 0.5).normalize() * 0.5 + 0.5;
        for s in &encoded.samples {
            assert!(approx(s[3], 1.0));
            assert!(approx(s[0], dir.x) && approx(s[1], dir.y) && approx(s[2], dir.z));
        }
    }

    #[test]
    fn test_zero_field_is_neutral() {
        let raw = vec![Vec3::ZERO; 8];
        let encoded = FieldEncoder::encode(&raw, UVec3::splat(2)).unwrap();
        assert_eq!(encoded.max_magnitude, 0.0);
        assert!(encoded.samples.iter().all(|s| *s == [0.5, 0.5, 0.5, 0.0]));
    }

    #[test]
    fn test_single_nonzero_vector() {
        let mut raw = vec![Vec3::ZERO; 8];
        raw[5] = Vec3::new(3.0, 4.0, 0.0);
        let encoded = FieldEncoder::encode(&raw, UVec3::splat(2)).unwrap();

        let s = encoded.samples[5];
        assert!(approx(s[0], 0.8));
        assert!(approx(s[1], 0.9));
        assert!(approx(s[2], 0.5));
        assert!(approx(s[3], 1.0));
        assert!(approx(encoded.max_magnitude, 5.0));

        for (i, s) in encoded.samples.iter().enumerate() {
            if i != 5 {
                assert_eq!(*s, [0.5, 0.5, 0.5, 0.0]);
            }
        }
    }

    #[test]
    fn test_magnitudes_normalized_by_global_max() {
        let raw = vec![Vec3::X, Vec3::X * 2.0, Vec3::Y * 4.0, Vec3::ZERO];
        let encoded = FieldEncoder::encode(&raw, UVec3::new(4, 1, 1)).unwrap();
        let mags: Vec<f32> = encoded.samples.iter().map(|s| s[3]).collect();
        assert!(approx(mags[0], 0.25));
        assert!(approx(mags[1], 0.5));
        assert!(approx(mags[2], 1.0));
        assert_eq!(mags[3], 0.0);
    }

    #[test]
    fn test_near_zero_threshold() {
        let raw = vec![Vec3::X * 1e-6, Vec3::X * 1e-3];
        let encoded = FieldEncoder::encode(&raw, UVec3::new(2, 1, 1)).unwrap();
        assert_eq!(encoded.samples[0], [0.5, 0.5, 0.5, 0.0]);
        assert!(approx(encoded.samples[1][0], 1.0));
        assert!(approx(encoded.samples[1][3], 1.0));
    }

    #[test]
    fn test_channels_stay_in_unit_range() {
        let raw: Vec<Vec3> = (0..64)
            .map(|i| {
                let t = i as f32 * 0.37;
                Vec3::new(t.sin() * 1e3, (t * 1.7).cos() * -250.0, t - 20.0)
            })
            .collect();
        let encoded = FieldEncoder::encode(&raw, UVec3::splat(4)).unwrap();
        for s in &encoded.samples {
            assert!(s.iter().all(|c| (0.0..=1.0).contains(c)), "{:?}", s);
        }
    }

    #[test]
    fn test_non_finite_treated_as_zero() {
        let raw = vec![Vec3::new(f32::NAN, 0.0, 0.0), Vec3::splat(f32::INFINITY), Vec3::Z];
        let encoded = FieldEncoder::encode(&raw, UVec3::new(3, 1, 1)).unwrap();
        assert_eq!(encoded.samples[0], [0.5, 0.5, 0.5, 0.0]);
        assert_eq!(encoded.samples[1], [0.5, 0.5, 0.5, 0.0]);
        assert!(approx(encoded.samples[2][3], 1.0));
    }

    #[test]
    fn test_deterministic() {
        let raw: Vec<Vec3> = (0..1000).map(|i| Vec3::new(i as f32, (i % 7) as f32, -1.0)).collect();
        let a = FieldEncoder::encode(&raw, UVec3::new(10, 10, 10)).unwrap();
        let b = FieldEncoder::encode(&raw, UVec3::new(10, 10, 10)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_size_mismatch() {
        let err = FieldEncoder::encode(&[Vec3::X; 5], UVec3::splat(2)).unwrap_err();
        assert!(matches!(err, Error::FieldSizeMismatch { expected: 8, actual: 5 }));
    }

    #[test]
    fn test_encode_field_stamps_version() {
        let mut field = VectorField::zeros(Grid::cube(2).unwrap());
        field.update_data();
        field.update_data();
        let encoded = FieldEncoder::encode_field(&field).unwrap();
        assert_eq!(encoded.source_version, 2);
        assert_eq!(encoded.dims, UVec3::splat(2));
    }

    #[test]
    fn test_texels_rgba16f() {
        let encoded = FieldEncoder::encode(&[Vec3::X], UVec3::ONE).unwrap();
        let texels = encoded.texels_rgba16f();
        assert_eq!(texels.len(), 4);
        assert_eq!(texels[0].to_f32(), 1.0);
        assert_eq!(texels[1].to_f32(), 0.5);
        assert_eq!(texels[3].to_f32(), 1.0);
    }
}
