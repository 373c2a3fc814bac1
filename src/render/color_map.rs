//! Transfer function lookup table for the LIC raycaster.

use crate::core::types::Vec4;

/// Number of entries in every color map table
pub const COLOR_MAP_SIZE: usize = 256;

/// 256-entry RGBA lookup table indexed by normalized LIC intensity.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMap {
    entries: Vec<Vec4>,
}

impl ColorMap {
    /// Build the table by linearly interpolating `(position, rgba)` keys.
    ///
    /// Positions are clamped to `[0, 1]`; entries before the first key or
    /// after the last take that key's color. An empty key list gives a fully
    /// transparent black map.
    pub fn from_keys(keys: &[(f32, Vec4)]) -> Self {
        let mut keys: Vec<(f32, Vec4)> = keys.iter().map(|&(t, c)| (t.clamp(0.0, 1.0), c)).collect();
        keys.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let entries = (0..COLOR_MAP_SIZE)
            .map(|i| {
                let t = i as f32 / (COLOR_MAP_SIZE - 1) as f32;
                sample_keys(&keys, t)
            })
            .collect();
        Self { entries }
    }

    /// Black-to-white ramp with alpha rising from 0 to 1
    pub fn grayscale() -> Self {
        Self::from_keys(&[(0.0, Vec4::ZERO), (1.0, Vec4::ONE)])
    }

    /// Nearest entry for `t` in `[0, 1]`
    pub fn sample(&self, t: f32) -> Vec4 {
        let i = (t.clamp(0.0, 1.0) * (COLOR_MAP_SIZE - 1) as f32).round() as usize;
        self.entries[i]
    }

    /// Rescale opacity for a different integration step: `a' = 1 - (1 - a)^exponent`.
    pub fn change_transparency(&mut self, exponent: f32) {
        for e in &mut self.entries {
            e.w = 1.0 - (1.0 - e.w.clamp(0.0, 1.0)).powf(exponent);
        }
    }

    /// Multiply color channels by alpha
    pub fn premultiply_alpha(&mut self) {
        for e in &mut self.entries {
            let a = e.w;
            e.x *= a;
            e.y *= a;
            e.z *= a;
        }
    }

    pub fn entries(&self) -> &[Vec4] {
        &self.entries
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        Self::grayscale()
    }
}

fn sample_keys(keys: &[(f32, Vec4)], t: f32) -> Vec4 {
    let Some(&(first_t, first_c)) = keys.first() else {
        return Vec4::ZERO;
    };
    if t <= first_t {
        return first_c;
    }
    for pair in keys.windows(2) {
        let ((t0, c0), (t1, c1)) = (pair[0], pair[1]);
        if t <= t1 {
            let span = t1 - t0;
            if span < 1e-6 {
                return c1;
            }
            return c0.lerp(c1, (t - t0) / span);
        }
    }
    keys[keys.len() - 1].1
}
