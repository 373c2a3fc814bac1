//! LIC shader parameters.
//!
//! The shader takes three vec3 uniforms:
//! - `gradient`: gradient estimation scale factors
//! - `licParams`: forward steps, backward steps, LIC step size
//! - `licKernel`: per-step kernel advance forward/backward, and the
//!   inverse kernel area spread over all steps

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::core::types::Result;
use crate::core::Error;

/// Tunable LIC integration settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicSettings {
    /// Gradient scale factors
    pub gradient: [f32; 3],
    /// Integration steps along the flow
    pub forward_steps: u32,
    /// Integration steps against the flow
    pub backward_steps: u32,
    /// Streamline step length in texture space
    pub lic_step_size: f32,
}

impl Default for LicSettings {
    fn default() -> Self {
        Self {
            gradient: [30.0, 1.0, 6.0],
            forward_steps: 32,
            backward_steps: 32,
            lic_step_size: 1.0 / 150.0,
        }
    }
}

impl LicSettings {
    pub fn validate(&self) -> Result<()> {
        if self.forward_steps == 0 || self.backward_steps == 0 {
            return Err(Error::InvalidConfig(format!(
                "LIC step counts must be positive (forward {}, backward {})",
                self.forward_steps, self.backward_steps
            )));
        }
        if !(self.lic_step_size.is_finite() && self.lic_step_size > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "LIC step size must be positive, got {}", self.lic_step_size
            )));
        }
        if self.gradient.iter().any(|g| !g.is_finite()) {
            return Err(Error::InvalidConfig("gradient factors must be finite".into()));
        }
        Ok(())
    }
}

/// Full parameter set for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LicParams {
    pub gradient: [f32; 3],
    pub lic_kernel: [f32; 3],
    pub lic_params: [f32; 3],
    /// Raycaster step size
    pub step_size: f32,
    pub transparency_gamma: f32,
}

impl LicParams {
    pub fn derive(settings: &LicSettings, inv_kernel_area: f32, step_size: f32, transparency_gamma: f32) -> Self {
        let forward = settings.forward_steps as f32;
        let backward = settings.backward_steps as f32;
        Self {
            gradient: settings.gradient,
            lic_kernel: [0.5 / forward, 0.5 / backward, inv_kernel_area / (forward + backward)],
            lic_params: [forward, backward, settings.lic_step_size],
            step_size,
            transparency_gamma,
        }
    }

    /// Pack into the std140-compatible uniform block
    pub fn to_uniforms(&self) -> LicUniforms {
        LicUniforms {
            gradient: self.gradient,
            step_size: self.step_size,
            lic_kernel: self.lic_kernel,
            transparency_gamma: self.transparency_gamma,
            lic_params: self.lic_params,
            _pad: 0.0,
        }
    }
}

/// LIC uniform block (must match shader struct exactly).
/// Each vec3 shares its 16-byte row with a trailing scalar.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct LicUniforms {
    /// offset 0
    pub gradient: [f32; 3],
    /// offset 12
    pub step_size: f32,
    /// offset 16
    pub lic_kernel: [f32; 3],
    /// offset 28
    pub transparency_gamma: f32,
    /// offset 32
    pub lic_params: [f32; 3],
    /// Padding to 48 bytes
    pub _pad: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_derivation() {
        let params = LicParams::derive(&LicSettings::default(), 1.0, 1.0, 1.0);
        assert_eq!(params.gradient, [30.0, 1.0, 6.0]);
        assert_eq!(params.lic_params, [32.0, 32.0, 1.0 / 150.0]);
        assert_eq!(params.lic_kernel[0], 0.5 / 32.0);
        assert_eq!(params.lic_kernel[1], 0.5 / 32.0);
        assert_eq!(params.lic_kernel[2], 1.0 / 64.0);
    }

    #[test]
    fn test_kernel_area_spread_over_steps() {
        let settings = LicSettings { forward_steps: 10, backward_steps: 30, ..Default::default() };
        let params = LicParams::derive(&settings, 2.0, 1.0, 1.0);
        assert_eq!(params.lic_kernel, [0.05, 0.5 / 30.0, 0.05]);
    }

    #[test]
    fn test_validate() {
        assert!(LicSettings::default().validate().is_ok());
        let zero_steps = LicSettings { forward_steps: 0, ..Default::default() };
        assert!(matches!(zero_steps.validate(), Err(Error::InvalidConfig(_))));
        let bad_step = LicSettings { lic_step_size: -1.0, ..Default::default() };
        assert!(bad_step.validate().is_err());
        let bad_gradient = LicSettings { gradient: [f32::NAN, 1.0, 1.0], ..Default::default() };
        assert!(bad_gradient.validate().is_err());
    }

    #[test]
    fn test_uniform_layout() {
        assert_eq!(std::mem::size_of::<LicUniforms>(), 48);
        let params = LicParams::derive(&LicSettings::default(), 1.0, 0.25, 2.0);
        let uniforms = params.to_uniforms();
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&uniforms));
        assert_eq!(floats[3], 0.25);
        assert_eq!(floats[7], 2.0);
        assert_eq!(floats[8], 32.0);
    }
}
