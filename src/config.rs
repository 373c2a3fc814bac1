//! Session configuration.
//!
//! Everything has a default, so a JSON file only needs the keys it changes:
//!
//! ```json
//! { "brush_radius": 0.05, "lic": { "forward_steps": 48 } }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::assets::{KERNEL_ASSET, NOISE_ASSET};
use crate::brush::DEFAULT_BRUSH_RADIUS;
use crate::core::types::Result;
use crate::core::Error;
use crate::render::LicSettings;

/// User-facing configuration for a painting + LIC session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicConfig {
    /// Outer brush radius in world units
    pub brush_radius: f32,
    /// Raycaster step size; scales color map opacity
    pub step_size: f32,
    /// Opacity adjustment applied on top of the step size
    pub transparency_gamma: f32,
    /// LIC integration settings
    pub lic: LicSettings,
    /// Directory the asset names are resolved against; built-in assets when unset
    pub asset_dir: Option<PathBuf>,
    /// Logical name of the noise volume
    pub noise_asset: String,
    /// Logical name of the kernel profile
    pub kernel_asset: String,
}

impl Default for LicConfig {
    fn default() -> Self {
        Self {
            brush_radius: DEFAULT_BRUSH_RADIUS,
            step_size: 1.0,
            transparency_gamma: 1.0,
            lic: LicSettings::default(),
            asset_dir: None,
            noise_asset: NOISE_ASSET.to_string(),
            kernel_asset: KERNEL_ASSET.to_string(),
        }
    }
}

impl LicConfig {
    /// Reject values the renderer or brush cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(self.brush_radius.is_finite() && self.brush_radius > 0.0) {
            return Err(Error::InvalidBrushRadius(self.brush_radius));
        }
        if !(self.step_size.is_finite() && self.step_size > 0.0) {
            return Err(Error::InvalidConfig(format!("step size must be positive, got {}", self.step_size)));
        }
        if !(self.transparency_gamma.is_finite() && self.transparency_gamma >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "transparency gamma must be non-negative, got {}", self.transparency_gamma
            )));
        }
        self.lic.validate()
    }

    /// Load and validate from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Save as pretty JSON, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }
}
