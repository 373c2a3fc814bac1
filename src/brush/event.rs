//! Input events consumed by the brush editor

use crate::core::types::{Quat, Vec3};

/// One pose sample from the locator device, already in domain space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputPose {
    pub position: Vec3,
    pub orientation: Quat,
    /// False while the device has no usable position (e.g. tracking lost)
    pub is_valid: bool,
}

impl InputPose {
    /// Valid pose at `position` with identity orientation
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
            is_valid: true,
        }
    }

    /// Pose flagged as unusable
    pub fn invalid() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            is_valid: false,
        }
    }
}

/// Discrete brush tool events
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BrushEvent {
    /// Device moved; one per input sample
    Motion(InputPose),
    /// Paint button pressed
    Press,
    /// Paint button released
    Release,
    /// Tool deactivated by the host; cancels any drag
    Deactivate,
}
