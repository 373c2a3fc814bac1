//! Press/drag state machine that stamps the mask while dragging

use crate::core::types::{Result, Vec3};
use crate::core::Error;
use crate::mask::{StampReport, VolumeMask};
use super::event::{BrushEvent, InputPose};

/// Brush radius in world units when none is configured
pub const DEFAULT_BRUSH_RADIUS: f32 = 0.03;

/// Value written into the mask by every stamp
pub const PAINT_VALUE: f32 = 1.0;

/// Drag state of the brush tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrushState {
    #[default]
    Idle,
    Dragging,
}

/// One brush tool session.
///
/// Holds no reference to the mask; the target is passed to [`BrushEditor::handle`]
/// so the caller decides which mask is being painted on each event.
#[derive(Debug, Clone)]
pub struct BrushEditor {
    cursor: Vec3,
    radius: f32,
    state: BrushState,
    has_valid_cursor: bool,
}

impl BrushEditor {
    /// Create an idle editor with the default radius and no cursor yet
    pub fn new() -> Self {
        Self {
            cursor: Vec3::ZERO,
            radius: DEFAULT_BRUSH_RADIUS,
            state: BrushState::Idle,
            has_valid_cursor: false,
        }
    }

    /// Create an idle editor with the given radius
    pub fn with_radius(radius: f32) -> Result<Self> {
        let mut editor = Self::new();
        editor.set_radius(radius)?;
        Ok(editor)
    }

    /// Feed one input event; returns the stamp it produced, if any.
    pub fn handle(&mut self, event: BrushEvent, mask: &mut VolumeMask) -> Option<StampReport> {
        match event {
            BrushEvent::Motion(pose) => self.on_motion(pose, mask),
            BrushEvent::Press => {
                self.on_press();
                None
            }
            BrushEvent::Release => {
                self.on_release();
                None
            }
            BrushEvent::Deactivate => {
                self.cancel();
                None
            }
        }
    }

    fn on_motion(&mut self, pose: InputPose, mask: &mut VolumeMask) -> Option<StampReport> {
        self.has_valid_cursor = pose.is_valid;
        if pose.is_valid {
            self.cursor = pose.position;
        }
        log::trace!("Brush motion to {} (valid: {})", pose.position, pose.is_valid);

        if self.state == BrushState::Dragging && self.has_valid_cursor {
            Some(mask.stamp_brush(self.cursor, self.radius, PAINT_VALUE))
        } else {
            None
        }
    }

    fn on_press(&mut self) {
        if !self.has_valid_cursor {
            log::debug!("Brush press ignored: no valid cursor yet");
            return;
        }
        self.state = BrushState::Dragging;
    }

    fn on_release(&mut self) {
        self.state = BrushState::Idle;
    }

    /// Drop out of a drag without a final stamp
    pub fn cancel(&mut self) {
        if self.state == BrushState::Dragging {
            log::debug!("Brush drag cancelled");
        }
        self.state = BrushState::Idle;
    }

    /// Set the outer brush radius in world units
    pub fn set_radius(&mut self, radius: f32) -> Result<()> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(Error::InvalidBrushRadius(radius));
        }
        self.radius = radius;
        Ok(())
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn cursor(&self) -> Vec3 {
        self.cursor
    }

    pub fn state(&self) -> BrushState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state == BrushState::Dragging
    }

    pub fn has_valid_cursor(&self) -> bool {
        self.has_valid_cursor
    }
}

impl Default for BrushEditor {
    fn default() -> Self {
        Self::new()
    }
}
