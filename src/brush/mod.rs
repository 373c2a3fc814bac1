//! Interactive mask painting.
//!
//! The input device produces poses and button events; [`BrushEditor`] turns
//! them into brush stamps on a [`crate::mask::VolumeMask`] while the button
//! is held.

pub mod editor;
pub mod event;

pub use editor::{BrushEditor, BrushState, DEFAULT_BRUSH_RADIUS, PAINT_VALUE};
pub use event::{BrushEvent, InputPose};
