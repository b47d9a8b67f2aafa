//! Freehand signature capture.
//!
//! This module turns pointer gestures into a raster image:
//! - Mouse and touch input normalization into surface-local coordinates
//! - A persistent transparent surface that every stroke is painted onto
//! - The pad state machine exposing only a save/clear contract
//! - Replay of recorded pointer scripts (used by the CLI)

pub mod events;
pub mod pad;
pub mod script;
pub mod surface;
pub mod types;

#[cfg(test)]
mod tests;

pub use events::{ClientRect, LocalPoint, PointerEvent, PointerInput, TouchPoint};
pub use pad::{CaptureState, SaveCallback, SignaturePad};
pub use script::{ReplayOutcome, ScriptEvent, StrokeScript};
pub use surface::{SIGNATURE_MIME_TYPE, SignatureSurface};
pub use types::{SignatureError, SignatureSettings, Stroke, StrokeStyle};
