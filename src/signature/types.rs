//! Data types for signature capture.

use crate::config::SignatureConfig;
use crate::draw::{BLACK, Color};
use thiserror::Error;

use super::events::LocalPoint;

/// Errors that can occur while capturing or encoding a signature.
#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("Invalid signature surface size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("Failed to encode signature image: {0}")]
    Encode(#[from] cairo::IoError),
}

/// Pen appearance for signature strokes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    /// Line width in surface pixels
    pub line_width: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: BLACK,
            line_width: 2.0,
        }
    }
}

/// Signature pad settings resolved from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignatureSettings {
    /// Fixed surface height in pixels (width comes from the host layout)
    pub height: u32,
    pub style: StrokeStyle,
}

impl Default for SignatureSettings {
    fn default() -> Self {
        Self {
            height: 200,
            style: StrokeStyle::default(),
        }
    }
}

impl From<&SignatureConfig> for SignatureSettings {
    fn from(config: &SignatureConfig) -> Self {
        Self {
            height: config.height,
            style: StrokeStyle {
                color: config.stroke_color.to_color(),
                line_width: config.line_width,
            },
        }
    }
}

/// Points traced while the pointer is held down.
///
/// Strokes are transient: each segment is painted as soon as it is appended and the
/// stroke itself is dropped when the pointer is released.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stroke {
    pub points: Vec<LocalPoint>,
}

impl Stroke {
    pub fn starting_at(point: LocalPoint) -> Self {
        Self {
            points: vec![point],
        }
    }

    pub fn last(&self) -> Option<LocalPoint> {
        self.points.last().copied()
    }

    /// Number of connecting segments painted so far.
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }
}
