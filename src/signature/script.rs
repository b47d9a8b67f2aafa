//! Replay of recorded pointer input through a signature pad.
//!
//! A stroke script is a JSON document describing where the pad sits on screen and the
//! sequence of client-space pointer events it receives:
//!
//! ```json
//! {
//!   "origin": [120, 340],
//!   "width": 300,
//!   "events": [
//!     { "type": "down", "x": 130, "y": 350 },
//!     { "type": "move", "x": 130, "y": 440 },
//!     { "type": "up" }
//!   ]
//! }
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::events::{ClientRect, PointerEvent, PointerInput, TouchPoint};
use super::pad::SignaturePad;
use super::types::{SignatureError, SignatureSettings};

fn default_width() -> u32 {
    300
}

/// Recorded pad layout plus pointer events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrokeScript {
    /// Client-space position of the surface's top-left corner
    #[serde(default)]
    pub origin: [f64; 2],
    /// Rendered surface width in pixels
    #[serde(default = "default_width")]
    pub width: u32,
    pub events: Vec<ScriptEvent>,
}

/// One recorded input event (client coordinates).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
    Leave,
    TouchStart { touches: Vec<[f64; 2]> },
    TouchMove { touches: Vec<[f64; 2]> },
    TouchEnd,
    /// Press of the pad's clear control
    Clear,
    /// The page scrolled or the layout shifted the surface to a new origin
    Reposition { left: f64, top: f64 },
}

/// Final state after replaying a script.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayOutcome {
    /// Last value delivered to the save callback (`None` if cleared or never saved)
    pub saved: Option<String>,
    pub has_signature: bool,
    /// Number of times the save callback fired
    pub save_count: usize,
}

fn touches(points: &[[f64; 2]]) -> PointerInput {
    PointerInput::Touch {
        touches: points
            .iter()
            .map(|[x, y]| TouchPoint {
                client_x: *x,
                client_y: *y,
            })
            .collect(),
    }
}

impl StrokeScript {
    /// Parses a script from JSON text.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Drives a fresh pad with every event and reports what the caller would have stored.
    pub fn replay(&self, settings: SignatureSettings) -> Result<ReplayOutcome, SignatureError> {
        let saved: Rc<RefCell<(Option<String>, usize)>> = Rc::new(RefCell::new((None, 0)));
        let sink = Rc::clone(&saved);

        let mut pad = SignaturePad::new(settings);
        pad.on_stroke_complete(move |value| {
            let mut slot = sink.borrow_mut();
            slot.0 = value;
            slot.1 += 1;
        });

        let mut rect = ClientRect::new(
            self.origin[0],
            self.origin[1],
            self.width as f64,
            settings.height as f64,
        );
        pad.attach(rect)?;

        for event in &self.events {
            match event {
                ScriptEvent::Down { x, y } => {
                    pad.handle_event(&PointerEvent::Down(PointerInput::mouse(*x, *y)))
                }
                ScriptEvent::Move { x, y } => {
                    pad.handle_event(&PointerEvent::Move(PointerInput::mouse(*x, *y)))
                }
                ScriptEvent::Up | ScriptEvent::TouchEnd => pad.handle_event(&PointerEvent::Up),
                ScriptEvent::Leave => pad.handle_event(&PointerEvent::Leave),
                ScriptEvent::TouchStart { touches: points } => {
                    pad.handle_event(&PointerEvent::Down(touches(points)))
                }
                ScriptEvent::TouchMove { touches: points } => {
                    pad.handle_event(&PointerEvent::Move(touches(points)))
                }
                ScriptEvent::Clear => pad.clear(),
                ScriptEvent::Reposition { left, top } => {
                    rect = rect.moved_to(*left, *top);
                    pad.attach(rect)?;
                }
            }
        }

        let has_signature = pad.has_signature();
        drop(pad);
        let (saved, save_count) = saved.take();
        Ok(ReplayOutcome {
            saved,
            has_signature,
            save_count,
        })
    }
}
