//! Pointer event types and client-to-surface coordinate mapping.
//!
//! Mouse and touch input arrive in viewport (client) coordinates. Both shapes are
//! folded into one [`PointerInput`] and normalized once into a [`LocalPoint`].

/// A point in surface-local coordinates (origin at the surface's top-left corner).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalPoint {
    pub x: f64,
    pub y: f64,
}

impl LocalPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn as_tuple(self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// On-screen bounding box of the drawing surface, in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClientRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ClientRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Same size, different on-screen origin.
    pub fn moved_to(self, left: f64, top: f64) -> Self {
        Self { left, top, ..self }
    }
}

/// One active touch contact, in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub client_x: f64,
    pub client_y: f64,
}

/// Position-carrying input from either a mouse or a touch screen.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerInput {
    /// Mouse/pen pointer position
    Mouse { client_x: f64, client_y: f64 },
    /// Touch event with all currently active contacts (first one wins)
    Touch { touches: Vec<TouchPoint> },
}

impl PointerInput {
    pub fn mouse(client_x: f64, client_y: f64) -> Self {
        PointerInput::Mouse { client_x, client_y }
    }

    pub fn touch(client_x: f64, client_y: f64) -> Self {
        PointerInput::Touch {
            touches: vec![TouchPoint { client_x, client_y }],
        }
    }

    /// Client-space position of this input, or `None` for a touch event with no contacts.
    pub fn client_position(&self) -> Option<(f64, f64)> {
        match self {
            PointerInput::Mouse { client_x, client_y } => Some((*client_x, *client_y)),
            PointerInput::Touch { touches } => touches
                .first()
                .map(|touch| (touch.client_x, touch.client_y)),
        }
    }

    /// Translates the input into surface-local space by subtracting the surface origin.
    pub fn to_local(&self, bounds: &ClientRect) -> Option<LocalPoint> {
        self.client_position()
            .map(|(x, y)| LocalPoint::new(x - bounds.left, y - bounds.top))
    }
}

/// Pointer lifecycle events delivered to the signature pad.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    /// Mouse button pressed or touch started
    Down(PointerInput),
    /// Pointer moved or touch contact moved
    Move(PointerInput),
    /// Mouse button released or touch ended
    Up,
    /// Pointer left the surface
    Leave,
}
