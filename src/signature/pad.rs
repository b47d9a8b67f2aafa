//! Signature pad state machine.

use log::{debug, trace, warn};

use super::events::{ClientRect, PointerEvent, PointerInput};
use super::surface::SignatureSurface;
use super::types::{SignatureError, SignatureSettings, Stroke};

/// Handler receiving the encoded signature (`Some`) or a cleared signature (`None`).
pub type SaveCallback = Box<dyn FnMut(Option<String>)>;

/// Current capture mode.
#[derive(Debug, Default)]
pub enum CaptureState {
    /// Waiting for pointer-down
    #[default]
    Idle,
    /// Pointer held down; segments are painted as the pointer moves
    Drawing { stroke: Stroke },
}

/// Freehand signature capture widget.
///
/// Owns the drawing surface exclusively. The only artifact that leaves the pad is the
/// encoded image passed to the save callback (or returned by [`SignaturePad::snapshot`]).
pub struct SignaturePad {
    settings: SignatureSettings,
    surface: Option<SignatureSurface>,
    bounds: Option<ClientRect>,
    state: CaptureState,
    on_save: Option<SaveCallback>,
}

impl SignaturePad {
    /// Creates a pad that is not yet laid out; input is ignored until [`attach`](Self::attach).
    pub fn new(settings: SignatureSettings) -> Self {
        Self {
            settings,
            surface: None,
            bounds: None,
            state: CaptureState::Idle,
            on_save: None,
        }
    }

    /// Registers the handler invoked on stroke completion and on clear.
    pub fn on_stroke_complete<F>(&mut self, callback: F)
    where
        F: FnMut(Option<String>) + 'static,
    {
        self.on_save = Some(Box::new(callback));
    }

    /// Lays the pad out at the given on-screen rectangle.
    ///
    /// The first call creates a blank surface `rect.width` pixels wide and
    /// `settings.height` pixels tall. Later calls only move the origin used for
    /// coordinate mapping; the raster is kept as-is.
    pub fn attach(&mut self, rect: ClientRect) -> Result<(), SignatureError> {
        if self.surface.is_none() {
            let width = rect.width.round().max(0.0) as u32;
            let surface = SignatureSurface::new(width, self.settings.height, self.settings.style)?;
            debug!(
                "Signature surface ready: {}x{}",
                surface.width(),
                surface.height()
            );
            self.surface = Some(surface);
        }
        self.bounds = Some(rect);
        Ok(())
    }

    /// Whether the surface exists and input will be processed.
    pub fn is_ready(&self) -> bool {
        self.surface.is_some() && self.bounds.is_some()
    }

    pub fn has_signature(&self) -> bool {
        self.surface.as_ref().is_some_and(|s| s.has_content())
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, CaptureState::Drawing { .. })
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    pub fn surface(&self) -> Option<&SignatureSurface> {
        self.surface.as_ref()
    }

    /// Dispatches a pointer lifecycle event.
    pub fn handle_event(&mut self, event: &PointerEvent) {
        match event {
            PointerEvent::Down(input) => self.on_pointer_down(input),
            PointerEvent::Move(input) => self.on_pointer_move(input),
            PointerEvent::Up => self.on_pointer_up(),
            PointerEvent::Leave => self.on_pointer_leave(),
        }
    }

    /// Begins a stroke at the pointer's local position.
    pub fn on_pointer_down(&mut self, input: &PointerInput) {
        let Some(bounds) = self.bounds.filter(|_| self.surface.is_some()) else {
            trace!("Pointer down before surface layout; ignoring");
            return;
        };
        let Some(point) = input.to_local(&bounds) else {
            trace!("Pointer down without a position; ignoring");
            return;
        };

        self.state = CaptureState::Drawing {
            stroke: Stroke::starting_at(point),
        };
    }

    /// Extends the active stroke and paints the connecting segment immediately.
    pub fn on_pointer_move(&mut self, input: &PointerInput) {
        let CaptureState::Drawing { stroke } = &mut self.state else {
            return;
        };
        let (Some(surface), Some(bounds)) = (self.surface.as_mut(), self.bounds) else {
            return;
        };
        let Some(point) = input.to_local(&bounds) else {
            return;
        };
        let Some(previous) = stroke.last() else {
            stroke.points.push(point);
            return;
        };

        match surface.paint_segment(previous, point) {
            Ok(()) => stroke.points.push(point),
            Err(e) => warn!("Failed to paint signature segment: {}", e),
        }
    }

    /// Pointer released: ends the stroke and saves the surface.
    pub fn on_pointer_up(&mut self) {
        self.finish_stroke();
    }

    /// Pointer left the surface: same as release.
    pub fn on_pointer_leave(&mut self) {
        self.finish_stroke();
    }

    /// Erases the surface, abandons any active stroke, and reports an empty signature.
    ///
    /// The stroke is dropped so the input that triggered the clear can never start
    /// drawing; a fresh pointer-down is required.
    pub fn clear(&mut self) {
        self.state = CaptureState::Idle;
        if let Some(surface) = self.surface.as_mut() {
            if let Err(e) = surface.clear() {
                warn!("Failed to clear signature surface: {}", e);
            }
        }
        debug!("Signature cleared");
        self.emit(None);
    }

    /// Encodes the current surface, or `None` when nothing has been drawn.
    pub fn snapshot(&self) -> Option<String> {
        let surface = self.surface.as_ref()?;
        match surface.to_data_url() {
            Ok(url) => url,
            Err(e) => {
                warn!("Failed to encode signature snapshot: {}", e);
                None
            }
        }
    }

    fn finish_stroke(&mut self) {
        let CaptureState::Drawing { stroke } = std::mem::take(&mut self.state) else {
            return;
        };
        trace!(
            "Stroke finished with {} segment(s)",
            stroke.segment_count()
        );

        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        if !surface.has_content() {
            return;
        }

        match surface.to_data_url() {
            Ok(Some(url)) => self.emit(Some(url)),
            Ok(None) => {}
            Err(e) => warn!("Failed to encode signature: {}", e),
        }
    }

    fn emit(&mut self, value: Option<String>) {
        if let Some(callback) = self.on_save.as_mut() {
            callback(value);
        }
    }
}

impl std::fmt::Debug for SignaturePad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignaturePad")
            .field("settings", &self.settings)
            .field("surface", &self.surface)
            .field("bounds", &self.bounds)
            .field("state", &self.state)
            .field("has_callback", &self.on_save.is_some())
            .finish()
    }
}
