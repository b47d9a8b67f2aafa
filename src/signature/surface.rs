//! Persistent raster surface that strokes are painted into.

use super::events::LocalPoint;
use super::types::{SignatureError, StrokeStyle};
use crate::draw;
use crate::util;

/// MIME type of the encoded signature image.
pub const SIGNATURE_MIME_TYPE: &str = "image/png";

/// Fixed-size transparent raster holding every committed stroke.
///
/// Strokes are painted incrementally and discarded; only the pixels persist.
/// `has_content` flips to true on the first painted segment and stays true until
/// [`SignatureSurface::clear`].
pub struct SignatureSurface {
    surface: cairo::ImageSurface,
    style: StrokeStyle,
    has_content: bool,
}

impl SignatureSurface {
    /// Creates a blank surface of `width × height` pixels.
    pub fn new(width: u32, height: u32, style: StrokeStyle) -> Result<Self, SignatureError> {
        if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(SignatureError::InvalidSize { width, height });
        }

        let surface =
            cairo::ImageSurface::create(cairo::Format::ARgb32, width as i32, height as i32)?;
        let mut created = Self {
            surface,
            style,
            has_content: false,
        };
        created.clear()?;
        Ok(created)
    }

    pub fn width(&self) -> u32 {
        self.surface.width() as u32
    }

    pub fn height(&self) -> u32 {
        self.surface.height() as u32
    }

    pub fn has_content(&self) -> bool {
        self.has_content
    }

    /// Erases every pixel and resets the content flag.
    pub fn clear(&mut self) -> Result<(), SignatureError> {
        let ctx = cairo::Context::new(&self.surface)?;
        ctx.set_operator(cairo::Operator::Clear);
        ctx.paint()?;
        drop(ctx);
        self.surface.flush();
        self.has_content = false;
        Ok(())
    }

    /// Paints one connecting segment on top of the existing raster.
    pub fn paint_segment(&mut self, from: LocalPoint, to: LocalPoint) -> Result<(), SignatureError> {
        let ctx = cairo::Context::new(&self.surface)?;
        draw::render_stroke_segment(
            &ctx,
            from.as_tuple(),
            to.as_tuple(),
            self.style.color,
            self.style.line_width,
        )?;
        drop(ctx);
        self.surface.flush();
        self.has_content = true;
        Ok(())
    }

    /// Encodes the full surface as PNG bytes.
    pub fn encode_png(&self) -> Result<Vec<u8>, SignatureError> {
        let mut buffer = Vec::new();
        self.surface.write_to_png(&mut buffer)?;
        Ok(buffer)
    }

    /// Encodes the full surface as a `data:image/png;base64,...` string.
    ///
    /// Returns `Ok(None)` when nothing has been drawn.
    pub fn to_data_url(&self) -> Result<Option<String>, SignatureError> {
        if !self.has_content {
            return Ok(None);
        }
        let png = self.encode_png()?;
        Ok(Some(util::encode_data_url(SIGNATURE_MIME_TYPE, &png)))
    }
}

impl std::fmt::Debug for SignatureSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureSurface")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("has_content", &self.has_content)
            .finish()
    }
}
