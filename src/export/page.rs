//! The page abstraction the exporter rasterizes.

use std::sync::Arc;

/// A fully laid-out printable page.
///
/// Pages are produced elsewhere and only referenced by the exporter. `paint` draws in
/// logical page pixels; the rasterizer has already applied supersampling and painted the
/// paper background, so a page only draws its own content.
pub trait ExportPage: Send + Sync {
    /// Short human-readable name used in logs and error messages.
    fn label(&self) -> &str;

    /// Paints the page onto `ctx`, which spans `width × height` logical pixels.
    fn paint(&self, ctx: &cairo::Context, width: f64, height: f64) -> Result<(), cairo::Error>;
}

/// Shared handle to a page; exports take an ordered list of these.
pub type SharedPage = Arc<dyn ExportPage>;
