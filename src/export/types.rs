//! Data types for paginated document export.

use std::path::PathBuf;
use thiserror::Error;

use super::file::ExportSaveConfig;
use crate::config::ExportConfig;
use crate::draw::{Color, PAPER};
use crate::util;

/// Fixed physical size of every output page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl PageGeometry {
    /// ISO A4 portrait (210×297mm).
    pub const A4: PageGeometry = PageGeometry {
        width_mm: 210.0,
        height_mm: 297.0,
    };

    pub fn width_pt(&self) -> f64 {
        util::mm_to_pt(self.width_mm)
    }

    pub fn height_pt(&self) -> f64 {
        util::mm_to_pt(self.height_mm)
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::A4
    }
}

/// Where a page image is placed on its output page, in millimetres from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x_mm: f64,
    pub y_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
}

impl Placement {
    /// Stretches the image over the whole page; no aspect-ratio fitting is applied.
    pub fn full_page(geometry: &PageGeometry) -> Self {
        Self {
            x_mm: 0.0,
            y_mm: 0.0,
            width_mm: geometry.width_mm,
            height_mm: geometry.height_mm,
        }
    }
}

/// One rasterized page, JPEG-encoded and ready for assembly.
#[derive(Clone)]
pub struct PageImage {
    /// Zero-based position in the export.
    pub index: usize,
    pub label: String,
    /// Pixel dimensions of the encoded image.
    pub width: u32,
    pub height: u32,
    pub jpeg: Vec<u8>,
}

impl std::fmt::Debug for PageImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageImage")
            .field("index", &self.index)
            .field("label", &self.label)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("jpeg_bytes", &self.jpeg.len())
            .finish()
    }
}

/// How pages are turned into pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterSettings {
    /// Logical page size that pages lay themselves out against.
    pub page_width_px: u32,
    pub page_height_px: u32,
    /// Supersampling factor applied on top of the logical size.
    pub scale: f64,
    /// JPEG quality factor in 0.0 - 1.0.
    pub jpeg_quality: f64,
    /// Painted before the page content.
    pub background: Color,
}

impl RasterSettings {
    /// Pixel dimensions of the raster after supersampling.
    pub fn pixel_size(&self) -> (u32, u32) {
        let width = (self.page_width_px as f64 * self.scale).round().max(1.0) as u32;
        let height = (self.page_height_px as f64 * self.scale).round().max(1.0) as u32;
        (width, height)
    }

    /// Quality factor mapped onto the 1-100 scale JPEG encoders expect.
    pub fn jpeg_quality_percent(&self) -> u8 {
        (self.jpeg_quality * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            page_width_px: 794,
            page_height_px: 1123,
            scale: 2.0,
            jpeg_quality: 0.8,
            background: PAPER,
        }
    }
}

/// Everything an export needs besides the pages themselves.
#[derive(Debug, Clone, Default)]
pub struct ExportSettings {
    pub raster: RasterSettings,
    pub geometry: PageGeometry,
    pub save: ExportSaveConfig,
    /// Announce successful exports (failures are always announced).
    pub notify_success: bool,
}

impl From<&ExportConfig> for ExportSettings {
    fn from(config: &ExportConfig) -> Self {
        let geometry = PageGeometry {
            width_mm: config.page_width_mm,
            height_mm: config.page_height_mm,
        };
        Self {
            raster: RasterSettings {
                page_width_px: config.page_width_px,
                page_height_px: util::page_height_px(
                    config.page_width_px,
                    geometry.width_mm,
                    geometry.height_mm,
                ),
                scale: config.scale,
                jpeg_quality: config.jpeg_quality,
                background: config.background_color.to_color(),
            },
            geometry,
            save: ExportSaveConfig {
                output_directory: super::file::expand_tilde(&config.output_directory),
                ..ExportSaveConfig::default()
            },
            notify_success: config.notify,
        }
    }
}

/// Result of a finished export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportResult {
    /// Path of the delivered document.
    pub saved_path: PathBuf,
    pub page_count: usize,
    pub byte_size: usize,
}

/// Outcome of an export request (success or failure).
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    Success(ExportResult),
    Failed(String),
}

/// Errors that can occur while exporting a document.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export: no pages were supplied")]
    NoPages,

    #[error("An export is already in progress")]
    AlreadyInProgress,

    #[error("Invalid output name: {0:?}")]
    InvalidOutputName(String),

    #[error("Failed to rasterize page {} ({label}): {reason}", .index + 1)]
    Rasterization {
        index: usize,
        label: String,
        reason: String,
    },

    #[error("Failed to assemble document: {0}")]
    Assembly(String),

    #[error("Failed to save document: {0}")]
    Save(#[from] std::io::Error),

    #[error("Export manager not running")]
    ManagerUnavailable,
}

/// Status of the export pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStatus {
    /// No export has run since the last reset.
    Idle,
    /// Pages are being rasterized; `page` is one-based.
    Rasterizing { page: usize, total: usize },
    /// Page images are being combined into the document.
    Assembling,
    /// The finished document is being written.
    Saving,
    /// Export completed successfully.
    Success,
    /// Export failed.
    Failed(String),
}

impl ExportStatus {
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ExportStatus::Rasterizing { .. } | ExportStatus::Assembling | ExportStatus::Saving
        )
    }
}
