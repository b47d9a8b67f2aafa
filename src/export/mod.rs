//! Paginated document export for numeroscribe.
//!
//! This module turns an ordered list of laid-out pages into one PDF:
//! - Supersampled Cairo rasterization of each page, strictly in order
//! - JPEG encoding at a configurable quality
//! - Assembly with one full-page image per output page
//! - Atomic delivery to the output directory
//! - A manager that allows only one export in flight and reports failures

pub mod document;
pub mod file;
pub mod page;
pub mod raster;
pub mod types;

mod dependencies;
mod manager;
mod pipeline;
#[cfg(test)]
mod tests;

pub use dependencies::{
    CairoRasterizer, DesktopNotifier, DocumentSaver, ExportDependencies, ExportNotifier,
    LogNotifier, PageRasterizer,
};
pub use document::{DocumentBackend, DocumentSink, PdfBackend, assemble_document};
pub use file::ExportSaveConfig;
pub use manager::ExportManager;
pub use page::{ExportPage, SharedPage};
pub use types::{
    ExportError, ExportOutcome, ExportResult, ExportSettings, ExportStatus, PageGeometry,
    PageImage, Placement, RasterSettings,
};
