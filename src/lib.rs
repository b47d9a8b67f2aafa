//! Signature capture and paginated PDF export for numerology reports.
//!
//! The binary is a thin CLI over these modules; they are exported so hosts embedding the
//! signature pad or the exporter can share configuration and validation with it.

pub mod config;
pub mod draw;
pub mod export;
pub mod notification;
pub mod report;
pub mod signature;
pub mod util;

pub use config::Config;
