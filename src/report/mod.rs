//! Numerology report content and its page layout.
//!
//! - [`NumerologyReport`]: the structured report as delivered by the generation service
//! - [`LoShuGrid`]: birth chart digits mapped onto the 3×3 magic square
//! - [`build_pages`]: the plan-dependent sequence of exportable pages

pub mod loshu;
pub mod model;
pub mod pages;

pub use loshu::LoShuGrid;
pub use model::{NumerologyReport, Plan, Remedies, Summary, YearPrediction};
pub use pages::{PageKind, ReportPage, ReportTheme, build_pages, page_sequence};

/// Expands a file name template, substituting `{driver}` and `{conductor}`.
pub fn output_name(template: &str, report: &NumerologyReport) -> String {
    template
        .replace("{driver}", &report.driver.to_string())
        .replace("{conductor}", &report.conductor.to_string())
}
