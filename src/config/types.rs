//! Configuration type definitions.

use super::enums::ColorSpec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Signature pad settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SignatureConfig {
    /// Fixed surface height in pixels (valid range: 50 - 1000).
    /// The width always follows the host layout.
    #[serde(default = "default_signature_height")]
    pub height: u32,

    /// Pen line width in pixels (valid range: 0.5 - 20.0)
    #[serde(default = "default_line_width")]
    pub line_width: f64,

    /// Pen color - a named color, `#RRGGBB`, or an RGB array like `[0, 0, 0]`
    #[serde(default = "default_stroke_color")]
    pub stroke_color: ColorSpec,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            height: default_signature_height(),
            line_width: default_line_width(),
            stroke_color: default_stroke_color(),
        }
    }
}

/// PDF export settings.
///
/// Each page is rasterized at `page_width_px × scale` pixels, JPEG-encoded at
/// `jpeg_quality`, and stretched over the full `page_width_mm × page_height_mm` page.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExportConfig {
    /// Output page width in millimetres (valid range: 10 - 1000)
    #[serde(default = "default_page_width_mm")]
    pub page_width_mm: f64,

    /// Output page height in millimetres (valid range: 10 - 1000)
    #[serde(default = "default_page_height_mm")]
    pub page_height_mm: f64,

    /// Logical page width in pixels that templates lay out against (valid range: 200 - 4000).
    /// The logical height follows the page aspect ratio.
    #[serde(default = "default_page_width_px")]
    pub page_width_px: u32,

    /// Supersampling factor applied when rasterizing (valid range: 1.0 - 4.0)
    #[serde(default = "default_scale")]
    pub scale: f64,

    /// JPEG quality factor (valid range: 0.1 - 1.0)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: f64,

    /// Paper color painted behind every page
    #[serde(default = "default_background_color")]
    pub background_color: ColorSpec,

    /// Directory that finished documents are written to (`~` is expanded)
    #[serde(default = "default_output_directory")]
    pub output_directory: String,

    /// Report file name template; `{driver}` and `{conductor}` are substituted
    #[serde(default = "default_filename_template")]
    pub filename_template: String,

    /// Send a desktop notification when an export finishes or fails
    #[serde(default = "default_notify")]
    pub notify: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            page_width_mm: default_page_width_mm(),
            page_height_mm: default_page_height_mm(),
            page_width_px: default_page_width_px(),
            scale: default_scale(),
            jpeg_quality: default_jpeg_quality(),
            background_color: default_background_color(),
            output_directory: default_output_directory(),
            filename_template: default_filename_template(),
            notify: default_notify(),
        }
    }
}

/// Report template appearance.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReportConfig {
    /// Font family for report text (e.g., "Sans", "Serif", "Noto Sans Devanagari")
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Brand shown on the cover and in page footers
    #[serde(default = "default_brand_name")]
    pub brand_name: String,

    /// Website shown on the right side of page footers (empty to hide)
    #[serde(default)]
    pub website: String,

    /// Accent color for frames, headings, and bullets
    #[serde(default = "default_accent_color")]
    pub accent_color: ColorSpec,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            brand_name: default_brand_name(),
            website: String::new(),
            accent_color: default_accent_color(),
        }
    }
}

fn default_signature_height() -> u32 {
    200
}

fn default_line_width() -> f64 {
    2.0
}

fn default_stroke_color() -> ColorSpec {
    ColorSpec::Name("black".to_string())
}

fn default_page_width_mm() -> f64 {
    210.0
}

fn default_page_height_mm() -> f64 {
    297.0
}

fn default_page_width_px() -> u32 {
    794
}

fn default_scale() -> f64 {
    2.0
}

fn default_jpeg_quality() -> f64 {
    0.8
}

fn default_background_color() -> ColorSpec {
    ColorSpec::Name("#FFFDF5".to_string())
}

fn default_output_directory() -> String {
    "~/Documents/Numeroscribe".to_string()
}

fn default_filename_template() -> String {
    "numerology_{driver}_{conductor}".to_string()
}

fn default_notify() -> bool {
    true
}

fn default_font_family() -> String {
    "Sans".to_string()
}

fn default_brand_name() -> String {
    "Numeroscribe".to_string()
}

fn default_accent_color() -> ColorSpec {
    ColorSpec::Name("gold".to_string())
}
