//! Utility functions for colors, page units, and data URLs.
//!
//! This module provides:
//! - Name/hex-to-color mapping for configuration values
//! - Millimetre, point, and pixel conversions for page geometry
//! - Encoding and decoding of `data:` URLs carrying base64 image payloads

use crate::draw::{Color, color::*};
use base64::Engine;

// ============================================================================
// Page Units
// ============================================================================

/// Millimetres per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// PostScript points per inch (PDF user space unit).
pub const PT_PER_INCH: f64 = 72.0;

/// Converts millimetres to PDF points.
pub fn mm_to_pt(mm: f64) -> f64 {
    mm / MM_PER_INCH * PT_PER_INCH
}

/// Derives a logical page height in pixels from a pixel width and the page aspect ratio.
///
/// An A4 page (210×297mm) that is 794px wide yields 1123px.
pub fn page_height_px(width_px: u32, width_mm: f64, height_mm: f64) -> u32 {
    if width_mm <= 0.0 {
        return width_px;
    }
    (width_px as f64 * height_mm / width_mm).round().max(1.0) as u32
}

// ============================================================================
// Color Mapping
// ============================================================================

/// Maps color name strings to Color values.
///
/// Used by the configuration system to parse color names from the config file.
///
/// # Supported Names (case-insensitive)
/// - "red", "green", "blue", "yellow", "orange", "pink", "white", "black", "paper", "gold", "indigo"
/// - Hex notation `#RRGGBB`
///
/// # Returns
/// - `Some(Color)` if the name matches a predefined color or valid hex value
/// - `None` if the name is not recognized
pub fn name_to_color(name: &str) -> Option<Color> {
    match name.to_lowercase().as_str() {
        "red" => Some(RED),
        "green" => Some(GREEN),
        "blue" => Some(BLUE),
        "yellow" => Some(YELLOW),
        "orange" => Some(ORANGE),
        "pink" => Some(PINK),
        "white" => Some(WHITE),
        "black" => Some(BLACK),
        "paper" => Some(PAPER),
        "gold" => Some(GOLD),
        "indigo" => Some(INDIGO),
        other => parse_hex_color(other),
    }
}

/// Parses `#RRGGBB` (leading `#` optional) into an opaque color.
pub fn parse_hex_color(value: &str) -> Option<Color> {
    let hex = value.strip_prefix('#').unwrap_or(value);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .ok()
            .map(|v| v as f64 / 255.0)
    };
    Some(Color {
        r: channel(0..2)?,
        g: channel(2..4)?,
        b: channel(4..6)?,
        a: 1.0,
    })
}

// ============================================================================
// Data URLs
// ============================================================================

/// A decoded `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    /// MIME type declared in the URL header (e.g. `image/png`)
    pub mime_type: String,
    /// Decoded payload bytes
    pub bytes: Vec<u8>,
}

/// Encodes bytes as a self-describing `data:<mime>;base64,<payload>` string.
pub fn encode_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime_type,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Returns the base64 payload of a data URL (the part after the first comma).
pub fn data_url_payload(url: &str) -> Option<&str> {
    let rest = url.strip_prefix("data:")?;
    let (_, payload) = rest.split_once(',')?;
    Some(payload)
}

/// Decodes a base64 `data:` URL. Returns `None` for malformed input or non-base64 URLs.
pub fn decode_data_url(url: &str) -> Option<DataUrl> {
    let rest = url.trim().strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime_type = header.strip_suffix(";base64")?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .ok()?;
    Some(DataUrl {
        mime_type: mime_type.to_string(),
        bytes,
    })
}
