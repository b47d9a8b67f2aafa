//! Font descriptor for report text rendering.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Font configuration for report text.
///
/// Describes which font family, weight, and style a block of text uses.
/// Report templates derive heading/body variants from the configured base font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FontDescriptor {
    /// Font family name (e.g., "Sans", "Serif", "Noto Sans Devanagari")
    pub family: String,

    /// Font weight (e.g., "normal", "bold", "light" or numeric 100-900)
    pub weight: String,

    /// Font style (e.g., "normal", "italic", "oblique")
    pub style: String,
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self::new("Sans", "normal", "normal")
    }
}

impl FontDescriptor {
    /// Creates a new font descriptor with the specified parameters.
    pub fn new(family: &str, weight: &str, style: &str) -> Self {
        Self {
            family: family.to_string(),
            weight: weight.to_string(),
            style: style.to_string(),
        }
    }

    /// Same family and style, bold weight.
    pub fn bold(&self) -> Self {
        Self {
            weight: "bold".to_string(),
            ..self.clone()
        }
    }

    /// Same family and weight, italic style.
    pub fn italic(&self) -> Self {
        Self {
            style: "italic".to_string(),
            ..self.clone()
        }
    }

    /// Converts this font descriptor to a Pango font description string.
    ///
    /// Format: "Family Style Weight Size"
    /// Example: "Sans Bold 32" or "Serif Italic 24"
    pub fn to_pango_string(&self, size: f64) -> String {
        let mut parts = vec![self.family.clone()];

        if !self.style.eq_ignore_ascii_case("normal") {
            parts.push(capitalize_first(&self.style));
        }

        if !self.weight.eq_ignore_ascii_case("normal") {
            parts.push(capitalize_first(&self.weight));
        }

        parts.push(format!("{}", size.round() as i32));

        parts.join(" ")
    }

    /// Builds the Pango description used by layouts.
    pub fn to_pango(&self, size: f64) -> pango::FontDescription {
        pango::FontDescription::from_string(&self.to_pango_string(size))
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}
