//! Configuration file support for numeroscribe.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/numeroscribe/config.toml`. Settings cover the signature pen,
//! page rasterization and PDF export, and report template appearance.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

pub use enums::ColorSpec;
pub use types::{ExportConfig, ReportConfig, SignatureConfig};

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// # Example TOML
/// ```toml
/// [signature]
/// height = 200
/// line_width = 2.0
/// stroke_color = "black"
///
/// [export]
/// scale = 2.0
/// jpeg_quality = 0.8
/// output_directory = "~/Documents/Numeroscribe"
///
/// [report]
/// font_family = "Sans"
/// accent_color = "gold"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, schemars::JsonSchema)]
pub struct Config {
    /// Signature pad defaults (surface height, pen width and color)
    #[serde(default)]
    pub signature: SignatureConfig,

    /// Page rasterization and PDF export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Report template appearance
    #[serde(default)]
    pub report: ReportConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `signature.height`: 50 - 1000
    /// - `signature.line_width`: 0.5 - 20.0
    /// - `export.page_width_mm` / `page_height_mm`: 10.0 - 1000.0
    /// - `export.page_width_px`: 200 - 4000
    /// - `export.scale`: 1.0 - 4.0
    /// - `export.jpeg_quality`: 0.1 - 1.0
    pub fn validate_and_clamp(&mut self) {
        if !(50..=1000).contains(&self.signature.height) {
            log::warn!(
                "Invalid signature height {}, clamping to 50-1000 range",
                self.signature.height
            );
            self.signature.height = self.signature.height.clamp(50, 1000);
        }

        if !(0.5..=20.0).contains(&self.signature.line_width) {
            log::warn!(
                "Invalid signature line_width {:.1}, clamping to 0.5-20.0 range",
                self.signature.line_width
            );
            self.signature.line_width = clamp_or(self.signature.line_width, 0.5, 20.0, 2.0);
        }

        if !self.signature.stroke_color.is_valid() {
            log::warn!(
                "Invalid signature stroke_color {:?}, falling back to black",
                self.signature.stroke_color
            );
            self.signature.stroke_color = ColorSpec::Name("black".to_string());
        }

        for (name, value, fallback) in [
            ("page_width_mm", &mut self.export.page_width_mm, 210.0),
            ("page_height_mm", &mut self.export.page_height_mm, 297.0),
        ] {
            if !(10.0..=1000.0).contains(value) {
                log::warn!(
                    "Invalid export {} {:.1}, clamping to 10.0-1000.0 range",
                    name,
                    value
                );
                *value = clamp_or(*value, 10.0, 1000.0, fallback);
            }
        }

        if !(200..=4000).contains(&self.export.page_width_px) {
            log::warn!(
                "Invalid export page_width_px {}, clamping to 200-4000 range",
                self.export.page_width_px
            );
            self.export.page_width_px = self.export.page_width_px.clamp(200, 4000);
        }

        if !(1.0..=4.0).contains(&self.export.scale) {
            log::warn!(
                "Invalid export scale {:.2}, clamping to 1.0-4.0 range",
                self.export.scale
            );
            self.export.scale = clamp_or(self.export.scale, 1.0, 4.0, 2.0);
        }

        if !(0.1..=1.0).contains(&self.export.jpeg_quality) {
            log::warn!(
                "Invalid export jpeg_quality {:.2}, clamping to 0.1-1.0 range",
                self.export.jpeg_quality
            );
            self.export.jpeg_quality = clamp_or(self.export.jpeg_quality, 0.1, 1.0, 0.8);
        }

        if !self.export.background_color.is_valid() {
            log::warn!(
                "Invalid export background_color {:?}, falling back to paper",
                self.export.background_color
            );
            self.export.background_color = ColorSpec::Name("paper".to_string());
        }

        if self.export.filename_template.trim().is_empty() {
            log::warn!("Empty export filename_template, using default");
            self.export.filename_template = ExportConfig::default().filename_template;
        }

        if !self.report.accent_color.is_valid() {
            log::warn!(
                "Invalid report accent_color {:?}, falling back to gold",
                self.report.accent_color
            );
            self.report.accent_color = ColorSpec::Name("gold".to_string());
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/numeroscribe/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("numeroscribe");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from an explicit path, or returns defaults if it does not exist.
    ///
    /// All loaded values are validated and clamped to acceptable ranges.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or contains invalid TOML.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Writes the documented example config to `config_path`.
    ///
    /// # Errors
    /// Returns an error if a file already exists at the target path or it cannot be written.
    pub fn create_default_file(config_path: &Path) -> Result<()> {
        if config_path.exists() {
            return Err(anyhow::anyhow!(
                "Config file already exists at {}",
                config_path.display()
            ));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let default_config = include_str!("../../config.example.toml");
        fs::write(config_path, default_config)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Created default config at {}", config_path.display());
        Ok(())
    }

    /// JSON schema describing the configuration file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}

/// Clamps finite values into range and replaces NaN/infinite values with `fallback`.
fn clamp_or(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}
