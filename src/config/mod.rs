//! Configuration file support for shapeboard.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/shapeboard/config.toml`. Settings include the initial tool
//! configuration, default shape sizes, history depth, and session persistence.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

// Re-export commonly used types at module level
pub use enums::{ColorSpec, SessionCompression, SessionStorageMode};
pub use types::{DrawingConfig, HistoryConfig, SessionConfig, ShapesConfig};

use anyhow::{Context, Result};
use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [drawing]
/// default_kind = "circle"
/// stroke_color = "red"
/// fill_color = "#ffffff"
/// stroke_width = 3.0
/// dash_style = "dashed"
///
/// [shapes]
/// rect_width = 100.0
/// rect_height = 60.0
/// circle_radius = 50.0
///
/// [history]
/// max_depth = 0
///
/// [session]
/// persist = true
/// compress = "auto"
/// ```
#[derive(Debug, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Initial tool configuration (kind, colors, stroke)
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Default shape sizes and resize limits
    #[serde(default)]
    pub shapes: ShapesConfig,

    /// Undo/redo history settings
    #[serde(default)]
    pub history: HistoryConfig,

    /// Session persistence settings
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is
    /// logged.
    ///
    /// Validated ranges:
    /// - `stroke_width`: 1.0 - 20.0
    /// - `min_size`: 1.0 - 100.0
    /// - default sizes: at least `min_size`
    /// - `dash_pattern`: finite, positive segments
    /// - `backup_retention`: 0 - 1
    fn validate_and_clamp(&mut self) {
        if !(1.0..=20.0).contains(&self.drawing.stroke_width) {
            warn!(
                "Invalid stroke_width {:.1}, clamping to 1.0-20.0 range",
                self.drawing.stroke_width
            );
            self.drawing.stroke_width = if self.drawing.stroke_width.is_nan() {
                1.0
            } else {
                self.drawing.stroke_width.clamp(1.0, 20.0)
            };
        }

        let shapes = &mut self.shapes;
        if !(1.0..=100.0).contains(&shapes.min_size) {
            warn!(
                "Invalid min_size {:.1}, clamping to 1.0-100.0 range",
                shapes.min_size
            );
            shapes.min_size = if shapes.min_size.is_nan() {
                1.0
            } else {
                shapes.min_size.clamp(1.0, 100.0)
            };
        }

        let min_size = shapes.min_size;
        for (name, value) in [
            ("rect_width", &mut shapes.rect_width),
            ("rect_height", &mut shapes.rect_height),
            ("circle_radius", &mut shapes.circle_radius),
        ] {
            if !value.is_finite() || *value < min_size {
                warn!(
                    "Invalid shapes.{} {:.1}, raising to min_size {:.1}",
                    name, value, min_size
                );
                *value = crate::util::clamp_extent(*value, min_size);
            }
        }

        if shapes.dash_pattern.is_empty()
            || shapes
                .dash_pattern
                .iter()
                .any(|segment| !segment.is_finite() || *segment <= 0.0)
        {
            warn!(
                "Invalid dash_pattern {:?}, falling back to default",
                shapes.dash_pattern
            );
            shapes.dash_pattern = types::default_dash_pattern();
        }

        if self.session.backup_retention > 1 {
            warn!(
                "backup_retention {} is not supported, keeping a single backup",
                self.session.backup_retention
            );
            self.session.backup_retention = 1;
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/shapeboard/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("shapeboard");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from `config_path`, falling back to defaults when the
    /// file does not exist. All loaded values are validated and clamped.
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

    /// Creates a default configuration file with documentation comments.
    ///
    /// Writes the example config from `config.example.toml` to the user's config
    /// directory and returns the path written.
    ///
    /// # Errors
    /// Returns an error if:
    /// - A config file already exists at the target path
    /// - The config directory cannot be created
    /// - The file cannot be written
    pub fn create_default_file() -> Result<PathBuf> {
        let config_path = Self::get_config_path()?;

        if config_path.exists() {
            return Err(anyhow::anyhow!(
                "Config file already exists at {}",
                config_path.display()
            ));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let default_config = include_str!("../../config.example.toml");
        fs::write(&config_path, default_config)?;

        info!("Created default config at {}", config_path.display());
        Ok(config_path)
    }

    /// JSON schema describing the configuration file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{RED, ShapeKind, WHITE};
    use crate::input::DashStyle;

    fn parse(toml_str: &str) -> Config {
        let mut config: Config = toml::from_str(toml_str).unwrap();
        config.validate_and_clamp();
        config
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = parse("");
        assert_eq!(config.drawing.default_kind, ShapeKind::Rectangle);
        assert_eq!(config.shapes.rect_width, 100.0);
        assert_eq!(config.shapes.rect_height, 60.0);
        assert_eq!(config.shapes.min_size, 5.0);
        assert_eq!(config.history.max_depth, 0);
        assert!(config.session.persist);
    }

    #[test]
    fn drawing_section_builds_tool_config() {
        let config = parse(
            r##"
            [drawing]
            default_kind = "line"
            stroke_color = "red"
            fill_color = "#ffffff"
            stroke_width = 4.0
            dash_style = "dashed"
            "##,
        );

        let tool = config.drawing.tool_config();
        assert_eq!(tool.kind, ShapeKind::Line);
        assert_eq!(tool.stroke, RED);
        assert_eq!(tool.fill, WHITE);
        assert_eq!(tool.stroke_width, 4.0);
        assert_eq!(tool.dash, DashStyle::Dashed);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = parse(
            r#"
            [drawing]
            stroke_width = 80.0

            [shapes]
            min_size = 10.0
            circle_radius = 2.0
            dash_pattern = [4.0, -1.0]

            [session]
            backup_retention = 5
            "#,
        );

        assert_eq!(config.drawing.stroke_width, 20.0);
        assert_eq!(config.shapes.circle_radius, 10.0);
        assert_eq!(config.shapes.dash_pattern, vec![10.0, 5.0]);
        assert_eq!(config.session.backup_retention, 1);
    }

    #[test]
    fn load_from_missing_file_returns_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config::load_from(&temp.path().join("absent.toml")).unwrap();
        assert_eq!(config.shapes.circle_radius, 50.0);
    }

    #[test]
    fn load_from_reports_invalid_toml() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[drawing\nstroke_width = ").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn example_config_parses() {
        let config = parse(include_str!("../../config.example.toml"));
        assert_eq!(config.shapes.rect_width, 100.0);
    }

    #[test]
    fn schema_lists_sections() {
        let schema = serde_json::to_value(Config::json_schema()).unwrap();
        let properties = &schema["properties"];
        for section in ["drawing", "shapes", "history", "session"] {
            assert!(properties.get(section).is_some(), "missing {section}");
        }
    }
}
