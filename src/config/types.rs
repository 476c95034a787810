//! Configuration type definitions.

use super::enums::{ColorSpec, SessionCompression, SessionStorageMode};
use crate::draw::{BLACK, ShapeDefaults, ShapeKind, TRANSPARENT};
use crate::input::{DashStyle, ToolConfig};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Drawing-related settings.
///
/// Controls the tool configuration the editor starts with. The UI may change
/// these at runtime; existing shapes are never affected.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DrawingConfig {
    /// Shape created by a placement gesture (rectangle, circle, line)
    #[serde(default = "default_kind")]
    pub default_kind: ShapeKind,

    /// Outline color - a named color, a hex string or an RGB array like `[255, 0, 0]`
    #[serde(default = "default_stroke_color")]
    pub stroke_color: ColorSpec,

    /// Fill color for rectangles and circles
    #[serde(default = "default_fill_color")]
    pub fill_color: ColorSpec,

    /// Outline width in canvas units (valid range: 1.0 - 20.0)
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,

    /// Outline style (solid or dashed)
    #[serde(default)]
    pub dash_style: DashStyle,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            default_kind: default_kind(),
            stroke_color: default_stroke_color(),
            fill_color: default_fill_color(),
            stroke_width: default_stroke_width(),
            dash_style: DashStyle::default(),
        }
    }
}

impl DrawingConfig {
    /// Builds the initial tool configuration.
    pub fn tool_config(&self) -> ToolConfig {
        ToolConfig {
            kind: self.default_kind,
            stroke: self.stroke_color.to_color_or(BLACK),
            stroke_width: self.stroke_width,
            dash: self.dash_style,
            fill: self.fill_color.to_color_or(TRANSPARENT),
        }
    }
}

/// Shape sizing settings.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ShapesConfig {
    /// Width of a newly placed rectangle
    #[serde(default = "default_rect_width")]
    pub rect_width: f64,

    /// Height of a newly placed rectangle
    #[serde(default = "default_rect_height")]
    pub rect_height: f64,

    /// Radius of a newly placed circle
    #[serde(default = "default_circle_radius")]
    pub circle_radius: f64,

    /// Smallest width, height or radius a resize may produce (valid range: 1.0 - 100.0)
    #[serde(default = "default_min_size")]
    pub min_size: f64,

    /// On/off segment lengths used by the dashed style
    #[serde(default = "default_dash_pattern")]
    pub dash_pattern: Vec<f64>,
}

impl Default for ShapesConfig {
    fn default() -> Self {
        Self {
            rect_width: default_rect_width(),
            rect_height: default_rect_height(),
            circle_radius: default_circle_radius(),
            min_size: default_min_size(),
            dash_pattern: default_dash_pattern(),
        }
    }
}

impl ShapesConfig {
    pub fn to_defaults(&self) -> ShapeDefaults {
        ShapeDefaults {
            rect_width: self.rect_width,
            rect_height: self.rect_height,
            circle_radius: self.circle_radius,
            min_size: self.min_size,
            dash_pattern: self.dash_pattern.clone(),
        }
    }
}

/// Undo/redo history settings.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct HistoryConfig {
    /// Maximum number of undo snapshots kept; 0 keeps every snapshot.
    /// When the cap is reached the oldest snapshot is dropped.
    #[serde(default)]
    pub max_depth: usize,
}

/// Session persistence settings.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SessionConfig {
    /// Save and restore the canvas between runs
    #[serde(default = "default_persist")]
    pub persist: bool,

    /// Where session files live (auto, config, custom)
    #[serde(default = "default_storage")]
    pub storage: SessionStorageMode,

    /// Directory used when `storage = "custom"` (supports `~/`)
    #[serde(default)]
    pub custom_directory: Option<String>,

    /// Maximum number of shapes on the canvas; 0 disables the limit
    #[serde(default = "default_max_shapes")]
    pub max_shapes: usize,

    /// Largest session file that will be written or read, in MiB
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,

    /// Gzip compression (auto, on, off)
    #[serde(default = "default_compress")]
    pub compress: SessionCompression,

    /// Payload size above which `auto` compression kicks in, in KiB
    #[serde(default = "default_auto_compress_threshold_kb")]
    pub auto_compress_threshold_kb: u64,

    /// Number of previous session files kept as backups (0 or 1)
    #[serde(default = "default_backup_retention")]
    pub backup_retention: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            persist: default_persist(),
            storage: default_storage(),
            custom_directory: None,
            max_shapes: default_max_shapes(),
            max_file_size_mb: default_max_file_size_mb(),
            compress: default_compress(),
            auto_compress_threshold_kb: default_auto_compress_threshold_kb(),
            backup_retention: default_backup_retention(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_kind() -> ShapeKind {
    ShapeKind::Rectangle
}

fn default_stroke_color() -> ColorSpec {
    ColorSpec::Name("black".to_string())
}

fn default_fill_color() -> ColorSpec {
    ColorSpec::Name("transparent".to_string())
}

fn default_stroke_width() -> f64 {
    2.0
}

fn default_rect_width() -> f64 {
    100.0
}

fn default_rect_height() -> f64 {
    60.0
}

fn default_circle_radius() -> f64 {
    50.0
}

fn default_min_size() -> f64 {
    5.0
}

pub(crate) fn default_dash_pattern() -> Vec<f64> {
    vec![10.0, 5.0]
}

fn default_persist() -> bool {
    true
}

fn default_storage() -> SessionStorageMode {
    SessionStorageMode::Auto
}

fn default_max_shapes() -> usize {
    10_000
}

fn default_max_file_size_mb() -> u64 {
    10
}

fn default_compress() -> SessionCompression {
    SessionCompression::Auto
}

fn default_auto_compress_threshold_kb() -> u64 {
    100
}

fn default_backup_retention() -> usize {
    1
}
