//! Tool configuration consulted when shapes are created.

use crate::draw::{BLACK, Color, ShapeKind, TRANSPARENT};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Smallest stroke width a new shape can receive.
pub const MIN_STROKE_WIDTH: f64 = 1.0;

/// Stroke dash style selectable in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DashStyle {
    /// Continuous outline
    #[default]
    Solid,
    /// Outline drawn with the configured dash pattern
    Dashed,
}

/// Read-only snapshot of the creation settings chosen in the UI.
///
/// Only consulted at creation time; changing it never alters existing shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolConfig {
    /// Kind of shape a placement gesture creates
    pub kind: ShapeKind,
    /// Outline color
    pub stroke: Color,
    /// Outline width in canvas units
    pub stroke_width: f64,
    pub dash: DashStyle,
    /// Fill color for rectangles and circles (ignored for lines)
    pub fill: Color,
}

impl ToolConfig {
    /// Stroke width guaranteed to be positive.
    pub fn effective_stroke_width(&self) -> f64 {
        if self.stroke_width.is_finite() {
            self.stroke_width.max(MIN_STROKE_WIDTH)
        } else {
            MIN_STROKE_WIDTH
        }
    }

    /// Returns the dash segment list for this tool given the dashed pattern.
    pub fn dash_segments(&self, dashed_pattern: &[f64]) -> Vec<f64> {
        match self.dash {
            DashStyle::Solid => Vec::new(),
            DashStyle::Dashed => dashed_pattern.to_vec(),
        }
    }

    pub fn with_kind(mut self, kind: ShapeKind) -> Self {
        self.kind = kind;
        self
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            kind: ShapeKind::Rectangle,
            stroke: BLACK,
            stroke_width: 2.0,
            dash: DashStyle::Solid,
            fill: TRANSPARENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stroke_width_is_forced_positive() {
        let mut tool = ToolConfig::default();
        tool.stroke_width = 0.0;
        assert_eq!(tool.effective_stroke_width(), MIN_STROKE_WIDTH);
        tool.stroke_width = f64::NAN;
        assert_eq!(tool.effective_stroke_width(), MIN_STROKE_WIDTH);
        tool.stroke_width = 4.5;
        assert_eq!(tool.effective_stroke_width(), 4.5);
    }

    #[test]
    fn dashed_style_uses_pattern() {
        let mut tool = ToolConfig::default();
        assert!(tool.dash_segments(&[10.0, 5.0]).is_empty());
        tool.dash = DashStyle::Dashed;
        assert_eq!(tool.dash_segments(&[10.0, 5.0]), vec![10.0, 5.0]);
    }
}
