//! Shape definitions for the editing surface.

use super::color::Color;
use crate::util;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier assigned to a shape at creation time.
///
/// Identifiers are never reused within a session, including across undo/redo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(pub u64);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape-{}", self.0)
    }
}

/// The three shape kinds supported by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Axis-aligned rectangle placed by its top-left corner
    Rectangle,
    /// Circle placed by its center
    Circle,
    /// Straight segment created with two clicks
    Line,
}

impl ShapeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Line => "line",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific geometry carried by a [`Shape`].
///
/// Serialized with an internal `kind` tag so exports read as flat records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Geometry {
    Rectangle {
        /// Top-left X coordinate
        x: f64,
        /// Top-left Y coordinate
        y: f64,
        width: f64,
        height: f64,
        fill: Color,
    },
    Circle {
        /// Center X coordinate
        x: f64,
        /// Center Y coordinate
        y: f64,
        radius: f64,
        fill: Color,
    },
    Line {
        /// Endpoints as `[x1, y1, x2, y2]`
        points: [f64; 4],
    },
}

/// A drawable entity: shared style and selection state plus its geometry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    /// Outline color
    pub stroke: Color,
    /// Outline width in canvas units (always positive)
    pub stroke_width: f64,
    /// On/off segment lengths; empty means a solid stroke
    #[serde(default)]
    pub dash: Vec<f64>,
    /// Whether the renderer may let the user drag this shape
    #[serde(default = "default_draggable")]
    pub draggable: bool,
    /// Selection flag, set on at most one shape of a frame
    #[serde(default)]
    pub selected: bool,
    #[serde(flatten)]
    pub geometry: Geometry,
}

fn default_draggable() -> bool {
    true
}

impl Shape {
    /// Returns the kind tag of this shape's geometry.
    pub fn kind(&self) -> ShapeKind {
        match self.geometry {
            Geometry::Rectangle { .. } => ShapeKind::Rectangle,
            Geometry::Circle { .. } => ShapeKind::Circle,
            Geometry::Line { .. } => ShapeKind::Line,
        }
    }

    /// Applies a partial geometry update, ignoring fields that do not belong to
    /// this shape's kind.
    ///
    /// Sizes and radii are clamped to `min_size`. For lines, `x`/`y` name the new
    /// position of the first endpoint and both endpoints move by the same delta;
    /// an explicit `points` value takes precedence over `x`/`y`.
    pub fn apply_patch(&mut self, patch: &GeometryPatch, min_size: f64) {
        match &mut self.geometry {
            Geometry::Rectangle {
                x,
                y,
                width,
                height,
                ..
            } => {
                if let Some(new_x) = patch.x {
                    *x = new_x;
                }
                if let Some(new_y) = patch.y {
                    *y = new_y;
                }
                if let Some(new_width) = patch.width {
                    *width = util::clamp_extent(new_width, min_size);
                }
                if let Some(new_height) = patch.height {
                    *height = util::clamp_extent(new_height, min_size);
                }
            }
            Geometry::Circle { x, y, radius, .. } => {
                if let Some(new_x) = patch.x {
                    *x = new_x;
                }
                if let Some(new_y) = patch.y {
                    *y = new_y;
                }
                if let Some(new_radius) = patch.radius {
                    *radius = util::clamp_extent(new_radius, min_size);
                }
            }
            Geometry::Line { points } => {
                if let Some(new_points) = patch.points {
                    *points = new_points;
                } else if patch.x.is_some() || patch.y.is_some() {
                    let dx = patch.x.map_or(0.0, |new_x| new_x - points[0]);
                    let dy = patch.y.map_or(0.0, |new_y| new_y - points[1]);
                    *points = util::translate_points(*points, dx, dy);
                }
            }
        }
    }
}

/// Partial geometry update used by drag and transform gestures.
///
/// Every field is optional; only those meaningful for the target shape's kind
/// are applied (see [`Shape::apply_patch`]).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeometryPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub radius: Option<f64>,
    pub points: Option<[f64; 4]>,
}

impl GeometryPatch {
    /// Patch that moves a shape's anchor (origin, center or first endpoint).
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Patch that resizes a rectangle.
    pub fn size(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Patch that resizes a circle.
    pub fn radius(radius: f64) -> Self {
        Self {
            radius: Some(radius),
            ..Self::default()
        }
    }

    /// Patch that replaces a line's endpoints.
    pub fn points(points: [f64; 4]) -> Self {
        Self {
            points: Some(points),
            ..Self::default()
        }
    }

    /// Returns false when `x`, `y` or `points` carry NaN or infinity.
    ///
    /// Sizes are not checked here; [`Shape::apply_patch`] clamps them.
    pub fn has_finite_coordinates(&self) -> bool {
        self.x.is_none_or(f64::is_finite)
            && self.y.is_none_or(f64::is_finite)
            && self
                .points
                .is_none_or(|points| points.iter().all(|p| p.is_finite()))
    }

    /// Adds an anchor position to an existing patch.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }
}

/// Canonical sizes applied when shapes are placed.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeDefaults {
    pub rect_width: f64,
    pub rect_height: f64,
    pub circle_radius: f64,
    /// Smallest width, height or radius a resize can produce
    pub min_size: f64,
    /// Segment lengths used for the dashed stroke style
    pub dash_pattern: Vec<f64>,
}

impl Default for ShapeDefaults {
    fn default() -> Self {
        Self {
            rect_width: 100.0,
            rect_height: 60.0,
            circle_radius: 50.0,
            min_size: 5.0,
            dash_pattern: vec![10.0, 5.0],
        }
    }
}
