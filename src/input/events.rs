//! Gesture events and the contract expected from the rendering layer.

use crate::draw::ShapeId;

/// A position in canvas (stage) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Node state reported by the renderer after a drag or transform.
///
/// `x`/`y` are the resolved absolute position: the origin of a rectangle, the
/// center of a circle, or the first endpoint of a line. Scale factors are
/// relative to the shape's size before the gesture started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    pub x: f64,
    pub y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl NodeTransform {
    /// A pure move with unit scale.
    pub fn translation(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

/// High-level gestures reported by the pointer layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Pointer down on empty canvas
    Place(Point),
    /// Click on a rendered shape
    Select(ShapeId),
    /// Drag released with the resolved absolute position
    DragEnd { id: ShapeId, position: Point },
    /// Resize released with the resolved position and scale factors
    TransformEnd { id: ShapeId, transform: NodeTransform },
}

/// What the editing core needs from a renderer.
///
/// Rasterization, hit-testing primitives and pointer capture live behind this
/// trait; the store only asks which shape is under a point and where a node
/// ended up after a gesture.
pub trait RenderSurface {
    /// Returns the topmost shape under `point`, if any.
    fn hit_test(&self, point: Point) -> Option<ShapeId>;

    /// Reads back the node geometry for `id` after a drag or transform.
    fn read_back(&self, id: ShapeId) -> Option<NodeTransform>;
}
