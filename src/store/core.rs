//! Shape store state and the history-aware mutation primitives.

use crate::config::Config;
use crate::draw::{
    Frame, Geometry, GeometryPatch, History, Shape, ShapeDefaults, ShapeId, ShapeKind,
};
use crate::input::{Point, ToolConfig};
use log::{debug, warn};

/// Owns the live shape collection for one editing session.
///
/// Every mutating operation records the pre-mutation frame in [`History`]
/// before touching the collection; selection lives in the shapes themselves so
/// it travels with each snapshot.
#[derive(Debug, Clone)]
pub struct ShapeStore {
    /// Live collection (insertion order = paint order)
    pub(crate) frame: Frame,
    pub(crate) history: History,
    /// Active tool settings used by placement gestures
    pub(crate) tool: ToolConfig,
    pub(crate) defaults: ShapeDefaults,
    /// First click of a two-click line, waiting for the second
    pub(crate) pending_line: Option<Point>,
    /// Next id handed out; never rewinds, so ids stay unique across undo.
    /// `None` once the id space is used up.
    pub(crate) next_id: Option<u64>,
    /// Maximum number of shapes allowed in the frame (0 = unlimited)
    pub max_shapes: usize,
}

impl ShapeStore {
    /// Creates an empty store with unbounded history.
    pub fn new(tool: ToolConfig, defaults: ShapeDefaults) -> Self {
        Self {
            frame: Frame::new(),
            history: History::new(0),
            tool,
            defaults,
            pending_line: None,
            next_id: Some(1),
            max_shapes: 0,
        }
    }

    /// Creates a store using the tool, shape and history settings from `config`.
    pub fn from_config(config: &Config) -> Self {
        let mut store = Self::new(config.drawing.tool_config(), config.shapes.to_defaults());
        store.history = History::new(config.history.max_depth);
        store.max_shapes = config.session.max_shapes;
        store
    }

    /// Replaces the history with one capped at `max_depth` snapshots (0 = unbounded).
    pub fn with_history_depth(mut self, max_depth: usize) -> Self {
        self.history = History::new(max_depth);
        self
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.frame.shapes
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.frame.get(id)
    }

    /// Id of the currently selected shape, derived from the shapes' flags.
    pub fn selected_id(&self) -> Option<ShapeId> {
        self.frame.selected_id()
    }

    pub fn pending_line_start(&self) -> Option<Point> {
        self.pending_line
    }

    pub fn tool(&self) -> &ToolConfig {
        &self.tool
    }

    pub fn defaults(&self) -> &ShapeDefaults {
        &self.defaults
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Creates a shape of `kind` at `point` using the styling in `tool`.
    ///
    /// Rectangles use `point` as their top-left corner and circles as their
    /// center; both get the default size and become the selection. Lines take
    /// two calls: the first only records the start point and returns `None`
    /// without touching history, the second completes the segment.
    ///
    /// Returns `None` as well when the shape limit is reached.
    pub fn create(&mut self, kind: ShapeKind, point: Point, tool: &ToolConfig) -> Option<&Shape> {
        let geometry = match kind {
            ShapeKind::Rectangle => {
                self.pending_line = None;
                Geometry::Rectangle {
                    x: point.x,
                    y: point.y,
                    width: self.defaults.rect_width,
                    height: self.defaults.rect_height,
                    fill: tool.fill,
                }
            }
            ShapeKind::Circle => {
                self.pending_line = None;
                Geometry::Circle {
                    x: point.x,
                    y: point.y,
                    radius: self.defaults.circle_radius,
                    fill: tool.fill,
                }
            }
            ShapeKind::Line => match self.pending_line.take() {
                Some(start) => Geometry::Line {
                    points: [start.x, start.y, point.x, point.y],
                },
                None => {
                    debug!("Line start recorded at ({}, {})", point.x, point.y);
                    self.pending_line = Some(point);
                    return None;
                }
            },
        };

        if !self.frame.has_room(self.max_shapes) {
            warn!(
                "Shape limit ({}) reached; discarding new {}",
                self.max_shapes, kind
            );
            return None;
        }

        let Some(id) = self.allocate_id() else {
            warn!("Shape ids exhausted; discarding new {}", kind);
            return None;
        };
        let shape = Shape {
            id,
            stroke: tool.stroke,
            stroke_width: tool.effective_stroke_width(),
            dash: tool.dash_segments(&self.defaults.dash_pattern),
            draggable: true,
            selected: true,
            geometry,
        };

        self.history.record(&self.frame);
        self.frame.clear_selection();
        self.frame.shapes.push(shape);
        debug!("Created {} {}", kind, id);

        self.frame.shapes.last()
    }

    /// Makes `id` the only selected shape.
    ///
    /// Unknown ids are ignored. Selection is not an undoable edit, so no
    /// snapshot is recorded.
    pub fn select(&mut self, id: ShapeId) {
        if !self.frame.select(id) {
            debug!("Ignoring selection of unknown shape {}", id);
        }
    }

    /// Applies a partial geometry update to `id` after recording a snapshot.
    ///
    /// Sizes are clamped to the configured minimum. Unknown ids and patches
    /// carrying non-finite coordinates are ignored and leave history untouched.
    pub fn update_geometry(&mut self, id: ShapeId, patch: &GeometryPatch) {
        if !self.frame.contains(id) {
            debug!("Ignoring geometry update for unknown shape {}", id);
            return;
        }
        if !patch.has_finite_coordinates() {
            warn!("Ignoring non-finite position for {}: {:?}", id, patch);
            return;
        }

        self.history.record(&self.frame);
        let min_size = self.defaults.min_size;
        if let Some(shape) = self.frame.get_mut(id) {
            shape.apply_patch(patch, min_size);
        }
    }

    fn allocate_id(&mut self) -> Option<ShapeId> {
        let id = self.next_id?;
        self.next_id = id.checked_add(1);
        Some(ShapeId(id))
    }
}

impl Default for ShapeStore {
    fn default() -> Self {
        Self::new(ToolConfig::default(), ShapeDefaults::default())
    }
}
