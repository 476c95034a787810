use crate::draw::{Geometry, GeometryPatch, ShapeId};
use crate::input::{Gesture, NodeTransform, Point, RenderSurface};
use log::debug;

use super::ShapeStore;

impl ShapeStore {
    /// Dispatches a gesture reported by the pointer layer.
    pub fn handle_gesture(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::Place(point) => self.on_place(point),
            Gesture::Select(id) => self.on_select(id),
            Gesture::DragEnd { id, position } => self.on_drag_end(id, position),
            Gesture::TransformEnd { id, transform } => self.on_transform_end(id, transform),
        }
    }

    /// Pointer down on empty canvas: create a shape with the active tool.
    pub fn on_place(&mut self, point: Point) {
        let tool = self.tool;
        self.create(tool.kind, point, &tool);
    }

    /// Click on a rendered shape.
    pub fn on_select(&mut self, id: ShapeId) {
        self.select(id);
    }

    /// Drag released at `position`.
    ///
    /// For rectangles and circles this is the new origin/center. For lines it
    /// is the new first endpoint; the whole segment follows it rigidly.
    pub fn on_drag_end(&mut self, id: ShapeId, position: Point) {
        self.update_geometry(id, &GeometryPatch::position(position.x, position.y));
    }

    /// Resize released with the node's final position and scale factors.
    ///
    /// Rectangles scale width and height independently; circles scale their
    /// radius by `scale_x`. Lines cannot be transformed and are left alone.
    pub fn on_transform_end(&mut self, id: ShapeId, transform: NodeTransform) {
        let Some(shape) = self.frame.get(id) else {
            debug!("Ignoring transform for unknown shape {}", id);
            return;
        };

        let patch = match shape.geometry {
            Geometry::Rectangle { width, height, .. } => {
                GeometryPatch::size(width * transform.scale_x, height * transform.scale_y)
            }
            Geometry::Circle { radius, .. } => GeometryPatch::radius(radius * transform.scale_x),
            Geometry::Line { .. } => {
                debug!("Lines are not resizable; ignoring transform of {}", id);
                return;
            }
        }
        .at(transform.x, transform.y);

        self.update_geometry(id, &patch);
    }

    /// Pointer down routed through the renderer's hit test: selects the shape
    /// under the pointer, or places a new one on empty canvas.
    pub fn on_pointer_down<S: RenderSurface + ?Sized>(&mut self, surface: &S, point: Point) {
        match surface.hit_test(point) {
            Some(id) => self.on_select(id),
            None => self.on_place(point),
        }
    }

    /// Drag released; the resolved position is read back from the renderer.
    pub fn on_drag_release<S: RenderSurface + ?Sized>(&mut self, surface: &S, id: ShapeId) {
        match surface.read_back(id) {
            Some(node) => self.on_drag_end(id, Point::new(node.x, node.y)),
            None => debug!("Renderer has no node for {}; drag ignored", id),
        }
    }

    /// Transform released; position and scale are read back from the renderer.
    pub fn on_transform_release<S: RenderSurface + ?Sized>(&mut self, surface: &S, id: ShapeId) {
        match surface.read_back(id) {
            Some(node) => self.on_transform_end(id, node),
            None => debug!("Renderer has no node for {}; transform ignored", id),
        }
    }
}
