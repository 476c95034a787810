//! Frame container for managing collections of shapes.

use super::shape::{Geometry, Shape, ShapeId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Invariant violations detected by [`Frame::validate`].
#[derive(Debug, Error, PartialEq)]
pub enum FrameError {
    #[error("duplicate shape id {0}")]
    DuplicateId(ShapeId),

    #[error("{count} shapes are selected; at most one is allowed")]
    MultipleSelected { count: usize },

    #[error("shape {id} has invalid geometry: {reason}")]
    InvalidGeometry { id: ShapeId, reason: &'static str },

    #[error("shape {id} has invalid style: {reason}")]
    InvalidStyle { id: ShapeId, reason: &'static str },
}

/// Ordered collection of all shapes on the canvas.
///
/// Shapes are kept in insertion order, which is also paint order (first =
/// bottom layer, last = top layer). The selection lives in the shapes' own
/// `selected` flags, so cloning a frame captures the selection as well.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Vector of all shapes in draw order
    pub shapes: Vec<Shape>,
}

impl Frame {
    /// Creates a new empty frame with no shapes.
    pub const fn new() -> Self {
        Self { shapes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Attempts to add a shape, enforcing a maximum shape count when `max` > 0.
    ///
    /// Returns `true` if the shape was added, `false` if the limit would be exceeded.
    pub fn try_add_shape(&mut self, shape: Shape, max: usize) -> bool {
        if self.has_room(max) {
            self.shapes.push(shape);
            true
        } else {
            false
        }
    }

    /// Returns whether another shape fits under the `max` limit (0 = unlimited).
    pub fn has_room(&self, max: usize) -> bool {
        max == 0 || self.shapes.len() < max
    }

    /// Drops shapes past the `max` limit (0 = unlimited) and returns how many
    /// were removed. The bottom-most shapes are kept.
    pub fn truncate_to_limit(&mut self, max: usize) -> usize {
        if max == 0 || self.shapes.len() <= max {
            return 0;
        }
        let dropped = self.shapes.len() - max;
        self.shapes.truncate(max);
        dropped
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.iter().any(|shape| shape.id == id)
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|shape| shape.id == id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|shape| shape.id == id)
    }

    /// Returns the id of the selected shape, if any.
    pub fn selected_id(&self) -> Option<ShapeId> {
        self.shapes
            .iter()
            .find(|shape| shape.selected)
            .map(|shape| shape.id)
    }

    /// Marks `id` as the only selected shape.
    ///
    /// Returns `false` (leaving every flag untouched) when `id` is not present.
    pub fn select(&mut self, id: ShapeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        for shape in &mut self.shapes {
            shape.selected = shape.id == id;
        }
        true
    }

    pub fn clear_selection(&mut self) {
        for shape in &mut self.shapes {
            shape.selected = false;
        }
    }

    /// Largest id present in the frame.
    pub fn max_id(&self) -> Option<ShapeId> {
        self.shapes.iter().map(|shape| shape.id).max()
    }

    /// Checks the data-model invariants: unique ids, at most one selection,
    /// finite coordinates, sizes of at least `min_size` and a positive stroke.
    pub fn validate(&self, min_size: f64) -> Result<(), FrameError> {
        let mut seen = HashSet::with_capacity(self.shapes.len());
        let mut selected = 0;

        for shape in &self.shapes {
            if !seen.insert(shape.id) {
                return Err(FrameError::DuplicateId(shape.id));
            }
            if shape.selected {
                selected += 1;
            }
            validate_style(shape)?;
            validate_geometry(shape, min_size)?;
        }

        if selected > 1 {
            return Err(FrameError::MultipleSelected { count: selected });
        }
        Ok(())
    }
}

fn validate_style(shape: &Shape) -> Result<(), FrameError> {
    let invalid = |reason| FrameError::InvalidStyle {
        id: shape.id,
        reason,
    };

    if !(shape.stroke_width.is_finite() && shape.stroke_width > 0.0) {
        return Err(invalid("stroke width must be positive"));
    }
    if !shape.stroke.is_valid() {
        return Err(invalid("stroke color out of range"));
    }
    if shape
        .dash
        .iter()
        .any(|segment| !segment.is_finite() || *segment < 0.0)
    {
        return Err(invalid("dash segments must be non-negative"));
    }
    Ok(())
}

fn validate_geometry(shape: &Shape, min_size: f64) -> Result<(), FrameError> {
    let invalid = |reason| FrameError::InvalidGeometry {
        id: shape.id,
        reason,
    };

    match &shape.geometry {
        Geometry::Rectangle {
            x,
            y,
            width,
            height,
            fill,
        } => {
            if !(x.is_finite() && y.is_finite()) {
                return Err(invalid("origin is not finite"));
            }
            if !(width.is_finite() && height.is_finite()) || *width < min_size || *height < min_size
            {
                return Err(invalid("size below minimum"));
            }
            if !fill.is_valid() {
                return Err(invalid("fill color out of range"));
            }
        }
        Geometry::Circle { x, y, radius, fill } => {
            if !(x.is_finite() && y.is_finite()) {
                return Err(invalid("center is not finite"));
            }
            if !radius.is_finite() || *radius < min_size {
                return Err(invalid("radius below minimum"));
            }
            if !fill.is_valid() {
                return Err(invalid("fill color out of range"));
            }
        }
        Geometry::Line { points } => {
            if points.iter().any(|p| !p.is_finite()) {
                return Err(invalid("endpoints are not finite"));
            }
        }
    }
    Ok(())
}
