//! Shape data model and snapshot history.
//!
//! This module defines the core types edited by the store:
//! - [`Color`]: RGBA color representation with predefined color constants
//! - [`Shape`]: Shared style and selection state plus kind-specific [`Geometry`]
//! - [`Frame`]: Ordered collection of all shapes on the canvas
//! - [`History`]: Undo/redo stacks of frame snapshots

pub mod color;
pub mod frame;
pub mod history;
pub mod shape;

// Re-export commonly used types at module level
pub use color::Color;
pub use frame::{Frame, FrameError};
pub use history::History;
pub use shape::{Geometry, GeometryPatch, Shape, ShapeDefaults, ShapeId, ShapeKind};

#[allow(unused_imports)]
pub use color::{BLACK, BLUE, GREEN, ORANGE, PINK, RED, TRANSPARENT, WHITE, YELLOW};
