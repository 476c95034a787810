//! Gesture contract and tool configuration.
//!
//! This module defines what the pointer/rendering layer reports to the store
//! (gestures, hit tests, geometry read-back) and the read-only tool settings
//! supplied by UI controls.

pub mod events;
pub mod tool;

// Re-export commonly used types at module level
pub use events::{Gesture, NodeTransform, Point, RenderSurface};
pub use tool::{DashStyle, ToolConfig};
