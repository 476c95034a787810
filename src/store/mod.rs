//! Shape store: the live collection plus the history-aware mutation protocol.
//!
//! The store turns gestures from the pointer layer into creations, selections
//! and geometry updates, recording a frame snapshot before each mutation so
//! undo/redo can swap whole collections.

mod actions;
mod core;
mod gestures;

pub use self::core::ShapeStore;
