//! Shape editing core: data model, history-aware mutations and persistence.
//!
//! The rendering and pointer layers live outside this crate. They report
//! gestures to a [`ShapeStore`], answer hit tests through
//! [`input::RenderSurface`], and move the collection in and out through the
//! [`session`] export/import surface.

pub mod config;
pub mod draw;
pub mod input;
pub mod session;
pub mod store;
pub mod util;

pub use config::Config;
pub use store::ShapeStore;
