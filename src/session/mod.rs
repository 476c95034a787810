//! Session persistence (export/import and save/restore) support.
//!
//! Converts the live shape collection into an opaque serialised payload and
//! back, and writes it to disk with locking, optional compression, and backup
//! rotation. Undo/redo history is never persisted.

mod options;
mod snapshot;
mod storage;

pub use options::{
    CompressionMode, DEFAULT_AUTO_COMPRESS_THRESHOLD_BYTES, DEFAULT_MAX_FILE_SIZE_BYTES,
    SessionOptions, options_from_config,
};
pub use snapshot::{
    CURRENT_VERSION, ImportError, export_state, import_state, import_state_with_limit,
    load_snapshot, save_snapshot,
};
pub use storage::{ClearOutcome, SessionInspection, clear_session, inspect_session};

#[cfg(test)]
mod tests;
