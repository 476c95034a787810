use crate::draw::Frame;
use crate::input::ToolConfig;
use crate::session::{self, ImportError};
use log::{debug, info, warn};

use super::ShapeStore;

impl ShapeStore {
    /// Replaces the active tool configuration.
    ///
    /// Switching to a different shape kind abandons a half-finished line.
    pub fn set_tool(&mut self, tool: ToolConfig) {
        if tool.kind != self.tool.kind && self.pending_line.take().is_some() {
            debug!("Tool changed to {}; discarding pending line start", tool.kind);
        }
        self.tool = tool;
    }

    /// Restores the previous snapshot. Returns `false` when history is empty.
    pub fn undo(&mut self) -> bool {
        self.pending_line = None;
        let undone = self.history.undo(&mut self.frame);
        if !undone {
            debug!("Nothing to undo");
        }
        undone
    }

    /// Re-applies the last undone snapshot. Returns `false` when nothing was undone.
    pub fn redo(&mut self) -> bool {
        self.pending_line = None;
        let redone = self.history.redo(&mut self.frame);
        if !redone {
            debug!("Nothing to redo");
        }
        redone
    }

    /// Serializes the live collection (never the history) into opaque bytes.
    pub fn export_state(&self) -> anyhow::Result<Vec<u8>> {
        session::export_state(&self.frame)
    }

    /// Replaces the live collection with the one encoded in `bytes`.
    ///
    /// Decoding and validation complete before anything is replaced, so a
    /// failed import leaves the store exactly as it was.
    ///
    /// Collections above the shape limit are truncated the same way a
    /// session load truncates them.
    pub fn import_state(&mut self, bytes: &[u8]) -> Result<(), ImportError> {
        let mut frame = session::import_state(bytes, self.defaults.min_size)?;
        let dropped = frame.truncate_to_limit(self.max_shapes);
        if dropped > 0 {
            warn!(
                "Imported collection exceeds the limit of {} shapes; dropped {}",
                self.max_shapes, dropped
            );
        }
        self.replace_frame(frame);
        Ok(())
    }

    /// Installs an already validated frame as the live collection.
    ///
    /// History and any pending line start are discarded because they describe
    /// a different document; the id allocator moves past every imported id.
    pub fn replace_frame(&mut self, frame: Frame) {
        if let Some(max) = frame.max_id() {
            self.next_id = match (self.next_id, max.0.checked_add(1)) {
                (Some(current), Some(after_import)) => Some(current.max(after_import)),
                _ => None,
            };
        }
        info!("Loaded {} shapes into the editor", frame.len());
        self.frame = frame;
        self.history.clear();
        self.pending_line = None;
    }
}
