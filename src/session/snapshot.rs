use super::options::{CompressionMode, DEFAULT_MAX_FILE_SIZE_BYTES, SessionOptions};
use crate::draw::{Frame, FrameError, Shape};
use anyhow::{Context, Result};
use chrono::Utc;
use flate2::{Compression, bufread::GzDecoder, write::GzEncoder};
use fs2::FileExt;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CURRENT_VERSION: u32 = 1;

/// Reasons an exported payload cannot be turned back into a [`Frame`].
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to decompress session payload: {0}")]
    Decompress(#[from] std::io::Error),

    #[error("failed to parse session json: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unsupported session version {found} (this build reads up to {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("decompressed session payload exceeds {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("session contains an invalid shape collection: {0}")]
    Invalid(#[from] FrameError),
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    version: u32,
    #[serde(default)]
    last_modified: String,
    #[serde(default)]
    shapes: Vec<Shape>,
}

pub struct LoadedSnapshot {
    pub frame: Frame,
    pub compressed: bool,
}

/// Serialises the ordered shape collection into an opaque, versioned payload.
///
/// Only the live collection is written; undo/redo history never is.
pub fn export_state(frame: &Frame) -> Result<Vec<u8>> {
    let file_payload = SessionFile {
        version: CURRENT_VERSION,
        last_modified: Utc::now().to_rfc3339(),
        shapes: frame.shapes.clone(),
    };
    serde_json::to_vec_pretty(&file_payload).context("failed to serialise session payload")
}

/// Decodes a payload produced by [`export_state`] (plain or gzip-compressed).
///
/// The collection is validated before it is returned, so callers can swap it
/// in without further checks. Compressed input may expand to at most
/// [`DEFAULT_MAX_FILE_SIZE_BYTES`].
pub fn import_state(bytes: &[u8], min_size: f64) -> Result<Frame, ImportError> {
    import_state_with_limit(bytes, min_size, DEFAULT_MAX_FILE_SIZE_BYTES)
}

/// [`import_state`] with an explicit cap on the decompressed payload size.
pub fn import_state_with_limit(
    bytes: &[u8],
    min_size: f64,
    max_bytes: u64,
) -> Result<Frame, ImportError> {
    let decompressed;
    let json = if is_gzip(bytes) {
        let mut out = Vec::new();
        GzDecoder::new(bytes)
            .take(max_bytes.saturating_add(1))
            .read_to_end(&mut out)?;
        if out.len() as u64 > max_bytes {
            return Err(ImportError::TooLarge { limit: max_bytes });
        }
        decompressed = out;
        &decompressed[..]
    } else {
        bytes
    };

    let session_file: SessionFile = serde_json::from_slice(json)?;
    if session_file.version == 0 || session_file.version > CURRENT_VERSION {
        return Err(ImportError::UnsupportedVersion {
            found: session_file.version,
            supported: CURRENT_VERSION,
        });
    }

    let frame = Frame {
        shapes: session_file.shapes,
    };
    frame.validate(min_size)?;
    Ok(frame)
}

/// Persist the provided frame to disk according to the configured options.
pub fn save_snapshot(frame: &Frame, options: &SessionOptions) -> Result<()> {
    if !options.persist {
        debug!("Session persistence disabled; skipping save");
        return Ok(());
    }

    fs::create_dir_all(&options.base_dir).with_context(|| {
        format!(
            "failed to create session directory {}",
            options.base_dir.display()
        )
    })?;

    let lock_path = options.lock_file_path();
    let lock_file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)
        .with_context(|| format!("failed to open session lock file {}", lock_path.display()))?;
    lock_file
        .lock_exclusive()
        .with_context(|| format!("failed to lock session file {}", lock_path.display()))?;

    let result = save_snapshot_inner(frame, options);

    FileExt::unlock(&lock_file).unwrap_or_else(|err| {
        warn!(
            "failed to unlock session file {}: {}",
            lock_path.display(),
            err
        )
    });

    result
}

fn save_snapshot_inner(frame: &Frame, options: &SessionOptions) -> Result<()> {
    let session_path = options.session_file_path();
    let backup_path = options.backup_file_path();

    if frame.is_empty() {
        if session_path.exists() {
            debug!(
                "Removing session file {} because the canvas is empty",
                session_path.display()
            );
            fs::remove_file(&session_path).with_context(|| {
                format!(
                    "failed to remove empty session file {}",
                    session_path.display()
                )
            })?;
        }
        return Ok(());
    }

    let mut json_bytes = export_state(frame)?;

    if json_bytes.len() as u64 > options.max_file_size_bytes {
        warn!(
            "Session data size {} bytes exceeds the configured limit of {} bytes; skipping save",
            json_bytes.len(),
            options.max_file_size_bytes
        );
        return Ok(());
    }

    let should_compress = match options.compression {
        CompressionMode::Off => false,
        CompressionMode::On => true,
        CompressionMode::Auto => (json_bytes.len() as u64) >= options.auto_compress_threshold_bytes,
    };

    if should_compress {
        json_bytes = compress_bytes(&json_bytes)?;
    }

    let tmp_path = temp_path(&session_path);
    {
        let mut tmp_file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
            .with_context(|| {
                format!(
                    "failed to open temporary session file {}",
                    tmp_path.display()
                )
            })?;
        tmp_file
            .write_all(&json_bytes)
            .context("failed to write session payload")?;
        tmp_file
            .sync_all()
            .context("failed to sync temporary session file")?;
    }

    if session_path.exists() {
        if options.backup_retention > 0 {
            if backup_path.exists() {
                fs::remove_file(&backup_path).ok();
            }
            fs::rename(&session_path, &backup_path).with_context(|| {
                format!(
                    "failed to rotate previous session file {} -> {}",
                    session_path.display(),
                    backup_path.display()
                )
            })?;
        } else {
            fs::remove_file(&session_path).ok();
        }
    }

    fs::rename(&tmp_path, &session_path).with_context(|| {
        format!(
            "failed to move temporary session file {} -> {}",
            tmp_path.display(),
            session_path.display()
        )
    })?;

    info!(
        "Session saved to {} ({} shapes, {} bytes, compression={})",
        session_path.display(),
        frame.len(),
        json_bytes.len(),
        should_compress
    );

    Ok(())
}

/// Attempt to load a previously saved session.
pub fn load_snapshot(options: &SessionOptions) -> Result<Option<Frame>> {
    if !options.persist {
        debug!("Session persistence disabled; skipping load");
        return Ok(None);
    }

    let session_path = options.session_file_path();
    if !session_path.exists() {
        debug!(
            "No session file present at {}, skipping load",
            session_path.display()
        );
        return Ok(None);
    }

    let metadata = fs::metadata(&session_path)
        .with_context(|| format!("failed to stat session file {}", session_path.display()))?;
    if metadata.len() > options.max_file_size_bytes {
        warn!(
            "Session file {} is {} bytes which exceeds the configured limit ({} bytes); refusing to load",
            session_path.display(),
            metadata.len(),
            options.max_file_size_bytes
        );
        return Ok(None);
    }

    let lock_path = options.lock_file_path();
    let lock_file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)
        .with_context(|| format!("failed to open session lock file {}", lock_path.display()))?;
    FileExt::lock_shared(&lock_file)
        .with_context(|| format!("failed to acquire shared lock {}", lock_path.display()))?;

    let result = load_snapshot_inner(&session_path, options);

    FileExt::unlock(&lock_file).unwrap_or_else(|err| {
        warn!(
            "failed to unlock session file {}: {}",
            lock_path.display(),
            err
        )
    });

    Ok(result?.map(|loaded| loaded.frame))
}

pub(crate) fn load_snapshot_inner(
    session_path: &Path,
    options: &SessionOptions,
) -> Result<Option<LoadedSnapshot>> {
    let mut file_bytes = Vec::new();
    {
        let mut file = File::open(session_path)
            .with_context(|| format!("failed to open session file {}", session_path.display()))?;
        file.read_to_end(&mut file_bytes)
            .context("failed to read session file")?;
    }

    let compressed = is_gzip(&file_bytes);
    let mut frame = import_state_with_limit(
        &file_bytes,
        options.min_shape_size,
        options.max_file_size_bytes,
    )
        .with_context(|| format!("failed to import session file {}", session_path.display()))?;

    enforce_shape_limit(&mut frame, options.max_shapes);

    if frame.is_empty() {
        debug!(
            "Loaded session file at {} but it contained no shapes",
            session_path.display()
        );
        return Ok(None);
    }

    Ok(Some(LoadedSnapshot { frame, compressed }))
}

fn enforce_shape_limit(frame: &mut Frame, max_shapes: usize) {
    let dropped = frame.truncate_to_limit(max_shapes);
    if dropped > 0 {
        warn!(
            "Session exceeds the limit of {} shapes; dropped {}",
            max_shapes, dropped
        );
    }
}

fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .context("failed to compress session payload")?;
    encoder
        .finish()
        .context("failed to finalise compressed session payload")
}

fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() > 2 && bytes[0] == 0x1f && bytes[1] == 0x8b
}

fn temp_path(target: &Path) -> PathBuf {
    let mut candidate = target.with_extension("json.tmp");
    let mut counter = 0u32;
    while candidate.exists() {
        counter += 1;
        candidate = target.with_extension(format!("json.tmp{}", counter));
    }
    candidate
}
