use super::*;
use crate::config::{Config, SessionStorageMode};
use crate::draw::{BLACK, Frame, Geometry, Shape, ShapeId, TRANSPARENT, WHITE};
use flate2::{Compression, write::GzEncoder};
use std::fs;
use std::io::Write;
use std::path::Path;

fn rect(id: u64, x: f64, selected: bool) -> Shape {
    Shape {
        id: ShapeId(id),
        stroke: BLACK,
        stroke_width: 2.0,
        dash: Vec::new(),
        draggable: true,
        selected,
        geometry: Geometry::Rectangle {
            x,
            y: 0.0,
            width: 100.0,
            height: 60.0,
            fill: WHITE,
        },
    }
}

fn sample_frame() -> Frame {
    let mut frame = Frame::new();
    frame.shapes.push(rect(1, 0.0, false));
    frame.shapes.push(Shape {
        id: ShapeId(2),
        stroke: BLACK,
        stroke_width: 1.5,
        dash: vec![10.0, 5.0],
        draggable: true,
        selected: true,
        geometry: Geometry::Line {
            points: [0.1, 0.2, 33.3, 44.4],
        },
    });
    frame.shapes.push(Shape {
        id: ShapeId(3),
        stroke: BLACK,
        stroke_width: 2.0,
        dash: Vec::new(),
        draggable: true,
        selected: false,
        geometry: Geometry::Circle {
            x: 10.0,
            y: 10.0,
            radius: 50.0,
            fill: TRANSPARENT,
        },
    });
    frame
}

fn options_in(dir: &Path) -> SessionOptions {
    let mut options = SessionOptions::new(dir.to_path_buf());
    options.compression = CompressionMode::Off;
    options
}

fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

#[test]
fn export_import_preserves_order_and_selection() {
    let frame = sample_frame();
    let bytes = export_state(&frame).unwrap();
    let restored = import_state(&bytes, 5.0).unwrap();

    assert_eq!(restored, frame);
    assert_eq!(restored.selected_id(), Some(ShapeId(2)));
    let ids: Vec<_> = restored.shapes.iter().map(|s| s.id.0).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn export_writes_tagged_json() {
    let bytes = export_state(&sample_frame()).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(value["version"], CURRENT_VERSION);
    assert!(value["last_modified"].as_str().is_some());
    assert_eq!(value["shapes"][0]["kind"], "rectangle");
    assert_eq!(value["shapes"][1]["kind"], "line");
    assert_eq!(value["shapes"][2]["kind"], "circle");
}

#[test]
fn import_accepts_gzip_payloads() {
    let frame = sample_frame();
    let compressed = gzip(&export_state(&frame).unwrap());
    assert_eq!(import_state(&compressed, 5.0).unwrap(), frame);
}

#[test]
fn import_fills_optional_flags() {
    let json = br#"{
        "version": 1,
        "shapes": [
            {"id": 7, "kind": "circle", "x": 1.0, "y": 2.0, "radius": 20.0,
             "fill": {"r": 0.0, "g": 0.0, "b": 0.0, "a": 0.0},
             "stroke": {"r": 0.0, "g": 0.0, "b": 0.0, "a": 1.0},
             "stroke_width": 2.0}
        ]
    }"#;

    let frame = import_state(json, 5.0).unwrap();
    let shape = &frame.shapes[0];
    assert!(shape.draggable);
    assert!(!shape.selected);
    assert!(shape.dash.is_empty());
}

#[test]
fn import_rejects_unknown_versions() {
    for version in [0, CURRENT_VERSION + 1] {
        let json = format!(r#"{{"version": {version}, "shapes": []}}"#);
        match import_state(json.as_bytes(), 5.0) {
            Err(ImportError::UnsupportedVersion { found, .. }) => assert_eq!(found, version),
            other => panic!("expected version error, got {other:?}"),
        }
    }
}

#[test]
fn import_rejects_malformed_payloads() {
    assert!(matches!(
        import_state(b"definitely not json", 5.0),
        Err(ImportError::Parse(_))
    ));
    assert!(matches!(
        import_state(&[0x1f, 0x8b, 0x00, 0x01, 0x02], 5.0),
        Err(ImportError::Decompress(_))
    ));
}

#[test]
fn import_rejects_invalid_collections() {
    let mut duplicate = sample_frame();
    duplicate.shapes[2].id = ShapeId(1);
    let bytes = export_state(&duplicate).unwrap();
    assert!(matches!(
        import_state(&bytes, 5.0),
        Err(ImportError::Invalid(_))
    ));

    let mut double_selection = sample_frame();
    double_selection.shapes[0].selected = true;
    let bytes = export_state(&double_selection).unwrap();
    assert!(matches!(
        import_state(&bytes, 5.0),
        Err(ImportError::Invalid(_))
    ));
}

#[test]
fn save_then_load_round_trips() {
    let temp = tempfile::tempdir().unwrap();
    let options = options_in(temp.path());
    let frame = sample_frame();

    save_snapshot(&frame, &options).unwrap();
    assert!(options.session_file_path().exists());

    let loaded = load_snapshot(&options).unwrap().unwrap();
    assert_eq!(loaded, frame);
}

#[test]
fn compression_on_writes_gzip() {
    let temp = tempfile::tempdir().unwrap();
    let mut options = options_in(temp.path());
    options.compression = CompressionMode::On;

    save_snapshot(&sample_frame(), &options).unwrap();
    let raw = fs::read(options.session_file_path()).unwrap();
    assert_eq!(&raw[..2], &[0x1f, 0x8b]);

    let info = inspect_session(&options).unwrap();
    assert!(info.compressed);
    assert_eq!(info.shape_count, Some(3));
    assert_eq!(load_snapshot(&options).unwrap().unwrap(), sample_frame());
}

#[test]
fn second_save_rotates_backup() {
    let temp = tempfile::tempdir().unwrap();
    let options = options_in(temp.path());

    let mut first = Frame::new();
    first.shapes.push(rect(1, 0.0, true));
    save_snapshot(&first, &options).unwrap();
    assert!(!options.backup_file_path().exists());

    save_snapshot(&sample_frame(), &options).unwrap();
    let backup = fs::read(options.backup_file_path()).unwrap();
    assert_eq!(import_state(&backup, 5.0).unwrap(), first);
}

#[test]
fn zero_backup_retention_skips_backup() {
    let temp = tempfile::tempdir().unwrap();
    let mut options = options_in(temp.path());
    options.backup_retention = 0;

    save_snapshot(&sample_frame(), &options).unwrap();
    save_snapshot(&sample_frame(), &options).unwrap();
    assert!(!options.backup_file_path().exists());
}

#[test]
fn saving_empty_frame_removes_session_file() {
    let temp = tempfile::tempdir().unwrap();
    let options = options_in(temp.path());

    save_snapshot(&sample_frame(), &options).unwrap();
    save_snapshot(&Frame::new(), &options).unwrap();

    assert!(!options.session_file_path().exists());
    assert!(load_snapshot(&options).unwrap().is_none());
}

#[test]
fn persistence_disabled_skips_disk() {
    let temp = tempfile::tempdir().unwrap();
    let mut options = options_in(temp.path());
    options.persist = false;

    save_snapshot(&sample_frame(), &options).unwrap();
    assert!(!options.session_file_path().exists());
    assert!(load_snapshot(&options).unwrap().is_none());
}

#[test]
fn oversized_payload_is_not_written() {
    let temp = tempfile::tempdir().unwrap();
    let mut options = options_in(temp.path());
    options.max_file_size_bytes = 16;

    save_snapshot(&sample_frame(), &options).unwrap();
    assert!(!options.session_file_path().exists());
}

#[test]
fn load_truncates_to_shape_limit() {
    let temp = tempfile::tempdir().unwrap();
    let mut options = options_in(temp.path());
    save_snapshot(&sample_frame(), &options).unwrap();

    options.max_shapes = 2;
    let loaded = load_snapshot(&options).unwrap().unwrap();
    let ids: Vec<_> = loaded.shapes.iter().map(|s| s.id.0).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn corrupt_session_file_reports_error() {
    let temp = tempfile::tempdir().unwrap();
    let options = options_in(temp.path());
    fs::write(options.session_file_path(), b"{\"version\": 1, \"shapes\": [{}]}").unwrap();

    let err = load_snapshot(&options).unwrap_err();
    assert!(format!("{err:#}").contains("failed to import session file"));
}

#[test]
fn clear_session_removes_all_files() {
    let temp = tempfile::tempdir().unwrap();
    let options = options_in(temp.path());
    save_snapshot(&sample_frame(), &options).unwrap();
    save_snapshot(&sample_frame(), &options).unwrap();

    let outcome = clear_session(&options).unwrap();
    assert!(outcome.removed_session);
    assert!(outcome.removed_backup);
    assert!(outcome.removed_lock);

    let again = clear_session(&options).unwrap();
    assert!(!again.removed_session && !again.removed_backup && !again.removed_lock);
}

#[test]
fn inspect_reports_missing_and_present_sessions() {
    let temp = tempfile::tempdir().unwrap();
    let options = options_in(temp.path());

    let empty = inspect_session(&options).unwrap();
    assert!(!empty.exists);
    assert_eq!(empty.shape_count, None);

    save_snapshot(&sample_frame(), &options).unwrap();
    let info = inspect_session(&options).unwrap();
    assert!(info.exists);
    assert!(!info.compressed);
    assert_eq!(info.shape_count, Some(3));
    assert_eq!(info.selected, Some(ShapeId(2)));
    assert!(info.size_bytes.unwrap() > 0);
}

#[test]
fn options_follow_config_values() {
    let temp = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.session.storage = SessionStorageMode::Custom;
    config.session.custom_directory = Some(temp.path().join("sessions").display().to_string());
    config.session.max_file_size_mb = 2;
    config.session.compress = crate::config::SessionCompression::On;
    config.shapes.min_size = 8.0;

    let options = options_from_config(&config, temp.path()).unwrap();
    assert_eq!(options.base_dir, temp.path().join("sessions"));
    assert_eq!(options.max_file_size_bytes, 2 * 1024 * 1024);
    assert_eq!(options.compression, CompressionMode::On);
    assert_eq!(options.min_shape_size, 8.0);
}

#[test]
fn config_storage_uses_config_directory() {
    let temp = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.session.storage = SessionStorageMode::Config;

    let options = options_from_config(&config, temp.path()).unwrap();
    assert_eq!(options.base_dir, temp.path());
    assert_eq!(options.session_file_path(), temp.path().join("session.json"));
}

#[test]
fn custom_storage_requires_directory() {
    let mut config = Config::default();
    config.session.storage = SessionStorageMode::Custom;
    config.session.custom_directory = None;

    assert!(options_from_config(&config, Path::new("/tmp")).is_err());
}

#[test]
fn oversized_gzip_payload_is_rejected() {
    let bytes = export_state(&sample_frame()).unwrap();
    let compressed = gzip(&bytes);
    let limit = bytes.len() as u64 - 1;

    assert!(matches!(
        import_state_with_limit(&compressed, 5.0, limit),
        Err(ImportError::TooLarge { limit: l }) if l == limit
    ));
    assert_eq!(
        import_state_with_limit(&compressed, 5.0, bytes.len() as u64).unwrap(),
        sample_frame()
    );
}

#[test]
fn load_rejects_session_that_expands_past_size_limit() {
    let temp = tempfile::tempdir().unwrap();
    let mut options = options_in(temp.path());
    options.compression = CompressionMode::On;
    save_snapshot(&sample_frame(), &options).unwrap();

    let stored = fs::metadata(options.session_file_path()).unwrap().len();
    let plain = export_state(&sample_frame()).unwrap().len() as u64;
    assert!(stored < plain);
    options.max_file_size_bytes = stored + (plain - stored) / 2;

    let err = load_snapshot(&options).unwrap_err();
    assert!(format!("{err:#}").contains("exceeds"));
}
