//! End-to-end asset pipeline: file on disk -> loader worker -> decoded model.

use std::io::Write;
use std::time::{Duration, Instant};

use vitrine::assets::loader::{self, LoadEvent};
use vitrine::assets::AssetSource;

// Single-triangle glTF with an embedded base64 buffer.
const TRIANGLE_GLTF: &str = r#"{
    "asset": {"version": "2.0"},
    "scene": 0,
    "scenes": [{"nodes": [0]}],
    "nodes": [{"mesh": 0}],
    "meshes": [{"primitives": [{"attributes": {"POSITION": 0}, "indices": 1}]}],
    "accessors": [
        {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
         "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]},
        {"bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR"}
    ],
    "bufferViews": [
        {"buffer": 0, "byteOffset": 0, "byteLength": 36},
        {"buffer": 0, "byteOffset": 36, "byteLength": 6}
    ],
    "buffers": [{
        "byteLength": 42,
        "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAABAAIA"
    }]
}"#;

fn wait_for<T>(handle: &loader::LoadHandle<T>) -> Result<T, String> {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        match handle.poll() {
            Some(LoadEvent::Ready(value)) => return Ok(value),
            Some(LoadEvent::Failed(err)) => return Err(err),
            Some(LoadEvent::Progress { .. }) | None => {
                assert!(Instant::now() < deadline, "loader timed out");
                std::thread::sleep(Duration::from_millis(5));
            }
        }
    }
}

#[test]
fn model_loads_through_worker() {
    let mut file = tempfile::Builder::new()
        .suffix(".gltf")
        .tempfile()
        .unwrap();
    file.write_all(TRIANGLE_GLTF.as_bytes()).unwrap();

    let handle = loader::spawn_model(AssetSource::Path(file.path().to_path_buf()));
    let model = wait_for(&handle).expect("model should decode");

    assert_eq!(model.meshes.len(), 1);
    assert_eq!(model.triangle_count(), 1);
    assert!(model.bounds.is_valid());
    assert!(model.normalize_transform().is_finite());
}

#[test]
fn model_failure_does_not_block_another_load() {
    let missing = loader::spawn_model(AssetSource::Path("/no/such/model.glb".into()));

    let mut file = tempfile::Builder::new()
        .suffix(".gltf")
        .tempfile()
        .unwrap();
    file.write_all(TRIANGLE_GLTF.as_bytes()).unwrap();
    let ok = loader::spawn_model(AssetSource::Path(file.path().to_path_buf()));

    assert!(wait_for(&missing).is_err());
    assert!(wait_for(&ok).is_ok());
}
