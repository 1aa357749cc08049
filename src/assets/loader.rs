//! Background workers for asynchronous asset loading.
//!
//! Each asset gets its own detached worker thread. The worker fetches and
//! decodes off the UI thread and reports back over an mpsc channel that the
//! UI drains once per frame. Dropping the handle detaches the worker; its
//! remaining sends fail silently and the thread winds down.

use std::sync::mpsc::{channel, Receiver};
use std::thread;

use super::hdri::{self, EnvImage};
use super::import;
use super::mesh::ModelData;
use super::{fetch_bytes, AssetSource};
use crate::util::Result;

/// Events sent from a loader worker back to the UI thread.
pub enum LoadEvent<T> {
    /// Bytes fetched so far; total is unknown for some remote sources.
    Progress { loaded: u64, total: Option<u64> },
    /// Decoding finished; the asset is ready for GPU upload.
    Ready(T),
    /// Fetch or decode failed. The asset stays absent for this run.
    Failed(String),
}

/// Handle to one in-flight asset load.
pub struct LoadHandle<T> {
    rx: Receiver<LoadEvent<T>>,
}

impl<T> LoadHandle<T> {
    /// Next pending event, if any (non-blocking).
    pub fn poll(&self) -> Option<LoadEvent<T>> {
        self.rx.try_recv().ok()
    }
}

/// Run a fetch/decode job on a detached worker thread.
pub fn spawn<T, F>(job: F) -> LoadHandle<T>
where
    T: Send + 'static,
    F: FnOnce(&mut dyn FnMut(u64, Option<u64>)) -> Result<T> + Send + 'static,
{
    let (tx, rx) = channel();
    thread::spawn(move || {
        let progress_tx = tx.clone();
        let mut report = move |loaded: u64, total: Option<u64>| {
            let _ = progress_tx.send(LoadEvent::Progress { loaded, total });
        };
        let event = match job(&mut report) {
            Ok(value) => LoadEvent::Ready(value),
            Err(e) => LoadEvent::Failed(e.to_string()),
        };
        let _ = tx.send(event);
    });
    LoadHandle { rx }
}

/// Start loading a glTF/GLB model.
pub fn spawn_model(source: AssetSource) -> LoadHandle<ModelData> {
    spawn(move |progress| {
        let bytes = fetch_bytes(&source, progress)?;
        match (import::decode_slice(&bytes), &source) {
            (Ok(model), _) => Ok(model),
            // A JSON .gltf referencing external buffer/image files cannot be
            // decoded from its own bytes; re-import from the path so the
            // references resolve relative to its directory.
            (Err(_), AssetSource::Path(path)) => import::decode_file(path),
            (Err(e), _) => Err(e),
        }
    })
}

/// Start loading an equirectangular HDR environment image.
pub fn spawn_environment(source: AssetSource) -> LoadHandle<EnvImage> {
    spawn(move |progress| {
        let bytes = fetch_bytes(&source, progress)?;
        hdri::decode(&bytes)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::Error;
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(5);

    fn drain_until_done<T>(handle: &LoadHandle<T>) -> (Vec<(u64, Option<u64>)>, Option<T>, Option<String>) {
        let mut progress = Vec::new();
        loop {
            match handle.rx.recv_timeout(WAIT).expect("worker event") {
                LoadEvent::Progress { loaded, total } => progress.push((loaded, total)),
                LoadEvent::Ready(value) => return (progress, Some(value), None),
                LoadEvent::Failed(msg) => return (progress, None, Some(msg)),
            }
        }
    }

    #[test]
    fn test_job_success_with_progress() {
        let handle = spawn(|progress| {
            progress(50, Some(100));
            progress(100, Some(100));
            Ok(42u32)
        });
        let (progress, value, error) = drain_until_done(&handle);
        assert_eq!(progress, vec![(50, Some(100)), (100, Some(100))]);
        assert_eq!(value, Some(42));
        assert!(error.is_none());
    }

    #[test]
    fn test_job_failure_is_an_event() {
        let handle: LoadHandle<u32> = spawn(|_| Err(Error::other("decode exploded")));
        let (_, value, error) = drain_until_done(&handle);
        assert!(value.is_none());
        assert_eq!(error.as_deref(), Some("decode exploded"));
    }

    #[test]
    fn test_failures_are_independent_across_workers() {
        // One worker failing must not disturb the other's channel
        let failing: LoadHandle<u32> = spawn(|_| Err(Error::other("no network")));
        let succeeding = spawn(|_| Ok(7u32));

        let (_, value, error) = drain_until_done(&failing);
        assert!(value.is_none());
        assert!(error.is_some());

        let (_, value, error) = drain_until_done(&succeeding);
        assert_eq!(value, Some(7));
        assert!(error.is_none());
    }

    #[test]
    fn test_poll_is_nonblocking() {
        let handle: LoadHandle<u32> = spawn(|_| {
            std::thread::sleep(Duration::from_millis(200));
            Ok(1)
        });
        // Worker is still sleeping; poll must return immediately with nothing
        assert!(handle.poll().is_none());
        let (_, value, _) = drain_until_done(&handle);
        assert_eq!(value, Some(1));
    }

    #[test]
    fn test_spawn_model_missing_file() {
        let handle = spawn_model(AssetSource::Path("/nope/model.glb".into()));
        let (_, value, error) = drain_until_done(&handle);
        assert!(value.is_none());
        assert!(error.unwrap().contains("File not found"));
    }
}
