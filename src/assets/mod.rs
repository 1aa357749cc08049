//! Asset fetching and decoding.
//!
//! Everything in this module runs on loader worker threads (see [`loader`]):
//! bytes are fetched from a path or URL, decoded to CPU-side data, and handed
//! to the UI thread for GPU upload.
//!
//! - [`mesh`] - GPU-ready mesh/material data and bounds
//! - [`import`] - glTF decoding
//! - [`hdri`] - HDR environment image decoding
//! - [`loader`] - Background worker threads and load events

pub mod hdri;
pub mod import;
pub mod loader;
pub mod mesh;

use std::io::Read;
use std::path::PathBuf;

use crate::util::{Error, Result};

/// Chunk size for progress-reporting reads.
const READ_CHUNK: usize = 64 * 1024;

/// Where an asset comes from: a filesystem path or an http(s) URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetSource {
    Path(PathBuf),
    Url(String),
}

impl AssetSource {
    /// Classify a user-supplied string. Anything that does not start with an
    /// `http://` or `https://` scheme is treated as a filesystem path.
    pub fn parse(s: &str) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            Self::Url(s.to_string())
        } else {
            Self::Path(PathBuf::from(s))
        }
    }

    /// Short human-readable label for status lines and log messages.
    pub fn label(&self) -> String {
        match self {
            Self::Path(p) => p
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.display().to_string()),
            Self::Url(u) => u.rsplit('/').next().unwrap_or(u).to_string(),
        }
    }
}

impl std::fmt::Display for AssetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(p) => write!(f, "{}", p.display()),
            Self::Url(u) => write!(f, "{}", u),
        }
    }
}

/// Fetch the raw bytes of an asset, reporting progress as `(loaded, total)`.
/// `total` is `None` when the size is not known up front (e.g. a response
/// without a Content-Length header).
pub fn fetch_bytes(
    source: &AssetSource,
    progress: &mut dyn FnMut(u64, Option<u64>),
) -> Result<Vec<u8>> {
    match source {
        AssetSource::Path(path) => {
            if !path.exists() {
                return Err(Error::FileNotFound(path.clone()));
            }
            let file = std::fs::File::open(path)?;
            let total = file.metadata().map(|m| m.len()).ok();
            read_with_progress(file, total, progress)
        }
        AssetSource::Url(url) => {
            let response = reqwest::blocking::get(url.as_str())?;
            let status = response.status();
            if !status.is_success() {
                return Err(Error::FetchStatus {
                    url: url.clone(),
                    status: status.as_u16(),
                });
            }
            let total = response.content_length();
            read_with_progress(response, total, progress)
        }
    }
}

fn read_with_progress(
    mut reader: impl Read,
    total: Option<u64>,
    progress: &mut dyn FnMut(u64, Option<u64>),
) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(total.unwrap_or(0) as usize);
    let mut chunk = vec![0u8; READ_CHUNK];
    loop {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        bytes.extend_from_slice(&chunk[..n]);
        progress(bytes.len() as u64, total);
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_source_parse() {
        assert_eq!(
            AssetSource::parse("https://example.com/a/env.hdr"),
            AssetSource::Url("https://example.com/a/env.hdr".into())
        );
        assert_eq!(
            AssetSource::parse("http://host/file.hdr"),
            AssetSource::Url("http://host/file.hdr".into())
        );
        assert_eq!(
            AssetSource::parse("assets/model.gltf"),
            AssetSource::Path(PathBuf::from("assets/model.gltf"))
        );
        // Windows drive letters are paths, not schemes
        assert_eq!(
            AssetSource::parse("C:/models/a.glb"),
            AssetSource::Path(PathBuf::from("C:/models/a.glb"))
        );
    }

    #[test]
    fn test_source_label() {
        assert_eq!(
            AssetSource::parse("https://example.com/a/env.hdr").label(),
            "env.hdr"
        );
        assert_eq!(AssetSource::parse("assets/model.gltf").label(), "model.gltf");
    }

    #[test]
    fn test_fetch_missing_file() {
        let src = AssetSource::Path(PathBuf::from("/definitely/not/here.gltf"));
        let err = fetch_bytes(&src, &mut |_, _| {}).unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }

    #[test]
    fn test_fetch_reports_progress() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let payload = vec![7u8; 1000];
        file.write_all(&payload).unwrap();

        let src = AssetSource::Path(file.path().to_path_buf());
        let mut seen = Vec::new();
        let bytes = fetch_bytes(&src, &mut |loaded, total| seen.push((loaded, total))).unwrap();

        assert_eq!(bytes, payload);
        // At least one progress report, final one covering the whole file
        assert_eq!(seen.last(), Some(&(1000, Some(1000))));
    }
}
