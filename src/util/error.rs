//! Error types for the asset pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for asset loading and decoding.
#[derive(Error, Debug)]
pub enum Error {
    /// File does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Remote fetch returned a non-success status
    #[error("Fetch failed for {url}: HTTP {status}")]
    FetchStatus { url: String, status: u16 },

    /// Model file decoded but contained no renderable geometry
    #[error("Model contains no triangle meshes")]
    EmptyScene,

    /// Environment image decode failed
    #[error("Image decode failed: {0}")]
    Image(#[from] image::ImageError),

    /// glTF parse/validation failed
    #[error("glTF decode failed: {0}")]
    Gltf(#[from] gltf::Error),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

/// Result type alias for asset operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::FetchStatus {
            url: "https://example.com/env.hdr".into(),
            status: 404,
        };
        assert!(e.to_string().contains("404"));
        assert!(e.to_string().contains("env.hdr"));

        let e = Error::EmptyScene;
        assert!(e.to_string().contains("no triangle meshes"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
