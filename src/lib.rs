//! # Vitrine
//!
//! Native 3D model showcase: loads a glTF model and an equirectangular HDR
//! environment map, lights the model from the environment, applies a
//! chromatic-shift post effect, and rotates the model to follow the pointer.
//!
//! ## Modules
//!
//! - [`util`] - Error handling and shared helpers
//! - [`assets`] - Asset fetching and decoding (glTF, HDR) on worker threads
//! - [`viewer`] - The egui/wgpu application: shell, viewport, renderer
//!
//! ## Example
//!
//! ```ignore
//! use vitrine::viewer::{self, ViewerOptions};
//!
//! viewer::run(ViewerOptions::default())?;
//! ```

pub mod assets;
pub mod util;
pub mod viewer;

pub use util::{Error, Result};
