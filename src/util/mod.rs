//! Shared utility types.
//!
//! - [`Error`] / [`Result`] - Error handling for the asset pipeline

mod error;

pub use error::*;
