//! # Content Feature
//!
//! Read-only task pool partitioned by category, plus random batch sampling.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Accept YAML category files next to JSON ones
//! - 1.0.0: Initial release with JSON category files

pub mod pool;
pub mod sampler;

pub use pool::{ContentItem, ContentPool};
pub use sampler::ContentSampler;

use std::path::PathBuf;
use thiserror::Error;

/// Content loading and sampling errors
#[derive(Debug, Error)]
pub enum ContentError {
    /// A category has no items to draw from (or the pool has no categories)
    #[error("content pool is empty for category '{category}'")]
    EmptyPool { category: String },

    #[error("batch size must be at least 1")]
    InvalidBatchSize,

    #[error("failed to read content from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse content file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}
