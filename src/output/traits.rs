//! Output handler traits and error types
//!
//! This module defines the trait interface for persisting a run's products.

use crate::product::ProductRecord;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for output handlers
///
/// An output handler persists the complete product list of a run as one
/// artifact. A failure here is fatal for the run.
pub trait OutputHandler {
    /// Writes every product and returns the path of the artifact
    ///
    /// # Arguments
    ///
    /// * `products` - Products in processing order
    fn write_products(&self, products: &[ProductRecord]) -> OutputResult<PathBuf>;
}
