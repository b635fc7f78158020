//! Storage module for the scraped dataset
//!
//! This module owns the on-disk layout of a run's output:
//! - The output root directory
//! - The images subdirectory
//! - The products JSON file at the root

use crate::config::OutputConfig;
use std::io;
use std::path::{Path, PathBuf};

/// Directory layout of one dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
    images_dir_name: String,
    products_file_name: String,
}

impl OutputLayout {
    /// Creates a layout rooted at `root`
    pub fn new(
        root: impl Into<PathBuf>,
        images_dir_name: impl Into<String>,
        products_file_name: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            images_dir_name: images_dir_name.into(),
            products_file_name: products_file_name.into(),
        }
    }

    /// Creates the layout described by the output configuration
    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.root_dir, &config.images_dir, &config.products_file)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join(&self.images_dir_name)
    }

    pub fn products_path(&self) -> PathBuf {
        self.root.join(&self.products_file_name)
    }

    /// Absolute (root-joined) path for an image file
    pub fn image_path(&self, file_name: &str) -> PathBuf {
        self.images_dir().join(file_name)
    }

    /// Path of an image file relative to the output root, as stored in records
    pub fn relative_image_path(&self, file_name: &str) -> String {
        Path::new(&self.images_dir_name)
            .join(file_name)
            .display()
            .to_string()
    }

    /// Creates the root and images directories if they do not exist
    pub fn ensure_dirs(&self) -> io::Result<()> {
        std::fs::create_dir_all(self.images_dir())?;
        tracing::info!(
            "Output directories ready: {} and {}",
            self.root.display(),
            self.images_dir().display()
        );
        Ok(())
    }
}
