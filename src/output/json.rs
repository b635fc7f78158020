//! JSON dataset writer
//!
//! The dataset is one UTF-8 JSON array, indented with two spaces, with
//! non-ASCII text written as-is.

use crate::output::traits::{OutputError, OutputHandler, OutputResult};
use crate::product::ProductRecord;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes the product list to a single JSON file
#[derive(Debug, Clone)]
pub struct JsonOutputHandler {
    path: PathBuf,
}

impl JsonOutputHandler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputHandler for JsonOutputHandler {
    fn write_products(&self, products: &[ProductRecord]) -> OutputResult<PathBuf> {
        let file = File::create(&self.path).map_err(|e| {
            OutputError::Write(format!("cannot create {}: {}", self.path.display(), e))
        })?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, products)?;
        writer.flush()?;

        tracing::info!(
            "Saved {} products to {}",
            products.len(),
            self.path.display()
        );

        Ok(self.path.clone())
    }
}

/// Loads a products file written by [`JsonOutputHandler`]
pub fn load_products(path: &Path) -> OutputResult<Vec<ProductRecord>> {
    let file = File::open(path)?;
    let products = serde_json::from_reader(BufReader::new(file))?;
    Ok(products)
}
