//! Output module for persisting and summarizing scrape results
//!
//! This module handles:
//! - Writing the product list as a JSON dataset
//! - Loading a previously written dataset
//! - Computing and printing run statistics

mod json;
pub mod stats;
mod traits;

pub use json::{load_products, JsonOutputHandler};
pub use stats::{parse_price, price_range, print_summary, PriceRange, RunSummary};
pub use traits::{OutputError, OutputHandler, OutputResult};

use std::path::Path;

/// Summarizes an existing products file without touching the network
///
/// # Arguments
///
/// * `path` - Path to a products JSON file
///
/// # Returns
///
/// * `Ok(RunSummary)` - Dataset statistics for the file
/// * `Err(OutputError)` - The file could not be read or parsed
pub fn summarize_file(path: &Path) -> OutputResult<RunSummary> {
    let products = load_products(path)?;
    let mut summary = RunSummary::from_products(&products);
    summary.output_path = Some(path.to_path_buf());
    Ok(summary)
}
