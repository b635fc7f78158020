//! Crawler module for catalog fetching and processing
//!
//! This module contains the core scraping logic, including:
//! - Bounded retry with fixed backoff
//! - HTTP fetching
//! - Collection and product page parsing
//! - Product image downloads
//! - Overall pipeline coordination

mod coordinator;
mod fetcher;
mod images;
mod parser;
mod retry;

pub use coordinator::{run_scrape, CollectionOutcome, Coordinator, ProductOutcome};
pub use fetcher::{build_http_client, Fetcher};
pub use images::{
    image_extension, image_file_name, safe_file_stem, ImageDownloader, DEFAULT_IMAGE_EXTENSION,
};
pub use parser::{
    extract_product, parse_collection, CatalogSelectors, OG_DESCRIPTION, OG_IMAGE, OG_TITLE,
};
pub use retry::RetryPolicy;

use crate::config::Config;
use crate::output::RunSummary;
use crate::ScrapeError;

/// Runs a complete scrape
///
/// This is the main entry point for a run. It will:
/// 1. Create the output directories
/// 2. Fetch every configured collection page
/// 3. Fetch and extract every listed product
/// 4. Download each product's image
/// 5. Write the products JSON file
/// 6. Return the run summary
pub async fn scrape(config: Config) -> Result<RunSummary, ScrapeError> {
    run_scrape(config).await
}
