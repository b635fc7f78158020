//! Scrape coordinator - main pipeline orchestration logic
//!
//! This module contains the main scrape loop that coordinates all aspects of
//! a run, including:
//! - Preparing the output directories
//! - Fetching each collection page and extracting product links
//! - Fetching and extracting each product page
//! - Downloading product images
//! - Writing the dataset and computing the run summary

use crate::config::Config;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::images::ImageDownloader;
use crate::crawler::parser::{extract_product, parse_collection, CatalogSelectors};
use crate::crawler::retry::RetryPolicy;
use crate::output::{JsonOutputHandler, OutputHandler, RunSummary};
use crate::product::ProductRecord;
use crate::storage::OutputLayout;
use crate::ScrapeError;
use chrono::Utc;
use std::collections::HashSet;
use url::Url;

/// Result of processing one collection page
#[derive(Debug)]
pub enum CollectionOutcome {
    /// The page listed at least one product
    Products(HashSet<String>),
    /// The page was fetched but listed no products
    Empty,
    /// The page could not be fetched
    Failed(ScrapeError),
}

/// Result of processing one product page
#[derive(Debug)]
pub enum ProductOutcome {
    /// Extracted; the image download result is attached
    Accepted(ProductRecord),
    /// Fetch or extraction failed; the product is left out of the dataset
    Dropped(ScrapeError),
}

/// Main scrape coordinator structure
pub struct Coordinator {
    config: Config,
    config_hash: Option<String>,
    base_url: Url,
    fetcher: Fetcher,
    selectors: CatalogSelectors,
    images: ImageDownloader,
    layout: OutputLayout,
    page_policy: RetryPolicy,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The scraper configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(ScrapeError)` - Invalid base URL or selector, or the HTTP client failed to build
    pub fn new(config: Config) -> Result<Self, ScrapeError> {
        let base_url = Url::parse(&config.site.base_url)?;
        let fetcher = Fetcher::new(&config.fetch, &config.user_agent)?;
        let selectors = CatalogSelectors::from_config(&config.site)?;
        let layout = OutputLayout::from_config(&config.output);

        let page_policy = RetryPolicy::new(config.fetch.max_retries, config.fetch.page_backoff());
        let image_policy = RetryPolicy::new(config.fetch.max_retries, config.fetch.image_backoff());
        let images = ImageDownloader::new(fetcher.clone(), layout.clone(), image_policy);

        Ok(Self {
            config,
            config_hash: None,
            base_url,
            fetcher,
            selectors,
            images,
            layout,
            page_policy,
        })
    }

    /// Records the configuration hash in the run summary
    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = Some(hash.into());
        self
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Absolute collection URLs in configured order
    ///
    /// Relative entries are resolved against the base URL.
    pub fn collection_urls(&self) -> Vec<String> {
        self.config
            .site
            .collections
            .iter()
            .filter_map(|collection| match self.base_url.join(collection.trim()) {
                Ok(url) => Some(url.to_string()),
                Err(e) => {
                    tracing::warn!("Skipping invalid collection URL {}: {}", collection, e);
                    None
                }
            })
            .collect()
    }

    /// Runs the full pipeline
    ///
    /// Failures of a single collection or product never abort the run.
    ///
    /// # Returns
    ///
    /// * `Ok(RunSummary)` - The run completed and the dataset was written
    /// * `Err(ScrapeError)` - The output directories or the dataset could not be written
    pub async fn run(&self) -> Result<RunSummary, ScrapeError> {
        let started_at = Utc::now();
        self.layout.ensure_dirs()?;

        let mut summary = RunSummary::new();
        summary.config_hash = self.config_hash.clone();

        let mut products: Vec<ProductRecord> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for collection_url in self.collection_urls() {
            summary.collections_total += 1;
            tracing::info!("Processing collection: {}", collection_url);

            let product_urls = match self.collect_product_urls(&collection_url).await {
                CollectionOutcome::Products(urls) => urls,
                CollectionOutcome::Empty => {
                    summary.collections_empty += 1;
                    tracing::info!("No product links found in {}", collection_url);
                    continue;
                }
                CollectionOutcome::Failed(e) => {
                    summary.collections_failed += 1;
                    tracing::error!(
                        "Failed to fetch product URLs for collection {}: {}",
                        collection_url,
                        e
                    );
                    continue;
                }
            };

            summary.collections_with_products += 1;
            summary.product_urls_found += product_urls.len();

            for product_url in product_urls {
                if !seen.insert(product_url.clone()) {
                    tracing::debug!("Already processed {}", product_url);
                    continue;
                }

                match self.process_product(&product_url).await {
                    ProductOutcome::Accepted(product) => products.push(product),
                    ProductOutcome::Dropped(e) => {
                        summary.products_dropped += 1;
                        tracing::warn!("Dropping product {}: {}", product_url, e);
                    }
                }
            }
        }

        tracing::info!(
            "Successfully scraped {} products from {} collections",
            products.len(),
            summary.collections_total
        );

        let output = JsonOutputHandler::new(self.layout.products_path());
        summary.output_path = Some(output.write_products(&products)?);

        summary.record_products(&products);
        summary.record_timing(started_at, Utc::now());

        Ok(summary)
    }

    /// Fetches a collection page and extracts its product URLs
    pub async fn collect_product_urls(&self, collection_url: &str) -> CollectionOutcome {
        tracing::info!("Fetching product URLs from {}", collection_url);

        let html = match self.fetcher.fetch_text(collection_url, self.page_policy).await {
            Ok(html) => html,
            Err(e) => return CollectionOutcome::Failed(e),
        };

        let urls = parse_collection(&html, &self.base_url, &self.selectors);
        tracing::info!("Found {} unique product URLs", urls.len());

        if urls.is_empty() {
            CollectionOutcome::Empty
        } else {
            CollectionOutcome::Products(urls)
        }
    }

    /// Fetches, extracts and downloads the image for one product
    pub async fn process_product(&self, product_url: &str) -> ProductOutcome {
        tracing::info!("Extracting product info from {}", product_url);

        let html = match self.fetcher.fetch_text(product_url, self.page_policy).await {
            Ok(html) => html,
            Err(e) => return ProductOutcome::Dropped(e),
        };

        let product = match extract_product(&html, product_url, &self.selectors) {
            Ok(product) => product,
            Err(e) => return ProductOutcome::Dropped(e),
        };

        let local_image_path = self
            .images
            .download(product.image_url(), product.name())
            .await;

        ProductOutcome::Accepted(product.with_local_image(local_image_path))
    }
}

/// Runs the main scrape operation
///
/// # Example
///
/// ```no_run
/// use catalog_scraper::config::load_config;
/// use catalog_scraper::crawler::run_scrape;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("catalog.toml"))?;
/// let summary = run_scrape(config).await?;
/// println!("{} products", summary.total_products);
/// # Ok(())
/// # }
/// ```
pub async fn run_scrape(config: Config) -> Result<RunSummary, ScrapeError> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
