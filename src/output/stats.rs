//! Run statistics
//!
//! This module computes the end-of-run summary (product counts and price
//! range) and prints it to stdout.

use crate::product::{ProductRecord, PRICE_NOT_AVAILABLE};
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;

/// Currency symbols accepted in front of a price
const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥', '₹'];

/// Lowest and highest parsed price of a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

/// Summary of one scrape run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    // Run metadata
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub duration_seconds: Option<u64>,
    pub config_hash: Option<String>,
    pub output_path: Option<PathBuf>,

    // Collection stage
    pub collections_total: usize,
    pub collections_with_products: usize,
    pub collections_empty: usize,
    pub collections_failed: usize,

    // Product stage
    pub product_urls_found: usize,
    pub products_dropped: usize,

    // Dataset statistics
    pub total_products: usize,
    pub images_downloaded: usize,
    pub unparseable_prices: usize,
    pub price_range: Option<PriceRange>,
}

impl RunSummary {
    /// Creates a new empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a summary holding only the dataset statistics of `products`
    pub fn from_products(products: &[ProductRecord]) -> Self {
        let mut summary = Self::new();
        summary.record_products(products);
        summary
    }

    /// Fills in the dataset statistics from the final product list
    pub fn record_products(&mut self, products: &[ProductRecord]) {
        self.total_products = products.len();
        self.images_downloaded = products
            .iter()
            .filter(|p| p.local_image_path().is_some())
            .count();

        let (range, unparseable) = price_range(products);
        self.price_range = range;
        self.unparseable_prices = unparseable;
    }

    /// Records start and finish times
    pub fn record_timing(&mut self, started_at: DateTime<Utc>, finished_at: DateTime<Utc>) {
        self.started_at = Some(started_at);
        self.finished_at = Some(finished_at);
        self.duration_seconds = Some((finished_at - started_at).num_seconds().max(0) as u64);
    }
}

/// Parses a formatted price such as `$19.99`
///
/// One leading currency symbol is stripped and the remainder parsed as an
/// unsigned decimal. The "not available" sentinel, signs, thousands
/// separators and anything else non-numeric yield None.
///
/// # Example
///
/// ```
/// use catalog_scraper::output::parse_price;
///
/// assert_eq!(parse_price("$19.99"), Some(19.99));
/// assert_eq!(parse_price("Price not available"), None);
/// ```
pub fn parse_price(price: &str) -> Option<f64> {
    let trimmed = price.trim();
    if trimmed.is_empty() || trimmed == PRICE_NOT_AVAILABLE {
        return None;
    }

    let amount = trimmed
        .strip_prefix(|c: char| CURRENCY_SYMBOLS.contains(&c))
        .unwrap_or(trimmed)
        .trim();

    // f64::from_str also accepts "inf" and "NaN"
    if !amount.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }

    amount.parse::<f64>().ok().filter(|value| value.is_finite())
}

impl fmt::Display for PriceRange {
    /// Bare amounts; the currency symbol is stripped during parsing
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} - {:.2}", self.min, self.max)
    }
}

/// Computes the price range over records with a parseable price
///
/// # Returns
///
/// The range (None when no price parses) and the number of records that
/// carried a price which could not be parsed. Records with the "not
/// available" sentinel are not counted as unparseable.
pub fn price_range(products: &[ProductRecord]) -> (Option<PriceRange>, usize) {
    let mut range: Option<PriceRange> = None;
    let mut unparseable = 0;

    for product in products.iter().filter(|p| p.has_price()) {
        match parse_price(product.price()) {
            Some(value) => {
                range = Some(match range {
                    Some(r) => PriceRange {
                        min: r.min.min(value),
                        max: r.max.max(value),
                    },
                    None => PriceRange {
                        min: value,
                        max: value,
                    },
                });
            }
            None => {
                tracing::debug!(
                    "Excluding unparseable price '{}' for {}",
                    product.price(),
                    product.url()
                );
                unparseable += 1;
            }
        }
    }

    (range, unparseable)
}

/// Prints the run summary to stdout in a formatted manner
pub fn print_summary(summary: &RunSummary) {
    println!();
    println!("=== Summary of scraped data ===\n");

    if summary.collections_total > 0 {
        println!("Collections:");
        println!("  Processed: {}", summary.collections_total);
        println!("  With products: {}", summary.collections_with_products);
        println!("  Empty: {}", summary.collections_empty);
        println!("  Failed: {}", summary.collections_failed);
        println!();

        println!("Products:");
        println!("  Product URLs found: {}", summary.product_urls_found);
        println!("  Dropped: {}", summary.products_dropped);
        println!();
    }

    println!("Total products: {}", summary.total_products);
    println!(
        "Products with images downloaded: {}",
        summary.images_downloaded
    );

    if summary.total_products == 0 {
        println!("No price information available.");
    } else if let Some(range) = summary.price_range {
        println!("Price range: {}", range);
    } else {
        println!("No valid prices found.");
    }

    if summary.unparseable_prices > 0 {
        println!(
            "Prices excluded as unparseable: {}",
            summary.unparseable_prices
        );
    }

    if let Some(path) = &summary.output_path {
        println!("Data saved to {}", path.display());
    }

    if let Some(seconds) = summary.duration_seconds {
        println!("Duration: {}s", seconds);
    }
}
