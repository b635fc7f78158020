use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Catalog-Scraper
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// The catalog site being scraped
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Base URL that product links are resolved against
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Collection pages to scrape, in processing order
    pub collections: Vec<String>,

    /// CSS selector matching product link anchors on a collection page
    #[serde(rename = "product-link-selector", default = "default_product_link_selector")]
    pub product_link_selector: String,

    /// Path fragment a product page URL must contain
    #[serde(rename = "product-path-marker", default = "default_product_path_marker")]
    pub product_path_marker: String,

    /// CSS selector for the price element on a product page
    #[serde(rename = "price-selector", default = "default_price_selector")]
    pub price_selector: String,
}

/// Network timing and retry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Total attempts per request, including the first
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay between attempts for collection and product pages (milliseconds)
    #[serde(rename = "page-backoff-ms", default = "default_page_backoff_ms")]
    pub page_backoff_ms: u64,

    /// Delay between attempts for image downloads (milliseconds)
    #[serde(rename = "image-backoff-ms", default = "default_image_backoff_ms")]
    pub image_backoff_ms: u64,
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn page_backoff(&self) -> Duration {
        Duration::from_millis(self.page_backoff_ms)
    }

    pub fn image_backoff(&self) -> Duration {
        Duration::from_millis(self.image_backoff_ms)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            page_backoff_ms: default_page_backoff_ms(),
            image_backoff_ms: default_image_backoff_ms(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the scraper
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the scraper
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the scraper
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for scraper-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Root directory of the dataset
    #[serde(rename = "root-dir", default = "default_root_dir")]
    pub root_dir: String,

    /// Image directory name, relative to the root
    #[serde(rename = "images-dir", default = "default_images_dir")]
    pub images_dir: String,

    /// Products JSON file name, relative to the root
    #[serde(rename = "products-file", default = "default_products_file")]
    pub products_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            images_dir: default_images_dir(),
            products_file: default_products_file(),
        }
    }
}

fn default_product_link_selector() -> String {
    "a.product-link".to_string()
}

fn default_product_path_marker() -> String {
    "/products/".to_string()
}

fn default_price_selector() -> String {
    "span.price".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

fn default_page_backoff_ms() -> u64 {
    2000
}

fn default_image_backoff_ms() -> u64 {
    1000
}

fn default_root_dir() -> String {
    "ecommerce_data".to_string()
}

fn default_images_dir() -> String {
    "images".to_string()
}

fn default_products_file() -> String {
    "ecommerce_products.json".to_string()
}
