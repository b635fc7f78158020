//! Product image downloads
//!
//! Images are stored under the layout's images directory, named after the
//! product. Two products whose names reduce to the same safe file name write
//! to the same file; the later download wins.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::retry::RetryPolicy;
use crate::storage::OutputLayout;
use crate::url::path_extension;
use crate::ScrapeError;
use std::path::Path;

/// Extension used when the image URL has none
pub const DEFAULT_IMAGE_EXTENSION: &str = ".jpg";

/// Returns the extension for an image URL, falling back to `.jpg`
pub fn image_extension(image_url: &str) -> String {
    path_extension(image_url).unwrap_or_else(|| DEFAULT_IMAGE_EXTENSION.to_string())
}

/// Replaces every character outside `[A-Za-z0-9]` with `_`
///
/// # Example
///
/// ```
/// use catalog_scraper::crawler::safe_file_stem;
///
/// assert_eq!(safe_file_stem("Men's T-Shirt (Blue)"), "Men_s_T_Shirt__Blue_");
/// ```
pub fn safe_file_stem(product_name: &str) -> String {
    product_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Builds the stored file name for a product image
pub fn image_file_name(product_name: &str, image_url: &str) -> String {
    format!("{}{}", safe_file_stem(product_name), image_extension(image_url))
}

/// Downloads product images into the dataset
#[derive(Debug, Clone)]
pub struct ImageDownloader {
    fetcher: Fetcher,
    layout: OutputLayout,
    policy: RetryPolicy,
}

impl ImageDownloader {
    pub fn new(fetcher: Fetcher, layout: OutputLayout, policy: RetryPolicy) -> Self {
        Self {
            fetcher,
            layout,
            policy,
        }
    }

    /// Downloads one product image
    ///
    /// Fetch and write failures are both retried under the image policy.
    ///
    /// # Returns
    ///
    /// * `Some(String)` - Path of the stored file relative to the output root
    /// * `None` - Every attempt failed; the product keeps no local image
    pub async fn download(&self, image_url: &str, product_name: &str) -> Option<String> {
        tracing::info!("Downloading image for {} from {}", product_name, image_url);

        let file_name = image_file_name(product_name, image_url);
        let target = self.layout.image_path(&file_name);

        match self
            .policy
            .run(image_url, || self.fetch_and_store(image_url, &target))
            .await
        {
            Ok(()) => {
                tracing::info!("Saved image: {}", target.display());
                Some(self.layout.relative_image_path(&file_name))
            }
            Err(e) => {
                tracing::warn!("Unable to download image for {}: {}", product_name, e);
                None
            }
        }
    }

    async fn fetch_and_store(&self, image_url: &str, target: &Path) -> Result<(), ScrapeError> {
        let bytes = self.fetcher.get_bytes(image_url).await?;
        tokio::fs::write(target, &bytes).await?;
        Ok(())
    }
}
