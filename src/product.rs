//! Product record type
//!
//! A `ProductRecord` is built once by the extractor and then handed to the
//! coordinator, which attaches the local image path exactly once.

use crate::ScrapeError;
use serde::{Deserialize, Serialize};

/// Price value recorded when a product page carries no price element
pub const PRICE_NOT_AVAILABLE: &str = "Price not available";

/// One extracted product
///
/// Field order matches the persisted JSON object layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    name: String,
    image_url: String,
    description: String,
    price: String,
    url: String,
    local_image_path: Option<String>,
}

impl ProductRecord {
    /// Creates a record with no local image attached
    ///
    /// # Arguments
    ///
    /// * `name` - Product name; must not be blank
    /// * `image_url` - Absolute image URL
    /// * `description` - Product description (may be empty)
    /// * `price` - Formatted price text, or `None` when the page has none
    /// * `url` - The product page URL
    ///
    /// # Returns
    ///
    /// * `Ok(ProductRecord)` - The record
    /// * `Err(ScrapeError::InvalidProduct)` - The name or a URL was blank
    pub fn new(
        name: impl Into<String>,
        image_url: impl Into<String>,
        description: impl Into<String>,
        price: Option<String>,
        url: impl Into<String>,
    ) -> Result<Self, ScrapeError> {
        let name = name.into();
        let image_url = image_url.into();
        let url = url.into();

        if name.trim().is_empty() {
            return Err(ScrapeError::InvalidProduct(format!(
                "product at {} has an empty name",
                url
            )));
        }

        if image_url.trim().is_empty() {
            return Err(ScrapeError::InvalidProduct(format!(
                "product at {} has an empty image URL",
                url
            )));
        }

        if url.trim().is_empty() {
            return Err(ScrapeError::InvalidProduct(
                "product URL cannot be empty".to_string(),
            ));
        }

        let price = price
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| PRICE_NOT_AVAILABLE.to_string());

        Ok(Self {
            name,
            image_url,
            description: description.into(),
            price,
            url,
            local_image_path: None,
        })
    }

    /// Attaches the result of the image download
    pub fn with_local_image(mut self, local_image_path: Option<String>) -> Self {
        self.local_image_path = local_image_path;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> &str {
        &self.price
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn local_image_path(&self) -> Option<&str> {
        self.local_image_path.as_deref()
    }

    /// Returns true unless the price is the "not available" sentinel
    pub fn has_price(&self) -> bool {
        self.price != PRICE_NOT_AVAILABLE
    }
}
