//! HTML parsing for collection and product pages
//!
//! This module handles:
//! - Extracting product links from a collection page
//! - Extracting a product record from a product page's OpenGraph metadata
//!   and price element

use crate::config::SiteConfig;
use crate::product::ProductRecord;
use crate::url::{resolve_href, resolve_with_fallback};
use crate::ScrapeError;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// OpenGraph property holding the product name
pub const OG_TITLE: &str = "og:title";
/// OpenGraph property holding the product image
pub const OG_IMAGE: &str = "og:image";
/// OpenGraph property holding the product description
pub const OG_DESCRIPTION: &str = "og:description";

/// Compiled selectors and link filter for one catalog site
#[derive(Debug, Clone)]
pub struct CatalogSelectors {
    product_link: Selector,
    price: Selector,
    meta_property: Selector,
    product_path_marker: String,
}

impl CatalogSelectors {
    /// Compiles the selectors named in the site configuration
    pub fn from_config(site: &SiteConfig) -> Result<Self, ScrapeError> {
        Self::new(
            &site.product_link_selector,
            &site.price_selector,
            &site.product_path_marker,
        )
    }

    pub fn new(
        product_link: &str,
        price: &str,
        product_path_marker: &str,
    ) -> Result<Self, ScrapeError> {
        Ok(Self {
            product_link: compile_selector(product_link)?,
            price: compile_selector(price)?,
            meta_property: compile_selector("meta[property]")?,
            product_path_marker: product_path_marker.to_string(),
        })
    }
}

fn compile_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector).map_err(|e| ScrapeError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Extracts the set of product page URLs from a collection page
///
/// Anchors matching the product link selector are resolved against
/// `base_url`; only URLs whose path contains the product path marker are
/// kept. Fragments are dropped, so duplicates collapse. An empty set means the collection lists no
/// products.
///
/// # Example
///
/// ```
/// use catalog_scraper::crawler::{parse_collection, CatalogSelectors};
/// use url::Url;
///
/// let html = r#"<a class="product-link" href="/products/hat">Hat</a>
///               <a class="product-link" href="/products/hat">Hat again</a>"#;
/// let base = Url::parse("https://shop.example.com").unwrap();
/// let selectors = CatalogSelectors::new("a.product-link", "span.price", "/products/").unwrap();
/// let urls = parse_collection(html, &base, &selectors);
/// assert_eq!(urls.len(), 1);
/// assert!(urls.contains("https://shop.example.com/products/hat"));
/// ```
pub fn parse_collection(
    html: &str,
    base_url: &Url,
    selectors: &CatalogSelectors,
) -> HashSet<String> {
    let document = Html::parse_document(html);

    document
        .select(&selectors.product_link)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_href(href, base_url))
        .filter(|url| url.path().contains(&selectors.product_path_marker))
        .map(|mut url| {
            url.set_fragment(None);
            url.to_string()
        })
        .collect()
}

/// Extracts a product record from a product page
///
/// `og:title`, `og:image` and `og:description` are required; a missing tag
/// fails the whole product. The price element is optional.
///
/// # Returns
///
/// * `Ok(ProductRecord)` - The extracted record, no local image yet
/// * `Err(ScrapeError::MissingMetadata)` - A required tag was absent
/// * `Err(ScrapeError::InvalidProduct)` - The title or image was blank
pub fn extract_product(
    html: &str,
    url: &str,
    selectors: &CatalogSelectors,
) -> Result<ProductRecord, ScrapeError> {
    let document = Html::parse_document(html);

    let name = required_meta(&document, selectors, OG_TITLE, url)?;
    let image = required_meta(&document, selectors, OG_IMAGE, url)?;
    let description = required_meta(&document, selectors, OG_DESCRIPTION, url)?;

    // Joining a blank href yields the page URL itself
    if image.trim().is_empty() {
        return Err(ScrapeError::InvalidProduct(format!(
            "blank {} on {}",
            OG_IMAGE, url
        )));
    }

    let image_url = match Url::parse(url) {
        Ok(page_url) => resolve_with_fallback(&image, &page_url),
        Err(_) => image,
    };

    let price = document
        .select(&selectors.price)
        .next()
        .map(stripped_text)
        .filter(|text| !text.is_empty());

    ProductRecord::new(name, image_url, description, price, url)
}

/// Reads the `content` of the first `<meta property=...>` tag
fn required_meta(
    document: &Html,
    selectors: &CatalogSelectors,
    property: &str,
    url: &str,
) -> Result<String, ScrapeError> {
    document
        .select(&selectors.meta_property)
        .find(|element| element.value().attr("property") == Some(property))
        .and_then(|element| element.value().attr("content"))
        .map(str::to_string)
        .ok_or_else(|| ScrapeError::MissingMetadata {
            url: url.to_string(),
            property: property.to_string(),
        })
}

/// Concatenates an element's text nodes, each trimmed
fn stripped_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}
