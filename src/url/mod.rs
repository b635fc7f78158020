//! URL handling module for Catalog-Scraper
//!
//! This module resolves hrefs found in catalog pages into absolute URLs and
//! derives file extensions from image URLs.

mod extension;
mod resolve;

pub use extension::path_extension;
pub use resolve::{resolve_href, resolve_with_fallback};
