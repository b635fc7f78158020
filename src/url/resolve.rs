use url::Url;

/// Resolves an href to an absolute HTTP(S) URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
///
/// # Examples
///
/// ```
/// use catalog_scraper::url::resolve_href;
/// use url::Url;
///
/// let base = Url::parse("https://shop.example.com/collections/shirts").unwrap();
/// let url = resolve_href("/products/blue-shirt", &base).unwrap();
/// assert_eq!(url.as_str(), "https://shop.example.com/products/blue-shirt");
/// ```
pub fn resolve_href(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url),
        _ => None,
    }
}

/// Resolves a metadata value that may be relative
///
/// Unlike [`resolve_href`], a value that cannot be resolved is returned
/// unchanged instead of being dropped; page metadata is recorded as the site
/// published it.
pub fn resolve_with_fallback(value: &str, base_url: &Url) -> String {
    let value = value.trim();
    base_url
        .join(value)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| value.to_string())
}
