use url::Url;

/// Derives a file extension (with leading dot) from a URL's path
///
/// The query string and fragment are ignored. Returns None when the last
/// path segment has no extension.
///
/// # Examples
///
/// ```
/// use catalog_scraper::url::path_extension;
///
/// assert_eq!(path_extension("https://cdn.example.com/a/shirt.png?x=1").as_deref(), Some(".png"));
/// assert_eq!(path_extension("https://cdn.example.com/a/shirt"), None);
/// ```
pub fn path_extension(url: &str) -> Option<String> {
    let without_query = url.split(|c| c == '?' || c == '#').next().unwrap_or(url);

    // Parsing keeps a bare host like "https://example.com" from yielding ".com"
    let path = match Url::parse(without_query) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => without_query.to_string(),
    };

    let file_name = path.rsplit('/').next()?;
    let (stem, extension) = file_name.rsplit_once('.')?;

    if stem.is_empty() || extension.is_empty() {
        return None;
    }

    Some(format!(".{}", extension))
}
