//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests with a per-request timeout
//! - Error classification (timeout, transport, HTTP status)
//! - Retry via [`RetryPolicy`]

use crate::config::{FetchConfig, UserAgentConfig};
use crate::crawler::retry::RetryPolicy;
use crate::ScrapeError;
use reqwest::{Client, Response};
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `timeout` - Per-request timeout
///
/// # Example
///
/// ```no_run
/// use catalog_scraper::config::UserAgentConfig;
/// use catalog_scraper::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "CatalogScraper".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// GET fetcher shared by the collection, product and image stages
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    timeout: Duration,
}

impl Fetcher {
    /// Creates a fetcher from the fetch and user agent configuration
    pub fn new(fetch: &FetchConfig, user_agent: &UserAgentConfig) -> Result<Self, ScrapeError> {
        let timeout = fetch.timeout();
        let client = build_http_client(user_agent, timeout)?;
        Ok(Self { client, timeout })
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetches a page as text, retrying per `policy`
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Body of the first 2xx response
    /// * `Err(ScrapeError::RetriesExhausted)` - Every attempt failed
    pub async fn fetch_text(&self, url: &str, policy: RetryPolicy) -> Result<String, ScrapeError> {
        policy.run(url, || self.get_text(url)).await
    }

    /// Fetches raw bytes, retrying per `policy`
    pub async fn fetch_bytes(&self, url: &str, policy: RetryPolicy) -> Result<Vec<u8>, ScrapeError> {
        policy.run(url, || self.get_bytes(url)).await
    }

    /// Single GET attempt returning the body as text
    pub async fn get_text(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self.send(url).await?;
        response.text().await.map_err(|e| classify_error(url, e))
    }

    /// Single GET attempt returning the body as bytes
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, ScrapeError> {
        let response = self.send(url).await?;
        let bytes = response.bytes().await.map_err(|e| classify_error(url, e))?;
        Ok(bytes.to_vec())
    }

    /// Sends the request and rejects non-2xx responses
    async fn send(&self, url: &str) -> Result<Response, ScrapeError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

/// Maps a transport error onto the scraper's error taxonomy
fn classify_error(url: &str, error: reqwest::Error) -> ScrapeError {
    if error.is_timeout() {
        ScrapeError::Timeout {
            url: url.to_string(),
        }
    } else {
        ScrapeError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
