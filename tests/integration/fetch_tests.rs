//! Fetcher and retry policy against a mock server

use crate::common::user_agent;
use catalog_scraper::crawler::{build_http_client, Fetcher, RetryPolicy};
use catalog_scraper::ScrapeError;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher_with_timeout(timeout: Duration) -> Fetcher {
    let client = build_http_client(&user_agent(), timeout).expect("Failed to build client");
    Fetcher::with_client(client, timeout)
}

async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or(0)
}

#[tokio::test]
async fn test_fetch_success_makes_one_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/collections/all"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = fetcher_with_timeout(Duration::from_secs(5));
    let url = format!("{}/collections/all", mock_server.uri());
    let body = fetcher
        .fetch_text(&url, RetryPolicy::new(3, Duration::ZERO))
        .await
        .expect("Fetch failed");

    assert_eq!(body, "<html>ok</html>");
}

#[tokio::test]
async fn test_fetch_retries_server_errors_then_succeeds() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
        .mount(&mock_server)
        .await;

    let fetcher = fetcher_with_timeout(Duration::from_secs(5));
    let url = format!("{}/flaky", mock_server.uri());
    let body = fetcher
        .fetch_text(&url, RetryPolicy::new(3, Duration::from_millis(10)))
        .await
        .expect("Fetch should succeed on the third attempt");

    assert_eq!(body, "recovered");
    assert_eq!(request_count(&mock_server).await, 3);
}

#[tokio::test]
async fn test_fetch_status_error_exhausts_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&mock_server)
        .await;

    let fetcher = fetcher_with_timeout(Duration::from_secs(5));
    let url = format!("{}/missing", mock_server.uri());
    let result = fetcher
        .fetch_text(&url, RetryPolicy::new(2, Duration::ZERO))
        .await;

    match result {
        Err(ScrapeError::RetriesExhausted {
            attempts, source, ..
        }) => {
            assert_eq!(attempts, 2);
            assert!(matches!(*source, ScrapeError::Status { status: 404, .. }));
        }
        other => panic!("expected RetriesExhausted, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_timeout_stops_after_max_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("too late")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let fetcher = fetcher_with_timeout(Duration::from_millis(200));
    let url = format!("{}/slow", mock_server.uri());
    let result = fetcher
        .fetch_text(&url, RetryPolicy::new(3, Duration::ZERO))
        .await;

    let error = result.expect_err("A fetch that always times out must fail");
    assert!(error.is_timeout());
    assert!(matches!(
        error,
        ScrapeError::RetriesExhausted { attempts: 3, .. }
    ));
    assert_eq!(request_count(&mock_server).await, 3);
}

#[tokio::test]
async fn test_fetch_bytes_returns_raw_body() {
    let mock_server = MockServer::start().await;
    let payload = vec![0x89, b'P', b'N', b'G', 0x00, 0xff];

    Mock::given(method("GET"))
        .and(path("/cdn/image.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
        .mount(&mock_server)
        .await;

    let fetcher = fetcher_with_timeout(Duration::from_secs(5));
    let url = format!("{}/cdn/image.png", mock_server.uri());
    let bytes = fetcher
        .fetch_bytes(&url, RetryPolicy::new(1, Duration::ZERO))
        .await
        .expect("Fetch failed");

    assert_eq!(bytes, payload);
}
