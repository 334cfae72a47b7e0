//! Integration tests for `HttpFetcher` against a local `wiremock` server.

use std::time::Duration;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vinyl_scraper::{FetchError, HttpFetcher, PageFetcher};

const TEST_UA: &str = "vinyldeals-test/0.1";

fn test_fetcher() -> HttpFetcher {
    HttpFetcher::new(5, TEST_UA).expect("failed to build test HttpFetcher")
}

#[tokio::test]
async fn fetch_returns_body_on_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sale/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let body = test_fetcher()
        .fetch(&format!("{}/sale/", server.uri()))
        .await
        .expect("expected Ok");
    assert_eq!(body, "<html>ok</html>");
}

#[tokio::test]
async fn fetch_sends_configured_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("user-agent", TEST_UA))
        .respond_with(ResponseTemplate::new(200).set_body_string("ua ok"))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_fetcher().fetch(&server.uri()).await;
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
}

#[tokio::test]
async fn fetch_reports_not_found_as_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/missing", server.uri());
    let err = test_fetcher().fetch(&url).await.unwrap_err();
    match err {
        FetchError::Status { status, url: failed } => {
            assert_eq!(status, 404);
            assert_eq!(failed, url);
        }
        other => panic!("expected Status, got: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_does_not_retry_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_fetcher().fetch(&server.uri()).await.unwrap_err();
    assert!(
        matches!(err, FetchError::Status { status: 503, .. }),
        "expected Status 503, got: {err:?}"
    );
    assert_eq!(err.kind(), "status");
}

#[tokio::test]
async fn fetch_times_out_on_slow_responses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("too late")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(1, TEST_UA).expect("failed to build test HttpFetcher");
    let err = fetcher.fetch(&server.uri()).await.unwrap_err();
    assert!(
        matches!(err, FetchError::Timeout { .. }),
        "expected Timeout, got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_reports_connection_failures_as_network_errors() {
    let err = test_fetcher()
        .fetch("http://127.0.0.1:1/")
        .await
        .unwrap_err();
    assert!(
        matches!(err, FetchError::Network { .. }),
        "expected Network, got: {err:?}"
    );
    assert_eq!(err.kind(), "network");
}
