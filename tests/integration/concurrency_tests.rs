//! In-flight limits and cancellation of fetch passes

use crate::{create_service_with_concurrency, create_test_service, html};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RESOURCE_DELAY: Duration = Duration::from_millis(400);

/// Mounts a page with `count` images, each answered after `delay`
async fn mount_delayed_images(mock_server: &MockServer, count: usize, delay: Duration) {
    let images: String = (0..count)
        .map(|i| format!(r#"<img src="/img{}.png">"#, i))
        .collect();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(format!("<html>{}</html>", images)))
        .mount(mock_server)
        .await;

    for i in 0..count {
        Mock::given(method("GET"))
            .and(path(format!("/img{}.png", i)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(vec![0u8; 10])
                    .set_delay(delay),
            )
            .mount(mock_server)
            .await;
    }
}

#[tokio::test]
async fn test_single_fetch_in_flight_serializes_pass() {
    let mock_server = MockServer::start().await;
    mount_delayed_images(&mock_server, 3, RESOURCE_DELAY).await;

    let started = Instant::now();
    let report = create_service_with_concurrency(1)
        .compute(&mock_server.uri())
        .await
        .expect("Request should succeed");
    let elapsed = started.elapsed();

    assert_eq!(report.bytes().images, 30);
    assert!(
        elapsed >= RESOURCE_DELAY * 3,
        "fetches overlapped: finished in {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_parallel_fetches_overlap() {
    let mock_server = MockServer::start().await;
    mount_delayed_images(&mock_server, 3, RESOURCE_DELAY).await;

    let started = Instant::now();
    let report = create_service_with_concurrency(3)
        .compute(&mock_server.uri())
        .await
        .expect("Request should succeed");
    let elapsed = started.elapsed();

    assert_eq!(report.bytes().images, 30);
    assert!(
        elapsed < RESOURCE_DELAY * 3,
        "fetches did not overlap: finished in {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_dropping_request_cancels_pending_fetches() {
    let mock_server = MockServer::start().await;
    mount_delayed_images(&mock_server, 2, Duration::from_secs(3)).await;

    let service = create_test_service();
    let started = Instant::now();
    let result = tokio::time::timeout(
        Duration::from_millis(300),
        service.compute(&mock_server.uri()),
    )
    .await;

    assert!(result.is_err(), "request should still be pending");
    assert!(started.elapsed() < Duration::from_secs(2));
}
