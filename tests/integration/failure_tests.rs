//! Failure handling: fatal document errors and isolated resource errors

use crate::{create_service_with_resource_timeout, create_test_service, html};
use page_weight::{ErrorKind, PageWeightError, PageWeightResponse};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_empty_url_is_bad_input() {
    let result = create_test_service().compute("").await;
    let err = result.as_ref().unwrap_err();
    assert!(matches!(err, PageWeightError::InvalidInput));

    let response = PageWeightResponse::from(result);
    assert_eq!(response.http_status(), 400);
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["error"], "URL is required");
}

#[tokio::test]
async fn test_document_404_is_upstream_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let err = create_test_service()
        .compute(&format!("{}/missing", mock_server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UpstreamFetch);
    assert!(matches!(
        err,
        PageWeightError::DocumentStatus { status: 404, .. }
    ));
}

#[tokio::test]
async fn test_unreachable_host_is_upstream_failure() {
    let err = create_test_service()
        .compute("http://127.0.0.1:1/")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamFetch);
}

#[tokio::test]
async fn test_failed_resources_count_as_zero() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><img src="/ok.png"><img src="/broken.png"><script src="/gone.js"></script></html>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ok.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 256]))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken.png"))
        .respond_with(ResponseTemplate::new(500).set_body_string("server error"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gone.js"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let report = create_test_service()
        .compute(&mock_server.uri())
        .await
        .expect("Resource failures must not fail the request");

    assert_eq!(report.bytes().images, 256);
    assert_eq!(report.bytes().js, 0);
    assert_eq!(report.failed_resources(), 2);

    let breakdown = report.breakdown().unwrap();
    assert_eq!(breakdown.images.len(), 2);
    assert!(breakdown
        .images
        .iter()
        .any(|e| e.url.ends_with("/broken.png") && e.size == 0));
    assert_eq!(breakdown.js[0].size, 0);
}

#[tokio::test]
async fn test_slow_resource_times_out_alone() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<html><img src="/fast.png"><img src="/slow.png"></html>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/fast.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 128]))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/slow.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0u8; 128])
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let report = create_service_with_resource_timeout(300)
        .compute(&mock_server.uri())
        .await
        .expect("Timeouts on resources must not fail the request");

    assert_eq!(report.bytes().images, 128);
    assert_eq!(report.failed_resources(), 1);
}

#[tokio::test]
async fn test_failed_stylesheet_counts_zero() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><link rel="stylesheet" href="/missing.css"><img src="/a.png"></html>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing.css"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 10]))
        .mount(&mock_server)
        .await;

    let report = create_test_service()
        .compute(&mock_server.uri())
        .await
        .expect("Request should succeed");

    assert_eq!(report.bytes().css, 0);
    assert_eq!(report.bytes().images, 10);
    assert_eq!(report.failed_resources(), 1);
}

#[tokio::test]
async fn test_redirect_to_404_names_final_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/moved"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/gone"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let err = create_test_service()
        .compute(&format!("{}/moved", mock_server.uri()))
        .await
        .unwrap_err();

    match err {
        PageWeightError::DocumentStatus { url, status } => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/gone"), "unexpected url {}", url);
        }
        other => panic!("Expected DocumentStatus, got {:?}", other),
    }
}
