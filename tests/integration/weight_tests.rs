//! End-to-end weight computation against mock servers

use crate::{create_test_service, html};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_simple_page() {
    let mock_server = MockServer::start().await;

    let page = r#"<html><img src="a.png"></html>"#;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(page))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 1024]))
        .mount(&mock_server)
        .await;

    let report = create_test_service()
        .compute(&mock_server.uri())
        .await
        .expect("Request should succeed");

    assert_eq!(report.bytes().html, page.len() as u64);
    assert_eq!(report.bytes().images, 1024);
    assert_eq!(report.bytes().total, page.len() as u64 + 1024);
    assert_eq!(report.images_size_mb(), 0.0);
    assert_eq!(report.total_size_mb(), 0.0);
    assert_eq!(report.external_size_mb(), 0.0);
    assert_eq!(report.failed_resources(), 0);
}

#[tokio::test]
async fn test_scheme_is_assumed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("<html></html>"))
        .mount(&mock_server)
        .await;

    // "127.0.0.1:port" without a scheme
    let bare = mock_server.uri().trim_start_matches("http://").to_string();
    let report = create_test_service()
        .compute(&bare)
        .await
        .expect("Request should succeed");

    assert_eq!(report.bytes().html, 13);
}

#[tokio::test]
async fn test_all_categories() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><head>
            <link rel="stylesheet" href="/site.css">
            <link rel="icon" href="/favicon.ico">
            <script src="/app.js"></script>
            </head><body><img src="/logo.png"></body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/site.css"))
        .respond_with(ResponseTemplate::new(200).set_body_string("body { color: red; }"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/app.js"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![b'x'; 3000]))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 5000]))
        .mount(&mock_server)
        .await;

    // Icons are not stylesheets and must never be requested
    Mock::given(method("GET"))
        .and(path("/favicon.ico"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 100]))
        .expect(0)
        .mount(&mock_server)
        .await;

    let report = create_test_service()
        .compute(&mock_server.uri())
        .await
        .expect("Request should succeed");

    let bytes = report.bytes();
    assert_eq!(bytes.css, 20);
    assert_eq!(bytes.js, 3000);
    assert_eq!(bytes.images, 5000);
    assert_eq!(bytes.total, bytes.html + 20 + 3000 + 5000);

    let breakdown = report.breakdown().expect("Breakdown enabled by default");
    assert_eq!(breakdown.css.len(), 1);
    assert_eq!(breakdown.js.len(), 1);
    assert_eq!(breakdown.images.len(), 1);
    assert!(breakdown.images[0].url.ends_with("/logo.png"));
}

#[tokio::test]
async fn test_css_background_image_is_counted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><head><link rel="stylesheet" href="/css/site.css"></head></html>"#,
        ))
        .mount(&mock_server)
        .await;

    let css = "body { background: url('../img/bg.jpg') }";
    Mock::given(method("GET"))
        .and(path("/css/site.css"))
        .respond_with(ResponseTemplate::new(200).set_body_string(css))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/img/bg.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 2048]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let report = create_test_service()
        .compute(&mock_server.uri())
        .await
        .expect("Request should succeed");

    assert_eq!(report.bytes().css, css.len() as u64);
    assert_eq!(report.bytes().images, 2048);

    let breakdown = report.breakdown().unwrap();
    assert_eq!(breakdown.images.len(), 1);
    assert!(breakdown.images[0].url.ends_with("/img/bg.jpg"));
}

#[tokio::test]
async fn test_inline_style_references() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><head><style>.hero { background: url(/hero.png) }</style></head>
            <body><div style="background-image: url('/tile.png')"></div></body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/hero.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 700]))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/tile.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 300]))
        .mount(&mock_server)
        .await;

    let report = create_test_service()
        .compute(&mock_server.uri())
        .await
        .expect("Request should succeed");

    assert_eq!(report.bytes().images, 1000);
}

#[tokio::test]
async fn test_duplicate_references_fetched_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html>
            <link rel="stylesheet" href="/site.css">
            <img src="/a.png"><img src="a.png"><img src="/a.png#top">
            </html>"#,
        ))
        .mount(&mock_server)
        .await;

    // The stylesheet references the same image again
    Mock::given(method("GET"))
        .and(path("/site.css"))
        .respond_with(ResponseTemplate::new(200).set_body_string(".x{background:url(/a.png)}"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 512]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let report = create_test_service()
        .compute(&mock_server.uri())
        .await
        .expect("Request should succeed");

    assert_eq!(report.bytes().images, 512);
    assert_eq!(report.breakdown().unwrap().images.len(), 1);
}

#[tokio::test]
async fn test_inline_base64_image() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><img src="data:image/png;base64,QUJDRA=="></html>"#,
        ))
        .mount(&mock_server)
        .await;

    let report = create_test_service()
        .compute(&mock_server.uri())
        .await
        .expect("Request should succeed");

    // floor(8 * 3 / 4)
    assert_eq!(report.bytes().inline, 6);
    assert_eq!(report.bytes().images, 0);
    assert_eq!(report.bytes().total, report.bytes().html + 6);
    assert!(report.breakdown().unwrap().images.is_empty());
}

#[tokio::test]
async fn test_external_resources_are_overlay() {
    let mock_server = MockServer::start().await;
    let cdn_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(format!(
            r#"<html><script src="{}/lib.js"></script><img src="/local.png"></html>"#,
            cdn_server.uri()
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/local.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 100]))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/lib.js"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![b'x'; 4000]))
        .mount(&cdn_server)
        .await;

    let report = create_test_service()
        .compute(&mock_server.uri())
        .await
        .expect("Request should succeed");

    let bytes = report.bytes();
    assert_eq!(bytes.js, 4000);
    assert_eq!(bytes.external, 4000);
    // External bytes are already in js and not added again
    assert_eq!(bytes.total, bytes.html + 100 + 4000);

    let breakdown = report.breakdown().unwrap();
    assert_eq!(breakdown.external_resources.len(), 1);
    assert!(breakdown.external_resources[0].url.ends_with("/lib.js"));
}

#[tokio::test]
async fn test_redirect_changes_base() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/docs/new"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/new"))
        .respond_with(html(r#"<html><img src="pic.png"></html>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/pic.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 64]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let report = create_test_service()
        .compute(&format!("{}/old", mock_server.uri()))
        .await
        .expect("Request should succeed");

    assert_eq!(report.bytes().images, 64);
}

#[tokio::test]
async fn test_json_response_shape() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<html><img src="/a.png"></html>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 1_572_864]))
        .mount(&mock_server)
        .await;

    let result = create_test_service().compute(&mock_server.uri()).await;
    let response = page_weight::PageWeightResponse::from(result);
    assert_eq!(response.http_status(), 200);

    let json: serde_json::Value =
        serde_json::from_str(&response.to_json().unwrap()).expect("Valid JSON");
    assert_eq!(json["images_size_mb"], 1.5);
    assert_eq!(json["total_size_mb"], 1.5);
    assert_eq!(json["images"][0]["size"], 1_572_864);
    assert!(json.get("error").is_none());
}
