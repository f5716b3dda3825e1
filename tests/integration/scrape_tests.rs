//! Integration tests for the scraper
//!
//! These tests use wiremock to serve pages and drive the full
//! fetch, extract, cache and export cycle through the HTTP engine.

use std::collections::BTreeMap;
use tempfile::TempDir;
use webglean::config::{Config, EngineKind};
use webglean::extract::FieldValue;
use webglean::output::{export, flatten_report};
use webglean::{OutputFormat, ScrapeError, ScrapeOptions, ScrapeStatus, Scraper};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PRODUCT_PAGE: &str = r##"<html lang="en">
<head>
    <title>Gadget Pro</title>
    <meta name="description" content="The best gadget">
    <meta property="og:type" content="product">
    <script type="application/ld+json">{"@type": "Product", "name": "Gadget Pro"}</script>
</head>
<body>
    <nav><a href="/">Home</a></nav>
    <main>
        <h1>Gadget Pro</h1>
        <span class="price">$99</span>
        <ul class="features"><li>Fast</li><li>Small</li></ul>
        <table>
            <tr><th>Attribute</th><th>Value</th></tr>
            <tr><td>Weight</td><td>120g</td></tr>
        </table>
        <a href="/reviews">Reviews</a>
        <a href="https://elsewhere.example.org/">Partner</a>
        <a href="#buy">Buy</a>
    </main>
    <footer>Copyright</footer>
</body>
</html>"##;

/// Creates a test configuration that fetches over plain HTTP
fn create_test_config() -> Config {
    let mut config = Config::default();
    config.browser.engine = EngineKind::Http;
    config.browser.user_agent = "webglean-test/1.0".to_string();
    // Very short spacing for testing
    config.scraper.requests_per_minute = 6000;
    config
}

fn html_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

#[tokio::test]
async fn test_scrape_page_over_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/product"))
        .and(header("user-agent", "webglean-test/1.0"))
        .respond_with(html_response(PRODUCT_PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/product", mock_server.uri());
    let mut scraper = Scraper::new(create_test_config()).expect("Failed to create scraper");
    let options = ScrapeOptions {
        selectors: Some(BTreeMap::from([
            ("price".to_string(), ".price".to_string()),
            ("features".to_string(), ".features li".to_string()),
        ])),
        ..Default::default()
    };

    let report = scraper.scrape(&url, &options).await.expect("Scrape failed");

    assert_eq!(report.status, ScrapeStatus::Success);
    let data = report.data.as_ref().expect("Missing page data");
    assert_eq!(data.metadata.title, "Gadget Pro");
    assert_eq!(data.metadata.description, "The best gadget");
    assert_eq!(data.metadata.og_type.as_deref(), Some("product"));
    assert_eq!(data.tables.len(), 1);
    assert_eq!(data.tables[0].headers, vec!["Attribute", "Value"]);
    assert_eq!(data.lists["list_ul_0"], vec!["Fast", "Small"]);
    assert_eq!(data.json_ld.len(), 1);
    assert_eq!(data.article.title, "Gadget Pro");
    assert!(!data.text.contains("Copyright"));

    assert_eq!(
        data.links.internal,
        vec![
            format!("{}/", mock_server.uri()),
            format!("{}/reviews", mock_server.uri()),
        ]
    );
    assert_eq!(data.links.external, vec!["https://elsewhere.example.org/"]);
    assert_eq!(data.links.anchors, vec!["buy"]);

    let custom = report.custom.as_ref().expect("Missing custom fields");
    assert_eq!(custom["price"], FieldValue::Single("$99".to_string()));
    assert_eq!(
        custom["features"],
        FieldValue::Many(vec!["Fast".to_string(), "Small".to_string()])
    );

    scraper.close().await;
}

#[tokio::test]
async fn test_cache_serves_repeat_requests() {
    let mock_server = MockServer::start().await;

    // The second scrape must come from the cache
    Mock::given(method("GET"))
        .and(path("/cached"))
        .respond_with(html_response(PRODUCT_PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/cached", mock_server.uri());
    let mut scraper = Scraper::new(create_test_config()).expect("Failed to create scraper");

    let first = scraper.scrape(&url, &ScrapeOptions::default()).await.unwrap();
    let second = scraper.scrape(&url, &ScrapeOptions::default()).await.unwrap();

    assert_eq!(first.scraped_at, second.scraped_at);
    let stats = scraper.stats();
    assert_eq!(stats.cache_hits, 1);
    assert_eq!(stats.rate_limiter.requests_made, 1);
}

#[tokio::test]
async fn test_server_error_is_reported_and_backs_off() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(html_response(PRODUCT_PAGE))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let urls = vec![
        format!("{}/broken", mock_server.uri()),
        format!("{}/ok", mock_server.uri()),
    ];
    let mut scraper = Scraper::new(create_test_config()).expect("Failed to create scraper");

    let reports = scraper.scrape_many(&urls, &ScrapeOptions::default()).await;

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].status, ScrapeStatus::Error);
    assert!(reports[0].error.as_deref().unwrap_or_default().contains("500"));
    assert_eq!(reports[1].status, ScrapeStatus::Success);

    let stats = scraper.stats();
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.rate_limiter.failures, 1);
    // 1.5 after the failure, then halved by the success and floored at 1.0
    assert_eq!(stats.rate_limiter.current_backoff, 1.0);
}

#[tokio::test]
async fn test_wait_for_selector_missing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/loading"))
        .respond_with(html_response("<div id=\"app\">Loading...</div>"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/loading", mock_server.uri());
    let mut scraper = Scraper::new(create_test_config()).expect("Failed to create scraper");
    let options = ScrapeOptions {
        wait_for: Some("#app .loaded".to_string()),
        ..Default::default()
    };

    let err = scraper.scrape(&url, &options).await.unwrap_err();
    assert!(matches!(err, ScrapeError::SelectorTimeout { .. }));
    assert_eq!(scraper.limiter().current_backoff, 1.5);
}

#[tokio::test]
async fn test_export_results() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/product"))
        .respond_with(html_response(PRODUCT_PAGE))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let urls = vec![
        format!("{}/product", mock_server.uri()),
        format!("{}/gone", mock_server.uri()),
    ];
    let mut scraper = Scraper::new(create_test_config()).expect("Failed to create scraper");
    let options = ScrapeOptions {
        selectors: Some(BTreeMap::from([("price".to_string(), ".price".to_string())])),
        ..Default::default()
    };
    let reports = scraper.scrape_many(&urls, &options).await;

    let dir = TempDir::new().expect("Failed to create temp dir");

    // JSON keeps the full reports
    let json_path = dir.path().join("out/results.json");
    scraper
        .export(&reports, &json_path, OutputFormat::Json)
        .expect("JSON export failed");
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[0]["data"]["metadata"]["title"], "Gadget Pro");
    assert_eq!(json[0]["custom"]["price"], "$99");
    assert_eq!(json[1]["status"], "error");

    // CSV gets one flat row per report
    let csv_path = dir.path().join("results.csv");
    let rows: Vec<_> = reports.iter().map(flatten_report).collect();
    export(&rows, &csv_path, OutputFormat::Csv).expect("CSV export failed");

    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["url", "status", "scraped_at", "title", "description", "word_count", "error", "price"]
    );

    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2);
    assert_eq!(&records[0][1], "success");
    assert_eq!(&records[0][3], "Gadget Pro");
    assert_eq!(&records[0][7], "$99");
    assert_eq!(&records[1][1], "error");
    assert!(records[1][6].contains("404"));
    assert_eq!(&records[1][7], "");
}
