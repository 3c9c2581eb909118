//! Full-pipeline scrape tests against a mock HTTP server

use img_scout::config::{EngineConfig, SiteConfig};
use img_scout::extract::{FetchEngine, Orchestrator};
use img_scout::render::{HttpRenderer, PageRenderer};
use img_scout::sites::SelectorSite;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a site entry pointing at the mock server
fn create_test_site(base_url: &str) -> SiteConfig {
    SiteConfig {
        website: "mockmart".to_string(),
        search_url: format!("{}/search?q={{query}}", base_url),
        search_url_extra: None,
        selector: ".result-item".to_string(),
        link_selector: ".result-item a".to_string(),
        image_selector: "img.product".to_string(),
        title_selector: Some("h1.product-title".to_string()),
    }
}

/// Engine config with timeouts short enough for tests
fn create_test_engine_config() -> EngineConfig {
    EngineConfig {
        max_workers: 4,
        navigation_timeout_ms: 5_000,
        selector_timeout_ms: 400,
    }
}

fn html_response(body: String) -> ResponseTemplate {
    // set_body_raw carries the mime; an inserted content-type header would
    // lose to the body's default text/plain
    ResponseTemplate::new(200).set_body_raw(body.into_bytes(), "text/html")
}

/// Mounts a search page with three result links
async fn mount_search_page(server: &MockServer, base_url: &str) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "lamp"))
        .respond_with(html_response(format!(
            r#"<html><body>
            <div class="result-item"><a href="{0}/p/1">Lamp one</a></div>
            <div class="result-item"><a href="{0}/p/2">Lamp two</a></div>
            <div class="result-item"><a href="{0}/p/3">Lamp three</a></div>
            </body></html>"#,
            base_url
        )))
        .mount(server)
        .await;
}

/// Mounts a detail page with a product image and title
async fn mount_detail_page(server: &MockServer, page_path: &str, title: &str, img: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html_response(format!(
            r#"<html><body>
            <h1 class="product-title">{}</h1>
            <img class="product" src="{}" alt="{}">
            </body></html>"#,
            title, img, title
        )))
        .mount(server)
        .await;
}

fn build_orchestrator(server_uri: &str) -> Orchestrator {
    let engine_config = create_test_engine_config();
    let renderer: Arc<dyn PageRenderer> =
        Arc::new(HttpRenderer::new(&engine_config).expect("client should build"));
    let site = create_test_site(server_uri);
    let scraper = Arc::new(SelectorSite::new(site, Arc::clone(&renderer)));
    Orchestrator::new(renderer, scraper, FetchEngine::new(engine_config.max_workers))
}

#[tokio::test]
async fn test_full_scrape_with_one_broken_detail_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_search_page(&mock_server, &base_url).await;
    mount_detail_page(&mock_server, "/p/1", "Brass Lamp", "/img/1.jpg").await;
    mount_detail_page(&mock_server, "/p/3", "Desk Lamp", "/img/3.jpg").await;

    // Detail page 2 is broken
    Mock::given(method("GET"))
        .and(path("/p/2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let report = build_orchestrator(&base_url)
        .scrape("lamp")
        .await
        .expect("engine should not fail");

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.stats.links_found, 3);
    assert_eq!(report.stats.records_extracted, 2);
    assert_eq!(report.stats.render_failed, 1);
    assert_eq!(report.stats.timed_out, 0);

    let mut sources: Vec<&str> = report.records.iter().filter_map(|r| r.src()).collect();
    sources.sort_unstable();
    assert_eq!(
        sources,
        vec![
            format!("{}/img/1.jpg", base_url),
            format!("{}/img/3.jpg", base_url),
        ]
    );
    for record in &report.records {
        assert_eq!(record.get("website"), Some("mockmart"));
    }
}

#[tokio::test]
async fn test_search_page_readiness_timeout_empties_batch() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Search page renders but the readiness selector never appears
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(html_response(
            "<html><body><p>Still loading...</p></body></html>".to_string(),
        ))
        .mount(&mock_server)
        .await;

    let report = build_orchestrator(&base_url)
        .scrape("lamp")
        .await
        .expect("engine should not fail");

    assert!(report.records.is_empty());
    assert!(report.stats.search_failed);
    assert_eq!(report.stats.links_found, 0);
}

#[tokio::test]
async fn test_detail_timeout_isolated_from_siblings() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_search_page(&mock_server, &base_url).await;
    mount_detail_page(&mock_server, "/p/1", "Brass Lamp", "/img/1.jpg").await;
    mount_detail_page(&mock_server, "/p/3", "Desk Lamp", "/img/3.jpg").await;

    // Detail page 2 loads but its image never appears, so the readiness
    // wait times out
    Mock::given(method("GET"))
        .and(path("/p/2"))
        .respond_with(html_response(
            "<html><body><div class=\"spinner\"></div></body></html>".to_string(),
        ))
        .mount(&mock_server)
        .await;

    let report = build_orchestrator(&base_url)
        .scrape("lamp")
        .await
        .expect("engine should not fail");

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.stats.timed_out, 1);
    assert_eq!(report.stats.render_failed, 0);
}

#[tokio::test]
async fn test_search_with_no_results_yields_empty_collection() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Readiness selector present, but no result links at all
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(html_response(
            r#"<html><body><div class="result-item">No matches</div></body></html>"#.to_string(),
        ))
        .mount(&mock_server)
        .await;

    let report = build_orchestrator(&base_url)
        .scrape("lamp")
        .await
        .expect("engine should not fail");

    assert!(report.records.is_empty());
    assert!(!report.stats.search_failed);
    assert_eq!(report.stats.links_found, 0);
}

#[tokio::test]
async fn test_detail_records_resolve_relative_image_urls() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(html_response(
            r#"<html><body>
            <div class="result-item"><a href="/p/1">Lamp</a></div>
            </body></html>"#
                .to_string(),
        ))
        .mount(&mock_server)
        .await;
    mount_detail_page(&mock_server, "/p/1", "Brass Lamp", "/img/relative.jpg").await;

    let report = build_orchestrator(&base_url)
        .scrape("lamp")
        .await
        .expect("engine should not fail");

    assert_eq!(report.records.len(), 1);
    assert_eq!(
        report.records[0].src(),
        Some(format!("{}/img/relative.jpg", base_url).as_str())
    );
    assert_eq!(
        report.records[0].get("link"),
        Some(format!("{}/p/1", base_url).as_str())
    );
}
