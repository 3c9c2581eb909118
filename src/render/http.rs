//! HTTP-backed page renderer
//!
//! This module implements [`PageRenderer`] over plain HTTP, including:
//! - Building HTTP clients with timeouts and compression
//! - Content-Type checking
//! - A bounded wait for the readiness selector (re-fetching until it matches)
//! - Error classification into navigation vs readiness failures

use crate::config::EngineConfig;
use crate::render::{Document, PageRenderer};
use crate::RenderError;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::{Duration, Instant};

/// Delay between readiness re-fetches
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `navigation_timeout_ms` - Per-request timeout in milliseconds
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(navigation_timeout_ms: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("img-scout/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_millis(navigation_timeout_ms))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`PageRenderer`] implementation over plain HTTP
///
/// A script-free renderer cannot literally "wait for a selector" the way a
/// headless browser does, so it approximates: fetch, check the selector,
/// and re-fetch on an interval until the selector matches or the selector
/// timeout elapses. For static pages the first fetch matches immediately.
///
/// The renderer is cheap to clone and safe to share; each `render` call is
/// an independent session (its own request/response cycle), so concurrent
/// fetch tasks never contend on shared mutable state.
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    client: Client,
    selector_timeout: Duration,
}

impl HttpRenderer {
    /// Creates a renderer from engine configuration
    pub fn new(config: &EngineConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config.navigation_timeout_ms)?,
            selector_timeout: Duration::from_millis(config.selector_timeout_ms),
        })
    }

    /// Creates a renderer around an existing client (tests, custom clients)
    pub fn with_client(client: Client, selector_timeout: Duration) -> Self {
        Self {
            client,
            selector_timeout,
        }
    }

    /// Performs one navigation: fetch the URL and return its HTML body
    async fn navigate(&self, url: &str) -> Result<String, RenderError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            let reason = if e.is_timeout() {
                "Navigation timeout".to_string()
            } else if e.is_connect() {
                "Connection refused".to_string()
            } else {
                e.to_string()
            };
            RenderError::Navigation {
                url: url.to_string(),
                reason,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Navigation {
                url: url.to_string(),
                reason: format!("HTTP {}", status.as_u16()),
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !content_type.is_empty() && !content_type.contains("text/html") {
            return Err(RenderError::ContentMismatch {
                url: url.to_string(),
                content_type,
            });
        }

        response.text().await.map_err(|e| RenderError::Navigation {
            url: url.to_string(),
            reason: format!("Failed to read response body: {}", e),
        })
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    async fn render(&self, url: &str, ready_selector: &str) -> Result<Document, RenderError> {
        let selector = Selector::parse(ready_selector).map_err(|_| RenderError::Navigation {
            url: url.to_string(),
            reason: format!("Invalid readiness selector '{}'", ready_selector),
        })?;

        let started = Instant::now();

        loop {
            let html = self.navigate(url).await?;

            if selector_matches(&html, &selector) {
                return Ok(Document::new(url, html));
            }

            if started.elapsed() >= self.selector_timeout {
                return Err(RenderError::SelectorTimeout {
                    url: url.to_string(),
                    selector: ready_selector.to_string(),
                    waited_ms: started.elapsed().as_millis() as u64,
                });
            }

            tracing::debug!(
                "Readiness selector '{}' not yet present on {}, re-fetching",
                ready_selector,
                url
            );
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

/// Checks whether the selector matches anywhere in the markup
///
/// Parsing happens in a plain function so the non-`Send` `Html` value never
/// lives across an await point.
fn selector_matches(html: &str, selector: &Selector) -> bool {
    Html::parse_document(html).select(selector).next().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(30_000);
        assert!(client.is_ok());
    }

    #[test]
    fn test_selector_matches() {
        let selector = Selector::parse(".result-item").unwrap();
        assert!(selector_matches(
            r#"<html><body><div class="result-item"></div></body></html>"#,
            &selector
        ));
        assert!(!selector_matches(
            r#"<html><body><div class="other"></div></body></html>"#,
            &selector
        ));
    }

    #[tokio::test]
    async fn test_render_navigation_error_on_unreachable_host() {
        let renderer = HttpRenderer::with_client(
            Client::builder()
                .timeout(Duration::from_millis(500))
                .build()
                .unwrap(),
            Duration::from_millis(500),
        );

        // Reserved TEST-NET-1 address, nothing listens there
        let result = renderer.render("http://192.0.2.1:9/", ".x").await;
        assert!(matches!(result, Err(RenderError::Navigation { .. })));
    }
}
