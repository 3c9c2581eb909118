//! Page rendering for search and detail pages
//!
//! This module defines the renderer contract the extraction pipeline consumes:
//! given a URL and a readiness selector, produce a queryable document or a
//! [`RenderError`] distinguishing navigation failures from readiness timeouts.
//! The shipped implementation is HTTP-backed; renderers that execute scripts
//! (headless browsers) plug in behind the same trait.

mod http;

pub use http::{build_http_client, HttpRenderer};

use crate::RenderError;
use async_trait::async_trait;
use scraper::Html;

/// A rendered page, owned by exactly one fetch task
///
/// Holds the raw markup rather than a parsed tree: `scraper::Html` is not
/// `Send`, and documents cross task boundaries. Parsing happens per query.
#[derive(Debug, Clone)]
pub struct Document {
    url: String,
    html: String,
}

impl Document {
    /// Wraps rendered markup for the given URL
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }

    /// The URL this document was rendered from
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The raw rendered markup
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Parses the markup into a queryable tree
    pub fn parse(&self) -> Html {
        Html::parse_document(&self.html)
    }
}

/// Renders a page and waits for a readiness marker
///
/// Every call must own an independent rendering session so that multiple
/// fetch tasks can render concurrently with no shared mutable state.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Renders `url` and returns the document once `ready_selector` matches
    ///
    /// # Errors
    ///
    /// * [`RenderError::Navigation`] - the page failed to load
    /// * [`RenderError::SelectorTimeout`] - the page loaded but the readiness
    ///   selector never appeared within the configured bound
    /// * [`RenderError::ContentMismatch`] - the response was not HTML
    async fn render(&self, url: &str, ready_selector: &str) -> Result<Document, RenderError>;
}
