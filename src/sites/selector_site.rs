//! Selector-driven site scraper
//!
//! Implements the extraction contract for any site whose search results are
//! attribute-bearing anchors and whose detail pages carry a queryable image
//! element. All site specifics live in the [`SiteConfig`] selectors.

use crate::config::SiteConfig;
use crate::extract::{ImageRecord, ImageScraper};
use crate::render::{Document, PageRenderer};
use crate::{ExtractionError, FetchError};
use async_trait::async_trait;
use scraper::Selector;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use url::Url;

/// Image source attributes recognized on detail-page image elements, in
/// preference order
const SRC_ATTRIBUTES: [&str; 3] = ["src", "data-src", "data-original"];

/// A scraper parameterized entirely by its site's CSS selectors
///
/// Holds no mutable state; each detail fetch renders through its own renderer
/// session, so one instance safely serves many concurrent workers.
pub struct SelectorSite {
    config: SiteConfig,
    renderer: Arc<dyn PageRenderer>,
}

impl SelectorSite {
    /// Creates a scraper for the given site
    pub fn new(config: SiteConfig, renderer: Arc<dyn PageRenderer>) -> Self {
        Self { config, renderer }
    }

    /// Parses a configured selector, mapping failure to an extraction error
    ///
    /// Config validation already checked these; failure here means the
    /// scraper was built from an unvalidated config.
    fn selector(&self, raw: &str) -> Result<Selector, ExtractionError> {
        Selector::parse(raw).map_err(|_| ExtractionError::InvalidSelector(raw.to_string()))
    }
}

/// Resolves an href to an absolute http(s) URL against a base
///
/// Returns None for special schemes, fragments, and anything that fails to
/// resolve.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:") || href.starts_with("mailto:") || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

#[async_trait]
impl ImageScraper for SelectorSite {
    fn site(&self) -> &SiteConfig {
        &self.config
    }

    fn extract_links(&self, document: &Document) -> Result<Vec<String>, ExtractionError> {
        let link_selector = self.selector(&self.config.link_selector)?;
        let base_url = Url::parse(document.url()).map_err(|e| {
            ExtractionError::MissingStructure(format!(
                "document URL '{}' is not absolute: {}",
                document.url(),
                e
            ))
        })?;

        let html = document.parse();
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        // Document order, first occurrence wins
        for element in html.select(&link_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute) = resolve_link(href, &base_url) {
                    if seen.insert(absolute.clone()) {
                        links.push(absolute);
                    }
                }
            }
        }

        Ok(links)
    }

    fn extract_img_source(
        &self,
        document: &Document,
    ) -> Result<BTreeMap<String, String>, ExtractionError> {
        let image_selector = self.selector(&self.config.image_selector)?;
        let html = document.parse();

        let mut attributes = BTreeMap::new();
        if let Some(element) = html.select(&image_selector).next() {
            for (name, value) in element.value().attrs() {
                attributes.insert(name.to_string(), value.to_string());
            }
        }

        Ok(attributes)
    }

    async fn fetch_img_details(&self, link: &str) -> Result<Option<ImageRecord>, FetchError> {
        // The image element doubles as the detail page's readiness marker
        let document = self
            .renderer
            .render(link, &self.config.image_selector)
            .await?;

        let attributes = self.extract_img_source(&document)?;

        let raw_src = SRC_ATTRIBUTES
            .iter()
            .find_map(|attr| attributes.get(*attr));

        let Some(raw_src) = raw_src else {
            tracing::debug!(
                "Detail page {} has no image source attribute, skipping",
                link
            );
            return Ok(None);
        };

        let base_url = Url::parse(document.url()).map_err(|e| FetchError::Other {
            link: link.to_string(),
            reason: format!("detail URL is not absolute: {}", e),
        })?;

        let Some(src) = resolve_link(raw_src, &base_url) else {
            tracing::debug!("Image source '{}' on {} is not resolvable", raw_src, link);
            return Ok(None);
        };

        let mut record = ImageRecord::new()
            .with("website", self.config.website.as_str())
            .with("link", link)
            .with("src", src);

        if let Some(alt) = attributes.get("alt") {
            if !alt.is_empty() {
                record.set("alt", alt.as_str());
            }
        }

        if let Some(title_selector) = &self.config.title_selector {
            let selector = self.selector(title_selector)?;
            let html = document.parse();
            if let Some(element) = html.select(&selector).next() {
                let title = element.text().collect::<String>().trim().to_string();
                if !title.is_empty() {
                    record.set("title", title);
                }
            }
        }

        Ok(Some(record))
    }
}
