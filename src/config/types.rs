use serde::Deserialize;

/// Default worker pool size when `max-workers` and `MAX_WORKERS` are absent
/// or invalid
pub const DEFAULT_MAX_WORKERS: usize = 4;

fn default_max_workers() -> usize {
    DEFAULT_MAX_WORKERS
}

fn default_navigation_timeout_ms() -> u64 {
    30_000
}

fn default_selector_timeout_ms() -> u64 {
    10_000
}

/// Main configuration structure for Img-Scout
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default, rename = "site")]
    pub sites: Vec<SiteConfig>,
}

/// Fetch engine and renderer behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Maximum number of detail-page fetches running concurrently
    #[serde(rename = "max-workers", default = "default_max_workers")]
    pub max_workers: usize,

    /// Upper bound on page navigation (milliseconds)
    #[serde(
        rename = "navigation-timeout-ms",
        default = "default_navigation_timeout_ms"
    )]
    pub navigation_timeout_ms: u64,

    /// Upper bound on waiting for the readiness selector (milliseconds)
    #[serde(
        rename = "selector-timeout-ms",
        default = "default_selector_timeout_ms"
    )]
    pub selector_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            navigation_timeout_ms: default_navigation_timeout_ms(),
            selector_timeout_ms: default_selector_timeout_ms(),
        }
    }
}

/// Immutable per-website scrape configuration
///
/// Created once at scraper construction and never mutated; each scraper
/// instance owns its own copy.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Website identifier (e.g. "examplemart")
    pub website: String,

    /// Search URL template with a `{query}` placeholder
    #[serde(rename = "search-url")]
    pub search_url: String,

    /// Optional extra query/path suffix appended to the search URL
    #[serde(rename = "search-url-extra", default)]
    pub search_url_extra: Option<String>,

    /// CSS selector whose presence marks the search page as rendered
    pub selector: String,

    /// CSS selector matching detail-page anchors on the search page
    #[serde(rename = "link-selector")]
    pub link_selector: String,

    /// CSS selector matching the image element on a detail page
    #[serde(rename = "image-selector")]
    pub image_selector: String,

    /// CSS selector matching the title element on a detail page
    #[serde(rename = "title-selector", default)]
    pub title_selector: Option<String>,
}

impl SiteConfig {
    /// Builds the concrete search URL for a query, including the optional
    /// extra suffix
    pub fn build_search_url(&self, query: &str) -> String {
        let mut url = self.search_url.replace("{query}", query);
        if let Some(extra) = &self.search_url_extra {
            url.push_str(extra);
        }
        url
    }
}
