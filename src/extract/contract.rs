//! The extraction contract and its data types
//!
//! Every supported website gets one implementation of [`ImageScraper`]. The
//! contract covers link discovery on search pages, image-source extraction on
//! detail pages, and the per-link detail fetch the engine fans out.

use crate::config::SiteConfig;
use crate::render::Document;
use crate::{ExtractionError, FetchError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One image's extracted data, as a field-name to value mapping
///
/// Conventional fields are `src`, `title`, `website`, and `link`; site
/// implementations may add whatever else their markup yields. Field order is
/// stable (sorted) so serialized output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord(BTreeMap<String, String>);

impl ImageRecord {
    /// Creates an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, replacing any previous value
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    /// Builder-style field setter
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Gets a field value
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// The image source URL, if present
    pub fn src(&self) -> Option<&str> {
        self.get("src")
    }

    /// Number of fields in the record
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over fields in sorted order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// All successful records from one scrape; insertion order follows task
/// completion order and carries no meaning
pub type ResultCollection = Vec<ImageRecord>;

/// State of a single detail-page extraction
///
/// `Idle -> Rendering -> {Extracted | TimedOut | RenderFailed}`. The wait in
/// `Rendering` is bounded; exceeding it transitions to `TimedOut`, which is a
/// recoverable per-item failure, never fatal to the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchPhase {
    /// Task created, rendering not started
    Idle,

    /// Rendering the page, waiting for the readiness selector
    Rendering,

    /// Page rendered and fields extracted (whether or not a record resulted)
    Extracted,

    /// Readiness selector never appeared within the bounded wait
    TimedOut,

    /// Page failed to load, or its content could not be processed
    RenderFailed,
}

impl FetchPhase {
    /// Returns true if this is a terminal phase
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Idle | Self::Rendering)
    }

    /// Returns true if this phase represents a per-item failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::TimedOut | Self::RenderFailed)
    }

    /// Classifies a failed fetch into its terminal phase
    ///
    /// Non-timeout failures, including extraction errors on a rendered page,
    /// collapse into `RenderFailed`.
    pub fn from_error(error: &FetchError) -> Self {
        match error {
            FetchError::Render(crate::RenderError::SelectorTimeout { .. }) => Self::TimedOut,
            _ => Self::RenderFailed,
        }
    }
}

impl fmt::Display for FetchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Rendering => "rendering",
            Self::Extracted => "extracted",
            Self::TimedOut => "timed-out",
            Self::RenderFailed => "render-failed",
        };
        write!(f, "{}", name)
    }
}

/// The polymorphic extraction contract, one implementation per supported
/// website
///
/// Implementations own their [`SiteConfig`] and whatever renderer handle they
/// need; they hold no mutable state, so a single instance may serve many
/// concurrent fetch tasks.
#[async_trait]
pub trait ImageScraper: Send + Sync {
    /// The site this scraper is configured for
    fn site(&self) -> &SiteConfig;

    /// Scans a rendered search-result document and returns every detail-page
    /// URL found, in document order
    ///
    /// No links is not an error: the result is simply empty. Fails only when
    /// the document structure itself is unusable.
    fn extract_links(&self, document: &Document) -> Result<Vec<String>, ExtractionError>;

    /// Returns the raw image-source attributes from a rendered detail
    /// document, as an attribute-name to value mapping
    ///
    /// Used internally by `fetch_img_details` implementations; the
    /// orchestrator never calls it directly.
    fn extract_img_source(
        &self,
        document: &Document,
    ) -> Result<BTreeMap<String, String>, ExtractionError>;

    /// Renders one detail page and produces its record
    ///
    /// Returns `Ok(None)` when the page rendered but required fields were
    /// missing. Each invocation owns an independent rendering session, so the
    /// engine may call this from many workers at once.
    async fn fetch_img_details(&self, link: &str) -> Result<Option<ImageRecord>, FetchError>;
}
