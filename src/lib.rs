//! Img-Scout: image metadata extraction from product-search pages
//!
//! This crate implements the shared orchestration for site-specific image
//! scrapers: a polymorphic extraction contract, a bounded-concurrency
//! fetch-and-collect engine with per-task failure isolation, and an
//! orchestrator that drives one full scrape per site.

pub mod config;
pub mod extract;
pub mod output;
pub mod render;
pub mod sites;

use thiserror::Error;

/// Main error type for Img-Scout operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output error: {0}")]
    Output(String),
}

/// Page rendering failures, recoverable at the call site that requested
/// the render
#[derive(Debug, Error)]
pub enum RenderError {
    /// Page failed to load at all (network error, HTTP error, navigation
    /// timeout)
    #[error("Navigation failed for {url}: {reason}")]
    Navigation { url: String, reason: String },

    /// Page loaded but the readiness selector never appeared within the
    /// selector timeout
    #[error("Selector '{selector}' never appeared on {url} within {waited_ms}ms")]
    SelectorTimeout {
        url: String,
        selector: String,
        waited_ms: u64,
    },

    /// Response was not HTML
    #[error("Expected HTML from {url}, got content type '{content_type}'")]
    ContentMismatch { url: String, content_type: String },
}

/// Rendered document lacked the expected structure
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Invalid selector '{0}'")]
    InvalidSelector(String),

    #[error("Document missing expected structure: {0}")]
    MissingStructure(String),
}

/// Catch-all failure for a single detail-page fetch task; always isolated
/// inside the engine, never propagates to sibling tasks
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("Fetch failed for {link}: {reason}")]
    Other { link: String, reason: String },
}

/// Pool-level resource exhaustion or misconfiguration; fatal, propagates to
/// the orchestrator's caller
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Worker pool closed unexpectedly: {0}")]
    PoolClosed(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Img-Scout operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, EngineConfig, SiteConfig};
pub use extract::{FetchEngine, FetchPhase, ImageRecord, ImageScraper, Orchestrator};
pub use render::{Document, HttpRenderer, PageRenderer};
pub use sites::SelectorSite;
