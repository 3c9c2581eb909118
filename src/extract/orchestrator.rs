//! Scrape orchestration - drives one full scrape for a site
//!
//! The orchestrator composes the page renderer, a site's extraction contract,
//! and the fetch engine into the end-to-end flow: render the search page,
//! extract detail-page links, fan the detail fetches out, aggregate results.

use crate::extract::contract::{ImageScraper, ResultCollection};
use crate::extract::engine::FetchEngine;
use crate::output::ScrapeStats;
use crate::render::PageRenderer;
use crate::EngineError;
use std::sync::Arc;

/// Result of one orchestrated scrape
#[derive(Debug)]
pub struct ScrapeReport {
    /// Every successful image record; order is completion order and carries
    /// no meaning
    pub records: ResultCollection,

    /// Run accounting for logging and output
    pub stats: ScrapeStats,
}

/// Drives one full scrape for a configured site
///
/// Per-item failures degrade to omissions; a search-page failure degrades the
/// whole batch to "no results". Only engine-level faults propagate.
pub struct Orchestrator {
    renderer: Arc<dyn PageRenderer>,
    scraper: Arc<dyn ImageScraper>,
    engine: FetchEngine,
}

impl Orchestrator {
    /// Composes an orchestrator from its collaborators
    pub fn new(
        renderer: Arc<dyn PageRenderer>,
        scraper: Arc<dyn ImageScraper>,
        engine: FetchEngine,
    ) -> Self {
        Self {
            renderer,
            scraper,
            engine,
        }
    }

    /// Runs one scrape for the given search query
    ///
    /// Sequence: build the search URL (template plus optional extra suffix),
    /// render it until the site's readiness selector appears, extract
    /// detail-page links, then fetch all details through the bounded engine.
    ///
    /// A failed search-page render or link extraction is logged and yields an
    /// empty result set rather than an error; the caller always gets whatever
    /// succeeded.
    ///
    /// # Errors
    ///
    /// Only [`EngineError`] (pool-level faults) propagates.
    pub async fn scrape(&self, query: &str) -> Result<ScrapeReport, EngineError> {
        let site = self.scraper.site();
        let search_url = site.build_search_url(query);
        let mut stats = ScrapeStats::start(&site.website, query);

        tracing::info!(
            "Scraping {} for '{}' ({})",
            site.website,
            query,
            search_url
        );

        // Search-page failures empty the batch deliberately; nothing null
        // flows downstream
        let document = match self.renderer.render(&search_url, &site.selector).await {
            Ok(document) => document,
            Err(e) => {
                tracing::error!("Error parsing page {}: {}", search_url, e);
                stats.search_failed = true;
                return Ok(ScrapeReport {
                    records: ResultCollection::new(),
                    stats: stats.finish(),
                });
            }
        };

        let links = match self.scraper.extract_links(&document) {
            Ok(links) => links,
            Err(e) => {
                tracing::error!("Error extracting links from {}: {}", search_url, e);
                stats.search_failed = true;
                return Ok(ScrapeReport {
                    records: ResultCollection::new(),
                    stats: stats.finish(),
                });
            }
        };

        stats.links_found = links.len() as u64;
        tracing::info!("Found {} detail links on {}", links.len(), site.website);

        let report = self
            .engine
            .run_report(&links, Arc::clone(&self.scraper))
            .await?;

        stats.records_extracted = report.records.len() as u64;
        stats.missing_fields = report.empty;
        for failure in &report.failures {
            stats.record_failure(failure.phase);
        }
        let stats = stats.finish();

        tracing::info!(
            "Scrape of {} complete: {} records from {} links ({} failed)",
            site.website,
            stats.records_extracted,
            stats.links_found,
            report.failures.len()
        );

        Ok(ScrapeReport {
            records: report.records,
            stats,
        })
    }
}
