//! Statistics for one scrape run
//!
//! This module provides the per-run accounting the orchestrator fills in and
//! the CLI displays.

use crate::extract::FetchPhase;
use chrono::{DateTime, Utc};

/// Accounting for one scrape run
#[derive(Debug, Clone)]
pub struct ScrapeStats {
    /// Website identifier the run targeted
    pub website: String,

    /// Search query the run used
    pub query: String,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished
    pub finished_at: Option<DateTime<Utc>>,

    /// Whether the search page itself failed to render or parse
    pub search_failed: bool,

    /// Detail-page links discovered on the search page
    pub links_found: u64,

    /// Records successfully extracted
    pub records_extracted: u64,

    /// Detail pages that rendered but lacked the required fields
    pub missing_fields: u64,

    /// Detail fetches that timed out waiting for readiness
    pub timed_out: u64,

    /// Detail fetches that failed to render or process
    pub render_failed: u64,
}

impl ScrapeStats {
    /// Starts accounting for a run
    pub fn start(website: &str, query: &str) -> Self {
        Self {
            website: website.to_string(),
            query: query.to_string(),
            started_at: Utc::now(),
            finished_at: None,
            search_failed: false,
            links_found: 0,
            records_extracted: 0,
            missing_fields: 0,
            timed_out: 0,
            render_failed: 0,
        }
    }

    /// Tallies one failed detail fetch by its terminal phase
    pub fn record_failure(&mut self, phase: FetchPhase) {
        match phase {
            FetchPhase::TimedOut => self.timed_out += 1,
            _ => self.render_failed += 1,
        }
    }

    /// Total failed detail fetches
    pub fn total_failed(&self) -> u64 {
        self.timed_out + self.render_failed
    }

    /// Stamps the finish time
    pub fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }

    /// Wall-clock duration, if the run finished
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.finished_at.map(|end| end - self.started_at)
    }
}

/// Prints run statistics to stdout
pub fn print_stats(stats: &ScrapeStats) {
    println!("=== Scrape Statistics ===");
    println!("Website:          {}", stats.website);
    println!("Query:            {}", stats.query);
    if stats.search_failed {
        println!("Search page:      FAILED");
    }
    println!("Links found:      {}", stats.links_found);
    println!("Records:          {}", stats.records_extracted);
    println!("Missing fields:   {}", stats.missing_fields);
    println!("Timed out:        {}", stats.timed_out);
    println!("Render failed:    {}", stats.render_failed);
    if let Some(duration) = stats.duration() {
        println!("Duration:         {}ms", duration.num_milliseconds());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_tally_by_phase() {
        let mut stats = ScrapeStats::start("examplemart", "lamp");
        stats.record_failure(FetchPhase::TimedOut);
        stats.record_failure(FetchPhase::RenderFailed);
        stats.record_failure(FetchPhase::RenderFailed);

        assert_eq!(stats.timed_out, 1);
        assert_eq!(stats.render_failed, 2);
        assert_eq!(stats.total_failed(), 3);
    }

    #[test]
    fn test_duration_requires_finish() {
        let stats = ScrapeStats::start("examplemart", "lamp");
        assert!(stats.duration().is_none());

        let stats = stats.finish();
        assert!(stats.duration().is_some());
    }
}
