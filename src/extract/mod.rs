//! Extraction core: the scraper contract, the concurrent fetch engine, and
//! the per-site orchestrator
//!
//! This module contains the shared orchestration layer, including:
//! - The polymorphic extraction contract every site scraper implements
//! - Bounded-concurrency detail-page fetching with per-task failure isolation
//! - The end-to-end scrape flow (search page -> links -> records)

mod contract;
mod engine;
mod orchestrator;

pub use contract::{FetchPhase, ImageRecord, ImageScraper, ResultCollection};
pub use engine::{EngineReport, FetchEngine, FetchFailure};
pub use orchestrator::{Orchestrator, ScrapeReport};
