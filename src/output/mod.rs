//! Output module for scrape results
//!
//! This module handles run statistics and writing extracted records to disk
//! as JSON Lines.

mod json;
mod stats;

pub use json::{records_to_jsonl, write_records};
pub use stats::{print_stats, ScrapeStats};
