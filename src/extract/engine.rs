//! Bounded-concurrency fetch engine
//!
//! This module fans detail-page fetches out across a worker pool, including:
//! - One task per link, at most `max_workers` running at once
//! - Collection of successes in completion order
//! - Per-task failure isolation: a failed or panicked task is logged and
//!   dropped without disturbing its siblings
//! - Engine-level faults (a closed pool) surfacing as fatal errors

use crate::config::DEFAULT_MAX_WORKERS;
use crate::extract::contract::{FetchPhase, ImageScraper, ResultCollection};
use crate::{EngineError, FetchError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// A single link that failed to yield a record, with its terminal phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    /// The detail-page link that failed
    pub link: String,

    /// Terminal phase of the failed extraction
    pub phase: FetchPhase,
}

/// Everything the engine observed during one batch
#[derive(Debug, Default)]
pub struct EngineReport {
    /// Records from every successful fetch, in completion order
    pub records: ResultCollection,

    /// Links that failed, with their terminal phases
    pub failures: Vec<FetchFailure>,

    /// Links that rendered fine but yielded no record (missing fields)
    pub empty: u64,
}

/// Outcome of one spawned fetch task
enum TaskOutcome {
    Fetched(Option<crate::extract::ImageRecord>),
    Failed(FetchError),
    PoolClosed,
}

/// Executes detail-page fetches under a bounded concurrency limit
///
/// The engine holds no per-run state; one instance may drive any number of
/// batches sequentially or concurrently.
#[derive(Debug, Clone)]
pub struct FetchEngine {
    max_workers: usize,
}

impl FetchEngine {
    /// Creates an engine with the given worker pool size
    ///
    /// A non-positive size falls back to the default of
    /// [`DEFAULT_MAX_WORKERS`]; the config boundary already guards this, so
    /// hitting the fallback here means the engine was constructed directly
    /// with a bad value.
    pub fn new(max_workers: usize) -> Self {
        let max_workers = if max_workers == 0 {
            tracing::warn!(
                "max_workers must be positive, falling back to {}",
                DEFAULT_MAX_WORKERS
            );
            DEFAULT_MAX_WORKERS
        } else {
            max_workers
        };

        Self { max_workers }
    }

    /// The effective worker pool size
    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Fetches every link and returns the records of the successful ones
    ///
    /// See [`FetchEngine::run_report`] for the full accounting variant.
    pub async fn run<S>(
        &self,
        links: &[String],
        scraper: Arc<S>,
    ) -> Result<ResultCollection, EngineError>
    where
        S: ImageScraper + ?Sized + 'static,
    {
        Ok(self.run_report(links, scraper).await?.records)
    }

    /// Fetches every link, returning records plus failure accounting
    ///
    /// Submits one task per link; at most `max_workers` tasks hold a permit
    /// at any moment. As each task completes, in whatever order, its result
    /// is inspected: a record is appended, a missing-fields outcome is
    /// counted, and a failure is logged with the offending link and excluded.
    /// The pool drains every submitted task before returning; individual
    /// tasks are never cancelled.
    ///
    /// # Errors
    ///
    /// [`EngineError::PoolClosed`] when the worker pool itself breaks. Per-link
    /// failures never surface as errors.
    pub async fn run_report<S>(
        &self,
        links: &[String],
        scraper: Arc<S>,
    ) -> Result<EngineReport, EngineError>
    where
        S: ImageScraper + ?Sized + 'static,
    {
        let mut report = EngineReport::default();

        // Empty input: no tasks, no permits, no log lines
        if links.is_empty() {
            return Ok(report);
        }

        let semaphore = Arc::new(Semaphore::new(self.max_workers));
        let mut tasks: JoinSet<(String, TaskOutcome)> = JoinSet::new();
        let mut task_links: HashMap<tokio::task::Id, String> = HashMap::new();

        for link in links {
            let semaphore = Arc::clone(&semaphore);
            let scraper = Arc::clone(&scraper);
            let task_link = link.clone();

            let handle = tasks.spawn(async move {
                // The permit is acquired inside the task and released when the
                // task ends, on every exit path
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return (task_link, TaskOutcome::PoolClosed),
                };

                match scraper.fetch_img_details(&task_link).await {
                    Ok(record) => (task_link, TaskOutcome::Fetched(record)),
                    Err(e) => (task_link, TaskOutcome::Failed(e)),
                }
            });
            task_links.insert(handle.id(), link.clone());
        }

        let mut fatal: Option<EngineError> = None;

        // Single completion-collecting loop; appends are serialized here, so
        // the result vector needs no locking
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((id, (link, outcome))) => {
                    task_links.remove(&id);
                    match outcome {
                        TaskOutcome::Fetched(Some(record)) => report.records.push(record),
                        TaskOutcome::Fetched(None) => {
                            tracing::debug!("No record extracted from {}", link);
                            report.empty += 1;
                        }
                        TaskOutcome::Failed(e) => {
                            let phase = FetchPhase::from_error(&e);
                            tracing::error!("Error processing {}: {}", link, e);
                            report.failures.push(FetchFailure { link, phase });
                        }
                        TaskOutcome::PoolClosed => {
                            fatal = Some(EngineError::PoolClosed(format!(
                                "semaphore closed while fetching {}",
                                link
                            )));
                        }
                    }
                }
                Err(join_err) => {
                    // A panicked task is isolated like any other failure
                    let link = task_links
                        .remove(&join_err.id())
                        .unwrap_or_else(|| "<unknown>".to_string());
                    tracing::error!("Error processing {}: task panicked: {}", link, join_err);
                    report.failures.push(FetchFailure {
                        link,
                        phase: FetchPhase::RenderFailed,
                    });
                }
            }
        }

        // The pool drained to completion; only now does a pool-level fault
        // propagate
        if let Some(e) = fatal {
            return Err(e);
        }

        Ok(report)
    }
}
