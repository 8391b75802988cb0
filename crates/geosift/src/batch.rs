//! Sequential batch execution with bounded retry.
//!
//! Rows are cut into contiguous batches. Each batch is one prompt and one
//! completion call. A batch moves `PENDING -> SUCCESS` on its first good
//! reply, or through up to `max_attempts - 1` retries (fixed backoff) before
//! giving up. Parse failures count against the same attempt budget as
//! transport failures. A batch that gives up contributes nothing, and the
//! run moves on to the next batch.

use std::ops::Range;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{GeoSiftError, Result};
use crate::llm::LlmProvider;

/// Retry settings for one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per batch, first call included.
    pub max_attempts: u32,
    /// Fixed pause between attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Create a policy.
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Default attempts with no pause between them.
    pub fn without_backoff() -> Self {
        Self {
            backoff: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Parsed reply of one successful batch.
#[derive(Debug, Clone)]
pub struct BatchResult<T> {
    /// Zero-based batch number.
    pub index: usize,
    /// Rows of the input table covered by this batch.
    pub rows: Range<usize>,
    /// Parsed reply.
    pub value: T,
}

/// Bookkeeping for a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Number of batches attempted.
    pub total_batches: usize,
    /// Batches that produced a parsed reply.
    pub succeeded: usize,
    /// Indices of batches that exhausted their attempts.
    pub failed_batches: Vec<usize>,
    /// Completion calls made, retries included.
    pub calls: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchReport {
    /// Whether every batch succeeded.
    pub fn is_complete(&self) -> bool {
        self.failed_batches.is_empty()
    }
}

/// Results of a run: successful batches in order plus the report.
#[derive(Debug, Clone)]
pub struct BatchOutcome<T> {
    pub batches: Vec<BatchResult<T>>,
    pub report: BatchReport,
}

/// Split `row_count` rows into consecutive ranges of at most `batch_size`.
pub fn batch_ranges(row_count: usize, batch_size: usize) -> Result<Vec<Range<usize>>> {
    if batch_size == 0 {
        return Err(GeoSiftError::Config(
            "batch_size must be at least 1".to_string(),
        ));
    }
    Ok((0..row_count)
        .step_by(batch_size)
        .map(|start| start..(start + batch_size).min(row_count))
        .collect())
}

/// Runs batches against one provider, strictly in order.
pub struct BatchRunner<'a> {
    provider: &'a dyn LlmProvider,
    policy: RetryPolicy,
    verbose: bool,
}

impl<'a> BatchRunner<'a> {
    /// Create a runner with the default retry policy.
    pub fn new(provider: &'a dyn LlmProvider) -> Self {
        Self {
            provider,
            policy: RetryPolicy::default(),
            verbose: false,
        }
    }

    /// Override the retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Emit per-batch progress at info level.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Run every batch.
    ///
    /// `prompt_for` builds the prompt for a row range; `parse` turns the raw
    /// reply into a value. The only error returned is a zero batch size;
    /// remote and parse failures are absorbed per batch.
    pub fn run<T, P, F>(
        &self,
        row_count: usize,
        batch_size: usize,
        mut prompt_for: P,
        mut parse: F,
    ) -> Result<BatchOutcome<T>>
    where
        P: FnMut(Range<usize>) -> String,
        F: FnMut(&str) -> Result<T>,
    {
        let ranges = batch_ranges(row_count, batch_size)?;
        let total = ranges.len();
        let started_at = Utc::now();

        let mut batches = Vec::new();
        let mut failed_batches = Vec::new();
        let mut calls = 0;

        for (index, rows) in ranges.into_iter().enumerate() {
            if self.verbose {
                info!(
                    batch = index + 1,
                    total,
                    rows = rows.len(),
                    provider = self.provider.name(),
                    "processing batch"
                );
            }

            let prompt = prompt_for(rows.clone());
            let mut attempt = 0;
            let value = loop {
                attempt += 1;
                calls += 1;
                debug!(batch = index + 1, attempt, "calling completion service");

                match self.provider.complete_json(&prompt).and_then(|raw| parse(&raw)) {
                    Ok(value) => break Some(value),
                    Err(e) if attempt < self.policy.max_attempts => {
                        warn!(
                            batch = index + 1,
                            attempt,
                            max_attempts = self.policy.max_attempts,
                            error = %e,
                            "batch attempt failed, retrying"
                        );
                        if !self.policy.backoff.is_zero() {
                            thread::sleep(self.policy.backoff);
                        }
                    }
                    Err(e) => {
                        warn!(
                            batch = index + 1,
                            attempts = attempt,
                            error = %e,
                            "batch gave up, skipping its rows"
                        );
                        break None;
                    }
                }
            };

            match value {
                Some(value) => batches.push(BatchResult { index, rows, value }),
                None => failed_batches.push(index),
            }
        }

        let report = BatchReport {
            total_batches: total,
            succeeded: batches.len(),
            failed_batches,
            calls,
            started_at,
            finished_at: Utc::now(),
        };

        Ok(BatchOutcome { batches, report })
    }
}
