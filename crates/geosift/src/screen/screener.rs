//! Batch screening of datasets against user criteria.

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexSet;
use serde::Serialize;
use tracing::{info, warn};

use super::criteria::ScreeningCriteria;
use crate::batch::{BatchReport, BatchRunner, RetryPolicy};
use crate::error::{GeoSiftError, Result};
use crate::input::DataTable;
use crate::llm::{parse_json_response, prompts, LlmProvider, ScreeningReply};
use crate::merge;
use crate::reference::ReferenceSource;
use crate::schema::{ColumnRole, ColumnRoles};
use crate::summary;

/// Default rows per completion call.
pub const DEFAULT_SCREEN_BATCH_SIZE: usize = 500;

/// Configuration for screening runs.
#[derive(Debug, Clone)]
pub struct ScreenConfig {
    /// Rows per completion call.
    pub batch_size: usize,
    /// Per-batch retry policy.
    pub retry: RetryPolicy,
    /// Log per-batch progress.
    pub verbose: bool,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_SCREEN_BATCH_SIZE,
            retry: RetryPolicy::default(),
            verbose: false,
        }
    }
}

/// How a screening run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreeningStatus {
    /// No criteria were given; the input came back unfiltered.
    NoCriteria,
    /// The model selected nothing; the result has headers only.
    NoMatches,
    /// At least one dataset was selected.
    Matched,
}

/// Result of screening a table.
#[derive(Debug, Clone)]
pub struct ScreeningOutcome {
    /// Selected rows, deduplicated, sorted and with role columns first.
    pub table: DataTable,
    /// Identifiers accepted from the model, in first-seen order.
    pub selected_ids: IndexSet<String>,
    /// Column roles used for the run.
    pub roles: ColumnRoles,
    /// Batch bookkeeping; `None` when no call was made.
    pub report: Option<BatchReport>,
    pub status: ScreeningStatus,
}

/// Filters dataset rows down to those matching [`ScreeningCriteria`].
pub struct Screener {
    provider: Arc<dyn LlmProvider>,
    config: ScreenConfig,
}

impl Screener {
    /// Create a screener with default configuration.
    pub fn new(provider: impl LlmProvider + 'static) -> Self {
        Self::with_config(provider, ScreenConfig::default())
    }

    /// Create a screener with custom configuration.
    pub fn with_config(provider: impl LlmProvider + 'static, config: ScreenConfig) -> Self {
        Self {
            provider: Arc::new(provider),
            config,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    /// Screen the reference table provided by `source`.
    pub fn screen_reference(
        &self,
        source: &dyn ReferenceSource,
        criteria: &ScreeningCriteria,
    ) -> Result<ScreeningOutcome> {
        info!(reference = %source.describe(), "screening reference table");
        let table = source.load()?;
        self.screen(&table, criteria)
    }

    /// Select the rows of `table` that satisfy `criteria`.
    ///
    /// With empty criteria the table is returned unchanged and no call is
    /// made. When nothing is selected the result keeps the input headers
    /// and has no rows.
    pub fn screen(
        &self,
        table: &DataTable,
        criteria: &ScreeningCriteria,
    ) -> Result<ScreeningOutcome> {
        let roles = ColumnRoles::resolve(table);

        if criteria.is_empty() {
            warn!("no screening criteria given, returning the full table");
            return Ok(ScreeningOutcome {
                table: table.clone(),
                selected_ids: IndexSet::new(),
                roles,
                report: None,
                status: ScreeningStatus::NoCriteria,
            });
        }

        if table.is_empty() {
            return Err(GeoSiftError::EmptyData(
                "Input table has no rows to screen".to_string(),
            ));
        }
        if self.config.batch_size == 0 {
            return Err(GeoSiftError::Config(
                "batch_size must be at least 1".to_string(),
            ));
        }

        let id_column = roles.require(ColumnRole::Id, table)?.to_string();
        if roles.get(ColumnRole::Description).is_none() {
            warn!(
                columns = %table.headers.join(", "),
                "no description column found, screening on identifiers and tags only"
            );
        }

        let criteria_text = criteria.to_prompt_string();
        info!(
            rows = table.row_count(),
            batch_size = self.config.batch_size,
            model = %self.provider.config().model,
            criteria = %criteria_text.replace('\n', "; "),
            "screening datasets"
        );

        let runner = BatchRunner::new(self.provider.as_ref())
            .with_policy(self.config.retry)
            .with_verbose(self.config.verbose);

        let outcome = runner.run(
            table.row_count(),
            self.config.batch_size,
            |rows| {
                prompts::screening_prompt(
                    &criteria_text,
                    &summary::summarize_rows(table, rows, &roles),
                )
            },
            parse_json_response::<ScreeningReply>,
        )?;

        let id_idx = table.column_index(&id_column);
        let mut selected_ids = IndexSet::new();
        for batch in &outcome.batches {
            let batch_ids: HashSet<&str> = batch
                .rows
                .clone()
                .filter_map(|r| id_idx.and_then(|i| table.get(r, i)))
                .map(str::trim)
                .collect();

            for id in &batch.value.selected_ids {
                if batch_ids.contains(id.as_str()) {
                    selected_ids.insert(id.clone());
                } else {
                    warn!(id = %id, batch = batch.index + 1, "ignoring selected id not in batch");
                }
            }
        }

        if selected_ids.is_empty() {
            warn!(
                failed_batches = outcome.report.failed_batches.len(),
                "no datasets matched the screening criteria"
            );
            return Ok(ScreeningOutcome {
                table: table.empty_like(),
                selected_ids,
                roles,
                report: Some(outcome.report),
                status: ScreeningStatus::NoMatches,
            });
        }

        let mut result = merge::select_rows(table, &id_column, &selected_ids);
        result = merge::dedupe_by_column(&result, &id_column);
        if let Some(sample_column) = roles.get(ColumnRole::SampleSize) {
            result = merge::sort_by_sample_size(&result, sample_column);
        }
        result = merge::reorder_columns(&result, &roles);

        info!(
            selected = result.row_count(),
            rows = table.row_count(),
            failed_batches = outcome.report.failed_batches.len(),
            "screening finished"
        );

        Ok(ScreeningOutcome {
            table: result,
            selected_ids,
            roles,
            report: Some(outcome.report),
            status: ScreeningStatus::Matched,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{MockProvider, MockReply};

    fn quick_config(batch_size: usize) -> ScreenConfig {
        ScreenConfig {
            batch_size,
            retry: RetryPolicy::without_backoff(),
            ..Default::default()
        }
    }

    fn table() -> DataTable {
        DataTable::from_strs(
            &["title", "gse", "n_samples"],
            &[
                &["liver tumour scRNA", "GSE1", "8"],
                &["breast array", "GSE2", "30"],
                &["HCC bulk", "GSE3", "40"],
            ],
        )
    }

    #[test]
    fn test_default_config() {
        let config = ScreenConfig::default();
        assert_eq!(config.batch_size, 500);
        assert_eq!(config.retry, RetryPolicy::default());
    }

    #[test]
    fn test_no_criteria_returns_input_without_calls() {
        let provider = Arc::new(MockProvider::new());
        let screener = Screener::new(Arc::clone(&provider));

        let outcome = screener.screen(&table(), &ScreeningCriteria::new()).unwrap();

        assert_eq!(outcome.status, ScreeningStatus::NoCriteria);
        assert_eq!(outcome.table, table());
        assert!(outcome.report.is_none());
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_selection_sorted_and_reordered() {
        let provider = MockProvider::scripted(vec![MockReply::text(
            r#"{"selected_ids":["GSE1","GSE3"]}"#,
        )]);
        let screener = Screener::with_config(provider, quick_config(10));
        let criteria = ScreeningCriteria::new().with_disease("Liver Cancer");

        let outcome = screener.screen(&table(), &criteria).unwrap();

        assert_eq!(outcome.status, ScreeningStatus::Matched);
        assert_eq!(outcome.table.headers, vec!["gse", "n_samples", "title"]);
        assert_eq!(outcome.table.column_by_name("gse").unwrap(), vec!["GSE3", "GSE1"]);
    }

    #[test]
    fn test_nothing_selected_keeps_headers() {
        let provider = MockProvider::scripted(vec![MockReply::text(r#"{"selected_ids":[]}"#)]);
        let screener = Screener::with_config(provider, quick_config(10));
        let criteria = ScreeningCriteria::new().with_species("Danio rerio");

        let outcome = screener.screen(&table(), &criteria).unwrap();

        assert_eq!(outcome.status, ScreeningStatus::NoMatches);
        assert_eq!(outcome.table.headers, table().headers);
        assert!(outcome.table.is_empty());
    }

    #[test]
    fn test_screen_reference_uses_injected_table() {
        let provider = MockProvider::new();
        let screener = Screener::with_config(provider, quick_config(2));
        let criteria = ScreeningCriteria::new().with_extra("anything");

        let outcome = screener.screen_reference(&table(), &criteria).unwrap();

        assert_eq!(outcome.table.row_count(), 3);
        assert_eq!(outcome.report.unwrap().total_batches, 2);
    }
}
