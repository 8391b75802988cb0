//! Batch classification of datasets into assay types.

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{info, warn};

use super::label::AssayType;
use crate::batch::{BatchReport, BatchRunner, RetryPolicy};
use crate::error::{GeoSiftError, Result};
use crate::input::DataTable;
use crate::llm::{parse_json_response, prompts, ClassificationReply, LlmProvider};
use crate::merge;
use crate::schema::{ColumnRole, ColumnRoles};
use crate::summary;

/// Default rows per completion call.
pub const DEFAULT_CLASSIFY_BATCH_SIZE: usize = 50;
/// Default name of the added category column.
pub const DEFAULT_LABEL_COLUMN: &str = "data_type_llm";

/// Configuration for classification runs.
#[derive(Debug, Clone)]
pub struct ClassifyConfig {
    /// Rows per completion call.
    pub batch_size: usize,
    /// Name of the category column added to the output.
    pub label_column: String,
    /// Per-batch retry policy.
    pub retry: RetryPolicy,
    /// Log per-batch progress.
    pub verbose: bool,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_CLASSIFY_BATCH_SIZE,
            label_column: DEFAULT_LABEL_COLUMN.to_string(),
            retry: RetryPolicy::default(),
            verbose: false,
        }
    }
}

/// Result of classifying a table.
#[derive(Debug, Clone)]
pub struct ClassificationOutcome {
    /// Input table plus the category column, same rows in the same order.
    pub table: DataTable,
    /// Label per identifier, as accepted from the model.
    pub labels: IndexMap<String, AssayType>,
    /// Column roles used for the run.
    pub roles: ColumnRoles,
    /// Batch bookkeeping.
    pub report: BatchReport,
}

impl ClassificationOutcome {
    /// Row count per label, including `Unknown`, in taxonomy order.
    pub fn counts(&self, label_column: &str) -> IndexMap<AssayType, usize> {
        let mut counts: IndexMap<AssayType, usize> = AssayType::CATEGORIES
            .iter()
            .chain(std::iter::once(&AssayType::Unknown))
            .map(|t| (*t, 0))
            .collect();
        if let Some(values) = self.table.column_by_name(label_column) {
            for t in values.into_iter().filter_map(AssayType::from_label) {
                *counts.entry(t).or_insert(0) += 1;
            }
        }
        counts
    }
}

/// Classifies dataset rows into [`AssayType`] categories.
pub struct Classifier {
    provider: Arc<dyn LlmProvider>,
    config: ClassifyConfig,
}

impl Classifier {
    /// Create a classifier with default configuration.
    pub fn new(provider: impl LlmProvider + 'static) -> Self {
        Self::with_config(provider, ClassifyConfig::default())
    }

    /// Create a classifier with custom configuration.
    pub fn with_config(provider: impl LlmProvider + 'static, config: ClassifyConfig) -> Self {
        Self {
            provider: Arc::new(provider),
            config,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ClassifyConfig {
        &self.config
    }

    /// Label every row of `table`.
    ///
    /// Fails before any remote call if the table is empty, the batch size is
    /// zero, or no description column can be found. Batches that exhaust
    /// their retries leave their rows labelled `Unknown`.
    pub fn classify(&self, table: &DataTable) -> Result<ClassificationOutcome> {
        if table.is_empty() {
            return Err(GeoSiftError::EmptyData(
                "Input table has no rows to classify".to_string(),
            ));
        }
        if self.config.batch_size == 0 {
            return Err(GeoSiftError::Config(
                "batch_size must be at least 1".to_string(),
            ));
        }

        let roles = ColumnRoles::resolve(table);
        let id_column = roles.require(ColumnRole::Id, table)?.to_string();
        roles.require(ColumnRole::Description, table)?;

        info!(
            rows = table.row_count(),
            batch_size = self.config.batch_size,
            model = %self.provider.config().model,
            id_column = %id_column,
            "classifying datasets"
        );

        let runner = BatchRunner::new(self.provider.as_ref())
            .with_policy(self.config.retry)
            .with_verbose(self.config.verbose);

        let outcome = runner.run(
            table.row_count(),
            self.config.batch_size,
            |rows| prompts::classification_prompt(&summary::summarize_rows(table, rows, &roles)),
            parse_json_response::<ClassificationReply>,
        )?;

        let id_idx = table.column_index(&id_column);
        let mut labels = IndexMap::new();
        for batch in &outcome.batches {
            let batch_ids: HashSet<&str> = batch
                .rows
                .clone()
                .filter_map(|r| id_idx.and_then(|i| table.get(r, i)))
                .map(str::trim)
                .collect();

            for entry in &batch.value.classifications {
                if batch_ids.contains(entry.id.as_str()) {
                    labels.insert(entry.id.clone(), entry.assay_type);
                } else {
                    warn!(id = %entry.id, batch = batch.index + 1, "ignoring label for id not in batch");
                }
            }
        }

        let labelled =
            merge::apply_classifications(table, &id_column, &labels, &self.config.label_column);

        info!(
            labelled = labels.len(),
            rows = table.row_count(),
            failed_batches = outcome.report.failed_batches.len(),
            "classification finished"
        );

        Ok(ClassificationOutcome {
            table: labelled,
            labels,
            roles,
            report: outcome.report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{MockProvider, MockReply};

    fn quick_config(batch_size: usize) -> ClassifyConfig {
        ClassifyConfig {
            batch_size,
            retry: RetryPolicy::without_backoff(),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = ClassifyConfig::default();
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.label_column, "data_type_llm");
        assert_eq!(config.retry, RetryPolicy::default());
    }

    #[test]
    fn test_empty_table_rejected_before_calls() {
        let provider = Arc::new(MockProvider::new());
        let classifier = Classifier::new(Arc::clone(&provider));
        let table = DataTable::from_strs(&["gse", "title"], &[]);

        assert!(matches!(
            classifier.classify(&table),
            Err(GeoSiftError::EmptyData(_))
        ));
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_missing_description_rejected_before_calls() {
        let provider = Arc::new(MockProvider::new());
        let classifier = Classifier::new(Arc::clone(&provider));
        let table = DataTable::from_strs(&["gse", "n"], &[&["GSE1", "3"]]);

        assert!(matches!(
            classifier.classify(&table),
            Err(GeoSiftError::MissingColumn { .. })
        ));
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_ids_outside_batch_are_ignored() {
        let provider = MockProvider::scripted(vec![
            MockReply::text(r#"{"classifications":[{"id":"GSE1","type":"scRNA-seq"},{"id":"GSE2","type":"Microarray"}]}"#),
            MockReply::text(r#"{"classifications":[{"id":"GSE2","type":"Other"}]}"#),
        ]);
        let classifier = Classifier::with_config(provider, quick_config(1));
        let table = DataTable::from_strs(&["gse", "title"], &[&["GSE1", "a"], &["GSE2", "b"]]);

        let outcome = classifier.classify(&table).unwrap();

        assert_eq!(outcome.labels.get("GSE1"), Some(&AssayType::ScRnaSeq));
        assert_eq!(outcome.labels.get("GSE2"), Some(&AssayType::Other));
        assert_eq!(
            outcome.table.column_by_name(DEFAULT_LABEL_COLUMN).unwrap(),
            vec!["scRNA-seq", "Other"]
        );
    }

    #[test]
    fn test_counts_include_unknown() {
        let provider = MockProvider::scripted(vec![MockReply::text(
            r#"{"classifications":[{"id":"GSE1","type":"Microarray"}]}"#,
        )]);
        let classifier = Classifier::with_config(provider, quick_config(10));
        let table = DataTable::from_strs(&["gse", "title"], &[&["GSE1", "a"], &["GSE2", "b"]]);

        let outcome = classifier.classify(&table).unwrap();
        let counts = outcome.counts(DEFAULT_LABEL_COLUMN);

        assert_eq!(counts[&AssayType::Microarray], 1);
        assert_eq!(counts[&AssayType::Unknown], 1);
        assert_eq!(counts[&AssayType::ScRnaSeq], 0);
    }
}
