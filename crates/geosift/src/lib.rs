//! GeoSift: LLM-assisted classification and screening of GEO metadata tables.
//!
//! GeoSift batches the rows of a dataset metadata table, renders each row as
//! a compact line, and asks an OpenAI-compatible model either to label the
//! assay type of every dataset or to pick the datasets matching free-form
//! criteria. Replies are merged back into the original table.
//!
//! # Core Principles
//!
//! - **Non-destructive**: input tables are never modified; flows return copies
//! - **No fabricated rows**: every output identifier exists in the input
//! - **Graceful degradation**: a failed batch is retried, then skipped
//!
//! # Example
//!
//! ```no_run
//! use geosift::{GeoSift, GeoSiftConfig};
//!
//! let geosift = GeoSift::with_config(GeoSiftConfig::from_env());
//! let (outcome, _source) = geosift.classify_file("geo_series.tsv").unwrap();
//!
//! println!("Labelled: {}", outcome.labels.len());
//! println!("Failed batches: {:?}", outcome.report.failed_batches);
//! ```

pub mod batch;
pub mod classify;
pub mod error;
pub mod input;
pub mod llm;
pub mod merge;
pub mod reference;
pub mod schema;
pub mod screen;
pub mod summary;

mod geosift;

pub use crate::geosift::{GeoSift, GeoSiftConfig};
pub use batch::{BatchReport, BatchRunner, RetryPolicy};
pub use classify::{AssayType, ClassificationOutcome, Classifier, ClassifyConfig};
pub use error::{GeoSiftError, Result};
pub use input::{write_table, DataTable, OutputFormat, Parser, ParserConfig, SourceMetadata};
pub use llm::{LlmConfig, LlmProvider, MockProvider, MockReply, OpenAIProvider};
pub use reference::{CachedReference, FileReference, ReferenceSource};
pub use schema::{ColumnRole, ColumnRoles};
pub use screen::{ScreenConfig, Screener, ScreeningCriteria, ScreeningOutcome, ScreeningStatus};
