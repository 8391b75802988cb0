//! Main GeoSift struct and public API.

use std::path::Path;

use crate::classify::{ClassificationOutcome, Classifier, ClassifyConfig};
use crate::error::Result;
use crate::input::{DataTable, Parser, ParserConfig, SourceMetadata};
use crate::llm::{LlmConfig, OpenAIProvider};
use crate::reference::ReferenceSource;
use crate::screen::{ScreenConfig, Screener, ScreeningCriteria, ScreeningOutcome};

/// Configuration for a GeoSift session.
#[derive(Debug, Clone, Default)]
pub struct GeoSiftConfig {
    /// Completion service settings.
    pub llm: LlmConfig,
    /// Classification settings.
    pub classify: ClassifyConfig,
    /// Screening settings.
    pub screen: ScreenConfig,
    /// Parser configuration for file inputs.
    pub parser: ParserConfig,
}

impl GeoSiftConfig {
    /// Defaults with the LLM settings taken from the environment.
    pub fn from_env() -> Self {
        Self {
            llm: LlmConfig::from_env(),
            ..Default::default()
        }
    }

    /// Set `verbose` on both flows.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.classify.verbose = verbose;
        self.screen.verbose = verbose;
        self
    }
}

/// Entry point that owns configuration and builds one provider per call.
///
/// # Example
///
/// ```no_run
/// use geosift::{GeoSift, GeoSiftConfig, ScreeningCriteria};
///
/// let geosift = GeoSift::with_config(GeoSiftConfig::from_env());
/// let (outcome, _source) = geosift
///     .screen_file(
///         "geo_series.tsv",
///         &ScreeningCriteria::new().with_disease("Liver Cancer"),
///     )
///     .unwrap();
/// println!("{} datasets selected", outcome.table.row_count());
/// ```
pub struct GeoSift {
    config: GeoSiftConfig,
}

impl GeoSift {
    /// Create an instance with default configuration.
    pub fn new() -> Self {
        Self::with_config(GeoSiftConfig::default())
    }

    /// Create an instance with custom configuration.
    pub fn with_config(config: GeoSiftConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &GeoSiftConfig {
        &self.config
    }

    /// Load a CSV/TSV file.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        Parser::with_config(self.config.parser.clone()).parse_file(path)
    }

    /// Classify an in-memory table.
    ///
    /// The provider is built first, so a missing credential fails before
    /// anything else happens.
    pub fn classify_table(&self, table: &DataTable) -> Result<ClassificationOutcome> {
        let provider = OpenAIProvider::with_config(self.config.llm.clone())?;
        Classifier::with_config(provider, self.config.classify.clone()).classify(table)
    }

    /// Screen an in-memory table.
    pub fn screen_table(
        &self,
        table: &DataTable,
        criteria: &ScreeningCriteria,
    ) -> Result<ScreeningOutcome> {
        let provider = OpenAIProvider::with_config(self.config.llm.clone())?;
        Screener::with_config(provider, self.config.screen.clone()).screen(table, criteria)
    }

    /// Screen the reference table.
    pub fn screen_reference(
        &self,
        source: &dyn ReferenceSource,
        criteria: &ScreeningCriteria,
    ) -> Result<ScreeningOutcome> {
        let provider = OpenAIProvider::with_config(self.config.llm.clone())?;
        Screener::with_config(provider, self.config.screen.clone())
            .screen_reference(source, criteria)
    }

    /// Load and classify a file.
    pub fn classify_file(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<(ClassificationOutcome, SourceMetadata)> {
        let (table, source) = self.load(path)?;
        Ok((self.classify_table(&table)?, source))
    }

    /// Load and screen a file.
    pub fn screen_file(
        &self,
        path: impl AsRef<Path>,
        criteria: &ScreeningCriteria,
    ) -> Result<(ScreeningOutcome, SourceMetadata)> {
        let (table, source) = self.load(path)?;
        Ok((self.screen_table(&table, criteria)?, source))
    }
}

impl Default for GeoSift {
    fn default() -> Self {
        Self::new()
    }
}
