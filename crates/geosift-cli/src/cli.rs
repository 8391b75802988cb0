//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use geosift::classify::{DEFAULT_CLASSIFY_BATCH_SIZE, DEFAULT_LABEL_COLUMN};
use geosift::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use geosift::screen::DEFAULT_SCREEN_BATCH_SIZE;
use geosift::{LlmConfig, OutputFormat};
use std::path::PathBuf;

/// GeoSift: LLM-assisted classification and screening of GEO metadata
#[derive(Parser)]
#[command(name = "geosift")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Label every dataset with its assay type
    Classify {
        /// Path to the metadata table (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Name of the added category column
        #[arg(long, default_value = DEFAULT_LABEL_COLUMN)]
        label_column: String,

        /// Rows per completion call
        #[arg(short, long, default_value_t = DEFAULT_CLASSIFY_BATCH_SIZE)]
        batch_size: usize,

        #[command(flatten)]
        llm: LlmArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Select the datasets that match screening criteria
    Screen {
        /// Path to the metadata table (default: the reference table)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Reference table used when no FILE is given
        #[arg(long, env = "GEOSIFT_REFERENCE")]
        reference: Option<PathBuf>,

        /// Disease or condition (e.g., "Liver Cancer")
        #[arg(long)]
        disease: Option<String>,

        /// Organism (e.g., "Homo sapiens")
        #[arg(long)]
        species: Option<String>,

        /// Platform or technology (e.g., "10x Genomics")
        #[arg(long)]
        platform: Option<String>,

        /// Assay type (e.g., "scRNA-seq")
        #[arg(long)]
        data_type: Option<String>,

        /// Minimum number of samples
        #[arg(long)]
        min_samples: Option<u64>,

        /// Free-form requirements passed to the model verbatim
        #[arg(short, long)]
        criteria: Option<String>,

        /// Rows per completion call
        #[arg(short, long, default_value_t = DEFAULT_SCREEN_BATCH_SIZE)]
        batch_size: usize,

        #[command(flatten)]
        llm: LlmArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show which column was picked for each role
    Columns {
        /// Path to the metadata table (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Completion service options shared by the model-backed commands.
#[derive(Args, Clone, Debug)]
pub struct LlmArgs {
    /// API key for the completion service
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model name
    #[arg(long, env = "GEOSIFT_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "GEOSIFT_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "120")]
    pub timeout: u64,
}

impl LlmArgs {
    pub fn to_config(&self) -> LlmConfig {
        let mut config = LlmConfig::default()
            .with_model(&self.model)
            .with_base_url(&self.base_url)
            .with_timeout_secs(self.timeout);
        if let Some(key) = &self.api_key {
            config = config.with_api_key(key);
        }
        config
    }
}

/// Where and how to write the result table.
#[derive(Args, Clone, Debug)]
pub struct OutputArgs {
    /// Output path (default: derived from the input name)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "tsv")]
    pub format: OutputFormat,
}

impl OutputArgs {
    /// The explicit path, or `<stem>_<suffix>.<ext>` next to `input`.
    pub fn resolve(&self, input: Option<&PathBuf>, suffix: &str) -> PathBuf {
        if let Some(path) = &self.output {
            return path.clone();
        }
        let ext = self.format.extension();
        match input {
            Some(file) => {
                let stem = file.file_stem().unwrap_or_default().to_string_lossy();
                file.with_file_name(format!("{}_{}.{}", stem, suffix, ext))
            }
            None => PathBuf::from(format!("{}.{}", suffix, ext)),
        }
    }
}
