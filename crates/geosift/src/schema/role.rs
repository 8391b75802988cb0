//! Logical column roles and the keyword lists used to find them.

use serde::{Deserialize, Serialize};

/// Logical role a column plays in a GEO metadata table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    /// Dataset accession (e.g., GSE12345).
    Id,
    /// Title, summary, or free-text description.
    Description,
    /// Sequencing or array platform (e.g., GPL570).
    Platform,
    /// Organism.
    Species,
    /// Submitter-declared data or experiment type.
    DataType,
    /// Disease or condition studied.
    Disease,
    /// Number of samples in the series.
    SampleSize,
}

impl ColumnRole {
    /// Resolution order.
    pub const RESOLUTION_ORDER: [ColumnRole; 7] = [
        ColumnRole::Id,
        ColumnRole::Description,
        ColumnRole::Platform,
        ColumnRole::Species,
        ColumnRole::DataType,
        ColumnRole::Disease,
        ColumnRole::SampleSize,
    ];

    /// Order in which role columns lead a screening result.
    pub const OUTPUT_ORDER: [ColumnRole; 6] = [
        ColumnRole::Id,
        ColumnRole::Species,
        ColumnRole::DataType,
        ColumnRole::Disease,
        ColumnRole::SampleSize,
        ColumnRole::Description,
    ];

    /// Case-insensitive keywords, highest priority first.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            ColumnRole::Id => &[
                "accession", "gse", "series", "geo_id", "dataset_id", "id", "编号", "登录号",
            ],
            ColumnRole::Description => &[
                "summary", "description", "abstract", "title", "desc", "摘要", "描述", "标题",
            ],
            ColumnRole::Platform => &["platform", "gpl", "technology", "平台", "技术"],
            ColumnRole::Species => &["species", "organism", "taxon", "物种", "种属"],
            ColumnRole::DataType => &[
                "data_type",
                "datatype",
                "experiment_type",
                "assay",
                "type",
                "数据类型",
                "类型",
            ],
            ColumnRole::Disease => &["disease", "condition", "phenotype", "疾病", "病种"],
            ColumnRole::SampleSize => &[
                "sample_count",
                "samples",
                "n_samples",
                "sample_size",
                "sample",
                "count",
                "样本数",
                "样本量",
                "样本",
            ],
        }
    }

    /// Short name used in logs and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnRole::Id => "id",
            ColumnRole::Description => "description",
            ColumnRole::Platform => "platform",
            ColumnRole::Species => "species",
            ColumnRole::DataType => "data_type",
            ColumnRole::Disease => "disease",
            ColumnRole::SampleSize => "sample_size",
        }
    }
}

impl std::fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
