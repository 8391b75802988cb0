//! Closed taxonomy of assay types.

use serde::{Deserialize, Serialize};

/// Assay category assigned to a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssayType {
    /// Single-cell or single-nucleus RNA sequencing.
    #[serde(rename = "scRNA-seq")]
    ScRnaSeq,
    /// Spatially resolved transcriptomics.
    #[serde(rename = "stRNA-seq")]
    StRnaSeq,
    /// Bulk (tissue or population level) RNA sequencing.
    #[serde(rename = "Bulk RNA-seq")]
    BulkRnaSeq,
    /// Expression arrays.
    Microarray,
    /// Anything else.
    Other,
    /// No label came back for this dataset. Never accepted from the model.
    #[serde(skip_deserializing)]
    Unknown,
}

impl AssayType {
    /// Categories the model may choose from, in prompt order.
    pub const CATEGORIES: [AssayType; 5] = [
        AssayType::ScRnaSeq,
        AssayType::StRnaSeq,
        AssayType::BulkRnaSeq,
        AssayType::Microarray,
        AssayType::Other,
    ];

    /// Label written to the output column.
    pub fn label(&self) -> &'static str {
        match self {
            AssayType::ScRnaSeq => "scRNA-seq",
            AssayType::StRnaSeq => "stRNA-seq",
            AssayType::BulkRnaSeq => "Bulk RNA-seq",
            AssayType::Microarray => "Microarray",
            AssayType::Other => "Other",
            AssayType::Unknown => "Unknown",
        }
    }

    /// Parse an output-column label back into a type.
    pub fn from_label(label: &str) -> Option<AssayType> {
        AssayType::CATEGORIES
            .into_iter()
            .chain(std::iter::once(AssayType::Unknown))
            .find(|t| t.label() == label.trim())
    }

    /// Definition shown to the model.
    pub fn definition(&self) -> &'static str {
        match self {
            AssayType::ScRnaSeq => {
                "single-cell or single-nucleus RNA sequencing (10x Genomics/Chromium, \
                 Drop-seq, Smart-seq2, snRNA-seq, CITE-seq, scATAC+RNA multiome)"
            }
            AssayType::StRnaSeq => {
                "spatial transcriptomics (10x Visium, Slide-seq, Stereo-seq, MERFISH, \
                 seqFISH, GeoMx, spatially resolved RNA profiling)"
            }
            AssayType::BulkRnaSeq => {
                "bulk RNA sequencing of tissues, sorted populations or cell lines \
                 (RNA-seq, mRNA-seq, total RNA-seq, high throughput sequencing of expression)"
            }
            AssayType::Microarray => {
                "expression or methylation arrays (Affymetrix, Illumina BeadChip, Agilent, \
                 expression profiling by array)"
            }
            AssayType::Other => {
                "everything else: ChIP-seq, ATAC-seq, methylation sequencing, proteomics, \
                 small RNA, genotyping, or when the assay cannot be determined"
            }
            AssayType::Unknown => "no label returned",
        }
    }
}

impl std::fmt::Display for AssayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
