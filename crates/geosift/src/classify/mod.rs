//! Assay-type classification flow.

mod classifier;
mod label;

pub use classifier::{
    ClassificationOutcome, Classifier, ClassifyConfig, DEFAULT_CLASSIFY_BATCH_SIZE,
    DEFAULT_LABEL_COLUMN,
};
pub use label::AssayType;
