//! Screening criteria supplied by the user.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// What a dataset must satisfy to be selected.
///
/// Every field is optional. The fields are rendered into the prompt as
/// labelled lines; the model interprets them semantically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreeningCriteria {
    /// Disease or condition (e.g., "Liver Cancer").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disease: Option<String>,

    /// Organism (e.g., "Homo sapiens").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,

    /// Platform or technology (e.g., "10x Genomics", "GPL570").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,

    /// Assay or data type (e.g., "scRNA-seq").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,

    /// Minimum number of samples.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_samples: Option<u64>,

    /// Free-form requirements, passed through verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,

    /// Additional labelled requirements.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub custom: IndexMap<String, String>,
}

impl ScreeningCriteria {
    /// Create empty criteria.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a disease.
    pub fn with_disease(mut self, disease: impl Into<String>) -> Self {
        self.disease = Some(disease.into());
        self
    }

    /// Require a species.
    pub fn with_species(mut self, species: impl Into<String>) -> Self {
        self.species = Some(species.into());
        self
    }

    /// Require a platform.
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Require a data type.
    pub fn with_data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }

    /// Require a minimum sample count.
    pub fn with_min_samples(mut self, count: u64) -> Self {
        self.min_samples = Some(count);
        self
    }

    /// Add free-form requirements.
    pub fn with_extra(mut self, text: impl Into<String>) -> Self {
        self.extra = Some(text.into());
        self
    }

    /// Add a labelled requirement.
    pub fn with_custom(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom.insert(key.into(), value.into());
        self
    }

    /// True when no requirement carries any text.
    pub fn is_empty(&self) -> bool {
        let blank = |v: &Option<String>| v.as_deref().is_none_or(|s| s.trim().is_empty());
        blank(&self.disease)
            && blank(&self.species)
            && blank(&self.platform)
            && blank(&self.data_type)
            && self.min_samples.is_none()
            && blank(&self.extra)
            && self.custom.values().all(|v| v.trim().is_empty())
    }

    /// Format criteria as labelled lines for the prompt.
    pub fn to_prompt_string(&self) -> String {
        let mut parts = Vec::new();
        let mut push = |label: &str, value: &Option<String>| {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                parts.push(format!("- {}: {}", label, v));
            }
        };

        push("Disease", &self.disease);
        push("Species", &self.species);
        push("Platform", &self.platform);
        push("Data type", &self.data_type);
        if let Some(n) = self.min_samples {
            parts.push(format!("- Minimum sample size: {}", n));
        }
        for (key, value) in &self.custom {
            if !value.trim().is_empty() {
                parts.push(format!("- {}: {}", key, value.trim()));
            }
        }
        if let Some(extra) = self.extra.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            parts.push(format!("- Additional requirements: {}", extra));
        }

        parts.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_criteria_builder() {
        let criteria = ScreeningCriteria::new()
            .with_disease("Liver Cancer")
            .with_species("Homo sapiens")
            .with_min_samples(20);

        assert_eq!(criteria.disease.as_deref(), Some("Liver Cancer"));
        assert!(!criteria.is_empty());
    }

    #[test]
    fn test_blank_fields_count_as_empty() {
        assert!(ScreeningCriteria::new().is_empty());
        assert!(ScreeningCriteria::new().with_disease("  ").with_extra("").is_empty());
        assert!(!ScreeningCriteria::new().with_min_samples(0).is_empty());
    }

    #[test]
    fn test_prompt_string() {
        let criteria = ScreeningCriteria::new()
            .with_extra("treatment-naive patients only")
            .with_disease("Liver Cancer")
            .with_data_type("scRNA-seq")
            .with_custom("Tissue", "tumor");

        assert_eq!(
            criteria.to_prompt_string(),
            "- Disease: Liver Cancer\n\
             - Data type: scRNA-seq\n\
             - Tissue: tumor\n\
             - Additional requirements: treatment-naive patients only"
        );
    }
}
