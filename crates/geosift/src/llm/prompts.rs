//! Prompt templates for classification and screening batches.

use crate::classify::AssayType;

/// Build the prompt for one classification batch.
pub fn classification_prompt(lines: &[String]) -> String {
    let categories = AssayType::CATEGORIES
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{}. \"{}\": {}", i + 1, t.label(), t.definition()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are an expert curator of GEO (Gene Expression Omnibus) series metadata.
Classify each dataset below into exactly one assay category.

## Categories
{categories}

## Input Format
Each line describes one dataset:
GSE12345 | [Plat: GPL24676] [Sp: Homo sapiens] [Type: ...] [Disease: ...] Title or summary text

## Output
Respond with a single JSON object and nothing else:
{{"classifications": [{{"id": "GSE12345", "type": "scRNA-seq"}}]}}
Use the identifier exactly as given before the "|". Include every dataset once.
The "type" value must be one of: {labels}.

## Datasets
{rows}"#,
        categories = categories,
        labels = label_list(),
        rows = lines.join("\n"),
    )
}

/// Build the prompt for one screening batch.
pub fn screening_prompt(criteria: &str, lines: &[String]) -> String {
    format!(
        r#"You are an expert curator of GEO (Gene Expression Omnibus) series metadata.
Select the datasets that satisfy ALL of the screening criteria below.
Interpret the criteria semantically: synonyms, abbreviations and subtypes count
(e.g. "HCC" matches "Liver Cancer"). When a dataset is ambiguous, leave it out.

## Criteria
{criteria}

## Input Format
Each line describes one dataset:
GSE12345 | [Plat: GPL24676] [Sp: Homo sapiens] [Type: ...] [Disease: ...] Title or summary text

## Output
Respond with a single JSON object and nothing else:
{{"selected_ids": ["GSE12345", "GSE67890"]}}
Use identifiers exactly as given before the "|". Return an empty list if nothing matches.

## Datasets
{rows}"#,
        criteria = criteria.trim(),
        rows = lines.join("\n"),
    )
}

fn label_list() -> String {
    AssayType::CATEGORIES
        .iter()
        .map(|t| format!("\"{}\"", t.label()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_prompt_contents() {
        let lines = vec![
            "GSE1 | 10x Chromium single cell RNA-seq of liver".to_string(),
            "GSE2 | Affymetrix expression array, breast tissue".to_string(),
        ];
        let prompt = classification_prompt(&lines);

        for label in ["scRNA-seq", "stRNA-seq", "Bulk RNA-seq", "Microarray", "Other"] {
            assert!(prompt.contains(label), "missing {}", label);
        }
        assert!(prompt.contains(r#"{"classifications": [{"id": "GSE12345", "type": "scRNA-seq"}]}"#));
        assert!(prompt.ends_with("GSE2 | Affymetrix expression array, breast tissue"));
        assert!(!prompt.contains("Unknown"));
    }

    #[test]
    fn test_screening_prompt_contents() {
        let lines = vec!["GSE1 | liver".to_string()];
        let prompt = screening_prompt("Disease: Liver Cancer\n", &lines);

        assert!(prompt.contains("## Criteria\nDisease: Liver Cancer\n"));
        assert!(prompt.contains(r#"{"selected_ids": ["GSE12345", "GSE67890"]}"#));
        assert!(prompt.ends_with("GSE1 | liver"));
    }
}
