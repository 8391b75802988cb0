//! Parsing of JSON replies from the completion service.

use serde::{Deserialize, Deserializer};

use crate::classify::AssayType;
use crate::error::{GeoSiftError, Result};

/// Reply shape for classification batches.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassificationReply {
    pub classifications: Vec<ClassificationEntry>,
}

/// One `{id, type}` pair.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassificationEntry {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "type")]
    pub assay_type: AssayType,
}

/// Reply shape for screening batches.
#[derive(Debug, Clone, Deserialize)]
pub struct ScreeningReply {
    #[serde(deserialize_with = "strings_or_numbers")]
    pub selected_ids: Vec<String>,
}

/// Parse JSON from an LLM reply, handling markdown code blocks.
///
/// Any failure, malformed JSON or a shape mismatch, is a `Remote` error so the
/// batch loop retries it like a transport failure.
pub fn parse_json_response<T: for<'de> Deserialize<'de>>(response: &str) -> Result<T> {
    let json_str = if response.contains("```json") {
        response
            .split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .map(|s| s.trim())
            .unwrap_or(response)
    } else if response.contains("```") {
        response
            .split("```")
            .nth(1)
            .map(|s| s.trim())
            .unwrap_or(response)
    } else {
        response.trim()
    };

    serde_json::from_str(json_str)
        .map_err(|e| GeoSiftError::Remote(format!("Failed to parse LLM JSON response: {}", e)))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdValue {
    Text(String),
    Int(i64),
}

impl From<IdValue> for String {
    fn from(value: IdValue) -> Self {
        match value {
            IdValue::Text(s) => s.trim().to_string(),
            IdValue::Int(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    IdValue::deserialize(d).map(String::from)
}

fn strings_or_numbers<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Vec<String>, D::Error> {
    Vec::<IdValue>::deserialize(d).map(|ids| ids.into_iter().map(String::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_classification_reply() {
        let raw = r#"{"classifications":[{"id":"GSE1","type":"scRNA-seq"},{"id":"GSE2","type":"Microarray"}]}"#;
        let reply: ClassificationReply = parse_json_response(raw).unwrap();
        assert_eq!(reply.classifications.len(), 2);
        assert_eq!(reply.classifications[0].assay_type, AssayType::ScRnaSeq);
        assert_eq!(reply.classifications[1].assay_type, AssayType::Microarray);
    }

    #[test]
    fn test_parse_fenced_reply() {
        let raw = "Here you go:\n```json\n{\"selected_ids\": [\"GSE1\", 42]}\n```";
        let reply: ScreeningReply = parse_json_response(raw).unwrap();
        assert_eq!(reply.selected_ids, vec!["GSE1", "42"]);
    }

    #[test]
    fn test_schema_mismatch_is_remote_error() {
        let err = parse_json_response::<ScreeningReply>(r#"{"ids":["GSE1"]}"#).unwrap_err();
        assert!(matches!(err, GeoSiftError::Remote(_)));

        let err = parse_json_response::<ClassificationReply>(
            r#"{"classifications":[{"id":"GSE1","type":"Proteomics"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, GeoSiftError::Remote(_)));
    }

    #[test]
    fn test_malformed_json_is_remote_error() {
        let err = parse_json_response::<ScreeningReply>("not json").unwrap_err();
        assert!(matches!(err, GeoSiftError::Remote(_)));
    }
}
