//! One-line row summaries embedded in prompts.

use crate::input::DataTable;
use crate::schema::{ColumnRole, ColumnRoles};

/// Maximum description length, in characters, before truncation.
pub const MAX_DESCRIPTION_CHARS: usize = 300;

/// Optional fields rendered as bracketed tags, in output order.
const TAGS: [(ColumnRole, &str); 4] = [
    (ColumnRole::Platform, "Plat"),
    (ColumnRole::Species, "Sp"),
    (ColumnRole::DataType, "Type"),
    (ColumnRole::Disease, "Disease"),
];

/// Render one row as `"<id> | [Plat: ..] [Sp: ..] [Type: ..] [Disease: ..] <description>"`.
///
/// Tags appear only for resolved columns holding a value.
pub fn summarize_row(table: &DataTable, row: usize, roles: &ColumnRoles) -> String {
    let cell = |role: ColumnRole| -> Option<String> {
        let column = roles.get(role)?;
        let value = table.get_by_name(row, column)?;
        if DataTable::is_null_value(value) {
            None
        } else {
            Some(flatten(value))
        }
    };

    let id = cell(ColumnRole::Id).unwrap_or_default();

    let mut parts: Vec<String> = TAGS
        .iter()
        .filter_map(|(role, label)| cell(*role).map(|v| format!("[{}: {}]", label, v)))
        .collect();

    if let Some(description) = cell(ColumnRole::Description) {
        parts.push(truncate(&description, MAX_DESCRIPTION_CHARS));
    }

    format!("{} | {}", id, parts.join(" "))
}

/// Summaries for a contiguous range of rows.
pub fn summarize_rows(
    table: &DataTable,
    rows: std::ops::Range<usize>,
    roles: &ColumnRoles,
) -> Vec<String> {
    rows.map(|row| summarize_row(table, row, roles)).collect()
}

/// Truncate to `max` characters, appending `...` when cut.
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Collapse whitespace runs (including newlines) so each row stays on one line.
fn flatten(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles_for(table: &DataTable) -> ColumnRoles {
        ColumnRoles::resolve(table)
    }

    #[test]
    fn test_full_row() {
        let table = DataTable::from_strs(
            &["gse", "title", "platform", "organism", "type", "disease"],
            &[&[
                "GSE1",
                "10x Chromium of liver",
                "GPL24676",
                "Homo sapiens",
                "Expression profiling by high throughput sequencing",
                "HCC",
            ]],
        );
        let line = summarize_row(&table, 0, &roles_for(&table));
        assert_eq!(
            line,
            "GSE1 | [Plat: GPL24676] [Sp: Homo sapiens] \
             [Type: Expression profiling by high throughput sequencing] \
             [Disease: HCC] 10x Chromium of liver"
        );
    }

    #[test]
    fn test_missing_fields_skip_tags() {
        let table = DataTable::from_strs(
            &["gse", "title", "organism"],
            &[&["GSE2", "Affymetrix array\nbreast", "NA"]],
        );
        let line = summarize_row(&table, 0, &roles_for(&table));
        assert_eq!(line, "GSE2 | Affymetrix array breast");
    }

    #[test]
    fn test_long_description_truncated() {
        let long = "a".repeat(MAX_DESCRIPTION_CHARS + 20);
        let table = DataTable::from_strs(&["gse", "summary"], &[&["GSE3", &long]]);
        let line = summarize_row(&table, 0, &roles_for(&table));

        let expected = format!("GSE3 | {}...", "a".repeat(MAX_DESCRIPTION_CHARS));
        assert_eq!(line, expected);
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        let text = "单细胞转录组测序";
        assert_eq!(truncate(text, 3), "单细胞...");
        assert_eq!(truncate(text, 8), text);
        assert_eq!(truncate(text, 100), text);
    }
}
