//! Delimited-text reader for GEO metadata exports.
//!
//! Tables arrive as TSV from GEOquery/pandas dumps or as CSV from
//! spreadsheets, sometimes with a UTF-8 BOM and `#` comment lines on top.
//! The delimiter is sniffed from the first lines unless configured.

use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

use super::source::{DataTable, SourceMetadata};
use crate::error::{GeoSiftError, Result};

/// Candidates in tie-break order.
const CANDIDATES: [u8; 4] = [b'\t', b',', b';', b'|'];

/// Lines inspected when sniffing the delimiter.
const SNIFF_LINES: usize = 10;

const BOM: char = '\u{feff}';

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Fixed delimiter; sniffed when `None`.
    pub delimiter: Option<u8>,
    /// Stop after this many data rows.
    pub max_rows: Option<usize>,
    pub quote: u8,
    /// Lines starting with this byte are skipped.
    pub comment: Option<u8>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            max_rows: None,
            quote: b'"',
            comment: Some(b'#'),
        }
    }
}

/// Reads metadata tables into [`DataTable`]s.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Read `path` and describe where the table came from.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        let path = path.as_ref();
        let contents = fs::read(path).map_err(|source| GeoSiftError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => sniff_delimiter(&contents, self.config.comment)?,
        };
        let table = self.parse_bytes(&contents, delimiter)?;

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            content_hash(&contents),
            contents.len() as u64,
            format_name(delimiter).to_string(),
            table.row_count(),
            table.column_count(),
        );

        Ok((table, metadata))
    }

    /// Parse bytes whose first non-comment line is the header.
    ///
    /// Short rows are padded by [`DataTable::new`]; blank lines are dropped.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<DataTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .quote(self.config.quote)
            .comment(self.config.comment)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches(BOM).trim().to_string())
            .collect();
        if headers.iter().all(String::is_empty) {
            return Err(GeoSiftError::EmptyData("No header row found".to_string()));
        }

        let limit = self.config.max_rows.unwrap_or(usize::MAX);
        let mut rows = Vec::new();
        for record in reader.records() {
            if rows.len() >= limit {
                break;
            }
            let record = record?;
            if record.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            rows.push(record.iter().map(str::to_string).collect());
        }

        if rows.is_empty() {
            return Err(GeoSiftError::EmptyData(
                "Table has a header but no data rows".to_string(),
            ));
        }

        Ok(DataTable::new(headers, rows))
    }
}

fn content_hash(bytes: &[u8]) -> String {
    format!("sha256:{:x}", Sha256::digest(bytes))
}

fn format_name(delimiter: u8) -> &'static str {
    match delimiter {
        b'\t' => "tsv",
        b',' => "csv",
        b';' => "csv-semicolon",
        b'|' => "psv",
        _ => "delimited",
    }
}

/// Pick the candidate that splits the sampled lines most consistently.
///
/// A delimiter appearing the same number of times on every line outranks
/// one that merely appears more often. Falls back to comma.
fn sniff_delimiter(bytes: &[u8], comment: Option<u8>) -> Result<u8> {
    let text = String::from_utf8_lossy(bytes);
    let sample: Vec<&str> = text
        .lines()
        .map(|l| l.trim_start_matches(BOM))
        .filter(|l| !l.trim().is_empty())
        .filter(|l| comment.is_none_or(|c| !l.as_bytes().starts_with(&[c])))
        .take(SNIFF_LINES)
        .collect();

    if sample.is_empty() {
        return Err(GeoSiftError::EmptyData("File has no content".to_string()));
    }

    let best = CANDIDATES
        .iter()
        .enumerate()
        .filter_map(|(rank, &delim)| {
            let fields = split_count(sample[0], delim);
            if fields == 0 {
                return None;
            }
            let uniform = sample.iter().all(|line| split_count(line, delim) == fields);
            // Earlier candidates win ties.
            Some(((uniform, fields, usize::MAX - rank), delim))
        })
        .max_by_key(|(key, _)| *key)
        .map(|(_, delim)| delim);

    Ok(best.unwrap_or(b','))
}

/// Unquoted occurrences of `delimiter` in `line`.
fn split_count(line: &str, delimiter: u8) -> usize {
    let target = delimiter as char;
    line.chars()
        .scan(false, |quoted, ch| {
            if ch == '"' {
                *quoted = !*quoted;
            }
            Some(ch == target && !*quoted)
        })
        .filter(|hit| *hit)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_sniff_csv() {
        assert_eq!(sniff_delimiter(b"a,b,c\n1,2,3\n4,5,6", None).unwrap(), b',');
    }

    #[test]
    fn test_sniff_prefers_uniform_tab_over_commas_in_text() {
        let data = b"id\ttitle\nGSE1\tliver, kidney and lung\nGSE2\tbrain, heart\n";
        assert_eq!(sniff_delimiter(data, None).unwrap(), b'\t');
    }

    #[test]
    fn test_sniff_skips_comment_lines() {
        let data = b"# exported 2024-01-01, GEO\ngse\ttitle\nGSE1\tx\n";
        assert_eq!(sniff_delimiter(data, Some(b'#')).unwrap(), b'\t');
    }

    #[test]
    fn test_split_count_ignores_quoted() {
        assert_eq!(split_count(r#"GSE1,"a, b",3"#, b','), 2);
    }

    #[test]
    fn test_parse_quoted_csv() {
        let data = b"gse,title,n\nGSE1,\"scRNA-seq, liver\",12\nGSE2,bulk,3";
        let table = Parser::new().parse_bytes(data, b',').unwrap();

        assert_eq!(table.headers, vec!["gse", "title", "n"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, 1), Some("scRNA-seq, liver"));
    }

    #[test]
    fn test_parse_skips_blank_rows_and_respects_limit() {
        let data = b"gse,title\nGSE1,a\n,\nGSE2,b\nGSE3,c\n";
        let parser = Parser::with_config(ParserConfig {
            max_rows: Some(2),
            ..Default::default()
        });
        let table = parser.parse_bytes(data, b',').unwrap();

        assert_eq!(table.column_by_name("gse").unwrap(), vec!["GSE1", "GSE2"]);
    }

    #[test]
    fn test_parse_header_only_is_empty() {
        let err = Parser::new().parse_bytes(b"gse,title\n", b',').unwrap_err();
        assert!(matches!(err, GeoSiftError::EmptyData(_)));
    }

    #[test]
    fn test_parse_file_metadata() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"\xEF\xBB\xBFAccession\tTitle\nGSE1\tx\n").unwrap();

        let (table, meta) = Parser::new().parse_file(file.path()).unwrap();
        assert_eq!(table.headers[0], "Accession");
        assert_eq!(meta.format, "tsv");
        assert_eq!(meta.row_count, 1);
        assert!(meta.hash.starts_with("sha256:"));
    }
}
