//! Export tables to delimited text or JSON.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use indexmap::IndexMap;

use super::source::DataTable;
use crate::error::{GeoSiftError, Result};

/// Supported output formats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Tsv,
    Csv,
    /// Array of objects, keys in column order.
    Json,
}

impl OutputFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Tsv => "tsv",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tsv" => Ok(OutputFormat::Tsv),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use tsv, csv, or json.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Write a table to `path` in the given format.
pub fn write_table(table: &DataTable, path: impl AsRef<Path>, format: OutputFormat) -> Result<()> {
    let path = path.as_ref();
    let io_err = |e: std::io::Error| GeoSiftError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut out = BufWriter::new(file);
    write_to(table, &mut out, format)?;
    out.flush().map_err(io_err)
}

/// Write a table to any writer.
pub fn write_to<W: Write>(table: &DataTable, out: W, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Tsv => write_delimited(table, out, b'\t'),
        OutputFormat::Csv => write_delimited(table, out, b','),
        OutputFormat::Json => {
            let records: Vec<IndexMap<&str, &str>> = table
                .rows
                .iter()
                .map(|row| {
                    table
                        .headers
                        .iter()
                        .map(String::as_str)
                        .zip(row.iter().map(String::as_str))
                        .collect()
                })
                .collect();
            serde_json::to_writer_pretty(out, &records)?;
            Ok(())
        }
    }
}

fn write_delimited<W: Write>(table: &DataTable, out: W, delimiter: u8) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(out);
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush().map_err(|e| GeoSiftError::Csv(e.into()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Parser;
    use tempfile::NamedTempFile;

    fn sample() -> DataTable {
        DataTable::from_strs(
            &["gse", "title"],
            &[&["GSE1", "liver, single cell"], &["GSE2", "breast"]],
        )
    }

    #[test]
    fn test_tsv_written_and_reparsed() {
        let file = NamedTempFile::new().unwrap();
        write_table(&sample(), file.path(), OutputFormat::Tsv).unwrap();

        let (table, meta) = Parser::new().parse_file(file.path()).unwrap();
        assert_eq!(meta.format, "tsv");
        assert_eq!(table, sample());
    }

    #[test]
    fn test_json_keeps_column_order() {
        let mut buf = Vec::new();
        write_to(&sample(), &mut buf, OutputFormat::Json).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let gse = text.find("\"gse\"").unwrap();
        let title = text.find("\"title\"").unwrap();
        assert!(gse < title);
        assert!(text.contains("liver, single cell"));
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert!("xlsx".parse::<OutputFormat>().is_err());
    }
}
