//! Merging model output back into the record table.

use std::cmp::Ordering;
use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::classify::AssayType;
use crate::input::DataTable;
use crate::schema::{ColumnRole, ColumnRoles};

static LEADING_INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+)").expect("valid leading-integer regex"));

/// Copy `table` with a category column holding each row's label.
///
/// Rows whose identifier has no label get [`AssayType::Unknown`]. Labels for
/// identifiers not present in the table are ignored. Row order and all
/// existing columns are kept; an existing column named `column` is overwritten.
pub fn apply_classifications(
    table: &DataTable,
    id_column: &str,
    labels: &IndexMap<String, AssayType>,
    column: &str,
) -> DataTable {
    let values = match table.column_index(id_column) {
        Some(idx) => table
            .column_values(idx)
            .map(|id| {
                labels
                    .get(id.trim())
                    .copied()
                    .unwrap_or(AssayType::Unknown)
                    .label()
                    .to_string()
            })
            .collect(),
        None => vec![AssayType::Unknown.label().to_string(); table.row_count()],
    };

    let mut out = table.clone();
    out.set_column(column, values);
    out
}

/// Rows whose identifier is in `selected`, in input order.
pub fn select_rows(table: &DataTable, id_column: &str, selected: &IndexSet<String>) -> DataTable {
    let Some(idx) = table.column_index(id_column) else {
        return table.empty_like();
    };
    filter_rows(table, |row| selected.contains(row[idx].trim()))
}

/// Drop rows whose value in `column` was already seen, keeping the first.
pub fn dedupe_by_column(table: &DataTable, column: &str) -> DataTable {
    let Some(idx) = table.column_index(column) else {
        return table.clone();
    };
    let mut seen = HashSet::new();
    filter_rows(table, |row| seen.insert(row[idx].trim().to_string()))
}

/// Numeric sample size of a cell.
///
/// A leading integer token wins ("24 samples" -> 24). Otherwise the whole
/// value is read as a number; anything else, including NaN, is `None`.
pub fn parse_sample_count(value: &str) -> Option<f64> {
    if let Some(caps) = LEADING_INTEGER.captures(value) {
        if let Ok(n) = caps[1].parse::<f64>() {
            return Some(n);
        }
    }
    value.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Stable sort by descending sample size; unparsable or missing values last.
pub fn sort_by_sample_size(table: &DataTable, column: &str) -> DataTable {
    let Some(idx) = table.column_index(column) else {
        return table.clone();
    };

    let mut keyed: Vec<(Option<f64>, &Vec<String>)> = table
        .rows
        .iter()
        .map(|row| (parse_sample_count(&row[idx]), row))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(x), Some(y)) => y.partial_cmp(x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    DataTable {
        headers: table.headers.clone(),
        rows: keyed.into_iter().map(|(_, row)| row.clone()).collect(),
    }
}

/// Move resolved role columns to the front in `id, species, data_type,
/// disease, sample_size, description` order; the rest keep their order.
pub fn reorder_columns(table: &DataTable, roles: &ColumnRoles) -> DataTable {
    let mut order: IndexSet<usize> = ColumnRole::OUTPUT_ORDER
        .iter()
        .filter_map(|role| roles.get(*role))
        .filter_map(|name| table.column_index(name))
        .collect();
    order.extend(0..table.column_count());

    DataTable {
        headers: order.iter().map(|&i| table.headers[i].clone()).collect(),
        rows: table
            .rows
            .iter()
            .map(|row| order.iter().map(|&i| row[i].clone()).collect())
            .collect(),
    }
}

fn filter_rows<F>(table: &DataTable, mut keep: F) -> DataTable
where
    F: FnMut(&[String]) -> bool,
{
    DataTable {
        headers: table.headers.clone(),
        rows: table
            .rows
            .iter()
            .filter(|row| keep(row))
            .cloned()
            .collect(),
    }
}
