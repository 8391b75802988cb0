//! Column role resolution by keyword matching on header names.

use indexmap::IndexMap;
use serde::Serialize;

use super::role::ColumnRole;
use crate::error::{GeoSiftError, Result};
use crate::input::DataTable;

/// Find the first column matching any pattern, trying patterns in priority order.
///
/// Matching is a case-insensitive substring test. For each pattern in turn,
/// the first column (in the given order) that contains it wins.
pub fn find_column<S: AsRef<str>>(columns: &[S], patterns: &[&str]) -> Option<String> {
    let lowered: Vec<String> = columns.iter().map(|c| c.as_ref().to_lowercase()).collect();
    patterns.iter().find_map(|pattern| {
        let pattern = pattern.to_lowercase();
        lowered
            .iter()
            .position(|c| c.contains(&pattern))
            .map(|i| columns[i].as_ref().to_string())
    })
}

/// Mapping from logical role to the column that fills it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnRoles {
    roles: IndexMap<ColumnRole, String>,
}

impl ColumnRoles {
    /// Resolve every role against a table's headers.
    ///
    /// Each role is matched independently, so one column may fill several
    /// roles. The identifier falls back to the first column. Sample size
    /// prefers numeric columns before looking at all columns.
    pub fn resolve(table: &DataTable) -> Self {
        let numeric = table.numeric_columns();
        Self::resolve_names(&table.headers, &numeric)
    }

    /// Resolve from header names plus the subset known to hold numbers.
    pub fn resolve_names(headers: &[String], numeric: &[String]) -> Self {
        let roles = ColumnRole::RESOLUTION_ORDER
            .into_iter()
            .filter_map(|role| {
                let found = match role {
                    ColumnRole::Id => {
                        find_column(headers, role.keywords()).or_else(|| headers.first().cloned())
                    }
                    ColumnRole::SampleSize => find_column(numeric, role.keywords())
                        .or_else(|| find_column(headers, role.keywords())),
                    _ => find_column(headers, role.keywords()),
                };
                found.map(|column| (role, column))
            })
            .collect();

        Self { roles }
    }

    /// Build a mapping directly, bypassing keyword matching.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (ColumnRole, S)>,
        S: Into<String>,
    {
        Self {
            roles: pairs.into_iter().map(|(r, c)| (r, c.into())).collect(),
        }
    }

    /// Column assigned to a role, if any.
    pub fn get(&self, role: ColumnRole) -> Option<&str> {
        self.roles.get(&role).map(String::as_str)
    }

    /// Column assigned to a role, or a `MissingColumn` error listing the headers.
    pub fn require(&self, role: ColumnRole, table: &DataTable) -> Result<&str> {
        self.get(role).ok_or_else(|| GeoSiftError::MissingColumn {
            role: role.to_string(),
            available: table.headers.join(", "),
        })
    }

    /// Resolved roles in resolution order.
    pub fn iter(&self) -> impl Iterator<Item = (ColumnRole, &str)> {
        self.roles.iter().map(|(r, c)| (*r, c.as_str()))
    }
}
