//! Column roles and their resolution from table headers.

mod resolver;
mod role;

pub use resolver::{find_column, ColumnRoles};
pub use role::ColumnRole;
