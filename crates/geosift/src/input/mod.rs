//! Table loading, in-memory representation, and export.

mod parser;
mod source;
mod writer;

pub use parser::{Parser, ParserConfig};
pub use source::{DataTable, SourceMetadata};
pub use writer::{write_table, write_to, OutputFormat};
