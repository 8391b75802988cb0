//! Columns command - show which column was picked for each role.

use std::path::PathBuf;

use colored::Colorize;
use geosift::{ColumnRole, ColumnRoles, Parser};

pub fn run(file: PathBuf, json_output: bool, _verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let (table, source) = Parser::new().parse_file(&file)?;
    let roles = ColumnRoles::resolve(&table);

    if json_output {
        let mut resolved = serde_json::Map::new();
        for role in ColumnRole::RESOLUTION_ORDER {
            let value = roles
                .get(role)
                .map(|c| serde_json::Value::String(c.to_string()))
                .unwrap_or(serde_json::Value::Null);
            resolved.insert(role.as_str().to_string(), value);
        }
        let status = serde_json::json!({
            "file": source.file,
            "format": source.format,
            "rows": source.row_count,
            "columns": table.headers,
            "roles": resolved,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Columns of".cyan().bold(),
        source.file.white()
    );
    println!(
        "{} rows, {} columns ({})",
        source.row_count, source.column_count, source.format
    );
    println!();

    for role in ColumnRole::RESOLUTION_ORDER {
        match roles.get(role) {
            Some(column) => println!("  {:12} {}", role.as_str(), column.green()),
            None => println!("  {:12} {}", role.as_str(), "not found".dimmed()),
        }
    }

    if roles.get(ColumnRole::Description).is_none() {
        println!();
        println!(
            "{} No description column found; classification needs one.",
            "Warning:".yellow().bold()
        );
    }

    Ok(())
}
