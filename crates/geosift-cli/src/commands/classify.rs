//! Classify command - label every dataset with its assay type.

use std::path::PathBuf;

use colored::Colorize;
use geosift::{AssayType, ClassifyConfig, GeoSift, GeoSiftConfig, write_table};
use tracing::debug;

use crate::cli::{LlmArgs, OutputArgs};

pub fn run(
    file: PathBuf,
    label_column: String,
    batch_size: usize,
    llm: LlmArgs,
    output: OutputArgs,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let config = GeoSiftConfig {
        llm: llm.to_config(),
        classify: ClassifyConfig {
            batch_size,
            label_column: label_column.clone(),
            ..Default::default()
        },
        ..Default::default()
    }
    .with_verbose(verbose);
    let geosift = GeoSift::with_config(config);

    let (table, source) = geosift.load(&file)?;
    println!(
        "{} {} ({} datasets, model {})",
        "Classifying".cyan().bold(),
        file.display().to_string().white(),
        source.row_count,
        llm.model
    );

    let outcome = geosift.classify_table(&table)?;

    if verbose {
        println!();
        println!("{}", "Columns:".yellow().bold());
        for (role, column) in outcome.roles.iter() {
            println!("  {:12} {}", role.as_str(), column);
        }
    }

    println!();
    for (label, count) in outcome.counts(&label_column) {
        if count == 0 {
            continue;
        }
        let padded = format!("{:14}", label.label());
        let name = match label {
            AssayType::Unknown => padded.red(),
            _ => padded.normal(),
        };
        println!("  {} {}", name, count.to_string().white().bold());
    }

    let report = &outcome.report;
    if !report.is_complete() {
        println!();
        println!(
            "{} {} of {} batches failed after retries; their rows are labelled {}",
            "Warning:".yellow().bold(),
            report.failed_batches.len(),
            report.total_batches,
            AssayType::Unknown.label()
        );
    }

    let output_path = output.resolve(Some(&file), "classified");
    write_table(&outcome.table, &output_path, output.format)?;
    debug!(
        path = %output_path.display(),
        rows = outcome.table.row_count(),
        format = %output.format,
        "wrote classified table"
    );

    println!();
    println!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );

    Ok(())
}
