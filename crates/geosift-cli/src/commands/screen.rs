//! Screen command - select the datasets that match user criteria.

use std::path::PathBuf;

use colored::Colorize;
use geosift::{
    FileReference, GeoSift, GeoSiftConfig, ScreenConfig, ScreeningCriteria, ScreeningStatus,
    write_table,
};
use tracing::debug;

use crate::cli::{LlmArgs, OutputArgs};

pub fn run(
    file: Option<PathBuf>,
    reference: Option<PathBuf>,
    criteria: ScreeningCriteria,
    batch_size: usize,
    llm: LlmArgs,
    output: OutputArgs,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = GeoSiftConfig {
        llm: llm.to_config(),
        screen: ScreenConfig {
            batch_size,
            ..Default::default()
        },
        ..Default::default()
    }
    .with_verbose(verbose);
    let geosift = GeoSift::with_config(config);

    let outcome = match &file {
        Some(path) => {
            if !path.exists() {
                return Err(format!("File not found: {}", path.display()).into());
            }
            let (table, source) = geosift.load(path)?;
            println!(
                "{} {} ({} datasets)",
                "Screening".cyan().bold(),
                path.display().to_string().white(),
                source.row_count
            );
            geosift.screen_table(&table, &criteria)?
        }
        None => {
            let path = reference.ok_or(
                "No input file given and no reference table configured (set --reference or GEOSIFT_REFERENCE)",
            )?;
            let source = FileReference::new(&path);
            println!(
                "{} reference table {}",
                "Screening".cyan().bold(),
                path.display().to_string().white()
            );
            geosift.screen_reference(&source, &criteria)?
        }
    };

    if verbose && !criteria.is_empty() {
        println!();
        println!("{}", "Criteria:".yellow().bold());
        println!("{}", criteria.to_prompt_string());
    }

    println!();
    match outcome.status {
        ScreeningStatus::NoCriteria => {
            println!(
                "{} No screening criteria given; writing the table unfiltered.",
                "Warning:".yellow().bold()
            );
        }
        ScreeningStatus::NoMatches => {
            println!("{}", "No datasets matched the criteria.".yellow());
        }
        ScreeningStatus::Matched => {
            println!(
                "Selected {} datasets",
                outcome.table.row_count().to_string().white().bold()
            );
        }
    }

    if let Some(report) = outcome.report.as_ref().filter(|r| !r.is_complete()) {
        println!(
            "{} {} of {} batches failed after retries and were skipped",
            "Warning:".yellow().bold(),
            report.failed_batches.len(),
            report.total_batches
        );
    }

    let output_path = output.resolve(file.as_ref(), "screened");
    write_table(&outcome.table, &output_path, output.format)?;
    debug!(
        path = %output_path.display(),
        rows = outcome.table.row_count(),
        format = %output.format,
        "wrote screened table"
    );

    println!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );

    Ok(())
}
