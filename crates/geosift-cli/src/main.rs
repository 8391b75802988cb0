//! GeoSift CLI - LLM-assisted screening of GEO metadata tables.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};
use geosift::ScreeningCriteria;

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Classify {
            file,
            label_column,
            batch_size,
            llm,
            output,
        } => commands::classify::run(file, label_column, batch_size, llm, output, cli.verbose),

        Commands::Screen {
            file,
            reference,
            disease,
            species,
            platform,
            data_type,
            min_samples,
            criteria,
            batch_size,
            llm,
            output,
        } => {
            let criteria = ScreeningCriteria {
                disease,
                species,
                platform,
                data_type,
                min_samples,
                extra: criteria,
                ..Default::default()
            };
            commands::screen::run(file, reference, criteria, batch_size, llm, output, cli.verbose)
        }

        Commands::Columns { file, json } => commands::columns::run(file, json, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
