mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        sd_utils::init_logging_with_filter("debug");
    } else {
        sd_utils::init_logging_with_filter("warn");
    }

    let config = commands::load_config(cli.config.as_deref())?;

    let output = match &cli.command {
        Commands::Report {
            smells,
            total_files,
            source_dir,
        } => {
            let report =
                commands::build_report(&config, smells, *total_files, source_dir.as_deref())?;
            commands::to_json(&report, cli.pretty)?
        }
        Commands::Portfolio { reports } => {
            let stats = commands::portfolio(reports)?;
            commands::to_json(&stats, cli.pretty)?
        }
        Commands::Scan { dir } => {
            let files = commands::scan(&config, dir)?;
            commands::to_json(&files, cli.pretty)?
        }
    };

    println!("{}", output);
    Ok(())
}
