//! Rental Yield - Short-term rental listing analysis
//!
//! Cleans a listings export, estimates occupancy and monthly revenue per
//! listing, and summarises revenue by neighborhood.

mod config;
mod data;
mod error;
mod pipeline;
mod stats;

use anyhow::Context;
use config::AnalysisConfig;
use log::{error, info};
use pipeline::{ListingPipeline, PipelineReport};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(report) => {
            log_report(&report);
            info!(
                "Done. You can now open '{}' in Tableau.",
                report.output_path.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            let message = fatal_message(&err);
            error!("{message}");
            // Still visible when logging is filtered out
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<PipelineReport> {
    let program_dir = program_dir()?;
    info!("Looking for files in: {}", program_dir.display());

    let pipeline = ListingPipeline::new(AnalysisConfig::in_dir(&program_dir));
    info!("Reading listings from '{}'", pipeline.config().input_path.display());
    let report = pipeline.run()?;
    Ok(report)
}

/// Directory holding the running executable; input and output live next to it.
fn program_dir() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe().context("locating the program")?;
    let dir = exe
        .parent()
        .context("the program path has no parent directory")?;
    Ok(dir.to_path_buf())
}

fn fatal_message(err: &anyhow::Error) -> String {
    format!("Error: {err:#}")
}

fn log_report(report: &PipelineReport) {
    info!(
        "{} rows loaded, {} matched the room type, {} priced, {} exported (price cap {:.2})",
        report.rows_loaded,
        report.rows_filtered,
        report.rows_priced,
        report.rows_exported,
        report.price_cap
    );
    info!("Neighborhood summary grouped by '{}':", report.area_column);
    info!(
        "{:<30} {:>12} {:>14} {:>10} {:>8}",
        "Neighborhood", "Avg Price", "Avg Revenue", "Occupancy", "Count"
    );
    for row in &report.summary {
        info!(
            "{:<30} {:>12.2} {:>14.2} {:>10.3} {:>8}",
            row.neighborhood,
            row.avg_nightly_price,
            row.avg_monthly_revenue,
            row.avg_occupancy,
            row.listing_count
        );
    }
}
