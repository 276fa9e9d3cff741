//! Listing Analysis Pipeline
//! Runs filter -> clean -> derive -> outlier removal -> aggregate -> export.

use crate::config::AnalysisConfig;
use crate::data::{DataExporter, DataLoader, DataProcessor};
use crate::error::Result;
use crate::stats::{NeighborhoodSummary, StatsCalculator};
use log::info;
use std::path::PathBuf;

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub rows_loaded: usize,
    pub rows_filtered: usize,
    pub rows_priced: usize,
    pub rows_exported: usize,
    pub price_cap: f64,
    pub area_column: String,
    pub summary: Vec<NeighborhoodSummary>,
    pub output_path: PathBuf,
}

/// Batch pipeline over a single listings file.
pub struct ListingPipeline {
    config: AnalysisConfig,
}

impl ListingPipeline {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run every stage in order. Nothing is written unless all stages succeed.
    pub fn run(&self) -> Result<PipelineReport> {
        let config = &self.config;
        config.validate()?;

        let listings = DataLoader::load_csv(&config.input_path)?;
        let rows_loaded = listings.height();

        let homes = DataProcessor::filter_by_room_type(&listings, &config.room_type)?;
        info!("{} listings are '{}'", homes.height(), config.room_type);

        let priced = DataProcessor::clean_price(&homes)?;
        info!("{} listings have a positive price", priced.height());

        let derived = DataProcessor::derive_metrics(&priced, config)?;
        let cut = StatsCalculator::remove_price_outliers(&derived, config.outlier_percentile)?;
        info!("{} listings remain after outlier removal", cut.kept.height());

        let (area_column, summary) =
            StatsCalculator::aggregate_by_area(&cut.kept, &config.area_columns, config.min_listings)?;
        let summary = StatsCalculator::summary_rows(&summary)?;

        info!(
            "Success! Exporting data to '{}'...",
            config.output_path.display()
        );
        DataExporter::write_csv(&cut.kept, &config.output_path)?;

        Ok(PipelineReport {
            rows_loaded,
            rows_filtered: homes.height(),
            rows_priced: priced.height(),
            rows_exported: cut.kept.height(),
            price_cap: cut.price_cap,
            area_column,
            summary,
            output_path: config.output_path.clone(),
        })
    }
}
