//! Analysis Configuration
//! Fixed heuristic constants and file locations for a run.

use crate::error::{PipelineError, Result};
use std::path::{Path, PathBuf};

/// Reviews left per booking, per month.
pub const REVIEW_RATE: f64 = 0.5;
/// Average nights per booking.
pub const AVG_NIGHTS: f64 = 3.0;
/// Ceiling on the estimated occupancy fraction.
pub const MAX_OCCUPANCY: f64 = 0.70;
pub const DAYS_PER_MONTH: f64 = 30.0;
/// Prices at or above this percentile are outliers.
pub const OUTLIER_PERCENTILE: f64 = 95.0;
/// Areas need strictly more listings than this to be reported.
pub const MIN_LISTINGS_PER_AREA: u64 = 20;
pub const TARGET_ROOM_TYPE: &str = "Entire home/apt";

pub const INPUT_FILE: &str = "listings.csv";
pub const OUTPUT_FILE: &str = "investor_analysis_nashville.csv";

/// Geographic key candidates, most specific first.
pub const AREA_COLUMN_CANDIDATES: [&str; 2] = ["neighbourhood_cleansed", "neighbourhood"];

/// Settings for one pipeline run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub review_rate: f64,
    pub avg_nights: f64,
    pub max_occupancy: f64,
    pub outlier_percentile: f64,
    pub min_listings: u64,
    pub room_type: String,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub area_columns: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            review_rate: REVIEW_RATE,
            avg_nights: AVG_NIGHTS,
            max_occupancy: MAX_OCCUPANCY,
            outlier_percentile: OUTLIER_PERCENTILE,
            min_listings: MIN_LISTINGS_PER_AREA,
            room_type: TARGET_ROOM_TYPE.to_string(),
            input_path: PathBuf::from(INPUT_FILE),
            output_path: PathBuf::from(OUTPUT_FILE),
            area_columns: AREA_COLUMN_CANDIDATES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl AnalysisConfig {
    /// Resolve the default input and output file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::default()
            .with_input_path(dir.join(INPUT_FILE))
            .with_output_path(dir.join(OUTPUT_FILE))
    }

    pub fn with_input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = path.into();
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Check the constants before any data is touched.
    pub fn validate(&self) -> Result<()> {
        if !self.review_rate.is_finite() || self.review_rate <= 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "review rate must be positive, got {}",
                self.review_rate
            )));
        }
        if !(self.max_occupancy > 0.0 && self.max_occupancy <= 1.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "max occupancy must be in (0, 1], got {}",
                self.max_occupancy
            )));
        }
        if !(self.outlier_percentile > 0.0 && self.outlier_percentile <= 100.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "outlier percentile must be in (0, 100], got {}",
                self.outlier_percentile
            )));
        }
        if self.area_columns.is_empty() {
            return Err(PipelineError::InvalidConfig(
                "at least one area column candidate is required".to_string(),
            ));
        }
        Ok(())
    }
}
