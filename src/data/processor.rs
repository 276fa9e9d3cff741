//! Listing Processor Module
//! Handles row filtering, price cleaning and revenue metric derivation.

use crate::config::{AnalysisConfig, DAYS_PER_MONTH};
use crate::data::DataLoader;
use crate::error::{PipelineError, Result};
use polars::prelude::*;

// Input columns
pub const ID_COL: &str = "id";
pub const ROOM_TYPE_COL: &str = "room_type";
pub const PRICE_COL: &str = "price";
pub const REVIEWS_COL: &str = "reviews_per_month";

// Derived columns
pub const PRICE_CLEAN_COL: &str = "price_clean";
pub const EST_BOOKINGS_COL: &str = "est_bookings_mo";
pub const OCCUPANCY_COL: &str = "occupancy_rate";
pub const REVENUE_COL: &str = "projected_revenue";

/// Handles data cleaning and transformation operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Keep only rows whose room type equals `room_type`.
    ///
    /// A frame without the room type column matches nothing.
    pub fn filter_by_room_type(df: &DataFrame, room_type: &str) -> Result<DataFrame> {
        if !DataLoader::has_column(df, ROOM_TYPE_COL) {
            return Ok(df.clear());
        }

        let filtered = df
            .clone()
            .lazy()
            .filter(
                col(ROOM_TYPE_COL)
                    .cast(DataType::String)
                    .eq(lit(room_type)),
            )
            .collect()?;
        Ok(filtered)
    }

    /// Parse currency text such as `$1,200.00`.
    pub fn parse_currency(text: &str) -> Option<f64> {
        text.trim().replace(['$', ','], "").parse::<f64>().ok()
    }

    /// Add `price_clean` parsed from the raw price text and drop rows whose
    /// price is missing, not a finite number, or not positive.
    ///
    /// Unparseable text is reported by listing id so it can be found in the
    /// source file regardless of earlier filtering.
    pub fn clean_price(df: &DataFrame) -> Result<DataFrame> {
        DataLoader::require_columns(df, &[PRICE_COL])?;

        let ids = if DataLoader::has_column(df, ID_COL) {
            Some(df.column(ID_COL)?.cast(&DataType::String)?)
        } else {
            None
        };
        let ids = ids.as_ref().map(|c| c.str()).transpose()?;

        let raw = df.column(PRICE_COL)?.cast(&DataType::String)?;
        let cleaned = raw
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| match value {
                None => Ok(None),
                Some(text) => match Self::parse_currency(text) {
                    // NaN and infinities are dropped like null prices
                    Some(price) => Ok(Some(price).filter(|p| p.is_finite())),
                    None => Err(PipelineError::DataParse {
                        listing: ids
                            .and_then(|ca| ca.get(row))
                            .map(|id| format!("id {id}"))
                            .unwrap_or_else(|| format!("row {row}")),
                        value: text.to_string(),
                    }),
                },
            })
            .collect::<Result<Vec<Option<f64>>>>()?;

        let mut with_clean = df.clone();
        with_clean.with_column(Column::new(PRICE_CLEAN_COL.into(), cleaned))?;

        let valid = with_clean
            .lazy()
            .filter(col(PRICE_CLEAN_COL).gt(lit(0.0)))
            .collect()?;
        Ok(valid)
    }

    /// Derive booking, occupancy and revenue estimates per row.
    ///
    /// Missing review counts become 0 and are written back to the review
    /// column. Occupancy is clamped to `[0, max_occupancy]`.
    pub fn derive_metrics(df: &DataFrame, config: &AnalysisConfig) -> Result<DataFrame> {
        DataLoader::require_columns(df, &[REVIEWS_COL, PRICE_CLEAN_COL])?;

        let max = config.max_occupancy;
        let raw_occupancy = col(EST_BOOKINGS_COL) * lit(config.avg_nights) / lit(DAYS_PER_MONTH);
        let occupancy = when(raw_occupancy.clone().gt(lit(max)))
            .then(lit(max))
            .when(raw_occupancy.clone().lt(lit(0.0)))
            .then(lit(0.0))
            .otherwise(raw_occupancy);

        let derived = df
            .clone()
            .lazy()
            .with_column(
                col(REVIEWS_COL)
                    .cast(DataType::Float64)
                    .fill_null(lit(0.0))
                    .fill_nan(lit(0.0))
                    .alias(REVIEWS_COL),
            )
            .with_column((col(REVIEWS_COL) / lit(config.review_rate)).alias(EST_BOOKINGS_COL))
            .with_column(occupancy.alias(OCCUPANCY_COL))
            .with_column(
                (col(PRICE_CLEAN_COL) * lit(DAYS_PER_MONTH) * col(OCCUPANCY_COL))
                    .alias(REVENUE_COL),
            )
            .collect()?;
        Ok(derived)
    }
}
