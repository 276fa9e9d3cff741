//! Statistics Calculator Module
//! Handles the price outlier cutoff and per-neighborhood aggregation.

use crate::data::{DataLoader, ID_COL, OCCUPANCY_COL, PRICE_CLEAN_COL, REVENUE_COL};
use crate::error::Result;
use log::{debug, info, warn};
use polars::prelude::*;

/// Percentiles over fewer prices than this are flagged as unreliable.
pub const SMALL_SAMPLE_THRESHOLD: usize = 20;

// Summary columns
pub const NEIGHBORHOOD_COL: &str = "Neighborhood";
pub const AVG_PRICE_COL: &str = "Avg_Nightly_Price";
pub const AVG_REVENUE_COL: &str = "Avg_Monthly_Revenue";
pub const AVG_OCCUPANCY_COL: &str = "Avg_Occupancy";
pub const LISTING_COUNT_COL: &str = "Listing_Count";

/// Aggregated figures for one neighborhood.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborhoodSummary {
    pub neighborhood: String,
    pub avg_nightly_price: f64,
    pub avg_monthly_revenue: f64,
    pub avg_occupancy: f64,
    pub listing_count: u64,
}

/// Result of dropping price outliers.
#[derive(Debug, Clone)]
pub struct OutlierCut {
    pub price_cap: f64,
    pub kept: DataFrame,
}

/// Handles statistical calculations over the cleaned listings.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        // Interpolate as `a + (b - a) * t` so equal neighbours return exactly.
        let (a, b) = (sorted_values[lower], sorted_values[upper]);
        if lower == upper {
            a
        } else {
            a + (b - a) * frac
        }
    }

    /// Get the non-null values of a float column.
    pub fn column_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
        let values = df
            .column(name)?
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .flatten()
            .collect();
        Ok(values)
    }

    /// Keep rows priced strictly below the `p`th percentile of `price_clean`.
    pub fn remove_price_outliers(df: &DataFrame, p: f64) -> Result<OutlierCut> {
        let mut prices = Self::column_values(df, PRICE_CLEAN_COL)?;
        prices.sort_by(|a, b| a.total_cmp(b));

        if prices.len() < SMALL_SAMPLE_THRESHOLD {
            warn!(
                "Only {} prices available, the {p}th percentile cutoff is unreliable",
                prices.len()
            );
        }

        let price_cap = Self::percentile(&prices, p);
        info!("Price cap ({p}th percentile): {price_cap:.2}");

        let kept = df
            .clone()
            .lazy()
            .filter(col(PRICE_CLEAN_COL).lt(lit(price_cap)))
            .collect()?;
        debug!("Dropped {} outlier rows", df.height() - kept.height());

        Ok(OutlierCut { price_cap, kept })
    }

    /// Group listings by the first area column present and summarise each
    /// area with more than `min_listings` listings, highest revenue first.
    ///
    /// Ties on revenue are ordered by neighborhood name.
    pub fn aggregate_by_area(
        df: &DataFrame,
        area_columns: &[String],
        min_listings: u64,
    ) -> Result<(String, DataFrame)> {
        let area_col = DataLoader::resolve_column(df, area_columns)?;
        DataLoader::require_columns(df, &[ID_COL, PRICE_CLEAN_COL, REVENUE_COL, OCCUPANCY_COL])?;
        info!("Grouping data by: {area_col}");

        let summary = df
            .clone()
            .lazy()
            .filter(col(area_col).is_not_null())
            .group_by([col(area_col).cast(DataType::String).alias(NEIGHBORHOOD_COL)])
            .agg([
                col(PRICE_CLEAN_COL).mean().alias(AVG_PRICE_COL),
                col(REVENUE_COL).mean().alias(AVG_REVENUE_COL),
                col(OCCUPANCY_COL).mean().alias(AVG_OCCUPANCY_COL),
                col(ID_COL)
                    .count()
                    .cast(DataType::UInt64)
                    .alias(LISTING_COUNT_COL),
            ])
            .filter(col(LISTING_COUNT_COL).gt(lit(min_listings)))
            .sort_by_exprs(
                [col(AVG_REVENUE_COL), col(NEIGHBORHOOD_COL)],
                SortMultipleOptions::default()
                    .with_order_descending_multi([true, false])
                    .with_maintain_order(true),
            )
            .collect()?;

        Ok((area_col.to_string(), summary))
    }

    /// Convert an aggregated frame into typed rows.
    pub fn summary_rows(summary: &DataFrame) -> Result<Vec<NeighborhoodSummary>> {
        let names = summary.column(NEIGHBORHOOD_COL)?.str()?;
        let prices = summary.column(AVG_PRICE_COL)?.f64()?;
        let revenues = summary.column(AVG_REVENUE_COL)?.f64()?;
        let occupancies = summary.column(AVG_OCCUPANCY_COL)?.f64()?;
        let counts = summary.column(LISTING_COUNT_COL)?.u64()?;

        let rows = (0..summary.height())
            .map(|i| NeighborhoodSummary {
                neighborhood: names.get(i).unwrap_or_default().to_string(),
                avg_nightly_price: prices.get(i).unwrap_or(f64::NAN),
                avg_monthly_revenue: revenues.get(i).unwrap_or(f64::NAN),
                avg_occupancy: occupancies.get(i).unwrap_or(f64::NAN),
                listing_count: counts.get(i).unwrap_or(0),
            })
            .collect();
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use polars::df;

    fn area_candidates() -> Vec<String> {
        vec!["neighbourhood_cleansed".into(), "neighbourhood".into()]
    }

    /// `count` listings in `area`, each with the given price and occupancy.
    fn listings(area: &str, count: usize, price: f64, occupancy: f64) -> DataFrame {
        let revenue = price * 30.0 * occupancy;
        df!(
            "id" => (0..count as i64).collect::<Vec<_>>(),
            "neighbourhood" => vec![area; count],
            "price_clean" => vec![price; count],
            "occupancy_rate" => vec![occupancy; count],
            "projected_revenue" => vec![revenue; count]
        )
        .unwrap()
    }

    fn stacked(parts: &[DataFrame]) -> DataFrame {
        let mut out = parts[0].clone();
        for part in &parts[1..] {
            out.vstack_mut(part).unwrap();
        }
        out
    }

    #[test]
    fn percentile_interpolates_linearly() {
        let values: Vec<f64> = (1..=10).map(|v| v as f64).collect();
        // rank = 0.95 * 9 = 8.55 -> 9 + 0.55 * (10 - 9)
        assert!((StatsCalculator::percentile(&values, 95.0) - 9.55).abs() < 1e-12);
        assert_eq!(StatsCalculator::percentile(&values, 100.0), 10.0);
        assert_eq!(StatsCalculator::percentile(&values, 0.0), 1.0);
    }

    #[test]
    fn percentile_degenerate_inputs() {
        assert!(StatsCalculator::percentile(&[], 95.0).is_nan());
        assert_eq!(StatsCalculator::percentile(&[42.0], 95.0), 42.0);
    }

    #[test]
    fn outlier_removal_keeps_rows_strictly_below_cap() {
        let prices: Vec<f64> = (1..=100).map(|v| v as f64 * 10.0).collect();
        let df = df!("price_clean" => prices).unwrap();

        let cut = StatsCalculator::remove_price_outliers(&df, 95.0).unwrap();
        // rank = 0.95 * 99 = 94.05 -> 950 + 0.05 * 10
        assert!((cut.price_cap - 950.5).abs() < 1e-9);
        let kept = StatsCalculator::column_values(&cut.kept, "price_clean").unwrap();
        assert_eq!(kept.len(), 95);
        assert!(kept.iter().all(|p| *p < cut.price_cap));
    }

    #[test]
    fn small_sample_still_gets_a_cap() {
        // Three prices: rank = 1.9 -> 200 + 0.9 * 100
        let df = df!("price_clean" => [300.0, 100.0, 200.0]).unwrap();
        let cut = StatsCalculator::remove_price_outliers(&df, 95.0).unwrap();
        assert!((cut.price_cap - 290.0).abs() < 1e-9);
        assert_eq!(cut.kept.height(), 2);
    }

    #[test]
    fn identical_prices_are_all_removed() {
        // Cap equals every price, and only strictly lower prices survive
        let df = df!("price_clean" => [150.0; 5]).unwrap();
        let cut = StatsCalculator::remove_price_outliers(&df, 95.0).unwrap();
        assert_eq!(cut.price_cap, 150.0);
        assert_eq!(cut.kept.height(), 0);
    }

    #[test]
    fn empty_frame_yields_empty_cut() {
        let df = df!("price_clean" => Vec::<f64>::new()).unwrap();
        let cut = StatsCalculator::remove_price_outliers(&df, 95.0).unwrap();
        assert!(cut.price_cap.is_nan());
        assert_eq!(cut.kept.height(), 0);
    }

    #[test]
    fn aggregate_drops_small_areas_and_sorts_by_revenue() {
        let df = stacked(&[
            listings("Germantown", 25, 200.0, 0.5),
            listings("East Nashville", 30, 150.0, 0.7),
            listings("Antioch", 20, 500.0, 0.7),
            listings("The Gulch", 21, 300.0, 0.6),
        ]);

        let (area_col, summary) =
            StatsCalculator::aggregate_by_area(&df, &area_candidates(), 20).unwrap();
        assert_eq!(area_col, "neighbourhood");

        let rows = StatsCalculator::summary_rows(&summary).unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.neighborhood.as_str()).collect();
        assert_eq!(names, vec!["The Gulch", "East Nashville", "Germantown"]);
        assert!(rows.iter().all(|r| r.listing_count > 20));
        assert!(rows
            .windows(2)
            .all(|w| w[0].avg_monthly_revenue >= w[1].avg_monthly_revenue));

        let gulch = &rows[0];
        assert_eq!(gulch.listing_count, 21);
        assert!((gulch.avg_nightly_price - 300.0).abs() < 1e-9);
        assert!((gulch.avg_occupancy - 0.6).abs() < 1e-9);
        assert!((gulch.avg_monthly_revenue - 300.0 * 30.0 * 0.6).abs() < 1e-6);
    }

    #[test]
    fn revenue_ties_break_alphabetically() {
        let df = stacked(&[
            listings("Sylvan Park", 22, 100.0, 0.5),
            listings("Midtown", 22, 100.0, 0.5),
            listings("Belmont", 22, 100.0, 0.5),
        ]);

        let (_, summary) = StatsCalculator::aggregate_by_area(&df, &area_candidates(), 20).unwrap();
        let rows = StatsCalculator::summary_rows(&summary).unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.neighborhood.as_str()).collect();
        assert_eq!(names, vec!["Belmont", "Midtown", "Sylvan Park"]);
    }

    #[test]
    fn cleansed_key_wins_over_plain_key() {
        let mut df = listings("East", 21, 100.0, 0.5);
        df.with_column(Column::new(
            "neighbourhood_cleansed".into(),
            vec!["District 5"; 21],
        ))
        .unwrap();

        let (area_col, summary) =
            StatsCalculator::aggregate_by_area(&df, &area_candidates(), 20).unwrap();
        assert_eq!(area_col, "neighbourhood_cleansed");
        let rows = StatsCalculator::summary_rows(&summary).unwrap();
        assert_eq!(rows[0].neighborhood, "District 5");
    }

    #[test]
    fn missing_area_column_is_fatal() {
        let df = listings("East", 21, 100.0, 0.5)
            .drop("neighbourhood")
            .unwrap();
        match StatsCalculator::aggregate_by_area(&df, &area_candidates(), 20) {
            Err(PipelineError::MissingColumnCandidates { candidates }) => {
                assert_eq!(candidates, area_candidates())
            }
            other => panic!("Expected MissingColumnCandidates, got: {other:?}"),
        }
    }
}
