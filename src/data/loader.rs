//! CSV Data Loader Module
//! Handles listing file loading and column lookups using Polars.

use crate::error::{PipelineError, Result};
use log::{debug, info};
use polars::prelude::*;
use std::path::Path;

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file into memory. The whole file is scanned for schema
    /// inference so that late rows cannot change a column's type.
    pub fn load_csv(path: &Path) -> Result<DataFrame> {
        if !path.is_file() {
            return Err(PipelineError::MissingInput {
                path: path.to_path_buf(),
            });
        }

        info!("Loading data from {}...", path.display());
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;

        debug!("Columns: {:?}", Self::get_columns(&df));
        info!("Loaded {} rows", df.height());
        Ok(df)
    }

    /// Get list of column names from a DataFrame.
    pub fn get_columns(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn has_column(df: &DataFrame, name: &str) -> bool {
        df.get_column_names().iter().any(|c| c.as_str() == name)
    }

    /// Fail with `MissingColumn` unless every name is present.
    pub fn require_columns(df: &DataFrame, names: &[&str]) -> Result<()> {
        match names.iter().find(|name| !Self::has_column(df, name)) {
            Some(missing) => Err(PipelineError::MissingColumn {
                column: missing.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Pick the first candidate column present in the frame.
    pub fn resolve_column<'a>(df: &DataFrame, candidates: &'a [String]) -> Result<&'a str> {
        candidates
            .iter()
            .find(|name| Self::has_column(df, name))
            .map(|name| name.as_str())
            .ok_or_else(|| PipelineError::MissingColumnCandidates {
                candidates: candidates.to_vec(),
            })
    }
}
