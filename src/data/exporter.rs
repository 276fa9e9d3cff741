//! CSV Exporter Module
//! Writes the cleaned listing table back to disk.

use crate::error::Result;
use log::info;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Writes DataFrames as comma-delimited CSV with a header row.
pub struct DataExporter;

impl DataExporter {
    /// Write `df` to `path`, truncating any existing file.
    pub fn write_csv(df: &DataFrame, path: &Path) -> Result<()> {
        let mut file = File::create(path)?;
        let mut out = df.clone();
        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .finish(&mut out)?;

        info!("Wrote {} rows to {}", df.height(), path.display());
        Ok(())
    }
}
