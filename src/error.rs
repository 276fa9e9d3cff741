//! Error Module
//! Fatal conditions that halt a pipeline run.

use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("'{}' not found", path.display())]
    MissingInput { path: PathBuf },
    #[error("'{column}' column not found")]
    MissingColumn { column: String },
    #[error("Could not find a neighborhood column (tried {}). Please check your CSV.", candidates.join(", "))]
    MissingColumnCandidates { candidates: Vec<String> },
    /// `listing` is `id <id>` when the listing has an id, else `row <n>`.
    #[error("Cannot parse price '{value}' for listing {listing}")]
    DataParse { listing: String, value: String },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// True for both the single-column and the fallback-exhausted cases.
    pub fn is_missing_column(&self) -> bool {
        matches!(
            self,
            PipelineError::MissingColumn { .. } | PipelineError::MissingColumnCandidates { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
