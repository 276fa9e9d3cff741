//! Stats module - Outlier cutoff and neighborhood aggregation

mod calculator;

pub use calculator::*;
