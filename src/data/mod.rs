//! Data module - CSV loading, listing processing and export

mod exporter;
mod loader;
mod processor;

pub use exporter::DataExporter;
pub use loader::DataLoader;
pub use processor::*;
