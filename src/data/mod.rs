//! Data module - CSV loading, caching and filtering

mod cache;
mod dataset;
mod loader;
mod processor;

pub use cache::DatasetCache;
pub use dataset::{columns, Dataset, Transaction};
pub use loader::{decode_source, load, load_bytes, parse_invoice_date, LoadError};
pub use processor::{DataProcessor, FilterCriteria, FilterError, FilteredView};
