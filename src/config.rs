//! Application Configuration
//! Defaults for the dashboard session; not persisted.

use crate::stats::TOP_PRODUCTS;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Source file loaded at startup, relative to the working directory.
pub const DEFAULT_SOURCE: &str = "Online_Retail.csv";

pub const APP_TITLE: &str = "Online Sales Insights Dashboard";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub source_path: PathBuf,
    pub top_n: usize,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
    /// Width and height of exported chart images, in pixels.
    pub chart_export_size: (u32, u32),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from(DEFAULT_SOURCE),
            top_n: TOP_PRODUCTS,
            window_size: [1400.0, 900.0],
            min_window_size: [1000.0, 700.0],
            chart_export_size: (1200, 700),
        }
    }
}
