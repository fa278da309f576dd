//! Retail Insights - Online Sales Dashboard Core
//!
//! Loads the retail transactions CSV, filters it by country and date range,
//! and computes the overview metrics and top-products ranking the dashboard
//! renders. The egui front end lives in the binary.

pub mod charts;
pub mod config;
pub mod data;
pub mod report;
pub mod ropa;
pub mod stats;
