//! Dashboard Report Module
//! Bundles the computed figures for one filter selection so the presentation
//! layer only reads values.

use crate::data::{DataProcessor, Dataset, FilterCriteria, FilterError};
use crate::ropa::{self, RopaEntry};
use crate::stats::{ProductSales, SalesCalculator, Summary};
use polars::prelude::PolarsError;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error("Aggregation failed: {0}")]
    Polars(#[from] PolarsError),
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportError {
    /// True when the user's selection was rejected rather than the computation failing.
    pub fn is_invalid_filter(&self) -> bool {
        matches!(self, ReportError::Filter(err) if err.is_invalid_filter())
    }
}

/// Everything the dashboard renders for one selection.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub criteria: FilterCriteria,
    pub summary: Summary,
    pub top_products: Vec<ProductSales>,
    pub ropa: &'static [RopaEntry],
}

impl DashboardReport {
    /// Filter the dataset and compute the overview and the top `top_n` products.
    pub fn build(
        dataset: &Dataset,
        criteria: &FilterCriteria,
        top_n: usize,
    ) -> Result<Self, ReportError> {
        let view = DataProcessor::filter(dataset, criteria)?;
        let summary = SalesCalculator::summarize(&view)?;
        let top_products = SalesCalculator::top_products(&view, top_n)?;

        Ok(Self {
            criteria: criteria.clone(),
            summary,
            top_products,
            ropa: ropa::entries(),
        })
    }

    /// Chart heading, e.g. "Top 5 Products in France".
    pub fn chart_title(&self, top_n: usize) -> String {
        format!("Top {} Products in {}", top_n, self.criteria.country)
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> Result<(), ReportError> {
        std::fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), "report exported");
        Ok(())
    }
}

/// Format a sales amount as `$1,234.56`; negatives render as `$-1,234.56`.
pub fn format_currency(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let digits = (cents / 100).to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("${}{}.{:02}", sign, grouped, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::load_bytes;
    use chrono::NaiveDate;

    const CSV: &str = "InvoiceNo,StockCode,Description,Quantity,InvoiceDate,UnitPrice,CustomerID,Country\n\
        536365,85123A,WHITE HANGING HEART T-LIGHT HOLDER,6,12/1/2010 8:26,2.55,17850,United Kingdom\n\
        536366,22633,HAND WARMER UNION JACK,6,12/1/2010 8:28,1.85,17850,United Kingdom\n\
        536370,22728,ALARM CLOCK BAKELIKE PINK,24,12/1/2010 8:45,3.75,12583,France\n\
        536370,22727,ALARM CLOCK BAKELIKE RED,24,12/1/2010 8:45,3.75,12583,France\n\
        536371,22086,PAPER CHAIN KIT 50'S CHRISTMAS,80,12/1/2010 9:00,2.55,13748,United Kingdom\n";

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2010, 12, d).unwrap()
    }

    #[test]
    fn builds_report_for_selection() {
        let dataset = load_bytes(CSV.as_bytes()).unwrap();
        let criteria = FilterCriteria::new("France", day(1), day(1));

        let report = DashboardReport::build(&dataset, &criteria, 5).unwrap();

        assert_eq!(report.summary.count, 2);
        assert_eq!(report.summary.total_sales, 24.0 * 3.75 + 24.0 * 3.75);
        assert_eq!(report.top_products.len(), 2);
        assert_eq!(report.top_products[0].description, "ALARM CLOCK BAKELIKE PINK");
        assert_eq!(report.ropa.len(), 4);
        assert_eq!(report.chart_title(5), "Top 5 Products in France");
    }

    #[test]
    fn invalid_selection_is_flagged() {
        let dataset = load_bytes(CSV.as_bytes()).unwrap();
        let criteria = FilterCriteria::new("France", day(9), day(1));

        let err = DashboardReport::build(&dataset, &criteria, 5).unwrap_err();

        assert!(err.is_invalid_filter());
    }

    #[test]
    fn json_export_contains_sections() {
        let dataset = load_bytes(CSV.as_bytes()).unwrap();
        let criteria = FilterCriteria::new("United Kingdom", day(1), day(31));
        let report = DashboardReport::build(&dataset, &criteria, 5).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        report.write_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["criteria"]["country"], "United Kingdom");
        assert_eq!(value["criteria"]["start"], "2010-12-01");
        assert_eq!(value["summary"]["count"], 3);
        assert_eq!(value["top_products"][0]["description"], "PAPER CHAIN KIT 50'S CHRISTMAS");
        assert_eq!(value["ropa"][3]["legal_basis"], "Contract");
    }

    #[test]
    fn formats_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(14.0), "$14.00");
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(8_187_806.364), "$8,187,806.36");
        assert_eq!(format_currency(-1234.567), "$-1,234.57");
    }
}
