//! Dataset Module
//! The normalized, immutable transactions table and its presentation metadata.

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Column names of the canonical transactions frame.
pub mod columns {
    pub const INVOICE_NO: &str = "InvoiceNo";
    pub const DESCRIPTION: &str = "Description";
    pub const QUANTITY: &str = "Quantity";
    pub const UNIT_PRICE: &str = "UnitPrice";
    pub const INVOICE_DATE: &str = "InvoiceDate";
    pub const CUSTOMER_ID: &str = "CustomerID";
    pub const COUNTRY: &str = "Country";

    /// Derived at load time: `Quantity * UnitPrice`.
    pub const TOTAL_SALES: &str = "TotalSales";
    /// Derived at load time: calendar date of `InvoiceDate`.
    pub const INVOICE_DAY: &str = "InvoiceDay";

    /// Columns the source file must provide.
    pub const REQUIRED: [&str; 7] = [
        INVOICE_NO,
        DESCRIPTION,
        QUANTITY,
        UNIT_PRICE,
        INVOICE_DATE,
        CUSTOMER_ID,
        COUNTRY,
    ];
}

/// A single normalized sales line.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub invoice_no: String,
    pub description: String,
    /// Negative for returns.
    pub quantity: i64,
    pub unit_price: f64,
    pub invoice_date: NaiveDateTime,
    pub customer_id: String,
    pub country: String,
}

impl Transaction {
    pub fn total_sales(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

/// The full normalized collection of transactions.
///
/// Built once per load and never mutated; filtering produces new views.
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
    source: Option<PathBuf>,
    countries: Vec<String>,
    date_bounds: Option<(NaiveDateTime, NaiveDateTime)>,
}

impl Dataset {
    /// Build the canonical frame from normalized records, preserving their order.
    pub fn from_transactions(
        source: Option<PathBuf>,
        records: &[Transaction],
    ) -> PolarsResult<Self> {
        let n = records.len();
        let mut invoice_nos: Vec<String> = Vec::with_capacity(n);
        let mut descriptions: Vec<String> = Vec::with_capacity(n);
        let mut quantities: Vec<i64> = Vec::with_capacity(n);
        let mut unit_prices: Vec<f64> = Vec::with_capacity(n);
        let mut invoice_dates: Vec<NaiveDateTime> = Vec::with_capacity(n);
        let mut customer_ids: Vec<String> = Vec::with_capacity(n);
        let mut country_col: Vec<String> = Vec::with_capacity(n);
        let mut total_sales: Vec<f64> = Vec::with_capacity(n);

        let mut countries: BTreeSet<String> = BTreeSet::new();
        let mut date_bounds: Option<(NaiveDateTime, NaiveDateTime)> = None;

        for record in records {
            invoice_nos.push(record.invoice_no.clone());
            descriptions.push(record.description.clone());
            quantities.push(record.quantity);
            unit_prices.push(record.unit_price);
            invoice_dates.push(record.invoice_date);
            customer_ids.push(record.customer_id.clone());
            country_col.push(record.country.clone());
            total_sales.push(record.total_sales());

            countries.insert(record.country.clone());
            date_bounds = Some(match date_bounds {
                None => (record.invoice_date, record.invoice_date),
                Some((min, max)) => (min.min(record.invoice_date), max.max(record.invoice_date)),
            });
        }

        let invoice_days: Vec<NaiveDate> = invoice_dates.iter().map(|dt| dt.date()).collect();
        let invoice_date = DatetimeChunked::from_naive_datetime(
            columns::INVOICE_DATE.into(),
            invoice_dates,
            TimeUnit::Milliseconds,
        );
        let invoice_day = DateChunked::from_naive_date(columns::INVOICE_DAY.into(), invoice_days);

        let frame = DataFrame::new(vec![
            Column::new(columns::INVOICE_NO.into(), invoice_nos),
            Column::new(columns::DESCRIPTION.into(), descriptions),
            Column::new(columns::QUANTITY.into(), quantities),
            Column::new(columns::UNIT_PRICE.into(), unit_prices),
            Column::from(invoice_date.into_series()),
            Column::new(columns::CUSTOMER_ID.into(), customer_ids),
            Column::new(columns::COUNTRY.into(), country_col),
            Column::new(columns::TOTAL_SALES.into(), total_sales),
            Column::from(invoice_day.into_series()),
        ])?;

        Ok(Self {
            frame,
            source,
            countries: countries.into_iter().collect(),
            date_bounds,
        })
    }

    /// Get a reference to the underlying DataFrame.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Path the dataset was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Distinct countries, sorted ascending.
    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    pub fn has_country(&self, country: &str) -> bool {
        self.countries
            .binary_search_by(|c| c.as_str().cmp(country))
            .is_ok()
    }

    /// Earliest and latest invoice timestamps; `None` for an empty dataset.
    pub fn date_bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.date_bounds
    }

    /// Date-only bounds, as offered to a range picker.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.date_bounds.map(|(min, max)| (min.date(), max.date()))
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }
}
