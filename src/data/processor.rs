//! Data Processor Module
//! Narrows the dataset to a country and an inclusive date range.

use crate::data::dataset::{columns, Dataset};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Unknown country: {0}")]
    UnknownCountry(String),
    #[error("Start date {start} is after end date {end}")]
    InvertedDateRange { start: NaiveDate, end: NaiveDate },
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

impl FilterError {
    /// True for rejected criteria; the user should be re-prompted.
    pub fn is_invalid_filter(&self) -> bool {
        matches!(
            self,
            FilterError::UnknownCountry(_) | FilterError::InvertedDateRange { .. }
        )
    }
}

/// User-selected filter: a country and an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub country: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FilterCriteria {
    pub fn new(country: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            country: country.into(),
            start,
            end,
        }
    }

    /// Criteria covering the dataset's whole date range.
    pub fn full_range(dataset: &Dataset, country: impl Into<String>) -> Option<Self> {
        let (start, end) = dataset.date_range()?;
        Some(Self::new(country, start, end))
    }
}

/// A filtered subset of the dataset; the dataset itself is untouched.
#[derive(Debug, Clone)]
pub struct FilteredView {
    criteria: FilterCriteria,
    frame: DataFrame,
}

impl FilteredView {
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }
}

/// Handles filtering of the transactions dataset.
pub struct DataProcessor;

impl DataProcessor {
    /// Reject criteria the dataset cannot satisfy.
    pub fn validate(dataset: &Dataset, criteria: &FilterCriteria) -> Result<(), FilterError> {
        if !dataset.has_country(&criteria.country) {
            return Err(FilterError::UnknownCountry(criteria.country.clone()));
        }
        if criteria.start > criteria.end {
            return Err(FilterError::InvertedDateRange {
                start: criteria.start,
                end: criteria.end,
            });
        }
        Ok(())
    }

    /// Select records of `criteria.country` whose invoice date (time of day
    /// ignored) lies within `start..=end`. No match yields an empty view.
    pub fn filter(dataset: &Dataset, criteria: &FilterCriteria) -> Result<FilteredView, FilterError> {
        Self::validate(dataset, criteria)?;

        let frame = dataset
            .frame()
            .clone()
            .lazy()
            .filter(
                col(columns::COUNTRY)
                    .eq(lit(criteria.country.as_str()))
                    .and(col(columns::INVOICE_DAY).gt_eq(lit(criteria.start)))
                    .and(col(columns::INVOICE_DAY).lt_eq(lit(criteria.end))),
            )
            .collect()?;

        debug!(
            country = %criteria.country,
            start = %criteria.start,
            end = %criteria.end,
            rows = frame.height(),
            "filtered dataset"
        );

        Ok(FilteredView {
            criteria: criteria.clone(),
            frame,
        })
    }
}
