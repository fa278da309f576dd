//! Stats module - summary metrics and product rankings

mod calculator;

pub use calculator::{ProductSales, SalesCalculator, Summary, TOP_PRODUCTS};
