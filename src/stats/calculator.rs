//! Sales Calculator Module
//! Summary metrics and the ranked top-products aggregation over a filtered view.

use crate::data::{columns, FilteredView};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of products shown in the dashboard ranking.
pub const TOP_PRODUCTS: usize = 5;

/// Overview metrics for a view.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub total_sales: f64,
}

/// Summed sales of one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSales {
    pub description: String,
    pub sales: f64,
}

/// Handles aggregation over filtered views.
pub struct SalesCalculator;

impl SalesCalculator {
    /// Transaction count and summed `TotalSales` (0 / 0.0 for an empty view).
    pub fn summarize(view: &FilteredView) -> PolarsResult<Summary> {
        let total_sales = view
            .frame()
            .column(columns::TOTAL_SALES)?
            .f64()?
            .into_iter()
            .flatten()
            .sum::<f64>();

        Ok(Summary {
            count: view.len(),
            total_sales,
        })
    }

    /// Products ranked by summed `TotalSales`, highest first, at most `n` entries.
    ///
    /// Equal sums are ordered by description ascending so the ranking is
    /// reproducible.
    pub fn top_products(view: &FilteredView, n: usize) -> PolarsResult<Vec<ProductSales>> {
        if n == 0 || view.is_empty() {
            return Ok(Vec::new());
        }

        let ranked = view
            .frame()
            .clone()
            .lazy()
            .group_by([col(columns::DESCRIPTION)])
            .agg([col(columns::TOTAL_SALES).sum()])
            .sort_by_exprs(
                [col(columns::TOTAL_SALES), col(columns::DESCRIPTION)],
                SortMultipleOptions::default().with_order_descending_multi([true, false]),
            )
            .limit(IdxSize::try_from(n).unwrap_or(IdxSize::MAX))
            .collect()?;

        let descriptions = ranked.column(columns::DESCRIPTION)?.str()?;
        let sales = ranked.column(columns::TOTAL_SALES)?.f64()?;

        let products: Vec<ProductSales> = descriptions
            .into_iter()
            .zip(sales.into_iter())
            .filter_map(|(description, sales)| {
                Some(ProductSales {
                    description: description?.to_string(),
                    sales: sales?,
                })
            })
            .collect();

        debug!(requested = n, returned = products.len(), "ranked top products");
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataProcessor, Dataset, FilterCriteria, Transaction};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn record(description: &str, quantity: i64, unit_price: f64, day: u32, country: &str) -> Transaction {
        Transaction {
            invoice_no: "536365".to_string(),
            description: description.to_string(),
            quantity,
            unit_price,
            invoice_date: NaiveDate::from_ymd_opt(2011, 1, day)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap(),
            customer_id: "17850".to_string(),
            country: country.to_string(),
        }
    }

    fn view_of(records: &[Transaction], country: &str) -> FilteredView {
        let dataset = Dataset::from_transactions(None, records).unwrap();
        let criteria = FilterCriteria::full_range(&dataset, country).unwrap();
        DataProcessor::filter(&dataset, &criteria).unwrap()
    }

    fn product(description: &str, sales: f64) -> ProductSales {
        ProductSales {
            description: description.to_string(),
            sales,
        }
    }

    #[test]
    fn worked_example() {
        let view = view_of(
            &[
                record("A", 2, 3.0, 3, "UK"),
                record("A", 1, 3.0, 4, "UK"),
                record("B", 5, 1.0, 5, "UK"),
            ],
            "UK",
        );

        let top = SalesCalculator::top_products(&view, TOP_PRODUCTS).unwrap();
        let summary = SalesCalculator::summarize(&view).unwrap();

        assert_eq!(top, vec![product("A", 9.0), product("B", 5.0)]);
        assert_eq!(
            summary,
            Summary {
                count: 3,
                total_sales: 14.0
            }
        );
    }

    #[test]
    fn country_without_records_in_range_is_empty() {
        let records = [record("A", 2, 3.0, 3, "UK"), record("B", 1, 1.0, 20, "France")];
        let dataset = Dataset::from_transactions(None, &records).unwrap();
        let criteria = FilterCriteria::new(
            "France",
            NaiveDate::from_ymd_opt(2011, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2011, 1, 10).unwrap(),
        );
        let view = DataProcessor::filter(&dataset, &criteria).unwrap();

        assert_eq!(SalesCalculator::summarize(&view).unwrap(), Summary::default());
        assert!(SalesCalculator::top_products(&view, TOP_PRODUCTS).unwrap().is_empty());
    }

    #[test]
    fn truncates_to_n_highest() {
        let records: Vec<Transaction> = ["P1", "P2", "P3", "P4", "P5", "P6", "P7"]
            .iter()
            .enumerate()
            .map(|(i, p)| record(p, i as i64 + 1, 1.0, 2, "UK"))
            .collect();
        let view = view_of(&records, "UK");

        let top = SalesCalculator::top_products(&view, 5).unwrap();

        let names: Vec<&str> = top.iter().map(|p| p.description.as_str()).collect();
        assert_eq!(names, ["P7", "P6", "P5", "P4", "P3"]);
    }

    #[test]
    fn ties_break_by_description_ascending() {
        let view = view_of(
            &[
                record("ZEBRA MUG", 2, 2.0, 2, "UK"),
                record("ALPHA MUG", 4, 1.0, 3, "UK"),
                record("MIDDLE MUG", 1, 4.0, 4, "UK"),
                record("TOP MUG", 1, 10.0, 5, "UK"),
            ],
            "UK",
        );

        let top = SalesCalculator::top_products(&view, 5).unwrap();

        let names: Vec<&str> = top.iter().map(|p| p.description.as_str()).collect();
        assert_eq!(names, ["TOP MUG", "ALPHA MUG", "MIDDLE MUG", "ZEBRA MUG"]);
    }

    #[test]
    fn returns_reduce_product_sales() {
        let view = view_of(
            &[
                record("LANTERN", 6, 3.0, 2, "UK"),
                record("LANTERN", -2, 3.0, 3, "UK"),
                record("CANDLE", 1, 5.0, 4, "UK"),
            ],
            "UK",
        );

        let top = SalesCalculator::top_products(&view, 5).unwrap();

        assert_eq!(top, vec![product("LANTERN", 12.0), product("CANDLE", 5.0)]);
    }

    #[test]
    fn zero_requested_is_empty() {
        let view = view_of(&[record("A", 1, 1.0, 2, "UK")], "UK");
        assert!(SalesCalculator::top_products(&view, 0).unwrap().is_empty());
    }

    fn arb_record() -> impl Strategy<Value = Transaction> {
        (
            prop::sample::select(vec!["LANTERN", "CANDLE", "MUG", "HEART", "CLOCK", "BAG", "TIN"]),
            -20i64..100,
            0u32..2000,
            1u32..29,
            prop::sample::select(vec!["United Kingdom", "France"]),
        )
            .prop_map(|(description, quantity, cents, day, country)| {
                record(description, quantity, cents as f64 / 100.0, day, country)
            })
    }

    proptest! {
        /// TotalSales over a view sums to exactly Quantity * UnitPrice over the same rows.
        #[test]
        fn total_sales_matches_quantity_times_price(
            records in prop::collection::vec(arb_record(), 1..60),
        ) {
            let country = records[0].country.clone();
            let view = view_of(&records, &country);

            let expected: f64 = records
                .iter()
                .filter(|r| r.country == country)
                .map(|r| r.quantity as f64 * r.unit_price)
                .sum();
            let summary = SalesCalculator::summarize(&view).unwrap();

            prop_assert_eq!(summary.total_sales, expected);
            prop_assert_eq!(summary.count, records.iter().filter(|r| r.country == country).count());
        }

        /// The ranking never exceeds five entries and only names products in the view.
        #[test]
        fn top_products_bounded_and_from_view(
            records in prop::collection::vec(arb_record(), 1..60),
        ) {
            let country = records[0].country.clone();
            let view = view_of(&records, &country);

            let top = SalesCalculator::top_products(&view, TOP_PRODUCTS).unwrap();

            prop_assert!(top.len() <= TOP_PRODUCTS);
            for entry in &top {
                prop_assert!(records
                    .iter()
                    .any(|r| r.country == country && r.description == entry.description));
            }
            for pair in top.windows(2) {
                prop_assert!(pair[0].sales >= pair[1].sales);
            }
        }
    }
}
