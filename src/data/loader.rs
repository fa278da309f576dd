//! CSV Data Loader Module
//! Reads the latin-1 transactions CSV with Polars and normalizes it into a `Dataset`.

use crate::data::dataset::{columns, Dataset, Transaction};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Timestamp layouts accepted for `InvoiceDate`, tried in order.
const DATE_TIME_FORMATS: [&str; 5] = [
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

/// Date-only layouts; the time of day becomes midnight.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Source not found: {}: {source}", .path.display())]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },
    #[error("Malformed InvoiceDate {value:?} in record {record}")]
    MalformedDate { record: usize, value: String },
    #[error("Malformed {column} value {value:?} in record {record}")]
    MalformedValue {
        column: &'static str,
        record: usize,
        value: String,
    },
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
}

/// Load and normalize a transactions CSV from disk.
pub fn load(path: impl AsRef<Path>) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| LoadError::SourceNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "read source file");

    let records = parse_records(&bytes)?;
    let dataset = Dataset::from_transactions(Some(path.to_path_buf()), &records)?;

    info!(
        path = %path.display(),
        rows = dataset.len(),
        countries = dataset.countries().len(),
        "dataset loaded"
    );
    Ok(dataset)
}

/// Load and normalize a transactions CSV held in memory.
pub fn load_bytes(bytes: &[u8]) -> Result<Dataset, LoadError> {
    let records = parse_records(bytes)?;
    Ok(Dataset::from_transactions(None, &records)?)
}

/// Decode windows-1252 source bytes to UTF-8.
///
/// This is what the WHATWG `latin1` label resolves to, so bytes 0x80-0x9F
/// become windows-1252 punctuation rather than ISO-8859-1 control codes.
/// Every byte decodes. A UTF-8 byte order mark switches decoding to UTF-8.
pub fn decode_source(bytes: &[u8]) -> String {
    let (text, _encoding, _had_errors) = encoding_rs::WINDOWS_1252.decode(bytes);
    text.into_owned()
}

/// Parse an `InvoiceDate` cell.
pub fn parse_invoice_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

/// Read the CSV with every column as a string, then normalize row by row.
fn parse_records(bytes: &[u8]) -> Result<Vec<Transaction>, LoadError> {
    let text = decode_source(bytes);

    // Schema inference over zero rows reads every column as String.
    let raw = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
        .finish()?;

    check_schema(&raw)?;

    let invoice_no = raw.column(columns::INVOICE_NO)?.str()?;
    let description = raw.column(columns::DESCRIPTION)?.str()?;
    let quantity = raw.column(columns::QUANTITY)?.str()?;
    let unit_price = raw.column(columns::UNIT_PRICE)?.str()?;
    let invoice_date = raw.column(columns::INVOICE_DATE)?.str()?;
    let customer_id = raw.column(columns::CUSTOMER_ID)?.str()?;
    let country = raw.column(columns::COUNTRY)?.str()?;

    let mut records: Vec<Transaction> = Vec::with_capacity(raw.height());
    for i in 0..raw.height() {
        let record = i + 1;

        // Only these two columns decide whether a record is kept.
        let (Some(desc), Some(customer)) =
            (present(description.get(i)), present(customer_id.get(i)))
        else {
            continue;
        };

        let qty_raw = quantity.get(i).unwrap_or_default();
        let qty = parse_quantity(qty_raw).ok_or_else(|| LoadError::MalformedValue {
            column: columns::QUANTITY,
            record,
            value: qty_raw.to_string(),
        })?;

        let price_raw = unit_price.get(i).unwrap_or_default();
        let price = parse_price(price_raw).ok_or_else(|| LoadError::MalformedValue {
            column: columns::UNIT_PRICE,
            record,
            value: price_raw.to_string(),
        })?;

        let date_raw = invoice_date.get(i).unwrap_or_default();
        let date = parse_invoice_date(date_raw).ok_or_else(|| LoadError::MalformedDate {
            record,
            value: date_raw.to_string(),
        })?;

        records.push(Transaction {
            invoice_no: invoice_no.get(i).unwrap_or_default().to_string(),
            description: desc.to_string(),
            quantity: qty,
            unit_price: price,
            invoice_date: date,
            customer_id: customer.trim().to_string(),
            country: country.get(i).unwrap_or_default().to_string(),
        });
    }

    debug!(
        raw_rows = raw.height(),
        kept = records.len(),
        dropped = raw.height() - records.len(),
        "normalized records"
    );
    Ok(records)
}

fn check_schema(raw: &DataFrame) -> Result<(), LoadError> {
    let names: Vec<String> = raw
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let missing: Vec<String> = columns::REQUIRED
        .iter()
        .filter(|required| !names.iter().any(|name| name == *required))
        .map(|required| required.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(LoadError::Schema { missing })
    }
}

/// Whole quantities, also when exported as floats (`2.0`).
fn parse_quantity(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Ok(qty) = value.parse::<i64>() {
        return Some(qty);
    }
    let qty = value.parse::<f64>().ok()?;
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound.
    (qty.is_finite() && qty.fract() == 0.0 && qty >= i64::MIN as f64 && qty < i64::MAX as f64)
        .then_some(qty as i64)
}

/// `f64::from_str` accepts `NaN` and `inf`; prices must be finite.
fn parse_price(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|price| price.is_finite())
}

/// Null and blank cells both count as missing.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
