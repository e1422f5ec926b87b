//! CSV snapshot parsing.
//!
//! The snapshot is produced upstream by the scraper with a fixed header
//! row. Cells are free text; empty optional cells become `None`, and a
//! row without a booking link gets one constructed from its route and
//! dates.

use std::path::Path;

use serde::Deserialize;

use crate::domain::{FlightRow, united_booking_link};

use super::StoredRow;
use super::error::StoreError;

/// Columns that must be present for the snapshot to be servable.
const REQUIRED_COLUMNS: [&str; 4] = ["origin", "destination", "depart_date", "return_date"];

/// One raw CSV record. Optional columns may be absent entirely.
#[derive(Debug, Deserialize)]
struct CsvRow {
    origin: String,
    destination: String,
    depart_date: String,
    return_date: String,
    #[serde(default)]
    price_total: Option<String>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    validating_airline: Option<String>,
    #[serde(default)]
    outbound_legs: Option<String>,
    #[serde(default)]
    return_legs: Option<String>,
    #[serde(default)]
    united_booking_link: Option<String>,
}

/// Treat empty or whitespace-only cells as absent.
fn clean(cell: Option<String>) -> Option<String> {
    cell.filter(|s| !s.trim().is_empty())
}

/// Parse a price cell to a finite number, for filtering and sorting.
fn parse_price(cell: Option<&str>) -> Option<f64> {
    cell.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|p| p.is_finite())
}

impl From<CsvRow> for StoredRow {
    fn from(raw: CsvRow) -> Self {
        let price_total = clean(raw.price_total);
        let price_num = parse_price(price_total.as_deref());

        let booking_link = clean(raw.united_booking_link).unwrap_or_else(|| {
            united_booking_link(
                &raw.origin,
                &raw.destination,
                &raw.depart_date,
                &raw.return_date,
            )
        });

        StoredRow {
            row: FlightRow {
                origin: raw.origin,
                destination: raw.destination,
                depart_date: raw.depart_date,
                return_date: raw.return_date,
                price_total,
                currency: clean(raw.currency),
                validating_airline: clean(raw.validating_airline),
                outbound_legs: raw.outbound_legs.unwrap_or_default(),
                return_legs: raw.return_legs.unwrap_or_default(),
                united_booking_link: booking_link,
            },
            price_num,
        }
    }
}

/// Read all rows from the snapshot at `path`.
pub(super) fn read_rows(path: &Path) -> Result<Vec<StoredRow>, StoreError> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(StoreError::MissingColumn(required));
        }
    }

    let mut rows = Vec::new();
    for record in reader.deserialize::<CsvRow>() {
        rows.push(StoredRow::from(record?));
    }
    Ok(rows)
}

/// Build stored rows from already-typed flight rows (tests, embedding).
pub(super) fn from_flight_rows(rows: Vec<FlightRow>) -> Vec<StoredRow> {
    rows.into_iter()
        .map(|row| {
            let price_num = parse_price(row.price_total.as_deref());
            StoredRow { row, price_num }
        })
        .collect()
}
