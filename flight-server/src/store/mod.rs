//! In-process flight search over the CSV snapshot.
//!
//! The store loads the scraped snapshot once at startup and serves the
//! filter/sort/paginate capability the rest of the system consumes.
//! Dates compare lexicographically (ISO dates order correctly as
//! strings); rows without a numeric price pass every price filter and
//! always sort after priced rows.

mod csv;
mod error;

use std::cmp::Ordering;
use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use crate::controller::{SearchBackend, SearchFailed};
use crate::domain::{FlightQuery, FlightRow, Iata, SearchResult, SortKey, SortOrder};

pub use error::StoreError;

/// Default page size of the service API (the interactive client asks
/// for 100; the raw API hands out up to 200 by default).
pub const DEFAULT_API_LIMIT: usize = 200;

/// A snapshot row with its price pre-parsed for numeric work.
#[derive(Debug, Clone)]
pub(crate) struct StoredRow {
    pub(crate) row: FlightRow,
    pub(crate) price_num: Option<f64>,
}

/// A fully validated, server-side search request.
#[derive(Debug, Clone)]
pub struct StoreQuery {
    pub origin: Option<Iata>,
    pub destination: Option<Iata>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort_by: SortKey,
    pub order: SortOrder,
    pub offset: usize,
    pub limit: usize,
}

impl Default for StoreQuery {
    fn default() -> Self {
        Self {
            origin: None,
            destination: None,
            start_date: None,
            end_date: None,
            min_price: None,
            max_price: None,
            sort_by: SortKey::DepartDate,
            order: SortOrder::Asc,
            offset: 0,
            limit: DEFAULT_API_LIMIT,
        }
    }
}

/// The loaded snapshot and its search operation.
pub struct FlightStore {
    rows: Vec<StoredRow>,
}

impl FlightStore {
    /// Load the snapshot at `path`.
    ///
    /// Fails with [`StoreError::SnapshotMissing`] when the file does not
    /// exist, so a misconfigured deployment is caught at startup.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(StoreError::SnapshotMissing {
                path: path.display().to_string(),
            });
        }

        let rows = csv::read_rows(path)?;
        info!(rows = rows.len(), path = %path.display(), "loaded flight snapshot");
        Ok(Self { rows })
    }

    /// Build a store from already-typed rows (tests, embedding).
    pub fn from_rows(rows: Vec<FlightRow>) -> Self {
        Self {
            rows: csv::from_flight_rows(rows),
        }
    }

    /// Number of rows in the snapshot.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the snapshot has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn matches(stored: &StoredRow, query: &StoreQuery) -> bool {
        let row = &stored.row;

        if let Some(origin) = &query.origin {
            if !row.origin.eq_ignore_ascii_case(origin.as_str()) {
                return false;
            }
        }
        if let Some(destination) = &query.destination {
            if !row.destination.eq_ignore_ascii_case(destination.as_str()) {
                return false;
            }
        }

        if let Some(start) = &query.start_date {
            if row.depart_date.as_str() < start.as_str() {
                return false;
            }
        }
        // The date window's upper bound cuts on the RETURN date: the
        // whole trip must be over by end_date.
        if let Some(end) = &query.end_date {
            if row.return_date.as_str() > end.as_str() {
                return false;
            }
        }

        // Rows without a numeric price pass every price filter.
        if let Some(min) = query.min_price {
            if stored.price_num.is_some_and(|p| p < min) {
                return false;
            }
        }
        if let Some(max) = query.max_price {
            if stored.price_num.is_some_and(|p| p > max) {
                return false;
            }
        }

        true
    }

    /// Execute a search: filter, sort, count, and cut one page.
    ///
    /// `total` counts all matching rows before the page is cut.
    pub fn search(&self, query: &StoreQuery) -> SearchResult {
        let mut matched: Vec<&StoredRow> =
            self.rows.iter().filter(|r| Self::matches(r, query)).collect();

        let descending = query.order == SortOrder::Desc;
        match query.sort_by {
            SortKey::PriceTotal => {
                // Unpriced rows sort last regardless of direction.
                matched.sort_by(|a, b| match (a.price_num, b.price_num) {
                    (Some(x), Some(y)) => {
                        let ord = x.total_cmp(&y);
                        if descending { ord.reverse() } else { ord }
                    }
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                });
            }
            SortKey::DepartDate => {
                matched.sort_by(|a, b| {
                    let ord = a.row.depart_date.cmp(&b.row.depart_date);
                    if descending { ord.reverse() } else { ord }
                });
            }
            SortKey::ReturnDate => {
                matched.sort_by(|a, b| {
                    let ord = a.row.return_date.cmp(&b.row.return_date);
                    if descending { ord.reverse() } else { ord }
                });
            }
        }

        let total = matched.len() as u64;
        let rows: Vec<FlightRow> = matched
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .map(|stored| stored.row.clone())
            .collect();

        SearchResult { total, rows }
    }
}

/// Map the client-side query onto a validated store query.
///
/// Mirrors the service boundary: airport codes must be 3 letters, price
/// text must be numeric; violations are recoverable client errors.
pub fn store_query(query: &FlightQuery) -> Result<StoreQuery, SearchFailed> {
    let parse_code = |field: &str, value: &Option<String>| -> Result<Option<Iata>, SearchFailed> {
        value
            .as_deref()
            .map(Iata::parse_normalized)
            .transpose()
            .map_err(|e| SearchFailed::new(format!("invalid {field}: {e}")))
    };
    let parse_price = |field: &str, value: &Option<String>| -> Result<Option<f64>, SearchFailed> {
        value
            .as_deref()
            .map(|s| s.trim().parse::<f64>())
            .transpose()
            .map_err(|_| SearchFailed::new(format!("invalid {field}: not a number")))
    };

    Ok(StoreQuery {
        origin: parse_code("origin", &query.origin)?,
        destination: parse_code("destination", &query.destination)?,
        start_date: query.start_date.clone(),
        end_date: query.end_date.clone(),
        min_price: parse_price("min_price", &query.min_price)?,
        max_price: parse_price("max_price", &query.max_price)?,
        sort_by: query.sort_by,
        order: query.order,
        offset: query.offset as usize,
        limit: query.limit as usize,
    })
}

#[async_trait]
impl SearchBackend for FlightStore {
    async fn search(&self, query: &FlightQuery) -> Result<SearchResult, SearchFailed> {
        let store_q = store_query(query)?;
        Ok(FlightStore::search(self, &store_q))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        origin: &str,
        depart: &str,
        ret: &str,
        price: Option<&str>,
    ) -> FlightRow {
        FlightRow {
            origin: origin.into(),
            destination: "MMH".into(),
            depart_date: depart.into(),
            return_date: ret.into(),
            price_total: price.map(Into::into),
            currency: price.map(|_| "USD".into()),
            validating_airline: Some("UA".into()),
            outbound_legs: format!("{origin} {depart}T07:00 → MMH {depart}T08:05 (UA5512)"),
            return_legs: format!("MMH {ret}T17:10 → {origin} {ret}T18:20 (UA5513)"),
            united_booking_link: "https://example.invalid/book".into(),
        }
    }

    fn fixture() -> FlightStore {
        FlightStore::from_rows(vec![
            row("SFO", "2025-01-10", "2025-01-12", Some("300.00")),
            row("SFO", "2025-01-17", "2025-01-19", Some("150.00")),
            row("sfo", "2025-01-24", "2025-01-26", None),
            row("OAK", "2025-01-10", "2025-01-12", Some("220.00")),
        ])
    }

    fn origins(result: &SearchResult) -> Vec<&str> {
        result.rows.iter().map(|r| r.origin.as_str()).collect()
    }

    #[test]
    fn no_filters_returns_everything() {
        let result = fixture().search(&StoreQuery::default());
        assert_eq!(result.total, 4);
        assert_eq!(result.rows.len(), 4);
    }

    #[test]
    fn origin_filter_is_case_insensitive() {
        let query = StoreQuery {
            origin: Some(Iata::parse("SFO").unwrap()),
            ..StoreQuery::default()
        };
        let result = fixture().search(&query);
        // The lowercase "sfo" snapshot row matches too
        assert_eq!(result.total, 3);
    }

    #[test]
    fn start_date_cuts_on_depart_date() {
        let query = StoreQuery {
            start_date: Some("2025-01-17".into()),
            ..StoreQuery::default()
        };
        let result = fixture().search(&query);
        assert_eq!(result.total, 2);
        assert!(result.rows.iter().all(|r| r.depart_date.as_str() >= "2025-01-17"));
    }

    #[test]
    fn end_date_cuts_on_return_date() {
        // The trip must be over by end_date: a flight departing
        // 2025-01-17 but returning 2025-01-19 survives an end_date of
        // 2025-01-19 and not one of 2025-01-18.
        let query = StoreQuery {
            end_date: Some("2025-01-19".into()),
            ..StoreQuery::default()
        };
        let result = fixture().search(&query);
        assert_eq!(result.total, 3);
        assert!(result.rows.iter().all(|r| r.return_date.as_str() <= "2025-01-19"));
    }

    #[test]
    fn unpriced_rows_pass_price_filters() {
        let query = StoreQuery {
            min_price: Some(200.0),
            max_price: Some(250.0),
            ..StoreQuery::default()
        };
        let result = fixture().search(&query);
        // 220.00 is in range; the unpriced row passes both bounds
        assert_eq!(result.total, 2);
        let prices: Vec<Option<&str>> =
            result.rows.iter().map(|r| r.price_total.as_deref()).collect();
        assert!(prices.contains(&Some("220.00")));
        assert!(prices.contains(&None));
    }

    #[test]
    fn price_sort_ascending_unpriced_last() {
        let query = StoreQuery {
            sort_by: SortKey::PriceTotal,
            ..StoreQuery::default()
        };
        let result = fixture().search(&query);
        let prices: Vec<Option<&str>> =
            result.rows.iter().map(|r| r.price_total.as_deref()).collect();
        assert_eq!(
            prices,
            vec![Some("150.00"), Some("220.00"), Some("300.00"), None]
        );
    }

    #[test]
    fn price_sort_descending_unpriced_still_last() {
        let query = StoreQuery {
            sort_by: SortKey::PriceTotal,
            order: SortOrder::Desc,
            ..StoreQuery::default()
        };
        let result = fixture().search(&query);
        let prices: Vec<Option<&str>> =
            result.rows.iter().map(|r| r.price_total.as_deref()).collect();
        assert_eq!(
            prices,
            vec![Some("300.00"), Some("220.00"), Some("150.00"), None]
        );
    }

    #[test]
    fn date_sort_descending() {
        let query = StoreQuery {
            sort_by: SortKey::DepartDate,
            order: SortOrder::Desc,
            ..StoreQuery::default()
        };
        let result = fixture().search(&query);
        let dates: Vec<&str> = result.rows.iter().map(|r| r.depart_date.as_str()).collect();
        assert_eq!(
            dates,
            vec!["2025-01-24", "2025-01-17", "2025-01-10", "2025-01-10"]
        );
    }

    #[test]
    fn pagination_counts_total_before_the_cut() {
        let query = StoreQuery {
            offset: 1,
            limit: 2,
            ..StoreQuery::default()
        };
        let result = fixture().search(&query);
        assert_eq!(result.total, 4);
        assert_eq!(result.rows.len(), 2);
    }

    #[test]
    fn offset_past_the_end_yields_empty_page() {
        let query = StoreQuery {
            offset: 100,
            ..StoreQuery::default()
        };
        let result = fixture().search(&query);
        assert_eq!(result.total, 4);
        assert!(result.rows.is_empty());
    }

    #[test]
    fn store_query_normalizes_codes() {
        let client = FlightQuery {
            origin: Some("sfo".into()),
            min_price: Some(" 150 ".into()),
            ..FlightQuery::default()
        };
        let sq = store_query(&client).unwrap();
        assert_eq!(sq.origin.unwrap().as_str(), "SFO");
        assert_eq!(sq.min_price, Some(150.0));
    }

    #[test]
    fn store_query_rejects_bad_input() {
        let client = FlightQuery {
            origin: Some("MAMMOTH".into()),
            ..FlightQuery::default()
        };
        assert!(store_query(&client).is_err());

        let client = FlightQuery {
            max_price: Some("lots".into()),
            ..FlightQuery::default()
        };
        let err = store_query(&client).unwrap_err();
        assert!(err.to_string().contains("max_price"));
    }

    #[tokio::test]
    async fn backend_impl_searches_with_client_query() {
        let store = fixture();
        let client = FlightQuery {
            origin: Some("OAK".into()),
            ..FlightQuery::default()
        };
        let page = SearchBackend::search(&store, &client).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.rows[0].origin, "OAK");
    }

    #[tokio::test]
    async fn controller_runs_against_the_store() {
        use crate::controller::QueryController;
        use std::sync::Arc;

        let controller = QueryController::new(Arc::new(fixture()));
        controller.initial_load().await;
        assert_eq!(controller.total(), 4);

        controller.edit_origin("sfo");
        controller.submit().await;
        assert_eq!(controller.total(), 3);
        assert_eq!(controller.query().origin.as_deref(), Some("SFO"));

        controller.toggle_sort(SortKey::PriceTotal).await;
        let rows = controller.rows();
        assert_eq!(rows[0].price_total.as_deref(), Some("150.00"));
        // Unpriced row trails even though the sort is ascending
        assert_eq!(rows.last().unwrap().price_total, None);
    }
}
