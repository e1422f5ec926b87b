//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{DEFAULT_LIMIT, FlightQuery, SortKey, SortOrder};
use crate::store::DEFAULT_API_LIMIT;

/// Query parameters of `GET /api/flights`.
///
/// Parameter names are the wire contract; absent parameters fall back
/// to the service defaults (note the API page size default of 200,
/// larger than the interactive client's 100).
#[derive(Debug, Deserialize)]
pub struct FlightsParams {
    /// Origin airport code (3 letters)
    pub origin: Option<String>,

    /// Destination airport code (3 letters)
    pub destination: Option<String>,

    /// Earliest outbound date, `YYYY-MM-DD` inclusive
    pub start_date: Option<String>,

    /// Latest return date, `YYYY-MM-DD` inclusive
    pub end_date: Option<String>,

    /// Minimum total price
    pub min_price: Option<f64>,

    /// Maximum total price
    pub max_price: Option<f64>,

    /// Sort column
    #[serde(default = "default_sort_by")]
    pub sort_by: SortKey,

    /// Sort direction
    #[serde(default = "default_order")]
    pub order: SortOrder,

    /// First row index of the requested page
    #[serde(default)]
    pub offset: u32,

    /// Page size
    #[serde(default = "default_api_limit")]
    pub limit: u32,
}

fn default_sort_by() -> SortKey {
    SortKey::DepartDate
}

fn default_order() -> SortOrder {
    SortOrder::Asc
}

fn default_api_limit() -> u32 {
    DEFAULT_API_LIMIT as u32
}

/// Query parameters of the HTML flight table.
///
/// Same names as the API, but all free text (values are echoed back
/// into the form) and the interactive page size default.
#[derive(Debug, Default, Deserialize)]
pub struct IndexParams {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort_by: Option<SortKey>,
    pub order: Option<SortOrder>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

impl IndexParams {
    /// Build the canonical query for this page view.
    ///
    /// Browser forms submit empty fields as empty parameters; those
    /// become absent fields (no constraint), never empty-string
    /// constraints. Airport codes are uppercased on input.
    pub fn into_query(self) -> FlightQuery {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        }

        FlightQuery {
            origin: clean(self.origin).map(|s| s.to_ascii_uppercase()),
            destination: clean(self.destination).map(|s| s.to_ascii_uppercase()),
            start_date: clean(self.start_date),
            end_date: clean(self.end_date),
            min_price: clean(self.min_price),
            max_price: clean(self.max_price),
            sort_by: self.sort_by.unwrap_or(SortKey::DepartDate),
            order: self.order.unwrap_or(SortOrder::Asc),
            offset: self.offset.unwrap_or(0),
            limit: self.limit.unwrap_or(DEFAULT_LIMIT),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
