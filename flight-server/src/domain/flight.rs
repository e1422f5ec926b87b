//! Flight offer rows and search result pages.

use serde::{Deserialize, Serialize};

/// A single round-trip flight offer, as stored in the CSV snapshot and
/// returned by the search interface.
///
/// The leg fields (`outbound_legs`, `return_legs`) are opaque
/// human-readable itinerary summaries produced upstream, e.g.
/// `"SFO 2025-01-10T07:00 → MMH 2025-01-10T08:05 (UA5512)"`.
/// Display fields (time of day, duration, stop count) are derived from
/// them at render time by the `legs` module, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightRow {
    /// Origin airport code
    pub origin: String,

    /// Destination airport code
    pub destination: String,

    /// Outbound departure date (ISO `YYYY-MM-DD`)
    pub depart_date: String,

    /// Return departure date (ISO `YYYY-MM-DD`)
    pub return_date: String,

    /// Total price as decimal text, if the offer was priced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_total: Option<String>,

    /// Price currency code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Validating airline code(s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validating_airline: Option<String>,

    /// Outbound itinerary summary (opaque leg string)
    pub outbound_legs: String,

    /// Return itinerary summary (opaque leg string)
    pub return_legs: String,

    /// Deep link into the external booking flow
    pub united_booking_link: String,
}

/// One page of search results.
///
/// `total` counts all matching rows server-side; `rows` holds at most
/// the requested limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Total matching rows before pagination
    pub total: u64,

    /// The requested page of rows
    pub rows: Vec<FlightRow>,
}

/// Build the United booking deep link for a round trip.
///
/// Format produced by the upstream scraper; used to backfill snapshot
/// rows whose booking-link cell is empty.
pub fn united_booking_link(
    origin: &str,
    destination: &str,
    depart_date: &str,
    return_date: &str,
) -> String {
    format!(
        "https://www.united.com/en/us/fsr/choose-flights\
         ?f={origin}&t={destination}&d={depart_date}&r={return_date}&tqp=R"
    )
}
