//! Wire types for the flights service.

use serde::{Deserialize, Serialize};

use crate::domain::FlightRow;

/// Response body of `GET /api/flights`.
///
/// The service echoes the effective offset/limit alongside the page so
/// a client can label the range without re-deriving its own request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightsResponse {
    /// Total matching rows before pagination
    pub total: u64,

    /// Offset the page was cut at
    pub offset: u32,

    /// Limit the page was cut with
    pub limit: u32,

    /// The page of rows
    pub rows: Vec<FlightRow>,
}

/// Error body returned by the service on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Human-readable error message
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_deserializes() {
        let json = r#"{
            "total": 237,
            "offset": 100,
            "limit": 100,
            "rows": [{
                "origin": "SFO",
                "destination": "MMH",
                "depart_date": "2025-01-10",
                "return_date": "2025-01-12",
                "price_total": "248.20",
                "currency": "USD",
                "outbound_legs": "SFO 2025-01-10T07:00 → MMH 2025-01-10T08:05 (UA5512)",
                "return_legs": "MMH 2025-01-12T17:10 → SFO 2025-01-12T18:20 (UA5513)",
                "united_booking_link": "https://example.invalid/book"
            }]
        }"#;

        let resp: FlightsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.total, 237);
        assert_eq!(resp.rows.len(), 1);
        assert_eq!(resp.rows[0].origin, "SFO");
        // Absent optional column deserializes as None
        assert!(resp.rows[0].validating_airline.is_none());
    }
}
