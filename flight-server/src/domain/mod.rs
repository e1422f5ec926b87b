//! Domain types for the flight fare finder.
//!
//! This module contains the value types the rest of the crate is built
//! on: validated airport codes, flight offer rows, and the canonical
//! search query with its delta-merge machinery. Queries are immutable
//! values; every change goes through an explicit merge.

mod airport;
mod flight;
mod query;

pub use airport::{Iata, InvalidIata};
pub use flight::{FlightRow, SearchResult, united_booking_link};
pub use query::{DEFAULT_LIMIT, FlightQuery, Patch, QueryDelta, SortKey, SortOrder};
