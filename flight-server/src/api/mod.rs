//! HTTP client for the flights service.
//!
//! Implements the consumed search interface: every present query field
//! travels as a string-valued parameter under its wire name, and the
//! response is the JSON page `{total, offset, limit, rows}`. The CSV
//! snapshot download is exposed as a plain URL.

mod client;
mod error;
mod types;

pub use client::{FlightsClient, FlightsConfig};
pub use error::FlightsApiError;
pub use types::{ApiErrorBody, FlightsResponse};
