//! Web layer for the flight fare finder.
//!
//! Serves the HTML flight table, the JSON search API, and the CSV
//! snapshot download.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
