//! Application state for the web layer.

use std::path::PathBuf;
use std::sync::Arc;

use crate::store::FlightStore;

/// Shared application state.
///
/// Contains the loaded snapshot and where it came from (for the
/// download endpoint).
#[derive(Clone)]
pub struct AppState {
    /// The in-process flight search
    pub store: Arc<FlightStore>,

    /// Path of the CSV snapshot backing the store
    pub csv_path: Arc<PathBuf>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(store: FlightStore, csv_path: PathBuf) -> Self {
        Self {
            store: Arc::new(store),
            csv_path: Arc::new(csv_path),
        }
    }
}
