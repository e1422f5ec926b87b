use std::net::SocketAddr;

use flight_server::store::FlightStore;
use flight_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Snapshot location from environment
    let csv_path = std::env::var("FLIGHTS_CSV").unwrap_or_else(|_| {
        eprintln!("Warning: FLIGHTS_CSV not set. Using ./flights.csv");
        "flights.csv".to_string()
    });

    // Load the snapshot (fail fast if unavailable)
    let store = FlightStore::load(&csv_path).expect("Failed to load flight snapshot");
    if store.is_empty() {
        tracing::warn!("flight snapshot has no rows");
    }

    let addr: SocketAddr = std::env::var("FLIGHTS_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:8000".to_string())
        .parse()
        .expect("Invalid FLIGHTS_ADDR");

    // Build app state
    let state = AppState::new(store, csv_path.into());

    // Create router
    let app = create_router(state, "static");

    // Bind and serve
    println!("Flight Fare Finder listening on http://{addr}");
    println!();
    println!("Open http://{addr} in your browser for the flight table.");
    println!();
    println!("API Endpoints:");
    println!("  GET  /health        - Health check");
    println!("  GET  /api/flights   - Search flight offers");
    println!("  GET  /api/download  - Download the CSV snapshot");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
