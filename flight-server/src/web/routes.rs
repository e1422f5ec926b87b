//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::warn;

use crate::api::FlightsResponse;
use crate::domain::Iata;
use crate::store::{StoreQuery, store_query};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/api/flights", get(get_flights))
        .route("/api/download", get(download_csv))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// HTML flight table.
///
/// A stateless projection: the query lives entirely in the URL, and
/// sort/page links carry the follow-up queries.
async fn index_page(
    State(state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<Response, AppError> {
    let query = params.into_query();

    // Bad filter input gets an HTML error page, not a JSON body.
    let store_q = match store_query(&query) {
        Ok(store_q) => store_q,
        Err(e) => {
            let template = ErrorTemplate {
                title: "Bad search".to_string(),
                message: e.to_string(),
            };
            let html = template.render().map_err(|e| AppError::Internal {
                message: format!("Template error: {}", e),
            })?;
            return Ok((StatusCode::BAD_REQUEST, Html(html)).into_response());
        }
    };
    let result = state.store.search(&store_q);

    let template = IndexTemplate::build(&query, &result);
    let html = template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })?;

    Ok(Html(html).into_response())
}

/// Search flight offers (JSON API).
async fn get_flights(
    State(state): State<AppState>,
    Query(params): Query<FlightsParams>,
) -> Result<Json<FlightsResponse>, AppError> {
    let origin = parse_code("origin", params.origin.as_deref())?;
    let destination = parse_code("destination", params.destination.as_deref())?;

    let store_q = StoreQuery {
        origin,
        destination,
        start_date: params.start_date,
        end_date: params.end_date,
        min_price: params.min_price,
        max_price: params.max_price,
        sort_by: params.sort_by,
        order: params.order,
        offset: params.offset as usize,
        limit: params.limit as usize,
    };

    let page = state.store.search(&store_q);

    Ok(Json(FlightsResponse {
        total: page.total,
        offset: params.offset,
        limit: params.limit,
        rows: page.rows,
    }))
}

/// Parse an optional airport-code parameter.
fn parse_code(field: &str, value: Option<&str>) -> Result<Option<Iata>, AppError> {
    value
        .map(Iata::parse_normalized)
        .transpose()
        .map_err(|_| AppError::BadRequest {
            message: format!("Invalid {field}: must be a 3-letter airport code"),
        })
}

/// Download the CSV snapshot behind the service.
async fn download_csv(State(state): State<AppState>) -> Result<Response, AppError> {
    let bytes = tokio::fs::read(state.csv_path.as_ref())
        .await
        .map_err(|_| AppError::NotFound {
            message: format!("CSV not found at {}", state.csv_path.display()),
        })?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv"),
        (
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"flights.csv\"",
        ),
    ];
    Ok((headers, bytes).into_response())
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
