use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use prometheus::TEXT_FORMAT;

use crate::metrics;
use crate::state::AppState;

/// Prometheus scrape endpoint for the registry held in the app state
pub async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let body = metrics::gather_metrics(&state.registry);
    ([(header::CONTENT_TYPE, TEXT_FORMAT)], body)
}
