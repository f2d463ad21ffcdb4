use axum::{routing::get, Router};

use crate::{handlers, metrics_handler, state::AppState};

pub fn observability_routes() -> Router<AppState> {
    Router::new().route("/metrics", get(metrics_handler::metrics_endpoint))
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health_check))
}

pub fn sidecar_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/v3/apps/:app_guid/sidecars",
            get(handlers::list_app_sidecars).post(handlers::create_sidecar),
        )
        .route(
            "/v3/sidecars/:guid",
            get(handlers::get_sidecar)
                .patch(handlers::update_sidecar)
                .delete(handlers::delete_sidecar),
        )
}
