use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use cc_shared::{ResourceList, SidecarResponse};
use serde_json::json;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::validation::{SidecarCreateMessage, SidecarUpdateMessage, ValidatedMessage};

fn parse_guid(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::resource_not_found("Sidecar not found"))
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "uptime_secs": state.started_at.elapsed().as_secs(),
    }))
}

pub async fn create_sidecar(
    State(state): State<AppState>,
    Path(app_guid): Path<String>,
    ValidatedMessage(message): ValidatedMessage<SidecarCreateMessage>,
) -> ApiResult<impl IntoResponse> {
    let sidecar = state.store.create(&app_guid, message).await?;
    let location = format!("/v3/sidecars/{}", sidecar.guid);

    tracing::info!(guid = %sidecar.guid, %app_guid, name = %sidecar.name, "sidecar created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(SidecarResponse::from(&sidecar)),
    ))
}

pub async fn list_app_sidecars(
    State(state): State<AppState>,
    Path(app_guid): Path<String>,
) -> impl IntoResponse {
    let resources: Vec<SidecarResponse> = state
        .store
        .list_for_app(&app_guid)
        .await
        .iter()
        .map(SidecarResponse::from)
        .collect();
    Json(ResourceList { resources })
}

pub async fn get_sidecar(
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> ApiResult<Json<SidecarResponse>> {
    let sidecar = state.store.get(parse_guid(&guid)?).await?;
    Ok(Json(SidecarResponse::from(&sidecar)))
}

pub async fn update_sidecar(
    State(state): State<AppState>,
    Path(guid): Path<String>,
    ValidatedMessage(message): ValidatedMessage<SidecarUpdateMessage>,
) -> ApiResult<Json<SidecarResponse>> {
    let guid = parse_guid(&guid)?;
    let sidecar = state.store.update(guid, message).await?;

    tracing::info!(%guid, "sidecar updated");
    Ok(Json(SidecarResponse::from(&sidecar)))
}

pub async fn delete_sidecar(
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> ApiResult<StatusCode> {
    let guid = parse_guid(&guid)?;
    state.store.delete(guid).await?;

    tracing::info!(%guid, "sidecar deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn route_not_found() -> impl IntoResponse {
    ApiError::not_found()
}
