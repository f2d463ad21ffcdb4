use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::metrics;
use crate::presenters::{ErrorHasher, PresentableError};
use crate::store::StoreError;

/// An error from the API error catalog
#[derive(Debug, Clone, Error)]
#[error("{name}: {message}")]
pub struct ApiError {
    status: StatusCode,
    name: &'static str,
    code: i64,
    message: String,
    extra: Map<String, Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, name: &'static str, code: i64, message: impl Into<String>) -> Self {
        Self {
            status,
            name,
            code,
            message: message.into(),
            extra: Map::new(),
        }
    }

    pub fn message_parse_error(detail: impl std::fmt::Display) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "MessageParseError",
            1001,
            format!("Request invalid due to parse error: {}", detail),
        )
    }

    pub fn not_authorized() -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            "NotAuthorized",
            10003,
            "You are not authorized to perform the requested action",
        )
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "NotFound", 10000, "Unknown request")
    }

    pub fn resource_not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "ResourceNotFound", 10010, message)
    }

    pub fn unprocessable_entity(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "UnprocessableEntity",
            10008,
            message,
        )
    }

    /// Attach a field that is rendered alongside the catalog fields
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failure reported by a downstream service, keeping its raw response
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ServicesError {
    type_name: String,
    message: String,
    response: Value,
    status: StatusCode,
}

impl ServicesError {
    pub fn new(type_name: impl Into<String>, message: impl Into<String>, response: Value) -> Self {
        Self {
            type_name: type_name.into(),
            message: message.into(),
            response,
            status: StatusCode::BAD_GATEWAY,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Services(#[from] ServicesError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Api(err) => err.status,
            AppError::Services(err) => err.status,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Classify this error for the error presenter
    pub fn presentable(&self) -> PresentableError {
        match self {
            AppError::Api(err) => {
                let mut error = PresentableError::api(err.name, err.code, err.message.clone());
                error.extra = err.extra.clone();
                error
            }
            AppError::Services(err) => PresentableError::services(
                err.type_name.clone(),
                err.message.clone(),
                err.response.clone(),
            ),
            AppError::Internal(err) => {
                PresentableError::named(root_cause_type_name(err), err.to_string())
                    .with_backtrace(err.chain().skip(1).map(|cause| cause.to_string()))
            }
        }
    }
}

/// Type name of the innermost error, for the error types this service raises
fn root_cause_type_name(err: &anyhow::Error) -> &'static str {
    fn name_of<T: std::error::Error + 'static>(
        cause: &(dyn std::error::Error + 'static),
    ) -> Option<&'static str> {
        cause.is::<T>().then(std::any::type_name::<T>)
    }

    let cause = err.root_cause();
    name_of::<StoreError>(cause)
        .or_else(|| name_of::<crate::config::ConfigError>(cause))
        .or_else(|| name_of::<serde_json::Error>(cause))
        .or_else(|| name_of::<std::io::Error>(cause))
        .or_else(|| name_of::<std::net::AddrParseError>(cause))
        .unwrap_or(std::any::type_name::<anyhow::Error>())
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::resource_not_found("Sidecar not found").into(),
            StoreError::NameTaken { name } => ApiError::unprocessable_entity(format!(
                "Sidecar with name '{}' already exists for given app",
                name
            ))
            .into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = self.presentable();
        let hasher = ErrorHasher::new(Some(&error));
        let details = hasher.unsanitized_hash().into_value();
        let body = hasher.sanitized_hash();

        metrics::ERRORS_PRESENTED_TOTAL
            .with_label_values(&[body.error_code().unwrap_or_default()])
            .inc();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %details, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %details, "request rejected");
        }

        (status, Json(body)).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_api_error_response() {
        let response = ApiError::resource_not_found("Sidecar not found").into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({
                "code": 10010,
                "description": "Sidecar not found",
                "error_code": "CF-ResourceNotFound",
            })
        );
    }

    #[tokio::test]
    async fn test_api_error_extra_fields_are_rendered() {
        let response = ApiError::unprocessable_entity("Name can't be blank")
            .with_extra("errors", json!(["Name can't be blank"]))
            .into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error_code"], "CF-UnprocessableEntity");
        assert_eq!(body["errors"], json!(["Name can't be blank"]));
    }

    #[tokio::test]
    async fn test_not_authorized_response() {
        let response = ApiError::not_authorized().into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(body["code"], 10003);
        assert_eq!(body["error_code"], "CF-NotAuthorized");
        assert_eq!(
            body["description"],
            "You are not authorized to perform the requested action"
        );
    }

    #[test]
    fn test_internal_error_named_after_root_cause() {
        let err = anyhow::Error::from(StoreError::NotFound(Uuid::nil())).context("loading sidecar");
        let details = ErrorHasher::new(Some(&AppError::from(err).presentable())).unsanitized_hash();

        assert_eq!(details.error_code(), Some("CF-StoreError"));
        assert_eq!(details.description(), Some("loading sidecar"));
    }

    #[test]
    fn test_internal_error_with_unknown_root_cause() {
        let err = anyhow::anyhow!("connection refused");
        let details = ErrorHasher::new(Some(&AppError::from(err).presentable())).unsanitized_hash();

        assert_eq!(details.error_code(), Some("CF-Error"));
    }

    #[tokio::test]
    async fn test_internal_error_is_hidden() {
        let err = anyhow::anyhow!("connection refused").context("loading sidecars");
        let response = AppError::from(err).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({
                "code": 10001,
                "description": "An unknown error occurred.",
                "error_code": "UnknownError",
            })
        );
    }

    #[test]
    fn test_internal_error_details_keep_cause_chain() {
        let err = anyhow::anyhow!("connection refused").context("loading sidecars");
        let error = AppError::from(err).presentable();

        assert_eq!(error.message, "loading sidecars");
        assert_eq!(error.backtrace, Some(vec!["connection refused".to_string()]));
    }

    #[tokio::test]
    async fn test_services_error_strips_source() {
        let err = ServicesError::new(
            "ServiceBrokerBadResponse",
            "The service broker returned an invalid response",
            json!({"raw": "<html>oops</html>"}),
        );
        let app_err = AppError::from(err);

        let details = ErrorHasher::new(Some(&app_err.presentable())).unsanitized_hash();
        assert_eq!(details.source(), Some(&json!({"raw": "<html>oops</html>"})));

        let response = app_err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error_code"], "CF-ServiceBrokerBadResponse");
        assert!(body.get("source").is_none());
    }

    #[test]
    fn test_store_errors_map_to_catalog() {
        let not_found = AppError::from(StoreError::NotFound(Uuid::nil()));
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let taken = AppError::from(StoreError::NameTaken {
            name: "my sidecar".to_string(),
        });
        assert_eq!(taken.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            taken.presentable().message,
            "Sidecar with name 'my sidecar' already exists for given app"
        );
    }

    #[test]
    fn test_message_parse_error() {
        let err = ApiError::message_parse_error("expected value at line 1 column 1");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), 1001);
        assert_eq!(err.name(), "MessageParseError");
        assert_eq!(
            err.message(),
            "Request invalid due to parse error: expected value at line 1 column 1"
        );
    }
}
