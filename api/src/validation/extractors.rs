//! Axum extractor for validated request messages
//!
//! `ValidatedMessage<M>` reads a JSON object body, runs the message's rule
//! set over the raw fields and only then builds the typed message.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde_json::{json, Value};

use super::messages::RequestMessage;
use super::rules::ValidationResult;
use crate::error::{ApiError, AppError};
use crate::metrics;

/// Validation failure rendered as an unprocessable-entity error
///
/// The individual messages are kept under `errors` next to the joined
/// description.
pub fn validation_error(result: &ValidationResult) -> ApiError {
    ApiError::unprocessable_entity(result.to_sentence())
        .with_extra("errors", json!(result.full_messages()))
}

fn parse_error(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(e) => ApiError::message_parse_error(e.body_text()),
        JsonRejection::JsonSyntaxError(e) => ApiError::message_parse_error(e.body_text()),
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::message_parse_error("Content-Type must be application/json")
        }
        JsonRejection::BytesRejection(_) => {
            ApiError::message_parse_error("failed to read request body")
        }
        _ => ApiError::message_parse_error("invalid JSON payload"),
    }
}

/// A request message that passed validation
///
/// ```ignore
/// pub async fn update_sidecar(
///     Path(guid): Path<Uuid>,
///     ValidatedMessage(message): ValidatedMessage<SidecarUpdateMessage>,
/// ) -> ApiResult<impl IntoResponse> {
///     // message only holds fields that satisfied the rule set
/// }
/// ```
pub struct ValidatedMessage<M>(pub M);

#[async_trait]
impl<S, M> FromRequest<S> for ValidatedMessage<M>
where
    M: RequestMessage + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(parse_error)?;

        let Value::Object(fields) = body else {
            return Err(ApiError::message_parse_error("Request body must be a JSON object").into());
        };

        let result = M::validate(&fields);
        if !result.is_valid() {
            metrics::VALIDATION_FAILURES_TOTAL
                .with_label_values(&[M::NAME])
                .inc();
            tracing::debug!(
                request_message = M::NAME,
                errors = %result.to_sentence(),
                "request message failed validation"
            );
            return Err(validation_error(&result).into());
        }

        let message = M::from_fields(fields).map_err(|e| {
            let mut result = ValidationResult::default();
            result.add(format!("Invalid field value: {}", e));
            metrics::VALIDATION_FAILURES_TOTAL
                .with_label_values(&[M::NAME])
                .inc();
            validation_error(&result)
        })?;
        Ok(ValidatedMessage(message))
    }
}

impl<T> std::ops::Deref for ValidatedMessage<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
