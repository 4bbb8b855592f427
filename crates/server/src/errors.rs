use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use models::errors::ModelError;
use service::errors::StoreError;

/// Store outcome to HTTP translation. Expected, recoverable failures
/// keep their message; backend failures are logged with full context
/// and answered with a generic body. Nothing here ever takes the
/// process down.
#[derive(Debug)]
pub struct ApiError(pub StoreError);

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self.0 {
            StoreError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            StoreError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            StoreError::Conflict(_) => (
                StatusCode::CONFLICT,
                "revision conflict, retry the request".to_string(),
            ),
            StoreError::Model(ModelError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            StoreError::Model(e) => {
                error!(error = %e, "store backend failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };
        (status, Json(serde_json::json!({"error": msg}))).into_response()
    }
}
