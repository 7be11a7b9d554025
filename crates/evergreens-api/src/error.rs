use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use evergreens_types::api::FailureResponse;

#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already exists")]
    DuplicateEmail,

    #[error("persistence error: {0}")]
    Persistence(#[from] anyhow::Error),
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            PortalError::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            PortalError::DuplicateEmail => (StatusCode::BAD_REQUEST, self.to_string()),
            PortalError::Persistence(e) => {
                error!("Persistence failure: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        (status, Json(FailureResponse { success: false, message })).into_response()
    }
}
