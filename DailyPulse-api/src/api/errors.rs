use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use daily_pulse_domain::services::DailyHealthServiceError;

/// Errors returned by the HTTP handlers.
/// Client errors carry a short plain-text body; internal errors are opaque.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DailyHealthServiceError> for ApiError {
    fn from(err: DailyHealthServiceError) -> Self {
        match err {
            DailyHealthServiceError::Validation(message) => ApiError::BadRequest(message),
            DailyHealthServiceError::Repository(message) => ApiError::Internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MethodNotAllowed => {
                (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response()
            }
            ApiError::BadRequest(message) => {
                warn!("Bad request: {}", message);
                (StatusCode::BAD_REQUEST, message).into_response()
            }
            ApiError::Internal(cause) => {
                error!("Request failed: {}", cause);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let validation = ApiError::from(DailyHealthServiceError::Validation("userId required".to_string()));
        let storage = ApiError::from(DailyHealthServiceError::Repository("disk full".to_string()));

        assert_eq!(validation.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(storage.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::MethodNotAllowed.into_response().status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
