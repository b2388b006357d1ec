use {
    axum::{
        Json,
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    onair_live::ControlError,
    serde_json::json,
    tracing::warn,
};

use crate::relay::RelayError;

/// Errors surfaced to HTTP callers as `{"error": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Control(#[from] ControlError),
    #[error(transparent)]
    Relay(#[from] RelayError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Control(ControlError::Unauthorized) => StatusCode::UNAUTHORIZED,
            Self::Relay(RelayError::EmptyMessage | RelayError::TooLong) => {
                StatusCode::BAD_REQUEST
            },
            Self::Relay(RelayError::NotConfigured) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Relay(RelayError::Delivery(_)) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Relay(RelayError::Delivery(e)) = &self {
            warn!(error = %e, "fan message delivery failed");
        }
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
