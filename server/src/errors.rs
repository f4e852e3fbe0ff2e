use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use reelex_core::DiscoveryError;
use serde_json::json;
use std::fmt;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "message": self.message,
                "status": self.status.as_u16(),
            }
        }));

        (self.status, body).into_response()
    }
}

impl From<DiscoveryError> for AppError {
    fn from(err: DiscoveryError) -> Self {
        match err {
            DiscoveryError::Configuration(_) => Self::internal(err.to_string()),
            DiscoveryError::Transport(_)
            | DiscoveryError::Status(_)
            | DiscoveryError::NotFound(_)
            | DiscoveryError::Decode(_) => Self::bad_gateway(err.to_string()),
        }
    }
}
