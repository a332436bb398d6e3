use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    Missing(&'static str),
    #[error("Invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

impl IntoResponse for TallyError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            TallyError::StoreUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "Vote store unavailable")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "details": self.to_string()
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for TallyError {
    fn from(error: sqlx::Error) -> Self {
        TallyError::StoreUnavailable(error.to_string())
    }
}
