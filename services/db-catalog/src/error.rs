use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common_dbconn::DbConnError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unknown database engine: {0}")]
    UnknownEngine(String),
    #[error("invalid request: {message}")]
    Validation { message: String },
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: ErrorDetails<'a>,
}

#[derive(Debug, Serialize)]
struct ErrorDetails<'a> {
    code: &'a str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::UnknownEngine(_) => {
                (StatusCode::NOT_FOUND, "unknown_engine", self.to_string())
            }
            ApiError::Validation { message } => {
                (StatusCode::BAD_REQUEST, "invalid_request", message.clone())
            }
        };

        let mut response = Json(ErrorBody {
            error: ErrorDetails { code, message },
        })
        .into_response();
        *response.status_mut() = status;
        response
    }
}

impl From<DbConnError> for ApiError {
    fn from(error: DbConnError) -> Self {
        match error {
            DbConnError::UnknownEngine(name) => ApiError::UnknownEngine(name),
            DbConnError::FieldNotApplicable { .. }
            | DbConnError::InvalidField { .. }
            | DbConnError::Url(_) => ApiError::Validation {
                message: error.to_string(),
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation {
            message: rejection.body_text(),
        }
    }
}
