// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::message::{ErrorBody, InvocationResponse};
use crate::services::runtime_client::RuntimeError;

/// Every failure an invocation can end with. Each variant maps to one
/// status code and one error body.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("{code}: {message}")]
    Collaborator { code: String, message: String },

    #[error("{kind}: {message}")]
    Internal { message: String, kind: String },
}

impl AppError {
    pub fn internal(kind: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Internal { message: message.into(), kind: kind.into() }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Configuration(_)
            | AppError::Collaborator { .. }
            | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            AppError::BadRequest(message) => ErrorBody {
                error: "Bad Request".to_string(),
                message: message.clone(),
                kind: None,
            },
            AppError::Configuration(message) => ErrorBody {
                error: "Configuration Error".to_string(),
                message: message.clone(),
                kind: None,
            },
            AppError::Collaborator { code, message } => ErrorBody {
                error: code.clone(),
                message: message.clone(),
                kind: None,
            },
            AppError::Internal { message, kind } => ErrorBody {
                error: "InternalError".to_string(),
                message: message.clone(),
                kind: Some(kind.clone()),
            },
        }
    }
}

impl From<RuntimeError> for AppError {
    fn from(err: RuntimeError) -> Self {
        match err {
            RuntimeError::Service { code, message } => AppError::Collaborator { code, message },
            RuntimeError::Transport(message) => AppError::internal("TransportError", message),
        }
    }
}

impl From<AppError> for InvocationResponse {
    fn from(err: AppError) -> Self {
        InvocationResponse::json(err.status_code().as_u16(), &err.body())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}
