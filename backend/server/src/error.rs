use std::fmt::Display;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::config::Environment;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    MissingParameter(&'static str),

    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    #[error("{context}")]
    Internal {
        context: &'static str,
        detail: Option<String>,
    },
}

impl AppError {
    /// Logs the cause. It only reaches the client in development.
    pub fn internal(context: &'static str, cause: impl Display, environment: Environment) -> Self {
        error!("{context}: {cause}");

        AppError::Internal {
            context,
            detail: environment.is_development().then(|| cause.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::MissingParameter(_) => (StatusCode::BAD_REQUEST, None),
            AppError::Upstream { status, .. } => (*status, None),
            AppError::Internal { detail, .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, detail.as_deref())
            }
        };

        let error = self.to_string();
        let body = ErrorBody {
            error: &error,
            message,
        };

        (status, Json(body)).into_response()
    }
}
