use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

use crate::models::profile::ProfileError;
use crate::services::plan_generation::PlanError;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_response: Option<Value>,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(&'static str),
    Conflict(&'static str),
    Plan {
        error: PlanError,
        expose_raw_response: bool,
    },
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn plan(error: PlanError, expose_raw_response: bool) -> Self {
        ApiError::Plan {
            error,
            expose_raw_response,
        }
    }
}

impl From<ProfileError> for ApiError {
    fn from(error: ProfileError) -> Self {
        ApiError::BadRequest(error.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        ApiError::Internal(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, raw_response) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message, None),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message.to_string(), None),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, message.to_string(), None),
            ApiError::Plan {
                error,
                expose_raw_response,
            } => {
                let status = match error {
                    PlanError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
                    _ => StatusCode::BAD_GATEWAY,
                };
                let raw = expose_raw_response
                    .then(|| error.raw_response())
                    .flatten();
                (status, error.to_string(), raw)
            }
            ApiError::Internal(e) => {
                tracing::error!(error = %e, "api.internal_error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        (
            status,
            Json(ErrorBody {
                error,
                raw_response,
            }),
        )
            .into_response()
    }
}
