//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::booking::session::SessionError;
use crate::booking::submission::SubmissionError;
use crate::booking::validation::ValidationError;
use crate::booking::wizard::StepNotReady;
use crate::pricing::responses::ErrorResponse;
use crate::pricing::PricingError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Booking session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Booking session {0} is already being submitted")]
    SubmissionInProgress(Uuid),

    #[error("Booking could not be submitted: {0}")]
    Submission(#[from] SubmissionError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Session(err.into())
    }
}

impl From<StepNotReady> for AppError {
    fn from(err: StepNotReady) -> Self {
        AppError::Session(err.into())
    }
}

impl AppError {
    fn status_and_type(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "session_not_found"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Session(err) => match err {
                SessionError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
                SessionError::NotReady(_) => (StatusCode::UNPROCESSABLE_ENTITY, "step_not_ready"),
                SessionError::Pricing(_) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_selection"),
                SessionError::Transition(_) => (StatusCode::CONFLICT, "invalid_transition"),
                SessionError::Locked(_) => (StatusCode::CONFLICT, "booking_locked"),
            },
            AppError::Pricing(_) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_selection"),
            AppError::SubmissionInProgress(_) => (StatusCode::CONFLICT, "submission_in_progress"),
            AppError::Submission(_) => (StatusCode::BAD_GATEWAY, "submission_failed"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            AppError::Session(SessionError::Validation(err)) => serde_json::to_value(err).ok(),
            AppError::Session(SessionError::NotReady(err)) => serde_json::to_value(err).ok(),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_type();

        let message = match &self {
            AppError::Submission(e) => {
                tracing::error!("Submission error: {}", e);
                "Booking could not be submitted, please try again".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error_type: error_type.to_string(),
            message,
            details: self.details(),
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
