//! Typed error taxonomy for the booking API.
//!
//! Every handler returns `ApiError` on failure; the `IntoResponse` impl maps
//! each variant to its HTTP status and renders the standard `ApiResponse`
//! envelope. Database errors are logged and never leak details to clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::lifecycle::AppointmentStatus;
use crate::models::ApiResponse;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("salon subscription is not active")]
    SubscriptionInactive,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0} already exists")]
    AlreadyExists(&'static str),

    #[error("this time slot is already booked")]
    SlotTaken,

    #[error("cannot change status from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("database error")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::SubscriptionInactive => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::AlreadyExists(_) => StatusCode::CONFLICT,
            ApiError::SlotTaken => StatusCode::CONFLICT,
            ApiError::InvalidTransition { .. } => StatusCode::CONFLICT,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Database(e) = &self {
            tracing::error!("database error: {}", e);
        }
        let status = self.status_code();
        (status, Json(ApiResponse::<()>::error(self.to_string()))).into_response()
    }
}

// ── Tests ──
