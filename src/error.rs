//! Error types for ShareIt server

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Stable machine-readable error codes exposed to API clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthorized = 2,
    Unavailable = 3,
    NoSuchUser = 4,
    NoSuchItem = 5,
    NoSuchBooking = 6,
    ItemNotAvailable = 7,
    SelfBooking = 8,
    AlreadyDecided = 9,
    UnknownState = 10,
    BadPagination = 11,
    BadDates = 12,
    BadValue = 18,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("User with id {0} not found")]
    UserNotFound(i64),

    #[error("Item with id {0} not found")]
    ItemNotFound(i64),

    #[error("Booking with id {0} not found")]
    BookingNotFound(i64),

    #[error("Item with id {0} is not available")]
    ItemUnavailable(i64),

    #[error("Owner cannot book their own item")]
    SelfBookingForbidden,

    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("Booking status already changed to {0}")]
    AlreadyDecided(String),

    #[error("Unknown state: {state}")]
    UnknownFilterState { state: String },

    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),

    #[error("Invalid booking dates: {0}")]
    InvalidBookingDates(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status and stable code for this error
    pub fn status_and_code(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::UserNotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchUser),
            AppError::ItemNotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchItem),
            AppError::BookingNotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchBooking),
            AppError::ItemUnavailable(_) => (StatusCode::BAD_REQUEST, ErrorCode::ItemNotAvailable),
            AppError::SelfBookingForbidden => (StatusCode::BAD_REQUEST, ErrorCode::SelfBooking),
            AppError::NotAuthorized(_) => (StatusCode::BAD_REQUEST, ErrorCode::NotAuthorized),
            AppError::AlreadyDecided(_) => (StatusCode::BAD_REQUEST, ErrorCode::AlreadyDecided),
            AppError::UnknownFilterState { .. } => (StatusCode::BAD_REQUEST, ErrorCode::UnknownState),
            AppError::InvalidPagination(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadPagination),
            AppError::InvalidBookingDates(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadDates),
            AppError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, ErrorCode::Unavailable),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Failure),
        }
    }
}

/// Connection-level failures mean the store is unreachable; anything else
/// (decode errors, missing rows, protocol errors) is a server fault.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if matches!(
            err,
            sqlx::Error::Io(_)
                | sqlx::Error::Tls(_)
                | sqlx::Error::PoolTimedOut
                | sqlx::Error::PoolClosed
                | sqlx::Error::WorkerCrashed
        ) {
            AppError::Unavailable(err)
        } else {
            AppError::Internal(format!("Database error: {}", err))
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::BadRequest(errors.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            AppError::Unavailable(e) => {
                tracing::error!("Storage error: {:?}", e);
                "Storage unavailable".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
