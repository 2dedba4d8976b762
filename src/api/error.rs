use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;
use tracing::{error, warn};

use crate::api::bid::models::BidStatus;
use crate::api::validation::ErrorResponse;
use crate::db::StoreError;

pub const UNAUTHORIZED_MESSAGE: &str = "unauthorized access";
pub const DUPLICATE_BID_MESSAGE: &str = "You have already placed a bid on this job";

/// Errors surfaced by handlers and services
#[derive(Debug)]
pub enum ApiError {
    /// Missing, invalid, expired or mismatched session
    Unauthorized,

    /// The bidder already has a bid on this job
    DuplicateBid,

    Validation(String),

    NotFound(String),

    /// Requested bid status change is not allowed from the current state
    InvalidTransition { from: BidStatus, to: BidStatus },

    /// A concurrent write won
    Conflict(String),

    /// Session token could not be signed
    Session(jsonwebtoken::errors::Error),

    Store(StoreError),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized => write!(f, "Unauthorized"),
            ApiError::DuplicateBid => write!(f, "Duplicate bid"),
            ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
            ApiError::NotFound(what) => write!(f, "Not found: {}", what),
            ApiError::InvalidTransition { from, to } => {
                write!(f, "Invalid status transition: {} -> {}", from, to)
            }
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Session(e) => write!(f, "Session error: {}", e),
            ApiError::Store(e) => write!(f, "Store error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Store(e)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::DuplicateBid | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidTransition { .. } | ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Session(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self {
            ApiError::Unauthorized => HttpResponse::build(status)
                .json(serde_json::json!({ "message": UNAUTHORIZED_MESSAGE })),
            ApiError::DuplicateBid => HttpResponse::build(status)
                .content_type("text/plain; charset=utf-8")
                .body(DUPLICATE_BID_MESSAGE),
            ApiError::Validation(msg) => {
                warn!("Validation error: {}", msg);
                HttpResponse::build(status).json(ErrorResponse::message("Validation failed", msg.as_str()))
            }
            ApiError::NotFound(what) => {
                warn!("Not found: {}", what);
                HttpResponse::build(status)
                    .json(ErrorResponse::message("Not found", format!("{} not found", what)))
            }
            ApiError::InvalidTransition { from, to } => HttpResponse::build(status).json(
                ErrorResponse::message(
                    "Invalid status transition",
                    format!("Cannot move a bid from '{}' to '{}'", from, to),
                ),
            ),
            ApiError::Conflict(msg) => {
                HttpResponse::build(status).json(ErrorResponse::message("Conflict", msg.as_str()))
            }
            ApiError::Session(e) => {
                error!("Failed to sign session token: {}", e);
                HttpResponse::build(status).json(ErrorResponse::message(
                    "Failed to issue session",
                    "Session signing failed",
                ))
            }
            ApiError::Store(e) => {
                error!("Store error: {}", e);
                HttpResponse::build(status).json(ErrorResponse::message(
                    "Failed to process request",
                    "Database error occurred",
                ))
            }
        }
    }
}
