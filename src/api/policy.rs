//! Ownership rules binding the session identity to the resources it touches.
//!
//! Every mismatch is reported as `Unauthorized`, the same answer a caller
//! without a session gets.

use tracing::warn;

use crate::api::auth::SessionUser;
use crate::api::bid::models::Bid;
use crate::api::error::ApiError;
use crate::api::job::models::Job;

/// Owner-scoped reads: the session must belong to `email`
pub fn ensure_same_user(session: &SessionUser, email: &str) -> Result<(), ApiError> {
    if session.email() == email {
        Ok(())
    } else {
        warn!("{} attempted to act as {}", session.email(), email);
        Err(ApiError::Unauthorized)
    }
}

/// Job edits and deletes are reserved to the job's owner
pub fn ensure_job_owner(session: &SessionUser, job: &Job) -> Result<(), ApiError> {
    if session.email() == job.owner.email {
        Ok(())
    } else {
        warn!("{} is not the owner of job {}", session.email(), job.id);
        Err(ApiError::Unauthorized)
    }
}

/// Status transitions are reserved to the owner of the bid's job
pub fn ensure_bid_job_owner(session: &SessionUser, bid: &Bid) -> Result<(), ApiError> {
    if session.email() == bid.job_owner_email {
        Ok(())
    } else {
        warn!("{} does not own the job behind bid {}", session.email(), bid.id);
        Err(ApiError::Unauthorized)
    }
}
