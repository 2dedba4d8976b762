use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::models::{Bid, BidStatus, NewBid};
use crate::api::auth::SessionUser;
use crate::api::dto::{InsertResult, UpdateResult};
use crate::api::error::ApiError;
use crate::api::policy;
use crate::db::{BidStore, JobStore, Store, StoreError};

/// Bid service: placement, listing and status transitions
pub struct BidService {
    store: Arc<dyn Store>,
}

impl BidService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Place a bid on a job
    ///
    /// # Business Logic
    /// - The bidder must be the caller, and cannot be the job's owner
    /// - At most one bid per (bidder, job): checked up front, and again by
    ///   the store's uniqueness guard for concurrent submissions
    /// - `jobOwnerEmail` is copied from the job, never from the payload
    /// - The insert and the job's `bidCount` increment are a single store write
    pub async fn create_bid(
        &self,
        session: &SessionUser,
        new_bid: NewBid,
    ) -> Result<InsertResult, ApiError> {
        policy::ensure_same_user(session, &new_bid.bidder_email)?;

        let job = self
            .store
            .get_job(new_bid.job_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Job {}", new_bid.job_id)))?;

        if job.owner.email == new_bid.bidder_email {
            warn!("Service: {} tried to bid on own job {}", job.owner.email, job.id);
            return Err(ApiError::Validation(
                "Job owners cannot bid on their own job".to_string(),
            ));
        }

        if self
            .store
            .find_bid(&new_bid.bidder_email, new_bid.job_id)
            .await?
            .is_some()
        {
            warn!(
                "Service: Duplicate bid by {} on job {}",
                new_bid.bidder_email, new_bid.job_id
            );
            return Err(ApiError::DuplicateBid);
        }

        let bid = Bid::from_new(Uuid::new_v4(), job.owner.email, new_bid);
        match self.store.insert_bid(&bid).await {
            Ok(()) => {
                info!(
                    "Service: Bid {} placed by {} on job {}",
                    bid.id, bid.bidder_email, bid.job_id
                );
                Ok(InsertResult::new(bid.id))
            }
            Err(StoreError::Duplicate(_)) => Err(ApiError::DuplicateBid),
            Err(e) => Err(e.into()),
        }
    }

    /// Bids placed by `email`, or received on `email`'s jobs when `as_owner`
    pub async fn list_bids(
        &self,
        email: &str,
        as_owner: bool,
        session: &SessionUser,
    ) -> Result<Vec<Bid>, ApiError> {
        policy::ensure_same_user(session, email)?;

        let bids = if as_owner {
            self.store.list_bids_by_job_owner(email).await?
        } else {
            self.store.list_bids_by_bidder(email).await?
        };
        Ok(bids)
    }

    /// Move a bid along its lifecycle; only the job owner may do so
    pub async fn update_bid_status(
        &self,
        id: Uuid,
        next: BidStatus,
        session: &SessionUser,
    ) -> Result<UpdateResult, ApiError> {
        let bid = self
            .store
            .get_bid(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Bid {}", id)))?;
        policy::ensure_bid_job_owner(session, &bid)?;

        if !bid.status.can_transition_to(next) {
            warn!("Service: Rejected transition {} -> {} on bid {}", bid.status, next, id);
            return Err(ApiError::InvalidTransition {
                from: bid.status,
                to: next,
            });
        }

        if !self.store.set_bid_status(id, bid.status, next).await? {
            return Err(ApiError::Conflict(format!(
                "Bid {} changed status concurrently",
                id
            )));
        }

        info!("Service: Bid {} moved {} -> {}", id, bid.status, next);
        Ok(UpdateResult::matched(true))
    }
}
