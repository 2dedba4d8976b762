use async_trait::async_trait;
use uuid::Uuid;

use crate::api::bid::models::{Bid, BidStatus};
use crate::api::job::models::{Job, JobQuery};
use super::error::StoreResult;

/// Operations on the `jobs` collection
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a new job; fails with `Duplicate` if the id is taken
    async fn insert_job(&self, job: &Job) -> StoreResult<()>;

    /// All jobs in insertion order
    async fn list_jobs(&self) -> StoreResult<Vec<Job>>;

    async fn list_jobs_by_owner(&self, email: &str) -> StoreResult<Vec<Job>>;

    async fn search_jobs(&self, query: &JobQuery) -> StoreResult<Vec<Job>>;

    async fn get_job(&self, id: Uuid) -> StoreResult<Option<Job>>;

    /// Overwrite title, category, deadline and details of an existing job.
    ///
    /// Owner and bid counter are never written here. Returns whether a
    /// document matched.
    async fn update_job(&self, job: &Job) -> StoreResult<bool>;

    /// Returns the number of removed documents (0 or 1)
    async fn delete_job(&self, id: Uuid) -> StoreResult<u64>;
}

/// Operations on the `bids` collection
#[async_trait]
pub trait BidStore: Send + Sync {
    async fn find_bid(&self, bidder_email: &str, job_id: Uuid) -> StoreResult<Option<Bid>>;

    /// Insert a bid and bump its job's `bidCount` as one atomic write.
    ///
    /// Fails with `Duplicate` when the bidder already has a bid on the job;
    /// in that case the counter is left untouched.
    async fn insert_bid(&self, bid: &Bid) -> StoreResult<()>;

    async fn get_bid(&self, id: Uuid) -> StoreResult<Option<Bid>>;

    async fn list_bids_by_bidder(&self, email: &str) -> StoreResult<Vec<Bid>>;

    async fn list_bids_by_job_owner(&self, email: &str) -> StoreResult<Vec<Bid>>;

    /// Compare-and-set the status; returns false if the bid is missing or
    /// no longer in `from`.
    async fn set_bid_status(&self, id: Uuid, from: BidStatus, to: BidStatus) -> StoreResult<bool>;
}

/// A complete backend: both collections plus connection lifecycle
#[async_trait]
pub trait Store: JobStore + BidStore {
    /// Cheap round trip used by health checks
    async fn ping(&self) -> StoreResult<()>;

    /// Release connections; called once during shutdown
    async fn close(&self);
}
