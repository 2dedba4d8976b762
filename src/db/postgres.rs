use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::info;
use uuid::Uuid;

use crate::api::bid::models::{Bid, BidStatus};
use crate::api::job::models::{Job, JobQuery};
use super::bid_repository::BidRepository;
use super::error::StoreResult;
use super::job_repository::JobRepository;
use super::store::{BidStore, JobStore, Store};

/// Postgres-backed store; cheap to clone, shares the underlying pool
#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgStore {
    async fn insert_job(&self, job: &Job) -> StoreResult<()> {
        JobRepository::create(&self.pool, job).await
    }

    async fn list_jobs(&self) -> StoreResult<Vec<Job>> {
        JobRepository::list(&self.pool).await
    }

    async fn list_jobs_by_owner(&self, email: &str) -> StoreResult<Vec<Job>> {
        JobRepository::list_by_owner(&self.pool, email).await
    }

    async fn search_jobs(&self, query: &JobQuery) -> StoreResult<Vec<Job>> {
        JobRepository::search(&self.pool, query).await
    }

    async fn get_job(&self, id: Uuid) -> StoreResult<Option<Job>> {
        JobRepository::find_by_id(&self.pool, id).await
    }

    async fn update_job(&self, job: &Job) -> StoreResult<bool> {
        JobRepository::update(&self.pool, job).await
    }

    async fn delete_job(&self, id: Uuid) -> StoreResult<u64> {
        JobRepository::delete(&self.pool, id).await
    }
}

#[async_trait]
impl BidStore for PgStore {
    async fn find_bid(&self, bidder_email: &str, job_id: Uuid) -> StoreResult<Option<Bid>> {
        BidRepository::find_by_bidder_and_job(&self.pool, bidder_email, job_id).await
    }

    async fn insert_bid(&self, bid: &Bid) -> StoreResult<()> {
        BidRepository::create_and_count(&self.pool, bid).await
    }

    async fn get_bid(&self, id: Uuid) -> StoreResult<Option<Bid>> {
        BidRepository::find_by_id(&self.pool, id).await
    }

    async fn list_bids_by_bidder(&self, email: &str) -> StoreResult<Vec<Bid>> {
        BidRepository::list_by_bidder(&self.pool, email).await
    }

    async fn list_bids_by_job_owner(&self, email: &str) -> StoreResult<Vec<Bid>> {
        BidRepository::list_by_job_owner(&self.pool, email).await
    }

    async fn set_bid_status(&self, id: Uuid, from: BidStatus, to: BidStatus) -> StoreResult<bool> {
        BidRepository::update_status(&self.pool, id, from, to).await
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        info!("Closing database connection pool...");
        self.pool.close().await;
        info!("Database connections closed");
    }
}
