use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::bid::models::{Bid, BidStatus};
use crate::api::job::models::{Job, JobQuery, SortOrder};
use super::error::{StoreError, StoreResult};
use super::store::{BidStore, JobStore, Store};

#[derive(Default)]
struct Collections {
    jobs: Vec<Job>,
    bids: Vec<Bid>,
}

/// In-process store used when no database is configured, and by tests
///
/// Both collections sit behind one lock, so a bid insert and its counter
/// increment are observed together.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn insert_job(&self, job: &Job) -> StoreResult<()> {
        let mut data = self.inner.write().await;
        if data.jobs.iter().any(|j| j.id == job.id) {
            return Err(StoreError::duplicate(format!("job {}", job.id)));
        }
        data.jobs.push(job.clone());
        debug!("Job created with id={}", job.id);
        Ok(())
    }

    async fn list_jobs(&self) -> StoreResult<Vec<Job>> {
        Ok(self.inner.read().await.jobs.clone())
    }

    async fn list_jobs_by_owner(&self, email: &str) -> StoreResult<Vec<Job>> {
        let data = self.inner.read().await;
        Ok(data
            .jobs
            .iter()
            .filter(|j| j.owner.email == email)
            .cloned()
            .collect())
    }

    async fn search_jobs(&self, query: &JobQuery) -> StoreResult<Vec<Job>> {
        let data = self.inner.read().await;
        let mut jobs: Vec<Job> = data
            .jobs
            .iter()
            .filter(|j| query.matches(j))
            .cloned()
            .collect();

        // stable sort keeps insertion order among equal deadlines
        match query.sort {
            Some(SortOrder::Asc) => jobs.sort_by(|a, b| a.deadline.cmp(&b.deadline)),
            Some(SortOrder::Desc) => jobs.sort_by(|a, b| b.deadline.cmp(&a.deadline)),
            None => {}
        }
        Ok(jobs)
    }

    async fn get_job(&self, id: Uuid) -> StoreResult<Option<Job>> {
        let data = self.inner.read().await;
        Ok(data.jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn update_job(&self, job: &Job) -> StoreResult<bool> {
        let mut data = self.inner.write().await;
        match data.jobs.iter_mut().find(|j| j.id == job.id) {
            Some(stored) => {
                stored.title = job.title.clone();
                stored.category = job.category.clone();
                stored.deadline = job.deadline;
                stored.details = job.details.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_job(&self, id: Uuid) -> StoreResult<u64> {
        let mut data = self.inner.write().await;
        let before = data.jobs.len();
        data.jobs.retain(|j| j.id != id);
        Ok((before - data.jobs.len()) as u64)
    }
}

#[async_trait]
impl BidStore for MemoryStore {
    async fn find_bid(&self, bidder_email: &str, job_id: Uuid) -> StoreResult<Option<Bid>> {
        let data = self.inner.read().await;
        Ok(data
            .bids
            .iter()
            .find(|b| b.bidder_email == bidder_email && b.job_id == job_id)
            .cloned())
    }

    async fn insert_bid(&self, bid: &Bid) -> StoreResult<()> {
        let mut data = self.inner.write().await;
        if data
            .bids
            .iter()
            .any(|b| b.bidder_email == bid.bidder_email && b.job_id == bid.job_id)
        {
            return Err(StoreError::duplicate(format!(
                "bid by {} on job {}",
                bid.bidder_email, bid.job_id
            )));
        }

        data.bids.push(bid.clone());
        match data.jobs.iter_mut().find(|j| j.id == bid.job_id) {
            Some(job) => job.bid_count += 1,
            None => warn!("Bid {} references missing job {}", bid.id, bid.job_id),
        }
        debug!("Bid created with id={}", bid.id);
        Ok(())
    }

    async fn get_bid(&self, id: Uuid) -> StoreResult<Option<Bid>> {
        let data = self.inner.read().await;
        Ok(data.bids.iter().find(|b| b.id == id).cloned())
    }

    async fn list_bids_by_bidder(&self, email: &str) -> StoreResult<Vec<Bid>> {
        let data = self.inner.read().await;
        Ok(data
            .bids
            .iter()
            .filter(|b| b.bidder_email == email)
            .cloned()
            .collect())
    }

    async fn list_bids_by_job_owner(&self, email: &str) -> StoreResult<Vec<Bid>> {
        let data = self.inner.read().await;
        Ok(data
            .bids
            .iter()
            .filter(|b| b.job_owner_email == email)
            .cloned()
            .collect())
    }

    async fn set_bid_status(&self, id: Uuid, from: BidStatus, to: BidStatus) -> StoreResult<bool> {
        let mut data = self.inner.write().await;
        match data.bids.iter_mut().find(|b| b.id == id && b.status == from) {
            Some(bid) => {
                bid.status = to;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn close(&self) {
        info!("In-memory store dropped on shutdown");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::job::models::Owner;
    use chrono::NaiveDate;
    use serde_json::Map;

    fn job(title: &str, category: &str, deadline: &str, owner: &str) -> Job {
        Job {
            id: Uuid::new_v4(),
            title: title.to_string(),
            category: category.to_string(),
            deadline: deadline.parse::<NaiveDate>().unwrap(),
            owner: Owner {
                email: owner.to_string(),
                profile: Map::new(),
            },
            bid_count: 0,
            details: Map::new(),
        }
    }

    fn bid_on(job: &Job, bidder: &str) -> Bid {
        Bid {
            id: Uuid::new_v4(),
            job_id: job.id,
            bidder_email: bidder.to_string(),
            job_owner_email: job.owner.email.clone(),
            status: BidStatus::Pending,
            details: Map::new(),
        }
    }

    #[actix_web::test]
    async fn bid_insert_bumps_counter_once() {
        let store = MemoryStore::new();
        let logo = job("Logo Design", "design", "2024-06-01", "a@x.com");
        store.insert_job(&logo).await.unwrap();

        store.insert_bid(&bid_on(&logo, "b@y.com")).await.unwrap();
        let err = store.insert_bid(&bid_on(&logo, "b@y.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));

        let stored = store.get_job(logo.id).await.unwrap().unwrap();
        assert_eq!(stored.bid_count, 1);
        assert_eq!(store.list_bids_by_bidder("b@y.com").await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn update_never_touches_owner_or_counter() {
        let store = MemoryStore::new();
        let original = job("Logo Design", "design", "2024-06-01", "a@x.com");
        store.insert_job(&original).await.unwrap();
        store.insert_bid(&bid_on(&original, "b@y.com")).await.unwrap();

        let mut edited = original.clone();
        edited.title = "Logo Refresh".to_string();
        edited.bid_count = 0;
        edited.owner.email = "mallory@x.com".to_string();
        assert!(store.update_job(&edited).await.unwrap());

        let stored = store.get_job(original.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Logo Refresh");
        assert_eq!(stored.bid_count, 1);
        assert_eq!(stored.owner.email, "a@x.com");
    }

    #[actix_web::test]
    async fn status_compare_and_set_rejects_stale_state() {
        let store = MemoryStore::new();
        let logo = job("Logo Design", "design", "2024-06-01", "a@x.com");
        let bid = bid_on(&logo, "b@y.com");
        store.insert_bid(&bid).await.unwrap();

        assert!(store
            .set_bid_status(bid.id, BidStatus::Pending, BidStatus::InProgress)
            .await
            .unwrap());
        assert!(!store
            .set_bid_status(bid.id, BidStatus::Pending, BidStatus::Rejected)
            .await
            .unwrap());

        let stored = store.get_bid(bid.id).await.unwrap().unwrap();
        assert_eq!(stored.status, BidStatus::InProgress);
    }

    #[actix_web::test]
    async fn delete_reports_removed_count() {
        let store = MemoryStore::new();
        let logo = job("Logo Design", "design", "2024-06-01", "a@x.com");
        store.insert_job(&logo).await.unwrap();

        assert_eq!(store.delete_job(logo.id).await.unwrap(), 1);
        assert_eq!(store.delete_job(logo.id).await.unwrap(), 0);
        assert!(store.get_job(logo.id).await.unwrap().is_none());
    }
}
