use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::models::{Job, JobQuery, JobUpdate, NewJob, Owner};
use crate::api::auth::SessionUser;
use crate::api::dto::{DeleteResult, InsertResult, UpdateResult};
use crate::api::error::ApiError;
use crate::api::policy;
use crate::db::{JobStore, Store, StoreError};

/// Job service containing business logic
pub struct JobService {
    store: Arc<dyn Store>,
}

impl JobService {
    /// Create a new JobService instance
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Create a single job
    ///
    /// # Business Logic
    /// - The embedded owner must be the caller
    /// - A new id is generated; `bidCount` starts at zero
    pub async fn create_job(
        &self,
        session: &SessionUser,
        new_job: NewJob,
    ) -> Result<InsertResult, ApiError> {
        policy::ensure_same_user(session, &new_job.owner.email)?;

        let job = Job::from_new(Uuid::new_v4(), new_job);
        info!("Service: Creating job '{}' for {}", job.title, job.owner.email);

        self.store.insert_job(&job).await?;

        info!("Service: Job created successfully with id={}", job.id);
        Ok(InsertResult::new(job.id))
    }

    pub async fn list_jobs(&self) -> Result<Vec<Job>, ApiError> {
        Ok(self.store.list_jobs().await?)
    }

    /// Jobs posted by `email`; only that user may list them
    pub async fn list_jobs_by_owner(
        &self,
        email: &str,
        session: &SessionUser,
    ) -> Result<Vec<Job>, ApiError> {
        policy::ensure_same_user(session, email)?;
        Ok(self.store.list_jobs_by_owner(email).await?)
    }

    pub async fn search_jobs(&self, query: &JobQuery) -> Result<Vec<Job>, ApiError> {
        Ok(self.store.search_jobs(query).await?)
    }

    /// Absent ids yield `None` rather than an error
    pub async fn get_job(&self, id: Uuid) -> Result<Option<Job>, ApiError> {
        Ok(self.store.get_job(id).await?)
    }

    /// Update-or-insert a job by id
    ///
    /// # Business Logic
    /// - Existing job: caller must own it; given fields replace stored ones,
    ///   the owner email may not change and the bid counter is untouched
    /// - Missing job: a new document is created under that id, owned by the
    ///   caller; title, category and deadline are then required
    ///
    /// # Returns
    /// - `UpdateResult::matched` for an existing job
    /// - `UpdateResult::upserted` when the document was created
    pub async fn update_job(
        &self,
        id: Uuid,
        update: JobUpdate,
        session: &SessionUser,
    ) -> Result<UpdateResult, ApiError> {
        match self.store.get_job(id).await? {
            Some(existing) => self.update_existing(existing, update, session).await,
            None => self.insert_missing(id, update, session).await,
        }
    }

    async fn update_existing(
        &self,
        existing: Job,
        update: JobUpdate,
        session: &SessionUser,
    ) -> Result<UpdateResult, ApiError> {
        policy::ensure_job_owner(session, &existing)?;

        if let Some(owner) = &update.owner {
            if owner.email != existing.owner.email {
                warn!("Service: Refusing to reassign owner of job {}", existing.id);
                return Err(ApiError::Validation("Job owner cannot be changed".to_string()));
            }
        }

        let mut updated = existing.clone();
        updated.apply(update);
        let modified = updated != existing;

        if modified && !self.store.update_job(&updated).await? {
            return Err(ApiError::Conflict(format!(
                "Job {} was deleted during the update",
                existing.id
            )));
        }

        info!("Service: Job {} updated (modified={})", existing.id, modified);
        Ok(UpdateResult::matched(modified))
    }

    async fn insert_missing(
        &self,
        id: Uuid,
        update: JobUpdate,
        session: &SessionUser,
    ) -> Result<UpdateResult, ApiError> {
        let owner = match &update.owner {
            Some(owner) => {
                policy::ensure_same_user(session, &owner.email)?;
                owner.clone()
            }
            None => Owner {
                email: session.email().to_string(),
                profile: session.claims.profile.clone(),
            },
        };

        let job = update.into_job(id, owner).map_err(|field| {
            ApiError::Validation(format!("{} is required to create job {}", field, id))
        })?;

        match self.store.insert_job(&job).await {
            Ok(()) => {
                info!("Service: Update of missing job {} created it", id);
                Ok(UpdateResult::upserted(id))
            }
            Err(StoreError::Duplicate(_)) => Err(ApiError::Conflict(format!(
                "Job {} was created concurrently",
                id
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a job; missing ids succeed with a zero count
    ///
    /// Bids placed on the job are left in place.
    pub async fn delete_job(&self, id: Uuid, session: &SessionUser) -> Result<DeleteResult, ApiError> {
        let Some(existing) = self.store.get_job(id).await? else {
            info!("Service: Delete of missing job {} is a no-op", id);
            return Ok(DeleteResult::new(0));
        };
        policy::ensure_job_owner(session, &existing)?;

        let deleted = self.store.delete_job(id).await?;
        info!("Service: Deleted job {} ({} document)", id, deleted);
        Ok(DeleteResult::new(deleted))
    }
}
