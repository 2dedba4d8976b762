use sqlx::types::Json;
use sqlx::{Pool, Postgres};
use tracing::debug;
use uuid::Uuid;

use crate::api::job::models::{Job, JobQuery};
use crate::db::error::{StoreError, StoreResult};
use crate::db::models::JobRow;

const JOB_COLUMNS: &str = "id, title, category, deadline, owner, bid_count, details";

/// Repository for Job database operations
pub struct JobRepository;

impl JobRepository {
    /// Insert a new job document
    pub async fn create(pool: &Pool<Postgres>, job: &Job) -> StoreResult<()> {
        debug!("Creating job: id={}, owner={}", job.id, job.owner.email);

        let result = sqlx::query(
            r#"
            INSERT INTO jobs (id, title, category, deadline, owner_email, owner, bid_count, details)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(job.id)
        .bind(&job.title)
        .bind(&job.category)
        .bind(job.deadline)
        .bind(&job.owner.email)
        .bind(Json(&job.owner))
        .bind(job.bid_count)
        .bind(Json(&job.details))
        .execute(pool)
        .await;

        match result {
            Ok(_) => {
                debug!("Job created with id={}", job.id);
                Ok(())
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StoreError::duplicate(format!("job {}", job.id)))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn list(pool: &Pool<Postgres>) -> StoreResult<Vec<Job>> {
        let sql = format!("SELECT {} FROM jobs ORDER BY created_at, id", JOB_COLUMNS);
        let rows = sqlx::query_as::<_, JobRow>(&sql).fetch_all(pool).await?;

        debug!("Fetched {} jobs", rows.len());
        Ok(rows.into_iter().map(Job::from).collect())
    }

    pub async fn list_by_owner(pool: &Pool<Postgres>, email: &str) -> StoreResult<Vec<Job>> {
        let sql = format!(
            "SELECT {} FROM jobs WHERE owner_email = $1 ORDER BY created_at, id",
            JOB_COLUMNS
        );
        let rows = sqlx::query_as::<_, JobRow>(&sql)
            .bind(email)
            .fetch_all(pool)
            .await?;

        debug!("Fetched {} jobs owned by {}", rows.len(), email);
        Ok(rows.into_iter().map(Job::from).collect())
    }

    /// Title substring + category filter, optionally ordered by deadline
    ///
    /// The title match is a literal, case-insensitive substring, so user
    /// input never reaches a pattern engine.
    pub async fn search(pool: &Pool<Postgres>, query: &JobQuery) -> StoreResult<Vec<Job>> {
        let order_by = match query.sort {
            Some(order) => format!("deadline {}, created_at, id", order.as_sql()),
            None => "created_at, id".to_string(),
        };
        let sql = format!(
            r#"
            SELECT {}
            FROM jobs
            WHERE ($1::text IS NULL OR strpos(lower(title), lower($1)) > 0)
              AND ($2::text IS NULL OR category = $2)
            ORDER BY {}
            "#,
            JOB_COLUMNS, order_by
        );

        let rows = sqlx::query_as::<_, JobRow>(&sql)
            .bind(query.search.as_deref())
            .bind(query.category.as_deref())
            .fetch_all(pool)
            .await?;

        debug!("Job search {:?} matched {} rows", query, rows.len());
        Ok(rows.into_iter().map(Job::from).collect())
    }

    pub async fn find_by_id(pool: &Pool<Postgres>, id: Uuid) -> StoreResult<Option<Job>> {
        let sql = format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS);
        let row = sqlx::query_as::<_, JobRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(Job::from))
    }

    /// Overwrite the editable fields; owner and bid_count are left alone
    pub async fn update(pool: &Pool<Postgres>, job: &Job) -> StoreResult<bool> {
        debug!("Updating job: id={}", job.id);

        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET title = $2, category = $3, deadline = $4, details = $5, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(job.id)
        .bind(&job.title)
        .bind(&job.category)
        .bind(job.deadline)
        .bind(Json(&job.details))
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(pool: &Pool<Postgres>, id: Uuid) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        debug!("Deleted {} job(s) with id={}", result.rows_affected(), id);
        Ok(result.rows_affected())
    }
}
