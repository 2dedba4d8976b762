use sqlx::types::Json;
use sqlx::{Pool, Postgres};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::api::bid::models::{Bid, BidStatus};
use crate::db::error::{StoreError, StoreResult};
use crate::db::models::BidRow;

const BID_COLUMNS: &str = "id, job_id, bidder_email, job_owner_email, status, details";

/// Repository for Bid database operations
pub struct BidRepository;

impl BidRepository {
    pub async fn find_by_bidder_and_job(
        pool: &Pool<Postgres>,
        bidder_email: &str,
        job_id: Uuid,
    ) -> StoreResult<Option<Bid>> {
        let sql = format!(
            "SELECT {} FROM bids WHERE bidder_email = $1 AND job_id = $2",
            BID_COLUMNS
        );
        let row = sqlx::query_as::<_, BidRow>(&sql)
            .bind(bidder_email)
            .bind(job_id)
            .fetch_optional(pool)
            .await?;

        row.map(Bid::try_from).transpose()
    }

    /// Insert the bid and increment the job's counter in one transaction
    pub async fn create_and_count(pool: &Pool<Postgres>, bid: &Bid) -> StoreResult<()> {
        debug!("Creating bid: job={}, bidder={}", bid.job_id, bid.bidder_email);

        let mut tx = pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO bids (id, job_id, bidder_email, job_owner_email, status, details)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(bid.id)
        .bind(bid.job_id)
        .bind(&bid.bidder_email)
        .bind(&bid.job_owner_email)
        .bind(bid.status.as_str())
        .bind(Json(&bid.details))
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {}
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                // dropping tx rolls back
                return Err(StoreError::duplicate(format!(
                    "bid by {} on job {}",
                    bid.bidder_email, bid.job_id
                )));
            }
            Err(e) => return Err(e.into()),
        }

        let counted = sqlx::query(
            "UPDATE jobs SET bid_count = bid_count + 1, updated_at = NOW() WHERE id = $1",
        )
        .bind(bid.job_id)
        .execute(&mut *tx)
        .await?;

        if counted.rows_affected() == 0 {
            warn!("Bid {} references missing job {}", bid.id, bid.job_id);
        }

        tx.commit().await?;
        debug!("Bid created with id={}", bid.id);
        Ok(())
    }

    pub async fn find_by_id(pool: &Pool<Postgres>, id: Uuid) -> StoreResult<Option<Bid>> {
        let sql = format!("SELECT {} FROM bids WHERE id = $1", BID_COLUMNS);
        let row = sqlx::query_as::<_, BidRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        row.map(Bid::try_from).transpose()
    }

    pub async fn list_by_bidder(pool: &Pool<Postgres>, email: &str) -> StoreResult<Vec<Bid>> {
        Self::list_where(pool, "bidder_email", email).await
    }

    pub async fn list_by_job_owner(pool: &Pool<Postgres>, email: &str) -> StoreResult<Vec<Bid>> {
        Self::list_where(pool, "job_owner_email", email).await
    }

    async fn list_where(
        pool: &Pool<Postgres>,
        column: &'static str,
        email: &str,
    ) -> StoreResult<Vec<Bid>> {
        let sql = format!(
            "SELECT {} FROM bids WHERE {} = $1 ORDER BY created_at, id",
            BID_COLUMNS, column
        );
        let rows = sqlx::query_as::<_, BidRow>(&sql)
            .bind(email)
            .fetch_all(pool)
            .await?;

        debug!("Fetched {} bids where {}={}", rows.len(), column, email);
        rows.into_iter().map(Bid::try_from).collect()
    }

    /// Move a bid from `from` to `to` only if it is still in `from`
    pub async fn update_status(
        pool: &Pool<Postgres>,
        id: Uuid,
        from: BidStatus,
        to: BidStatus,
    ) -> StoreResult<bool> {
        debug!("Updating bid status: id={}, {} -> {}", id, from, to);

        let result = sqlx::query(
            "UPDATE bids SET status = $3, updated_at = NOW() WHERE id = $1 AND status = $2",
        )
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
