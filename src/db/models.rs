use chrono::NaiveDate;
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::api::bid::models::{Bid, BidStatus};
use crate::api::job::models::{Job, Owner};
use super::error::StoreError;

/// Database representation of a job
#[derive(Debug, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub deadline: NaiveDate,
    pub owner: Json<Owner>,
    pub bid_count: i64,
    pub details: Json<Map<String, Value>>,
}

impl From<JobRow> for Job {
    fn from(row: JobRow) -> Self {
        Job {
            id: row.id,
            title: row.title,
            category: row.category,
            deadline: row.deadline,
            owner: row.owner.0,
            bid_count: row.bid_count,
            details: row.details.0,
        }
    }
}

/// Database representation of a bid
#[derive(Debug, FromRow)]
pub struct BidRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub bidder_email: String,
    pub job_owner_email: String,
    pub status: String,
    pub details: Json<Map<String, Value>>,
}

impl TryFrom<BidRow> for Bid {
    type Error = StoreError;

    fn try_from(row: BidRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<BidStatus>()
            .map_err(|e| StoreError::corrupt(format!("bid {}: {}", row.id, e)))?;

        Ok(Bid {
            id: row.id,
            job_id: row.job_id,
            bidder_email: row.bidder_email,
            job_owner_email: row.job_owner_email,
            status,
            details: row.details.0,
        })
    }
}
