use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::api::job::models::strip_reserved;

const RESERVED_BID_KEYS: &[&str] = &[
    "id", "_id", "jobId", "email", "bidderEmail", "jobOwnerEmail", "bayerEmail", "status",
];

/// Lifecycle state of a bid
///
/// Wire labels match what the frontend renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BidStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Rejected,
}

impl BidStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BidStatus::Pending => "Pending",
            BidStatus::InProgress => "In Progress",
            BidStatus::Completed => "Completed",
            BidStatus::Rejected => "Rejected",
        }
    }

    /// Pending -> In Progress | Rejected, In Progress -> Completed
    pub fn can_transition_to(self, next: BidStatus) -> bool {
        matches!(
            (self, next),
            (BidStatus::Pending, BidStatus::InProgress)
                | (BidStatus::Pending, BidStatus::Rejected)
                | (BidStatus::InProgress, BidStatus::Completed)
        )
    }
}

impl fmt::Display for BidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BidStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(BidStatus::Pending),
            "In Progress" => Ok(BidStatus::InProgress),
            "Completed" => Ok(BidStatus::Completed),
            "Rejected" => Ok(BidStatus::Rejected),
            other => Err(format!("unknown bid status: {}", other)),
        }
    }
}

/// A freelancer's offer on a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: Uuid,
    pub job_id: Uuid,
    pub bidder_email: String,
    /// Copied from the job when the bid is placed
    pub job_owner_email: String,
    pub status: BidStatus,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Bid {
    pub fn from_new(id: Uuid, job_owner_email: String, new_bid: NewBid) -> Self {
        let NewBid {
            job_id,
            bidder_email,
            mut details,
        } = new_bid;
        strip_reserved(&mut details, RESERVED_BID_KEYS);

        Bid {
            id,
            job_id,
            bidder_email,
            job_owner_email,
            status: BidStatus::Pending,
            details,
        }
    }
}

/// Request body for `POST /add-bid`
///
/// `id` and `email` are the field names older clients send.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewBid {
    #[serde(alias = "id")]
    pub job_id: Uuid,
    #[serde(alias = "email")]
    #[validate(email(message = "Bidder email must be a valid email address"))]
    pub bidder_email: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// Request body for `PATCH /status-updated/{id}`
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub current_status: BidStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_labels_round_trip_through_serde() {
        let value = serde_json::to_value(BidStatus::InProgress).unwrap();
        assert_eq!(value, json!("In Progress"));
        let parsed: BidStatus = serde_json::from_value(json!("Rejected")).unwrap();
        assert_eq!(parsed, BidStatus::Rejected);
        assert_eq!("In Progress".parse::<BidStatus>(), Ok(BidStatus::InProgress));
        assert!("Done".parse::<BidStatus>().is_err());
    }

    #[test]
    fn only_forward_transitions_are_legal() {
        use BidStatus::*;
        assert!(Pending.can_transition_to(InProgress));
        assert!(Pending.can_transition_to(Rejected));
        assert!(InProgress.can_transition_to(Completed));

        assert!(!Pending.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!InProgress.can_transition_to(Rejected));
        assert!(!Completed.can_transition_to(Pending));
        assert!(!Rejected.can_transition_to(InProgress));
    }

    #[test]
    fn new_bid_accepts_legacy_field_names() {
        let job_id = Uuid::new_v4();
        let new_bid: NewBid = serde_json::from_value(json!({
            "id": job_id,
            "email": "b@y.com",
            "price": 120,
            "status": "Completed",
            "bayerEmail": "someone@else.com"
        }))
        .unwrap();
        assert_eq!(new_bid.job_id, job_id);
        assert_eq!(new_bid.bidder_email, "b@y.com");

        let bid = Bid::from_new(Uuid::new_v4(), "a@x.com".to_string(), new_bid);
        assert_eq!(bid.status, BidStatus::Pending);
        assert_eq!(bid.job_owner_email, "a@x.com");
        assert_eq!(bid.details.get("price"), Some(&json!(120)));
        assert!(!bid.details.contains_key("status"));
        assert!(!bid.details.contains_key("bayerEmail"));
    }

    #[test]
    fn status_update_reads_current_status() {
        let update: StatusUpdate =
            serde_json::from_value(json!({ "currentStatus": "In Progress" })).unwrap();
        assert_eq!(update.current_status, BidStatus::InProgress);
    }
}
