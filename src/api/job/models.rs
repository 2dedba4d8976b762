use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;
use validator::Validate;

/// Keys the service manages itself; clients cannot set them through extra fields
const RESERVED_JOB_KEYS: &[&str] = &[
    "id", "_id", "owner", "bayer", "ownerEmail", "bidCount", "bit_count",
];

/// Drop system-managed keys from a flattened document body
pub fn strip_reserved(details: &mut Map<String, Value>, reserved: &[&str]) {
    details.retain(|key, _| !reserved.contains(&key.as_str()));
}

/// The posting user, embedded in every job
///
/// Only `email` is interpreted; profile fields such as `name` or `photo`
/// are stored as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Owner {
    #[validate(email(message = "Owner email must be a valid email address"))]
    pub email: String,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

/// A posted job as stored and returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub deadline: NaiveDate,
    pub owner: Owner,
    #[serde(default, alias = "bit_count")]
    pub bid_count: i64,
    /// Free-form document fields (description, price range, ...)
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Job {
    /// Build a fresh job document; the bid counter always starts at zero
    pub fn from_new(id: Uuid, new_job: NewJob) -> Self {
        let NewJob {
            title,
            category,
            deadline,
            owner,
            mut details,
        } = new_job;
        strip_reserved(&mut details, RESERVED_JOB_KEYS);

        Job {
            id,
            title,
            category,
            deadline,
            owner,
            bid_count: 0,
            details,
        }
    }

    /// Replace every field present in `update`, leaving owner and counter alone
    pub fn apply(&mut self, update: JobUpdate) {
        let JobUpdate {
            title,
            category,
            deadline,
            owner: _,
            mut details,
        } = update;
        strip_reserved(&mut details, RESERVED_JOB_KEYS);

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(deadline) = deadline {
            self.deadline = deadline;
        }
        self.details.extend(details);
    }
}

/// Request body for `POST /add-job`
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Title must be between 1 and 200 characters"
    ))]
    pub title: String,
    #[validate(length(
        min = 1,
        max = 100,
        message = "Category must be between 1 and 100 characters"
    ))]
    pub category: String,
    pub deadline: NaiveDate,
    #[serde(alias = "bayer")]
    #[validate(nested)]
    pub owner: Owner,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// Request body for `PUT /update-job/{id}`; absent fields are left untouched
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobUpdate {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Title must be between 1 and 200 characters"
    ))]
    pub title: Option<String>,
    #[validate(length(
        min = 1,
        max = 100,
        message = "Category must be between 1 and 100 characters"
    ))]
    pub category: Option<String>,
    pub deadline: Option<NaiveDate>,
    #[serde(alias = "bayer")]
    pub owner: Option<Owner>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl JobUpdate {
    /// Turn an update for a missing id into a full job owned by `owner`
    ///
    /// Returns the name of the first missing required field on failure.
    pub fn into_job(self, id: Uuid, owner: Owner) -> Result<Job, &'static str> {
        let JobUpdate {
            title,
            category,
            deadline,
            owner: _,
            details,
        } = self;

        let new_job = NewJob {
            title: title.ok_or("title")?,
            category: category.ok_or("category")?,
            deadline: deadline.ok_or("deadline")?,
            owner,
            details,
        };
        Ok(Job::from_new(id, new_job))
    }
}

/// Deadline ordering for job searches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Normalized search over the job collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobQuery {
    /// Case-insensitive title substring; `None` matches every title
    pub search: Option<String>,
    /// Exact category match
    pub category: Option<String>,
    pub sort: Option<SortOrder>,
}

impl JobQuery {
    /// Whether `job` satisfies the title and category predicates
    pub fn matches(&self, job: &Job) -> bool {
        let title_ok = match &self.search {
            Some(needle) => job.title.to_lowercase().contains(&needle.to_lowercase()),
            None => true,
        };
        let category_ok = match &self.category {
            Some(category) => &job.category == category,
            None => true,
        };
        title_ok && category_ok
    }
}
