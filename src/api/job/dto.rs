use serde::Deserialize;

use super::models::{JobQuery, SortOrder};

/// Raw query string of `GET /all-jobs`
///
/// The frontend always sends every key, often with empty values, so empty
/// strings mean "not set".
#[derive(Debug, Default, Deserialize)]
pub struct JobSearchParams {
    pub search: Option<String>,
    pub filter: Option<String>,
    pub sort: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl From<JobSearchParams> for JobQuery {
    fn from(params: JobSearchParams) -> Self {
        // anything other than "asc" sorts latest deadline first
        let sort = non_empty(params.sort).map(|sort| match sort.as_str() {
            "asc" => SortOrder::Asc,
            _ => SortOrder::Desc,
        });

        JobQuery {
            search: non_empty(params.search),
            category: non_empty(params.filter),
            sort,
        }
    }
}
