//! Envelopes and query parameters of the `/api` endpoints.

use serde::{Deserialize, Serialize};

use crate::analytics::{
    Buckets, DealGroup, OwnerBreakdown, OwnerRank, StageBreakdown, StageRank,
};
use crate::pagination::{PageMeta, PageRequest};

/// Query parameters accepted by the list and aggregate endpoints.
///
/// Values are kept raw so malformed numbers fall back to defaults instead of
/// rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub pipeline_id: Option<String>,
    pub owner_id: Option<String>,
    pub stage: Option<String>,
}

impl DashboardQuery {
    /// Builds the query from decoded `key=value` pairs.
    ///
    /// The first occurrence of a repeated key wins and unknown keys are
    /// ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "page" => &mut query.page,
                "per_page" => &mut query.per_page,
                "pipeline_id" => &mut query.pipeline_id,
                "owner_id" => &mut query.owner_id,
                "stage" => &mut query.stage,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        query
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_raw(self.page.as_deref(), self.per_page.as_deref())
    }

    /// Pipeline filter, ignoring blank values.
    pub fn pipeline_id(&self) -> Option<&str> {
        non_blank(self.pipeline_id.as_deref())
    }

    /// Owner filter of the leads-by-owner view.
    pub fn owner_id(&self) -> Option<&str> {
        non_blank(self.owner_id.as_deref())
    }

    /// Stage label filter of the by-stage view. Labels are matched exactly,
    /// so only surrounding whitespace is dropped.
    pub fn stage(&self) -> Option<&str> {
        non_blank(self.stage.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// A page of records together with the provider's pagination block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageOf<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

/// Successful response: `{success: true, data, meta?}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            meta: None,
        }
    }

    pub fn paged(page: PageOf<T>) -> ApiResponse<Vec<T>> {
        ApiResponse {
            success: true,
            data: page.items,
            meta: Some(page.meta),
        }
    }
}

/// Failed response: `{success: false, error}`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub success: bool,
    pub error: String,
}

impl ApiError {
    pub fn new(error: impl ToString) -> Self {
        Self {
            success: false,
            error: error.to_string(),
        }
    }
}

/// `/opportunities/by-stage` payload.
#[derive(Debug, Serialize)]
pub struct StageBreakdownResponse {
    pub success: bool,
    pub data: Buckets<DealGroup>,
    pub top_stages: Vec<StageRank>,
}

impl From<StageBreakdown> for StageBreakdownResponse {
    fn from(breakdown: StageBreakdown) -> Self {
        Self {
            success: true,
            data: breakdown.groups,
            top_stages: breakdown.top_stages,
        }
    }
}

/// `/opportunities/leads-by-sales-owner` payload.
#[derive(Debug, Serialize)]
pub struct OwnerBreakdownResponse {
    pub success: bool,
    pub data: Buckets<DealGroup>,
    pub top_owners: Vec<OwnerRank>,
}

impl From<OwnerBreakdown> for OwnerBreakdownResponse {
    fn from(breakdown: OwnerBreakdown) -> Self {
        Self {
            success: true,
            data: breakdown.groups,
            top_owners: breakdown.top_owners,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_pipeline_is_no_filter() {
        let query = DashboardQuery {
            pipeline_id: Some("  ".into()),
            ..DashboardQuery::default()
        };
        assert_eq!(query.pipeline_id(), None);

        let query = DashboardQuery {
            pipeline_id: Some(" 12 ".into()),
            ..DashboardQuery::default()
        };
        assert_eq!(query.pipeline_id(), Some("12"));
    }

    #[test]
    fn first_occurrence_of_a_key_wins() {
        let query = DashboardQuery::from_pairs([
            ("page", "2"),
            ("page", "9"),
            ("stage", " Won "),
            ("owner_id", ""),
            ("colour", "blue"),
        ]);

        assert_eq!(query.page.as_deref(), Some("2"));
        assert_eq!(query.page_request().page, 2);
        assert_eq!(query.stage(), Some("Won"));
        assert_eq!(query.owner_id(), None);
        assert_eq!(query.pipeline_id(), None);
    }

    #[test]
    fn envelope_omits_missing_meta() {
        let json = serde_json::to_value(ApiResponse::ok(vec![1, 2])).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": [1, 2]}));
    }

    #[test]
    fn paged_envelope_carries_meta() {
        let page = PageOf {
            items: vec!["a"],
            meta: PageMeta::new(1, 3),
        };
        let json = serde_json::to_value(ApiResponse::paged(page)).unwrap();
        assert_eq!(json["meta"]["total_pages"], 3);
        assert_eq!(json["data"][0], "a");
    }

    #[test]
    fn error_envelope() {
        let json = serde_json::to_value(ApiError::new("boom")).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "error": "boom"}));
    }
}
