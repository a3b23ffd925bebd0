use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::catalog::{Owner, Stage};
use crate::domain::types::{Amount, RecordId, null_as_default};
use crate::pagination::PageMeta;

/// Deal (opportunity) as returned by the provider's deal views.
///
/// `owner` and `deal_stage` are attached locally by id lookup; `owner_name`
/// and `stage_name` are the flat labels added to single-page listings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub amount: Option<Amount>,
    #[serde(default)]
    pub owner_id: Option<RecordId>,
    #[serde(default)]
    pub deal_stage_id: Option<RecordId>,
    #[serde(default)]
    pub deal_pipeline_id: Option<RecordId>,
    #[serde(default)]
    pub sales_account_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deal_stage: Option<Stage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Deal {
    #[must_use]
    pub fn new(name: &str, amount: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            amount: Some(Amount::from(amount)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn in_pipeline(mut self, pipeline_id: impl Into<RecordId>) -> Self {
        self.deal_pipeline_id = Some(pipeline_id.into());
        self
    }

    #[must_use]
    pub fn at_stage(mut self, stage: Stage) -> Self {
        self.deal_stage_id = stage.id.clone();
        self.deal_stage = Some(stage);
        self
    }

    #[must_use]
    pub fn owned_by(mut self, owner: Owner) -> Self {
        self.owner_id = owner.id.clone();
        self.owner = Some(owner);
        self
    }

    /// Parsed amount; zero when missing or unparsable.
    pub fn amount_value(&self) -> f64 {
        self.amount.as_ref().map_or(0.0, Amount::value)
    }

    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Whether the deal belongs to the given pipeline (loose comparison).
    pub fn in_pipeline_matching(&self, pipeline_id: &str) -> bool {
        self.deal_pipeline_id
            .as_ref()
            .is_some_and(|id| id.matches(pipeline_id))
    }

    /// Whether the deal belongs to the given owner. The attached owner record
    /// wins over the raw `owner_id`.
    pub fn owned_by_matching(&self, owner_id: &str) -> bool {
        self.owner
            .as_ref()
            .and_then(|owner| owner.id.as_ref())
            .or(self.owner_id.as_ref())
            .is_some_and(|id| id.matches(owner_id))
    }
}

/// One page of `deals/view/{id}`.
///
/// `users` holds the owner records the provider side-loads for the page.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DealsPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub deals: Vec<Deal>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub users: Vec<Owner>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_provider_payload() {
        let page: DealsPage = serde_json::from_str(
            r#"{
                "deals": [{
                    "id": 11, "name": "John Doe", "amount": "1500.0",
                    "owner_id": 7, "deal_stage_id": 3, "deal_pipeline_id": 1,
                    "sales_account_id": null, "probability": 40
                }],
                "users": [{"id": 7, "display_name": "Asha", "email": "asha@example.com"}],
                "meta": {"total_pages": 2}
            }"#,
        )
        .unwrap();

        let deal = &page.deals[0];
        assert_eq!(deal.amount_value(), 1500.0);
        assert!(deal.sales_account_id.is_none());
        assert!(deal.in_pipeline_matching("1"));
        assert_eq!(deal.extra.get("probability"), Some(&Value::from(40)));
        assert_eq!(page.users[0].display_name.as_deref(), Some("Asha"));
        assert_eq!(page.meta.total_pages, Some(2));
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let page: DealsPage = serde_json::from_str(r#"{"deals": null}"#).unwrap();
        assert!(page.deals.is_empty());
        assert!(page.users.is_empty());
        assert_eq!(page.meta, PageMeta::default());
    }

    #[test]
    fn missing_amount_is_zero() {
        let deal = Deal {
            name: Some("No amount".into()),
            ..Deal::default()
        };
        assert_eq!(deal.amount_value(), 0.0);
    }

    #[test]
    fn unattached_references_are_not_serialized() {
        let json = serde_json::to_value(Deal::new("A", "1")).unwrap();
        assert!(json.get("owner").is_none());
        assert!(json.get("deal_stage").is_none());
        assert!(json.get("owner_name").is_none());
    }

    #[test]
    fn owner_match_prefers_attached_owner() {
        let deal = Deal::new("A", "1").owned_by(Owner::new(7, "Asha", "asha@example.com"));
        assert!(deal.owned_by_matching("7"));
        assert!(!deal.owned_by_matching("8"));

        let raw = Deal {
            owner_id: Some(RecordId::from("12")),
            ..Deal::new("B", "1")
        };
        assert!(raw.owned_by_matching(" 12 "));
        assert!(!Deal::new("C", "1").owned_by_matching("12"));
    }
}
