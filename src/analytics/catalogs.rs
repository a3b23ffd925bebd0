//! Filter catalogs derived from the deals themselves.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::analytics::distribution::{Labeling, stage_label};
use crate::analytics::pipeline_deals;
use crate::domain::deal::Deal;
use crate::domain::types::RecordId;

/// Owner entry offered as a dashboard filter.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OwnerSummary {
    pub id: RecordId,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Distinct owners attached to the filtered deals, in first-seen order.
pub fn sales_owners(deals: &[Deal], pipeline_id: Option<&str>) -> Vec<OwnerSummary> {
    let mut seen = HashSet::new();
    let mut owners = Vec::new();

    for owner in pipeline_deals(deals, pipeline_id).filter_map(|deal| deal.owner.as_ref()) {
        let Some(id) = owner.id.as_ref().filter(|id| id.is_present()) else {
            continue;
        };
        if !seen.insert(id.key()) {
            continue;
        }
        let name = owner
            .display_name
            .clone()
            .filter(|name| !name.is_empty())
            .or_else(|| owner.email.clone());
        owners.push(OwnerSummary {
            id: id.clone(),
            name,
            email: owner.email.clone(),
        });
    }

    owners
}

/// Sorted distinct stage labels of the filtered deals.
pub fn stage_names(deals: &[Deal], pipeline_id: Option<&str>) -> Vec<String> {
    pipeline_deals(deals, pipeline_id)
        .map(|deal| stage_label(deal, Labeling::Attached))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
