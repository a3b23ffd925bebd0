//! Stage and owner distributions of deals.

use serde::Serialize;

use crate::analytics::{Buckets, pipeline_deals};
use crate::domain::deal::Deal;

/// Label for deals whose stage could not be resolved.
pub const UNKNOWN_STAGE: &str = "Unknown";
/// Label for deals without a resolvable owner.
pub const UNASSIGNED_OWNER: &str = "Unassigned";
/// Number of entries kept in a ranking.
pub const TOP_LIMIT: usize = 10;

/// Which deal fields may be used to resolve a label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Labeling {
    /// Only the attached `deal_stage` / `owner` records.
    Attached,
    /// Attached records first, then the flat `stage_name` / `owner_name`.
    WithFlatFields,
}

pub fn stage_label(deal: &Deal, labeling: Labeling) -> String {
    let attached = deal.deal_stage.as_ref().and_then(|stage| stage.label());
    let flat = match labeling {
        Labeling::Attached => None,
        Labeling::WithFlatFields => deal.stage_name.as_deref().filter(|name| !name.is_empty()),
    };
    attached.or(flat).unwrap_or(UNKNOWN_STAGE).to_string()
}

pub fn owner_label(deal: &Deal, labeling: Labeling) -> String {
    if let Some(label) = deal.owner.as_ref().and_then(|owner| owner.label()) {
        return label;
    }
    let flat = match labeling {
        Labeling::Attached => None,
        Labeling::WithFlatFields => deal
            .owner_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty()),
    };
    flat.unwrap_or(UNASSIGNED_OWNER).to_string()
}

/// Deal count and summed amount of a group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Tally {
    pub count: usize,
    pub total_value: f64,
}

impl Tally {
    fn add(&mut self, deal: &Deal) {
        self.count += 1;
        self.total_value += deal.amount_value();
    }
}

/// A group of deals sharing a label.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DealGroup {
    #[serde(flatten)]
    pub tally: Tally,
    pub leads: Vec<Deal>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StageRank {
    pub stage: String,
    pub count: usize,
    pub total_value: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OwnerRank {
    pub owner: String,
    pub count: usize,
    pub total_value: f64,
}

/// Deals grouped by stage plus the top stages by deal count.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StageBreakdown {
    pub groups: Buckets<DealGroup>,
    pub top_stages: Vec<StageRank>,
}

impl StageBreakdown {
    /// Keeps only the `stage` group. An unknown stage yields one empty group
    /// under that label.
    #[must_use]
    pub fn narrowed_to(mut self, stage: &str) -> Self {
        let group = self.groups.get(stage).cloned().unwrap_or_default();
        self.groups = Buckets::new();
        self.groups.insert(stage, group);
        self.top_stages.retain(|rank| rank.stage == stage);
        self
    }
}

/// Deals grouped by owner plus the top owners by deal count.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OwnerBreakdown {
    pub groups: Buckets<DealGroup>,
    pub top_owners: Vec<OwnerRank>,
}

pub fn opportunities_by_stage(deals: &[Deal], pipeline_id: Option<&str>) -> StageBreakdown {
    let groups = group_deals(deals, pipeline_id, |deal| {
        stage_label(deal, Labeling::WithFlatFields)
    });
    let top_stages = top_ranked(&groups, |group| group.tally)
        .into_iter()
        .map(|(stage, tally)| StageRank {
            stage,
            count: tally.count,
            total_value: tally.total_value,
        })
        .collect();
    StageBreakdown { groups, top_stages }
}

/// Groups deals by owner label. With `owner_id` set, only that owner's deals
/// are grouped.
pub fn opportunities_by_owner(
    deals: &[Deal],
    pipeline_id: Option<&str>,
    owner_id: Option<&str>,
) -> OwnerBreakdown {
    let owned: Vec<Deal> = deals
        .iter()
        .filter(|deal| owner_id.is_none_or(|id| deal.owned_by_matching(id)))
        .cloned()
        .collect();
    let groups = group_deals(&owned, pipeline_id, |deal| {
        owner_label(deal, Labeling::WithFlatFields)
    });
    let top_owners = top_ranked(&groups, |group| group.tally)
        .into_iter()
        .map(|(owner, tally)| OwnerRank {
            owner,
            count: tally.count,
            total_value: tally.total_value,
        })
        .collect();
    OwnerBreakdown { groups, top_owners }
}

/// Groups the filtered deals under `label`, keeping each deal as a lead.
pub fn group_deals<F>(deals: &[Deal], pipeline_id: Option<&str>, label: F) -> Buckets<DealGroup>
where
    F: Fn(&Deal) -> String,
{
    let mut groups: Buckets<DealGroup> = Buckets::new();
    for deal in pipeline_deals(deals, pipeline_id) {
        let group = groups.entry_or_insert_with(&label(deal), DealGroup::default);
        group.tally.add(deal);
        group.leads.push(deal.clone());
    }
    groups
}

/// Counts and sums the filtered deals under `label`.
pub fn tally_deals<F>(deals: &[Deal], pipeline_id: Option<&str>, label: F) -> Buckets<Tally>
where
    F: Fn(&Deal) -> String,
{
    let mut tallies: Buckets<Tally> = Buckets::new();
    for deal in pipeline_deals(deals, pipeline_id) {
        tallies.entry_or_insert_with(&label(deal), Tally::default).add(deal);
    }
    tallies
}

/// The [`TOP_LIMIT`] largest groups by count; ties keep first-seen order.
pub fn top_ranked<V, F>(buckets: &Buckets<V>, tally: F) -> Vec<(String, Tally)>
where
    F: Fn(&V) -> Tally,
{
    let mut ranked: Vec<(String, Tally)> = buckets
        .iter()
        .map(|(label, value)| (label.to_string(), tally(value)))
        .collect();
    ranked.sort_by(|left, right| right.1.count.cmp(&left.1.count));
    ranked.truncate(TOP_LIMIT);
    ranked
}
