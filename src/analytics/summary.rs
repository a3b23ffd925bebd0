//! Composite dashboard figures.

use serde::Serialize;

use crate::analytics::distribution::{
    Labeling, OwnerRank, StageRank, owner_label, stage_label, tally_deals, top_ranked,
};
use crate::analytics::sources::{contacts_by_source, contacts_not_in_opportunities};
use crate::analytics::{Buckets, pipeline_deals};
use crate::domain::contact::Contact;
use crate::domain::deal::Deal;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_contacts: usize,
    pub total_opportunities: usize,
    pub contacts_without_opportunities: usize,
    pub total_opportunity_value: f64,
    pub sources_breakdown: Buckets<usize>,
    pub top_stages: Vec<StageRank>,
    pub top_owners: Vec<OwnerRank>,
}

/// Builds the summary from one snapshot of contacts and deals.
///
/// Stage and owner rankings only look at the attached `deal_stage` / `owner`
/// records.
pub fn dashboard_summary(
    contacts: &[Contact],
    deals: &[Deal],
    pipeline_id: Option<&str>,
) -> DashboardSummary {
    let (total_opportunities, total_opportunity_value) = pipeline_deals(deals, pipeline_id)
        .fold((0, 0.0), |(count, value), deal| {
            (count + 1, value + deal.amount_value())
        });

    let sources_breakdown =
        contacts_by_source(contacts, deals, pipeline_id).map_values(Vec::len);

    let stages = tally_deals(deals, pipeline_id, |deal| stage_label(deal, Labeling::Attached));
    let top_stages = top_ranked(&stages, |tally| *tally)
        .into_iter()
        .map(|(stage, tally)| StageRank {
            stage,
            count: tally.count,
            total_value: tally.total_value,
        })
        .collect();

    let owners = tally_deals(deals, pipeline_id, |deal| owner_label(deal, Labeling::Attached));
    let top_owners = top_ranked(&owners, |tally| *tally)
        .into_iter()
        .map(|(owner, tally)| OwnerRank {
            owner,
            count: tally.count,
            total_value: tally.total_value,
        })
        .collect();

    DashboardSummary {
        total_contacts: contacts.len(),
        total_opportunities,
        contacts_without_opportunities: contacts_not_in_opportunities(contacts, deals, pipeline_id)
            .len(),
        total_opportunity_value,
        sources_breakdown,
        top_stages,
        top_owners,
    }
}
