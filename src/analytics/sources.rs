//! Source attribution for contacts.

use std::collections::HashSet;

use crate::analytics::{Buckets, normalize_name, pipeline_deals};
use crate::domain::contact::Contact;
use crate::domain::deal::Deal;

/// Bucket for contacts with neither tags nor a matching deal.
pub const NO_SOURCE: &str = "No Source";

/// Stage-name fragments that indicate where a lead came from.
const SOURCE_STAGE_MARKERS: [&str; 5] = ["walk", "online", "referral", "reference", "lead"];

/// Groups contacts by inferred source.
///
/// Tagged contacts land once under each of their tags. Untagged contacts are
/// matched by normalized full name against the deal source table: exact match
/// first, then substring containment in either direction in deal order.
/// Anything left goes to [`NO_SOURCE`].
pub fn contacts_by_source(
    contacts: &[Contact],
    deals: &[Deal],
    pipeline_id: Option<&str>,
) -> Buckets<Vec<Contact>> {
    let table = source_table(deals, pipeline_id);
    let mut grouped: Buckets<Vec<Contact>> = Buckets::new();

    for contact in contacts {
        if !contact.tags.is_empty() {
            for tag in &contact.tags {
                grouped
                    .entry_or_insert_with(tag, Vec::new)
                    .push(contact.clone());
            }
            continue;
        }

        let name = normalize_name(&contact.full_name());
        let source = match_source(&table, &name).unwrap_or(NO_SOURCE);
        grouped
            .entry_or_insert_with(source, Vec::new)
            .push(contact.clone());
    }

    grouped
}

/// Contacts whose normalized full name equals no deal name exactly.
///
/// Unlike [`contacts_by_source`] no substring matching is applied, so a
/// contact can be attributed to a deal's source and still be listed here.
pub fn contacts_not_in_opportunities(
    contacts: &[Contact],
    deals: &[Deal],
    pipeline_id: Option<&str>,
) -> Vec<Contact> {
    let deal_names: HashSet<String> = pipeline_deals(deals, pipeline_id)
        .map(|deal| normalize_name(deal.name_or_empty()))
        .collect();

    contacts
        .iter()
        .filter(|contact| !deal_names.contains(&normalize_name(&contact.full_name())))
        .cloned()
        .collect()
}

/// Normalized deal name -> source label. A later deal with the same name
/// replaces the label but keeps the earlier position.
fn source_table(deals: &[Deal], pipeline_id: Option<&str>) -> Buckets<String> {
    let mut table = Buckets::new();
    for deal in pipeline_deals(deals, pipeline_id) {
        let name = normalize_name(deal.name_or_empty());
        if name.is_empty() {
            continue;
        }
        if let Some(source) = deal_source(deal) {
            table.insert(&name, source);
        }
    }
    table
}

fn deal_source(deal: &Deal) -> Option<String> {
    if let Some(account) = deal.sales_account_id.as_ref().filter(|id| id.is_present()) {
        return Some(account.key());
    }

    let stage = deal.deal_stage.as_ref()?.label()?;
    let lowered = stage.to_lowercase();
    SOURCE_STAGE_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
        .then(|| stage.to_string())
}

fn match_source<'a>(table: &'a Buckets<String>, name: &str) -> Option<&'a str> {
    if let Some(source) = table.get(name) {
        return Some(source.as_str());
    }
    if name.is_empty() {
        return None;
    }
    table
        .iter()
        .find(|(deal_name, _)| deal_name.contains(name) || name.contains(*deal_name))
        .map(|(_, source)| source.as_str())
}
