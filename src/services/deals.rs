//! Pagination walks over the CRM list endpoints.
//!
//! A deal walk is a three-step protocol: fetch the owner and stage catalogs
//! once, index them into a [`CatalogSnapshot`], then request pages strictly
//! in order, enriching each deal from the snapshot. Catalogs are never
//! re-fetched mid-walk.

use std::collections::HashMap;

use crate::crm::{CrmApi, CrmResult};
use crate::domain::catalog::{Owner, Stage};
use crate::domain::contact::{Contact, ContactsPage};
use crate::domain::deal::{Deal, DealsPage};
use crate::domain::types::RecordId;

/// Hard cap on pages requested by one walk.
pub const DEFAULT_MAX_PAGES: u32 = 100;
/// Page size used while walking.
pub const WALK_PAGE_SIZE: u32 = 100;

/// Owner and stage lookups keyed by provider id.
#[derive(Clone, Debug, Default)]
pub struct CatalogSnapshot {
    owners: HashMap<String, Owner>,
    stages: HashMap<String, Stage>,
}

impl CatalogSnapshot {
    /// Fetches both catalogs. A failed catalog is logged and treated as empty;
    /// enrichment is best-effort.
    pub async fn fetch<C>(client: &C) -> Self
    where
        C: CrmApi + ?Sized,
    {
        let owners = client.fetch_owners().await.unwrap_or_else(|err| {
            log::warn!("Could not fetch owners: {err}");
            Vec::new()
        });
        let stages = client.fetch_stages().await.unwrap_or_else(|err| {
            log::warn!("Could not fetch stages: {err}");
            Vec::new()
        });
        Self::from_catalogs(owners, stages)
    }

    /// Indexes the catalogs; entries without an id are dropped.
    pub fn from_catalogs(owners: Vec<Owner>, stages: Vec<Stage>) -> Self {
        let mut snapshot = Self::default();
        snapshot.merge_owners(owners);
        for stage in stages {
            if let Some(key) = present_key(stage.id.as_ref()) {
                snapshot.stages.entry(key).or_insert(stage);
            }
        }
        snapshot
    }

    /// Adds owners not yet known; existing entries are kept as they are.
    pub fn merge_owners(&mut self, owners: Vec<Owner>) {
        for owner in owners {
            if let Some(key) = present_key(owner.id.as_ref()) {
                self.owners.entry(key).or_insert(owner);
            }
        }
    }

    pub fn owner(&self, id: &RecordId) -> Option<&Owner> {
        self.owners.get(&id.key())
    }

    pub fn stage(&self, id: &RecordId) -> Option<&Stage> {
        self.stages.get(&id.key())
    }

    pub fn owner_count(&self) -> usize {
        self.owners.len()
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Attaches `owner` and `deal_stage` when the ids resolve; unresolved ids
    /// leave the deal untouched.
    pub fn enrich(&self, deal: &mut Deal) {
        if let Some(owner) = deal.owner_id.as_ref().and_then(|id| self.owner(id)) {
            deal.owner = Some(owner.clone());
        }
        if let Some(stage) = deal.deal_stage_id.as_ref().and_then(|id| self.stage(id)) {
            deal.deal_stage = Some(stage.clone());
        }
    }
}

fn present_key(id: Option<&RecordId>) -> Option<String> {
    id.filter(|id| id.is_present()).map(RecordId::key)
}

/// Fetches the catalogs, then every deal page.
pub async fn fetch_all_deals<C>(client: &C, max_pages: u32) -> CrmResult<Vec<Deal>>
where
    C: CrmApi + ?Sized,
{
    let catalogs = CatalogSnapshot::fetch(client).await;
    walk_deals(client, catalogs, max_pages).await
}

/// Requests deal pages in order until an empty page, the last page reported
/// by the provider, or `max_pages`, whichever comes first.
///
/// Owners side-loaded with a page extend `catalogs` for that page and the
/// following ones. The first failed page aborts the walk.
pub async fn walk_deals<C>(
    client: &C,
    mut catalogs: CatalogSnapshot,
    max_pages: u32,
) -> CrmResult<Vec<Deal>>
where
    C: CrmApi + ?Sized,
{
    let mut all_deals = Vec::new();
    let mut page = 1;

    while page <= max_pages {
        let DealsPage { deals, users, meta } =
            client.fetch_deals_page(page, WALK_PAGE_SIZE).await?;
        catalogs.merge_owners(users);

        if deals.is_empty() {
            break;
        }
        all_deals.extend(deals.into_iter().map(|mut deal| {
            catalogs.enrich(&mut deal);
            deal
        }));

        if meta.is_last(page) {
            break;
        }
        page += 1;
    }

    log::debug!("Fetched {} deals in {page} page(s)", all_deals.len());
    Ok(all_deals)
}

/// Requests contact pages with the same termination rules as [`walk_deals`].
pub async fn fetch_all_contacts<C>(client: &C, max_pages: u32) -> CrmResult<Vec<Contact>>
where
    C: CrmApi + ?Sized,
{
    let mut all_contacts = Vec::new();
    let mut page = 1;

    while page <= max_pages {
        let ContactsPage { contacts, meta } =
            client.fetch_contacts_page(page, WALK_PAGE_SIZE).await?;

        if contacts.is_empty() {
            break;
        }
        all_contacts.extend(contacts);

        if meta.is_last(page) {
            break;
        }
        page += 1;
    }

    log::debug!("Fetched {} contacts in {page} page(s)", all_contacts.len());
    Ok(all_contacts)
}
