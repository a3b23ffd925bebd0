//! Contact listings and source attribution.

use crate::analytics::{self, Buckets};
use crate::crm::CrmApi;
use crate::domain::contact::Contact;
use crate::dto::api::PageOf;
use crate::pagination::PageRequest;
use crate::services::ServiceResult;
use crate::services::deals::{DEFAULT_MAX_PAGES, fetch_all_contacts, fetch_all_deals};

/// Relays one page of the contacts view.
pub async fn list_contacts<C>(client: &C, request: PageRequest) -> ServiceResult<PageOf<Contact>>
where
    C: CrmApi + ?Sized,
{
    let page = client
        .fetch_contacts_page(request.page, request.per_page)
        .await?;
    Ok(PageOf {
        items: page.contacts,
        meta: page.meta,
    })
}

/// Every contact grouped by inferred source.
pub async fn contacts_by_source<C>(
    client: &C,
    pipeline_id: Option<&str>,
) -> ServiceResult<Buckets<Vec<Contact>>>
where
    C: CrmApi + ?Sized,
{
    let contacts = fetch_all_contacts(client, DEFAULT_MAX_PAGES).await?;
    let deals = fetch_all_deals(client, DEFAULT_MAX_PAGES).await?;
    Ok(analytics::contacts_by_source(&contacts, &deals, pipeline_id))
}

/// Contacts whose name matches no deal.
pub async fn contacts_not_in_opportunities<C>(
    client: &C,
    pipeline_id: Option<&str>,
) -> ServiceResult<Vec<Contact>>
where
    C: CrmApi + ?Sized,
{
    let contacts = fetch_all_contacts(client, DEFAULT_MAX_PAGES).await?;
    let deals = fetch_all_deals(client, DEFAULT_MAX_PAGES).await?;
    Ok(analytics::contacts_not_in_opportunities(
        &contacts,
        &deals,
        pipeline_id,
    ))
}
