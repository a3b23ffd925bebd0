//! Deal listings and stage/owner breakdowns.

use crate::analytics::{self, OwnerBreakdown, OwnerSummary, StageBreakdown};
use crate::crm::CrmApi;
use crate::domain::deal::Deal;
use crate::dto::api::PageOf;
use crate::pagination::PageRequest;
use crate::services::ServiceResult;
use crate::services::deals::{CatalogSnapshot, DEFAULT_MAX_PAGES, fetch_all_deals};

/// One page of deals with flat `owner_name` / `stage_name` labels.
///
/// Owners come from the page's side-loaded users only; labels that do not
/// resolve are empty strings. The pipeline filter is applied after the page
/// is fetched, so a page may hold fewer than `per_page` deals.
pub async fn list_opportunities<C>(
    client: &C,
    request: PageRequest,
    pipeline_id: Option<&str>,
) -> ServiceResult<PageOf<Deal>>
where
    C: CrmApi + ?Sized,
{
    let page = client
        .fetch_deals_page(request.page, request.per_page)
        .await?;
    let stages = client.fetch_stages().await?;
    let catalogs = CatalogSnapshot::from_catalogs(page.users, stages);

    let items = page
        .deals
        .into_iter()
        .filter(|deal| pipeline_id.is_none_or(|id| deal.in_pipeline_matching(id)))
        .map(|mut deal| {
            deal.owner_name = Some(
                deal.owner_id
                    .as_ref()
                    .and_then(|id| catalogs.owner(id))
                    .and_then(|owner| owner.display_name.clone())
                    .unwrap_or_default(),
            );
            deal.stage_name = Some(
                deal.deal_stage_id
                    .as_ref()
                    .and_then(|id| catalogs.stage(id))
                    .and_then(|stage| stage.name.clone())
                    .unwrap_or_default(),
            );
            deal
        })
        .collect();

    Ok(PageOf {
        items,
        meta: page.meta,
    })
}

/// Deals grouped by stage, optionally narrowed to a single stage label.
pub async fn opportunities_by_stage<C>(
    client: &C,
    pipeline_id: Option<&str>,
    stage: Option<&str>,
) -> ServiceResult<StageBreakdown>
where
    C: CrmApi + ?Sized,
{
    let deals = fetch_all_deals(client, DEFAULT_MAX_PAGES).await?;
    let breakdown = analytics::opportunities_by_stage(&deals, pipeline_id);
    Ok(match stage {
        Some(stage) => breakdown.narrowed_to(stage),
        None => breakdown,
    })
}

pub async fn opportunities_by_owner<C>(
    client: &C,
    pipeline_id: Option<&str>,
    owner_id: Option<&str>,
) -> ServiceResult<OwnerBreakdown>
where
    C: CrmApi + ?Sized,
{
    let deals = fetch_all_deals(client, DEFAULT_MAX_PAGES).await?;
    Ok(analytics::opportunities_by_owner(&deals, pipeline_id, owner_id))
}

/// Owners that appear on at least one deal.
pub async fn sales_owners<C>(
    client: &C,
    pipeline_id: Option<&str>,
) -> ServiceResult<Vec<OwnerSummary>>
where
    C: CrmApi + ?Sized,
{
    let deals = fetch_all_deals(client, DEFAULT_MAX_PAGES).await?;
    Ok(analytics::sales_owners(&deals, pipeline_id))
}

/// Stage labels that appear on at least one deal.
pub async fn stage_names<C>(client: &C, pipeline_id: Option<&str>) -> ServiceResult<Vec<String>>
where
    C: CrmApi + ?Sized,
{
    let deals = fetch_all_deals(client, DEFAULT_MAX_PAGES).await?;
    Ok(analytics::stage_names(&deals, pipeline_id))
}
