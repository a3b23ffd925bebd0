use crate::analytics::{self, DashboardSummary};
use crate::crm::CrmApi;
use crate::services::ServiceResult;
use crate::services::deals::{DEFAULT_MAX_PAGES, fetch_all_contacts, fetch_all_deals};

/// Fetches contacts and deals once and derives every summary figure from
/// that snapshot.
pub async fn dashboard_summary<C>(
    client: &C,
    pipeline_id: Option<&str>,
) -> ServiceResult<DashboardSummary>
where
    C: CrmApi + ?Sized,
{
    let contacts = fetch_all_contacts(client, DEFAULT_MAX_PAGES).await?;
    let deals = fetch_all_deals(client, DEFAULT_MAX_PAGES).await?;
    Ok(analytics::dashboard_summary(&contacts, &deals, pipeline_id))
}
