use crate::crm::CrmApi;
use crate::domain::catalog::Pipeline;
use crate::services::ServiceResult;

/// Pipeline catalog offered as a dashboard filter.
pub async fn list_pipelines<C>(client: &C) -> ServiceResult<Vec<Pipeline>>
where
    C: CrmApi + ?Sized,
{
    let pipelines = client.fetch_pipelines().await?;
    log::debug!("Pipeline count: {}", pipelines.len());
    Ok(pipelines)
}
