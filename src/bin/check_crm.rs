//! Connectivity check against the configured CRM tenant.
//!
//! Fetches a small deals page plus the owner and stage catalogs and logs the
//! ids side by side, which shows at a glance whether enrichment can resolve
//! the deals' owners and stages.

use dotenvy::dotenv;

use crm_dashboard::crm::http::FreshworksClient;
use crm_dashboard::crm::{CrmApi, CrmResult};
use crm_dashboard::domain::types::RecordId;
use crm_dashboard::models::config::ServerConfig;
use crm_dashboard::services::deals::CatalogSnapshot;

const SAMPLE_PAGE_SIZE: u32 = 10;

fn id_list<'a>(ids: impl Iterator<Item = Option<&'a RecordId>>) -> Vec<String> {
    ids.map(|id| id.map_or_else(|| "-".to_string(), RecordId::key))
        .collect()
}

async fn check(client: &FreshworksClient) -> CrmResult<()> {
    let page = client.fetch_deals_page(1, SAMPLE_PAGE_SIZE).await?;
    let owners = client.fetch_owners().await?;
    let stages = client.fetch_stages().await?;

    log::info!(
        "Deal owner_ids: {:?}",
        id_list(page.deals.iter().map(|deal| deal.owner_id.as_ref()))
    );
    log::info!(
        "Deal deal_stage_ids: {:?}",
        id_list(page.deals.iter().map(|deal| deal.deal_stage_id.as_ref()))
    );
    log::info!(
        "Owner IDs: {:?}",
        id_list(owners.iter().map(|owner| owner.id.as_ref()))
    );
    log::info!(
        "Stage IDs: {:?}",
        id_list(stages.iter().map(|stage| stage.id.as_ref()))
    );

    let mut catalogs = CatalogSnapshot::from_catalogs(owners, stages);
    catalogs.merge_owners(page.users);
    let resolved = page
        .deals
        .iter()
        .filter(|deal| {
            deal.owner_id.as_ref().is_some_and(|id| catalogs.owner(id).is_some())
                && deal.deal_stage_id.as_ref().is_some_and(|id| catalogs.stage(id).is_some())
        })
        .count();
    log::info!(
        "Catalogs hold {} owner(s) and {} stage(s); {resolved} of {} deal(s) fully resolved",
        catalogs.owner_count(),
        catalogs.stage_count(),
        page.deals.len()
    );

    Ok(())
}

#[actix_web::main]
async fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let server_config = match ServerConfig::load() {
        Ok(server_config) => server_config,
        Err(err) => {
            log::error!("Error loading server config: {err}");
            std::process::exit(1);
        }
    };

    let client = match FreshworksClient::new(&server_config.crm_config()) {
        Ok(client) => client,
        Err(err) => {
            log::error!("Failed to create CRM client: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = check(&client).await {
        log::error!("CRM check failed: {err}");
        std::process::exit(1);
    }
}
