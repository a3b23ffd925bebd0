//! Configuration model loaded from external sources.

use std::env;

use ::config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Process-wide settings, deserialized once at startup.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// Tenant sub-domain of `myfreshworks.com`.
    pub freshworks_domain: String,
    pub freshworks_api_key: String,
    pub contacts_view_id: String,
    pub deals_view_id: String,
    /// Overrides the URL derived from `freshworks_domain`.
    #[serde(default)]
    pub freshworks_base_url: Option<String>,
}

/// Settings the CRM client needs, detached from the server settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrmConfig {
    pub base_url: String,
    pub api_key: String,
    pub contacts_view_id: String,
    pub deals_view_id: String,
}

impl ServerConfig {
    /// Reads `config/default.yaml`, the optional `config/{APP_ENV}.yaml`
    /// profile (defaults to `local`) and `APP_*` environment variables, in
    /// increasing priority.
    pub fn load() -> Result<Self, ConfigError> {
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

        Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(Environment::with_prefix("APP"))
            .build()?
            .try_deserialize()
    }

    pub fn crm_config(&self) -> CrmConfig {
        let base_url = self
            .freshworks_base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| {
                format!(
                    "https://{}.myfreshworks.com/crm/sales/api",
                    self.freshworks_domain.trim()
                )
            });

        CrmConfig {
            base_url,
            api_key: self.freshworks_api_key.clone(),
            contacts_view_id: self.contacts_view_id.clone(),
            deals_view_id: self.deals_view_id.clone(),
        }
    }
}
