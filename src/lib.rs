//! Aggregation backend for the CRM dashboard.
//!
//! Pulls contacts and deals from the Freshworks CRM, joins them in memory and
//! serves the derived analytics as JSON. Nothing is cached: every request
//! rebuilds its view from a fresh fetch.

pub mod analytics;
pub mod domain;
pub mod dto;
pub mod pagination;

#[cfg(feature = "server")]
pub mod crm;
#[cfg(feature = "server")]
pub mod models;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

#[cfg(feature = "server")]
pub use server::run;

#[cfg(feature = "server")]
mod server {
    use std::sync::Arc;

    use actix_cors::Cors;
    use actix_web::{App, HttpServer, middleware, web};

    use crate::crm::CrmApi;
    use crate::crm::http::FreshworksClient;
    use crate::models::config::ServerConfig;
    use crate::routes::{configure_api, main::health};

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        let crm_config = server_config.crm_config();
        if server_config.freshworks_domain.trim().is_empty()
            && server_config.freshworks_base_url.is_none()
        {
            return Err(std::io::Error::other("freshworks_domain must be set"));
        }
        if crm_config.api_key.trim().is_empty() {
            return Err(std::io::Error::other("freshworks_api_key must be set"));
        }

        let client = FreshworksClient::new(&crm_config)
            .map_err(|e| std::io::Error::other(format!("Failed to create CRM client: {e}")))?;
        let client: Arc<dyn CrmApi> = Arc::new(client);
        let client = web::Data::from(client);

        let bind_address = (server_config.address.clone(), server_config.port);
        log::info!(
            "Serving dashboard API on {}:{} for {}",
            bind_address.0,
            bind_address.1,
            crm_config.base_url
        );

        HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .service(health)
                .service(web::scope("/api").configure(configure_api))
                .app_data(client.clone())
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
