//! HTTP handlers of the dashboard API.

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, HttpResponse, web};

use crate::dto::api::{ApiError, DashboardQuery};
use crate::services::ServiceError;

pub mod contacts;
pub mod main;
pub mod opportunities;
pub mod pipelines;
pub mod summary;

/// Registers every `/api` endpoint on the given scope.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(contacts::list_contacts)
        .service(contacts::contacts_by_source)
        .service(contacts::contacts_not_in_opportunities)
        .service(opportunities::list_opportunities)
        .service(opportunities::opportunities_by_stage)
        .service(opportunities::leads_by_sales_owner)
        .service(opportunities::sales_owners)
        .service(opportunities::stages)
        .service(pipelines::list_pipelines)
        .service(summary::dashboard_summary)
        .service(main::health);
}

/// Logs the failure and answers `500 {success: false, error}`.
pub fn error_response(context: &str, err: ServiceError) -> HttpResponse {
    log::error!("{context}: {err}");
    HttpResponse::InternalServerError().json(ApiError::new(err))
}

/// Lenient query extraction: repeated keys keep their first value and a
/// query string that cannot be decoded is treated as empty, so a request is
/// never rejected over its parameters.
impl FromRequest for DashboardQuery {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let pairs = web::Query::<Vec<(String, String)>>::from_query(req.query_string())
            .map(web::Query::into_inner)
            .unwrap_or_else(|err| {
                log::warn!("Ignoring undecodable query `{}`: {err}", req.query_string());
                Vec::new()
            });
        ready(Ok(DashboardQuery::from_pairs(pairs)))
    }
}
