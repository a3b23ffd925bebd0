use actix_web::{HttpResponse, Responder, get, web};

use crate::crm::CrmApi;
use crate::dto::api::{ApiResponse, DashboardQuery};
use crate::routes::error_response;
use crate::services::summary as summary_service;

#[get("/summary")]
pub async fn dashboard_summary(
    query: DashboardQuery,
    client: web::Data<dyn CrmApi>,
) -> impl Responder {
    match summary_service::dashboard_summary(client.get_ref(), query.pipeline_id()).await {
        Ok(summary) => HttpResponse::Ok().json(ApiResponse::ok(summary)),
        Err(err) => error_response("Failed to build dashboard summary", err),
    }
}
