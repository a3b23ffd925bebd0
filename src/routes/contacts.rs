use actix_web::{HttpResponse, Responder, get, web};

use crate::crm::CrmApi;
use crate::dto::api::{ApiResponse, DashboardQuery};
use crate::routes::error_response;
use crate::services::contacts as contacts_service;

#[get("/contacts")]
pub async fn list_contacts(
    query: DashboardQuery,
    client: web::Data<dyn CrmApi>,
) -> impl Responder {
    match contacts_service::list_contacts(client.get_ref(), query.page_request()).await {
        Ok(page) => HttpResponse::Ok().json(ApiResponse::paged(page)),
        Err(err) => error_response("Failed to list contacts", err),
    }
}

#[get("/contacts/by-source")]
pub async fn contacts_by_source(
    query: DashboardQuery,
    client: web::Data<dyn CrmApi>,
) -> impl Responder {
    match contacts_service::contacts_by_source(client.get_ref(), query.pipeline_id()).await {
        Ok(grouped) => HttpResponse::Ok().json(ApiResponse::ok(grouped)),
        Err(err) => error_response("Failed to group contacts by source", err),
    }
}

#[get("/contacts/not-in-opportunities")]
pub async fn contacts_not_in_opportunities(
    query: DashboardQuery,
    client: web::Data<dyn CrmApi>,
) -> impl Responder {
    match contacts_service::contacts_not_in_opportunities(client.get_ref(), query.pipeline_id())
        .await
    {
        Ok(contacts) => HttpResponse::Ok().json(ApiResponse::ok(contacts)),
        Err(err) => error_response("Failed to list contacts without opportunities", err),
    }
}
