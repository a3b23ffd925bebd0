use actix_web::{HttpResponse, Responder, get, web};

use crate::crm::CrmApi;
use crate::dto::api::{
    ApiResponse, DashboardQuery, OwnerBreakdownResponse, StageBreakdownResponse,
};
use crate::routes::error_response;
use crate::services::opportunities as opportunities_service;

#[get("/opportunities")]
pub async fn list_opportunities(
    query: DashboardQuery,
    client: web::Data<dyn CrmApi>,
) -> impl Responder {
    match opportunities_service::list_opportunities(
        client.get_ref(),
        query.page_request(),
        query.pipeline_id(),
    )
    .await
    {
        Ok(page) => HttpResponse::Ok().json(ApiResponse::paged(page)),
        Err(err) => error_response("Failed to list opportunities", err),
    }
}

#[get("/opportunities/by-stage")]
pub async fn opportunities_by_stage(
    query: DashboardQuery,
    client: web::Data<dyn CrmApi>,
) -> impl Responder {
    match opportunities_service::opportunities_by_stage(
        client.get_ref(),
        query.pipeline_id(),
        query.stage(),
    )
    .await
    {
        Ok(breakdown) => HttpResponse::Ok().json(StageBreakdownResponse::from(breakdown)),
        Err(err) => error_response("Failed to group opportunities by stage", err),
    }
}

#[get("/opportunities/leads-by-sales-owner")]
pub async fn leads_by_sales_owner(
    query: DashboardQuery,
    client: web::Data<dyn CrmApi>,
) -> impl Responder {
    match opportunities_service::opportunities_by_owner(
        client.get_ref(),
        query.pipeline_id(),
        query.owner_id(),
    )
    .await
    {
        Ok(breakdown) => HttpResponse::Ok().json(OwnerBreakdownResponse::from(breakdown)),
        Err(err) => error_response("Failed to group leads by sales owner", err),
    }
}

#[get("/sales-owners")]
pub async fn sales_owners(
    query: DashboardQuery,
    client: web::Data<dyn CrmApi>,
) -> impl Responder {
    match opportunities_service::sales_owners(client.get_ref(), query.pipeline_id()).await {
        Ok(owners) => HttpResponse::Ok().json(ApiResponse::ok(owners)),
        Err(err) => error_response("Failed to list sales owners", err),
    }
}

#[get("/stages")]
pub async fn stages(
    query: DashboardQuery,
    client: web::Data<dyn CrmApi>,
) -> impl Responder {
    match opportunities_service::stage_names(client.get_ref(), query.pipeline_id()).await {
        Ok(stages) => HttpResponse::Ok().json(ApiResponse::ok(stages)),
        Err(err) => error_response("Failed to list stages", err),
    }
}
