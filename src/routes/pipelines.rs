use actix_web::{HttpResponse, Responder, get, web};

use crate::crm::CrmApi;
use crate::dto::api::ApiResponse;
use crate::routes::error_response;
use crate::services::pipelines as pipelines_service;

#[get("/pipelines")]
pub async fn list_pipelines(client: web::Data<dyn CrmApi>) -> impl Responder {
    match pipelines_service::list_pipelines(client.get_ref()).await {
        Ok(pipelines) => HttpResponse::Ok().json(ApiResponse::ok(pipelines)),
        Err(err) => error_response("Failed to list pipelines", err),
    }
}
