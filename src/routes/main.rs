use actix_web::{HttpResponse, Responder, get};

use crate::dto::api::HealthResponse;

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse { status: "ok" })
}
