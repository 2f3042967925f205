use actix_web::{HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::utils::now_iso;

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    /// UTC, ISO-8601
    pub timestamp: String,
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        service: "citizens-eye-service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: now_iso(),
    })
}
