pub mod analytics;
pub mod auth;
pub mod complaints;
pub mod health;
pub mod ml;
pub mod swagger;

use actix_web::{error, guard, web, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::middleware::RequireRole;
use crate::utils::AppError;

/// Generic `{ "message": ... }` acknowledgement body.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

fn json_error_handler(err: error::JsonPayloadError, req: &HttpRequest) -> error::Error {
    log::warn!("❌ {} {} - invalid JSON body: {}", req.method(), req.path(), err);
    AppError::InvalidRequest(format!("Invalid JSON body: {}", err)).into()
}

fn query_error_handler(err: error::QueryPayloadError, req: &HttpRequest) -> error::Error {
    log::warn!("❌ {} {} - invalid query string: {}", req.method(), req.path(), err);
    AppError::InvalidRequest(format!("Invalid query string: {}", err)).into()
}

/// Registers every `/api` route. Role checks are attached per resource; resources
/// sharing a path are told apart by method guards.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .content_type_required(false)
            .error_handler(json_error_handler),
    )
    .app_data(web::QueryConfig::default().error_handler(query_error_handler))
    .service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .route("/auth/login", web::post().to(auth::login))
            .route("/users", web::post().to(auth::register_user))
            // ==================== COMPLAINTS ====================
            .service(
                web::resource("/complaints")
                    .guard(guard::Post())
                    .wrap(RequireRole::citizen())
                    .route(web::post().to(complaints::create_complaint)),
            )
            .service(
                web::resource("/complaints")
                    .guard(guard::Get())
                    .wrap(RequireRole::officer())
                    .route(web::get().to(complaints::list_complaints)),
            )
            // must stay ahead of `/complaints/{complaint_id}`
            .service(
                web::resource("/complaints/user/{user_id}")
                    .wrap(RequireRole::citizen())
                    .route(web::get().to(complaints::list_user_complaints)),
            )
            .route("/complaints/{complaint_id}", web::get().to(complaints::get_complaint))
            .service(
                web::resource("/complaints/{complaint_id}/actions")
                    .wrap(RequireRole::officer())
                    .route(web::post().to(complaints::log_action)),
            )
            .service(
                web::resource("/complaints/{complaint_id}/feedback")
                    .wrap(RequireRole::citizen())
                    .route(web::post().to(complaints::submit_feedback)),
            )
            // ==================== OFFICER DASHBOARD ====================
            .service(
                web::resource("/analytics/summary")
                    .wrap(RequireRole::officer())
                    .route(web::get().to(analytics::get_summary)),
            )
            .route("/ml/process_image", web::post().to(ml::process_image)),
    );
}
