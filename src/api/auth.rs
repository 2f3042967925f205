use actix_web::{web, HttpResponse};

use crate::{
    database::Store,
    models::{LoginRequest, RegisterUserRequest, UserResponse},
    services::user_service,
    utils::AppError,
};

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 403, description = "Role mismatch"),
        (status = 404, description = "User not found")
    )
)]
pub async fn login(
    store: web::Data<dyn Store>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔐 POST /auth/login - email: {}", request.email);

    match user_service::login(store.get_ref(), &request).await {
        Ok(user) => {
            log::info!("✅ Login successful: {} ({})", user.email, user.role);
            Ok(HttpResponse::Ok().json(user))
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", request.email, e);
            Err(e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Auth",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User registered"),
        (status = 400, description = "Missing or invalid fields"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register_user(
    store: web::Data<dyn Store>,
    request: web::Json<RegisterUserRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let email = request.email.clone().unwrap_or_default();
    log::info!("📝 POST /users - email: {}", email);

    let id = user_service::register(store.get_ref(), request).await.map_err(|e| {
        log::warn!("❌ Registration failed: {} - {}", email, e);
        e
    })?;

    log::info!("✅ Registered user {}", id);
    Ok(HttpResponse::Created().json(serde_json::json!({ "id": id })))
}
