use actix_web::{web, HttpResponse};

use crate::{
    api::MessageResponse,
    config::Settings,
    database::Store,
    models::{
        ComplaintDetail, ComplaintFilter, ComplaintQuery, ComplaintSort, ComplaintWithHistory,
        CreateComplaintRequest, CreateComplaintResponse, FeedbackRequest, LogActionRequest,
    },
    services::{complaint_service, RandomSource},
    utils::AppError,
};

#[utoipa::path(
    post,
    path = "/api/complaints",
    tag = "Complaints",
    request_body = CreateComplaintRequest,
    responses(
        (status = 201, description = "Complaint stored as Pending", body = CreateComplaintResponse),
        (status = 400, description = "Missing user id"),
        (status = 403, description = "Caller is not a Citizen"),
        (status = 404, description = "User not found")
    ),
    security(("user_role" = []))
)]
pub async fn create_complaint(
    store: web::Data<dyn Store>,
    rng: web::Data<RandomSource>,
    settings: web::Data<Settings>,
    request: web::Json<CreateComplaintRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!(
        "📸 POST /complaints - user: {}",
        request.user_id.as_deref().unwrap_or("<missing>")
    );

    let complaint_id =
        complaint_service::create_complaint(store.get_ref(), rng.get_ref(), &settings, request.into_inner())
            .await?;

    Ok(HttpResponse::Created().json(CreateComplaintResponse { complaint_id }))
}

#[utoipa::path(
    get,
    path = "/api/complaints",
    tag = "Complaints",
    params(ComplaintQuery),
    responses(
        (status = 200, description = "Filtered complaints with ML data and actions", body = [ComplaintWithHistory]),
        (status = 403, description = "Caller is not an Officer")
    ),
    security(("user_role" = []))
)]
pub async fn list_complaints(
    store: web::Data<dyn Store>,
    query: web::Query<ComplaintQuery>,
) -> Result<HttpResponse, AppError> {
    let filter = ComplaintFilter::from(&*query);
    let sort = ComplaintSort::from(&*query);
    log::info!("📋 GET /complaints - filter: {:?}, sort: {:?}", filter, sort);

    let complaints = complaint_service::list_complaints(store.get_ref(), &filter, sort).await?;

    log::info!("✅ Returning {} complaints", complaints.len());
    Ok(HttpResponse::Ok().json(complaints))
}

#[utoipa::path(
    get,
    path = "/api/complaints/user/{user_id}",
    tag = "Complaints",
    params(("user_id" = String, Path, description = "Citizen id")),
    responses(
        (status = 200, description = "The citizen's complaints, newest first", body = [ComplaintWithHistory]),
        (status = 403, description = "Caller is not a Citizen")
    ),
    security(("user_role" = []))
)]
pub async fn list_user_complaints(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    log::info!("📋 GET /complaints/user/{}", user_id);

    let complaints = complaint_service::complaints_for_user(store.get_ref(), &user_id).await?;
    Ok(HttpResponse::Ok().json(complaints))
}

#[utoipa::path(
    get,
    path = "/api/complaints/{complaint_id}",
    tag = "Complaints",
    params(("complaint_id" = String, Path, description = "Complaint id")),
    responses(
        (status = 200, description = "Complaint with ML data, actions and feedback", body = ComplaintDetail),
        (status = 404, description = "Complaint not found")
    )
)]
pub async fn get_complaint(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let complaint_id = path.into_inner();
    log::info!("🔍 GET /complaints/{}", complaint_id);

    let complaint = complaint_service::get_complaint(store.get_ref(), &complaint_id).await?;
    Ok(HttpResponse::Ok().json(complaint))
}

#[utoipa::path(
    post,
    path = "/api/complaints/{complaint_id}/actions",
    tag = "Complaints",
    params(("complaint_id" = String, Path, description = "Complaint id")),
    request_body = LogActionRequest,
    responses(
        (status = 201, description = "Action recorded", body = MessageResponse),
        (status = 400, description = "Invalid action type"),
        (status = 403, description = "Caller is not an Officer")
    ),
    security(("user_role" = []))
)]
pub async fn log_action(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
    request: web::Json<LogActionRequest>,
) -> Result<HttpResponse, AppError> {
    let complaint_id = path.into_inner();
    log::info!(
        "👮 POST /complaints/{}/actions - {}",
        complaint_id,
        request.action_type.as_deref().unwrap_or("<missing>")
    );

    let action = complaint_service::log_action(store.get_ref(), &complaint_id, request.into_inner()).await?;

    log::info!("✅ {} recorded on complaint {}", action.action_type.as_str(), complaint_id);
    Ok(HttpResponse::Created().json(MessageResponse::new("Action recorded")))
}

#[utoipa::path(
    post,
    path = "/api/complaints/{complaint_id}/feedback",
    tag = "Complaints",
    params(("complaint_id" = String, Path, description = "Complaint id")),
    request_body = FeedbackRequest,
    responses(
        (status = 201, description = "Feedback saved", body = MessageResponse),
        (status = 403, description = "Caller is not a Citizen")
    ),
    security(("user_role" = []))
)]
pub async fn submit_feedback(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
    request: web::Json<FeedbackRequest>,
) -> Result<HttpResponse, AppError> {
    let complaint_id = path.into_inner();
    log::info!("⭐ POST /complaints/{}/feedback", complaint_id);

    complaint_service::submit_feedback(store.get_ref(), &complaint_id, request.into_inner()).await?;
    Ok(HttpResponse::Created().json(MessageResponse::new("Feedback saved")))
}
