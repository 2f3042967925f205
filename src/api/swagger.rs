use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::OpenApi;

use crate::middleware::ROLE_HEADER;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Citizen's Eye API",
        version = "1.0.0",
        description = "Traffic-violation reporting backend.\n\n**Roles:** there is no authentication. Callers declare their role in the `X-User-Role` header (`Citizen` or `Officer`); role-restricted routes answer 403 with the allowed roles otherwise.\n\n**Features:**\n- Citizen complaint submission with mock image storage and ML extraction\n- Officer review queue with filters and sorting\n- Officer actions driving the complaint status\n- Citizen feedback\n- Officer analytics dashboard"
    ),
    paths(
        // Health
        crate::api::health::health_check,

        // Auth
        crate::api::auth::login,
        crate::api::auth::register_user,

        // Complaints
        crate::api::complaints::create_complaint,
        crate::api::complaints::list_complaints,
        crate::api::complaints::list_user_complaints,
        crate::api::complaints::get_complaint,
        crate::api::complaints::log_action,
        crate::api::complaints::submit_feedback,

        // Analytics & ML
        crate::api::analytics::get_summary,
        crate::api::ml::process_image,
    ),
    components(
        schemas(
            crate::api::MessageResponse,
            crate::api::health::HealthResponse,

            // Users
            crate::models::Role,
            crate::models::LoginRequest,
            crate::models::RegisterUserRequest,
            crate::models::UserResponse,

            // Complaints
            crate::models::ComplaintStatus,
            crate::models::CreateComplaintRequest,
            crate::models::CreateComplaintResponse,
            crate::models::ComplaintResponse,
            crate::models::ComplaintWithHistory,
            crate::models::ComplaintDetail,
            crate::models::ActionType,
            crate::models::LogActionRequest,
            crate::models::ActionResponse,
            crate::models::FeedbackRequest,
            crate::models::FeedbackResponse,

            // Analytics & ML
            crate::models::StatusTotals,
            crate::models::GroupCount,
            crate::models::AnalyticsSummary,
            crate::models::MlPayloadInput,
            crate::models::ProcessImageRequest,
            crate::models::MlDataResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness check."),
        (name = "Auth", description = "Email-based login and user registration. No passwords or tokens."),
        (name = "Complaints", description = "Complaint submission, review queue, officer actions and citizen feedback."),
        (name = "Analytics", description = "Officer dashboard aggregates."),
        (name = "ML", description = "Mock image inference."),
    ),
    modifiers(&RoleHeaderAddon)
)]
pub struct ApiDoc;

struct RoleHeaderAddon;

impl utoipa::Modify for RoleHeaderAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "user_role",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    ROLE_HEADER,
                    "Caller role: Citizen or Officer",
                ))),
            );
        }
    }
}
