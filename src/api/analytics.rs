use actix_web::{web, HttpResponse};

use crate::{database::Store, models::AnalyticsSummary, services::analytics_service, utils::AppError};

#[utoipa::path(
    get,
    path = "/api/analytics/summary",
    tag = "Analytics",
    responses(
        (status = 200, description = "Status totals, zone hotspots and violation breakdown", body = AnalyticsSummary),
        (status = 403, description = "Caller is not an Officer")
    ),
    security(("user_role" = []))
)]
pub async fn get_summary(store: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    log::info!("📊 GET /analytics/summary");

    let summary = analytics_service::summary(store.get_ref()).await?;

    log::info!(
        "✅ Summary: {} complaints, {} zones, {} violation types",
        summary.totals.all,
        summary.hotspots.len(),
        summary.violations.len()
    );
    Ok(HttpResponse::Ok().json(summary))
}
