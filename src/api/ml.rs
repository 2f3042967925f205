use actix_web::{web, HttpResponse};

use crate::{
    database::Store,
    models::{MlDataResponse, ProcessImageRequest},
    services::{inference_service, RandomSource},
    utils::AppError,
};

#[utoipa::path(
    post,
    path = "/api/ml/process_image",
    tag = "ML",
    request_body = ProcessImageRequest,
    responses(
        (status = 200, description = "Generated inference payload", body = MlDataResponse)
    )
)]
pub async fn process_image(
    store: web::Data<dyn Store>,
    rng: web::Data<RandomSource>,
    request: web::Json<ProcessImageRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!(
        "🤖 POST /ml/process_image - complaint: {}",
        request.complaint_id.as_deref().unwrap_or("<new>")
    );

    let payload = inference_service::process_image(store.get_ref(), rng.get_ref(), request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(payload))
}
