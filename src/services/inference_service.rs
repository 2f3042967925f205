use crate::{
    database::Store,
    models::{MlDataResponse, ProcessImageRequest},
    services::mock_data::{self, RandomSource},
    utils::AppError,
};

/// Runs the mock model for a (possibly new) complaint id and optionally stores the result.
pub async fn process_image(
    store: &dyn Store,
    rng: &RandomSource,
    request: ProcessImageRequest,
) -> Result<MlDataResponse, AppError> {
    let complaint_id = request
        .complaint_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| rng.uuid().to_string());

    let payload = mock_data::generate_ml_payload(rng, &complaint_id, request.manual_violation.as_deref());

    if request.persist.unwrap_or(true) {
        store.upsert_ml_data(payload.clone()).await?;
        log::info!("🤖 ML payload stored for complaint {}", complaint_id);
    }

    Ok(MlDataResponse::from(payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryStore;

    #[tokio::test]
    async fn test_persists_by_default_and_upserts() {
        let store = InMemoryStore::new();
        let rng = RandomSource::from_entropy();
        let request = |manual: &str| ProcessImageRequest {
            complaint_id: Some("c1".into()),
            manual_violation: Some(manual.into()),
            persist: None,
        };

        process_image(&store, &rng, request("No Helmet")).await.unwrap();
        let result = process_image(&store, &rng, request("Lane Cutting")).await.unwrap();
        assert_eq!(result.vehicle_type, "SUV");
        assert!(result.id.is_none());

        let stored = store.find_ml_data("c1").await.unwrap().unwrap();
        assert_eq!(stored.violation_type_ai, "Unsafe Lane Change");
    }

    #[tokio::test]
    async fn test_generates_id_and_skips_persist() {
        let store = InMemoryStore::new();
        let rng = RandomSource::seeded(5);
        let request = ProcessImageRequest { persist: Some(false), ..ProcessImageRequest::default() };

        let result = process_image(&store, &rng, request).await.unwrap();
        assert!(uuid::Uuid::parse_str(&result.complaint_id).is_ok());
        assert!(store.find_ml_data(&result.complaint_id).await.unwrap().is_none());
    }
}
