// ==================== COMPLAINT LIFECYCLE ====================
// Pending -> Under Review -> Resolved, moved only by officer actions.

use mongodb::bson::oid::ObjectId;

use crate::{
    config::Settings,
    database::Store,
    models::{
        Action, ActionType, Complaint, ComplaintDetail, ComplaintFilter, ComplaintResponse,
        ComplaintSort, ComplaintStatus, ComplaintWithHistory, CreateComplaintRequest, Feedback,
        FeedbackRequest, LogActionRequest, DEFAULT_VIOLATION_TYPE,
    },
    services::mock_data::{self, RandomSource},
    utils::{now_iso, AppError},
};

/// Stores a new Pending complaint plus its ML payload and returns the complaint id.
pub async fn create_complaint(
    store: &dyn Store,
    rng: &RandomSource,
    settings: &Settings,
    request: CreateComplaintRequest,
) -> Result<String, AppError> {
    let user_id = request
        .user_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::InvalidRequest("user_id is required".to_string()))?;

    let user = store
        .find_user(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let (location_geotag, zone) = match request.location_geotag.filter(|g| !g.is_empty()) {
        Some(geotag) => (geotag, user.location_zone.clone()),
        None => {
            let location = mock_data::auto_location(rng);
            (location.geotag.to_string(), Some(location.zone.to_string()))
        }
    };

    let complaint = Complaint {
        id: None,
        user_id: user.id.map(|id| id.to_hex()).unwrap_or(user_id),
        image_url: mock_data::store_image_mock(rng, request.image_base64.as_deref(), settings.allow_mock_storage),
        timestamp: request.timestamp.filter(|t| !t.is_empty()).unwrap_or_else(now_iso),
        status: ComplaintStatus::Pending,
        violation_type_manual: request
            .violation_type_manual
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_VIOLATION_TYPE.to_string()),
        location_geotag,
        zone,
        comments_citizen: request.comments_citizen.unwrap_or_default(),
    };

    let violation_type = complaint.violation_type_manual.clone();
    let complaint_id = store.insert_complaint(complaint).await?;

    let generated = mock_data::generate_ml_payload(rng, &complaint_id, Some(&violation_type));
    let ml_data = match request.ml_payload {
        Some(payload) => payload.fill(generated),
        None => generated,
    };
    store.upsert_ml_data(ml_data).await?;

    log::info!("📝 Complaint {} created by user {}", complaint_id, user.email);
    Ok(complaint_id)
}

/// Hex ids are stored lowercase; anything else is kept as sent.
fn canonical_id(raw: &str) -> String {
    ObjectId::parse_str(raw).map(|oid| oid.to_hex()).unwrap_or_else(|_| raw.to_string())
}

async fn with_history(store: &dyn Store, complaint: Complaint) -> Result<ComplaintWithHistory, AppError> {
    let response = ComplaintResponse::from(complaint);
    let ml_data = store.find_ml_data(&response.id).await?;
    let actions = store.find_actions(&response.id).await?;

    Ok(ComplaintWithHistory {
        ml_data: ml_data.map(Into::into),
        actions: actions.into_iter().map(Into::into).collect(),
        complaint: response,
    })
}

/// Complaints matching `filter`, each joined with its ML payload and actions.
pub async fn list_complaints(
    store: &dyn Store,
    filter: &ComplaintFilter,
    sort: ComplaintSort,
) -> Result<Vec<ComplaintWithHistory>, AppError> {
    let complaints = store.find_complaints(filter, sort).await?;

    let mut result = Vec::with_capacity(complaints.len());
    for complaint in complaints {
        result.push(with_history(store, complaint).await?);
    }
    Ok(result)
}

pub async fn complaints_for_user(store: &dyn Store, user_id: &str) -> Result<Vec<ComplaintWithHistory>, AppError> {
    list_complaints(store, &ComplaintFilter::for_user(user_id), ComplaintSort::default()).await
}

pub async fn get_complaint(store: &dyn Store, complaint_id: &str) -> Result<ComplaintDetail, AppError> {
    let complaint = store
        .find_complaint(complaint_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Complaint not found".to_string()))?;

    let history = with_history(store, complaint).await?;
    let feedback = store.find_feedback(&history.complaint.id).await?;

    Ok(ComplaintDetail {
        complaint: history.complaint,
        ml_data: history.ml_data,
        actions: history.actions,
        feedback: feedback.map(Into::into),
    })
}

/// Appends an officer action and applies its status change.
///
/// The complaint is not required to exist; the action is still recorded.
///
/// The action insert and the status update are two separate writes with no
/// transaction around them. Two officers acting on the same complaint at once
/// can leave the status matching the earlier of the two actions, and a failed
/// status write leaves the action recorded without its status change.
pub async fn log_action(store: &dyn Store, complaint_id: &str, request: LogActionRequest) -> Result<Action, AppError> {
    let complaint_id = &canonical_id(complaint_id);
    let action_type: ActionType = request
        .action_type
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|_| AppError::InvalidRequest("Invalid action type".to_string()))?;

    let mut action = Action {
        id: None,
        complaint_id: complaint_id.to_string(),
        officer_id: request.officer_id,
        action_type,
        remarks: request.remarks.unwrap_or_default(),
        action_timestamp: now_iso(),
    };
    let action_id = store.insert_action(action.clone()).await?;
    action.id = ObjectId::parse_str(&action_id).ok();

    if let Some(status) = action_type.target_status() {
        let matched = store.set_complaint_status(complaint_id, status).await?;
        if matched {
            log::info!("🔄 Complaint {} -> {}", complaint_id, status.as_str());
        } else {
            log::warn!("⚠️  Action {} logged for unknown complaint {}", action_type.as_str(), complaint_id);
        }
    }

    Ok(action)
}

/// Saves the citizen's feedback, replacing any earlier submission.
pub async fn submit_feedback(store: &dyn Store, complaint_id: &str, request: FeedbackRequest) -> Result<(), AppError> {
    let feedback = Feedback {
        id: None,
        complaint_id: canonical_id(complaint_id),
        rating: request.rating,
        comments_feedback: request.comments_feedback.unwrap_or_default(),
        submitted_on: now_iso(),
    };
    store.upsert_feedback(feedback).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryStore;
    use crate::models::{MlPayloadInput, Role, User};
    use crate::services::mock_data::{MOCK_LOCATIONS, MOCK_STORAGE_BASE, PLACEHOLDER_IMAGE_URL};

    fn rng() -> RandomSource {
        RandomSource::seeded(11)
    }

    async fn citizen(store: &dyn Store, zone: Option<&str>) -> String {
        store
            .insert_user(User {
                id: None,
                name: "Rahul Khurana".into(),
                email: "rahul@example.com".into(),
                role: Role::Citizen,
                location_zone: zone.map(String::from),
            })
            .await
            .unwrap()
    }

    fn request(user_id: &str) -> CreateComplaintRequest {
        CreateComplaintRequest {
            user_id: Some(user_id.to_string()),
            image_base64: None,
            location_geotag: None,
            timestamp: None,
            violation_type_manual: None,
            comments_citizen: None,
            ml_payload: None,
        }
    }

    fn action(action_type: &str) -> LogActionRequest {
        LogActionRequest {
            officer_id: Some("officer-1".into()),
            action_type: Some(action_type.into()),
            remarks: None,
        }
    }

    #[tokio::test]
    async fn test_create_requires_known_user() {
        let store = InMemoryStore::new();
        let settings = Settings::default();

        let err = create_complaint(&store, &rng(), &settings, request("")).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));

        let err = create_complaint(&store, &rng(), &settings, request("64b7f0c2a1b2c3d4e5f60718"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_defaults_location_and_generates_ml() {
        let store = InMemoryStore::new();
        let user_id = citizen(&store, Some("Central Delhi")).await;

        let id = create_complaint(&store, &rng(), &Settings::default(), request(&user_id)).await.unwrap();
        let detail = get_complaint(&store, &id).await.unwrap();

        assert_eq!(detail.complaint.status, ComplaintStatus::Pending);
        assert_eq!(detail.complaint.user_id, user_id);
        assert!(MOCK_LOCATIONS.iter().any(|l| {
            l.geotag == detail.complaint.location_geotag && Some(l.zone) == detail.complaint.zone.as_deref()
        }));
        assert_eq!(detail.complaint.violation_type_manual, "Unspecified");
        assert_eq!(detail.complaint.image_url, PLACEHOLDER_IMAGE_URL);

        let ml = detail.ml_data.unwrap();
        assert_eq!(ml.complaint_id, id);
        assert_eq!(ml.violation_type_ai, "General Violation");
        assert!(detail.actions.is_empty());
        assert!(detail.feedback.is_none());
    }

    #[tokio::test]
    async fn test_supplied_geotag_uses_user_zone_and_client_ml_payload() {
        let store = InMemoryStore::new();
        let user_id = citizen(&store, Some("Bengaluru Urban")).await;

        let mut req = request(&user_id);
        req.location_geotag = Some("12.9,77.5".into());
        req.timestamp = Some("2026-03-01T10:00:00Z".into());
        req.ml_payload = Some(MlPayloadInput {
            license_plate: Some("KA01XY0001".into()),
            vehicle_type: Some("Truck".into()),
            violation_type_ai: Some("Overloading".into()),
            confidence_score: Some(0.5),
        });

        let id = create_complaint(&store, &rng(), &Settings::default(), req).await.unwrap();
        let detail = get_complaint(&store, &id).await.unwrap();

        assert_eq!(detail.complaint.zone.as_deref(), Some("Bengaluru Urban"));
        assert_eq!(detail.complaint.timestamp, "2026-03-01T10:00:00Z");
        let ml = detail.ml_data.unwrap();
        assert_eq!(ml.license_plate, "KA01XY0001");
        assert_eq!(ml.vehicle_type, "Truck");
        assert_eq!(ml.confidence_score, 0.5);
        assert_eq!(ml.complaint_id, id);
    }

    #[tokio::test]
    async fn test_partial_ml_payload_keeps_supplied_fields() {
        let store = InMemoryStore::new();
        let user_id = citizen(&store, None).await;

        let mut req = request(&user_id);
        req.violation_type_manual = Some("No Helmet".into());
        req.ml_payload = Some(MlPayloadInput {
            license_plate: Some("X".into()),
            ..MlPayloadInput::default()
        });

        let id = create_complaint(&store, &rng(), &Settings::default(), req).await.unwrap();
        let ml = store.find_ml_data(&id).await.unwrap().unwrap();
        assert_eq!(ml.license_plate, "X");
        assert_eq!(ml.vehicle_type, "Scooter");
        assert_eq!(ml.violation_type_ai, "Helmet Violation");
        assert!((0.78..=0.97).contains(&ml.confidence_score));
    }

    #[tokio::test]
    async fn test_image_is_stored_when_mock_storage_allowed() {
        let store = InMemoryStore::new();
        let user_id = citizen(&store, None).await;

        let mut req = request(&user_id);
        req.image_base64 = Some("data:image/jpeg;base64,aGVsbG8gd29ybGQ=".into());
        let id = create_complaint(&store, &rng(), &Settings::default(), req).await.unwrap();

        let image_url = store.find_complaint(&id).await.unwrap().unwrap().image_url;
        assert!(image_url.starts_with(MOCK_STORAGE_BASE));
        assert_ne!(image_url, PLACEHOLDER_IMAGE_URL);
    }

    #[tokio::test]
    async fn test_image_falls_back_to_placeholder_without_mock_storage() {
        let store = InMemoryStore::new();
        let user_id = citizen(&store, None).await;
        let settings = Settings { allow_mock_storage: false, ..Settings::default() };

        let mut req = request(&user_id);
        req.image_base64 = Some("aGVsbG8gd29ybGQ=".into());
        let id = create_complaint(&store, &rng(), &settings, req).await.unwrap();

        let image_url = store.find_complaint(&id).await.unwrap().unwrap().image_url;
        assert_eq!(image_url, PLACEHOLDER_IMAGE_URL);
    }

    #[tokio::test]
    async fn test_overspeeding_complaint_gets_matching_ml_payload() {
        let store = InMemoryStore::new();
        let user_id = citizen(&store, None).await;

        let mut req = request(&user_id);
        req.violation_type_manual = Some("Overspeeding".into());
        let id = create_complaint(&store, &rng(), &Settings::default(), req).await.unwrap();

        let ml = store.find_ml_data(&id).await.unwrap().unwrap();
        assert_eq!(ml.vehicle_type, "Sedan");
        assert_eq!(ml.violation_type_ai, "Overspeeding");
        assert!((0.78..=0.97).contains(&ml.confidence_score));
    }

    #[tokio::test]
    async fn test_actions_drive_status() {
        let store = InMemoryStore::new();
        let user_id = citizen(&store, None).await;
        let id = create_complaint(&store, &rng(), &Settings::default(), request(&user_id))
            .await
            .unwrap();

        log_action(&store, &id, action("Issued Notice")).await.unwrap();
        let detail = get_complaint(&store, &id).await.unwrap();
        assert_eq!(detail.complaint.status, ComplaintStatus::UnderReview);
        assert_eq!(detail.actions.len(), 1);

        log_action(&store, &id, action("Request More Info")).await.unwrap();
        assert_eq!(get_complaint(&store, &id).await.unwrap().complaint.status, ComplaintStatus::UnderReview);

        log_action(&store, &id, action("Mark Resolved")).await.unwrap();
        assert_eq!(get_complaint(&store, &id).await.unwrap().complaint.status, ComplaintStatus::Resolved);

        log_action(&store, &id, action("Issued Notice")).await.unwrap();
        let detail = get_complaint(&store, &id).await.unwrap();
        assert_eq!(detail.complaint.status, ComplaintStatus::UnderReview);
        assert_eq!(detail.actions.len(), 4);
    }

    #[tokio::test]
    async fn test_uppercase_id_reaches_the_same_complaint() {
        let store = InMemoryStore::new();
        let user_id = citizen(&store, None).await;
        let id = create_complaint(&store, &rng(), &Settings::default(), request(&user_id))
            .await
            .unwrap();
        let upper = id.to_uppercase();

        let recorded = log_action(&store, &upper, action("Mark Resolved")).await.unwrap();
        assert_eq!(recorded.complaint_id, id);
        submit_feedback(&store, &upper, FeedbackRequest { rating: Some(3.0), comments_feedback: None })
            .await
            .unwrap();

        let detail = get_complaint(&store, &upper).await.unwrap();
        assert_eq!(detail.complaint.id, id);
        assert_eq!(detail.complaint.status, ComplaintStatus::Resolved);
        assert_eq!(detail.actions.len(), 1);
        assert_eq!(detail.feedback.unwrap().rating, Some(3.0));
    }

    #[tokio::test]
    async fn test_invalid_action_type_is_rejected() {
        let store = InMemoryStore::new();

        let err = log_action(&store, "c1", action("Close")).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));

        let missing = LogActionRequest { officer_id: None, action_type: None, remarks: None };
        assert!(log_action(&store, "c1", missing).await.is_err());
        assert!(store.find_actions("c1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_feedback_resubmission_overwrites() {
        let store = InMemoryStore::new();
        let user_id = citizen(&store, None).await;
        let id = create_complaint(&store, &rng(), &Settings::default(), request(&user_id))
            .await
            .unwrap();

        submit_feedback(&store, &id, FeedbackRequest { rating: Some(2.0), comments_feedback: Some("slow".into()) })
            .await
            .unwrap();
        submit_feedback(&store, &id, FeedbackRequest { rating: Some(4.5), comments_feedback: Some("fixed".into()) })
            .await
            .unwrap();

        let feedback = get_complaint(&store, &id).await.unwrap().feedback.unwrap();
        assert_eq!(feedback.rating, Some(4.5));
        assert_eq!(feedback.comments_feedback, "fixed");
    }

    #[tokio::test]
    async fn test_complaints_for_user_only_returns_their_complaints() {
        let store = InMemoryStore::new();
        let user_id = citizen(&store, None).await;
        create_complaint(&store, &rng(), &Settings::default(), request(&user_id)).await.unwrap();
        create_complaint(&store, &rng(), &Settings::default(), request(&user_id)).await.unwrap();

        assert_eq!(complaints_for_user(&store, &user_id).await.unwrap().len(), 2);
        assert!(complaints_for_user(&store, "someone-else").await.unwrap().is_empty());
    }
}
