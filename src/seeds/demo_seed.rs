use chrono::{Duration, Utc};

use crate::database::Store;
use crate::models::{derive_status, Action, ActionType, Complaint, Feedback, MlExtractedData, Role, User};
use crate::utils::{to_iso, AppError};

struct DemoComplaint {
    reporter_email: &'static str,
    image_url: &'static str,
    days_ago: i64,
    violation_type_manual: &'static str,
    location_geotag: &'static str,
    comments_citizen: &'static str,
    vehicle_type: &'static str,
    /// Officer history, oldest first. The stored status is derived from it.
    actions: &'static [(ActionType, &'static str)],
}

const DEMO_COMPLAINTS: [DemoComplaint; 2] = [
    DemoComplaint {
        reporter_email: "aditi.rao@example.com",
        image_url: "https://mockstorage.local/cmp-001.jpg",
        days_ago: 2,
        violation_type_manual: "Signal Jump",
        location_geotag: "28.6139,77.2090",
        comments_citizen: "Vehicle jumped the red light at Connaught Place.",
        vehicle_type: "Motorcycle",
        actions: &[
            (ActionType::IssuedNotice, "Notice dispatched via SMS."),
            (ActionType::MarkResolved, "Fine paid at the traffic court."),
        ],
    },
    DemoComplaint {
        reporter_email: "rahul.khurana@example.com",
        image_url: "https://mockstorage.local/cmp-002.jpg",
        days_ago: 1,
        violation_type_manual: "Wrong Parking",
        location_geotag: "12.9716,77.5946",
        comments_citizen: "Blocked entire footpath on MG Road.",
        vehicle_type: "Sedan",
        actions: &[(ActionType::IssuedNotice, "Notice dispatched via SMS.")],
    },
];

fn demo_users() -> Vec<User> {
    [
        ("Aditi Rao", "aditi.rao@example.com", Role::Citizen, "Central Delhi"),
        ("Rahul Khurana", "rahul.khurana@example.com", Role::Citizen, "Bengaluru Urban"),
        ("Officer Kavya Iyer", "kavya.iyer@traffic.gov", Role::Officer, "Central Delhi"),
        ("Officer Arjun Patel", "arjun.patel@traffic.gov", Role::Officer, "Bengaluru Urban"),
    ]
    .into_iter()
    .map(|(name, email, role, zone)| User {
        id: None,
        name: name.to_string(),
        email: email.to_string(),
        role,
        location_zone: Some(zone.to_string()),
    })
    .collect()
}

/// Seeds demo users, complaints and their history into an empty store.
/// Returns `false` (and writes nothing) when users already exist.
pub async fn seed(store: &dyn Store) -> Result<bool, AppError> {
    let existing = store.count_users().await?;
    if existing > 0 {
        log::info!("🌱 Demo seed: {} users already present, skipping", existing);
        return Ok(false);
    }

    log::info!("🌱 Demo seed: inserting users, complaints and history...");

    let users = demo_users();
    let mut officer_id = None;
    for user in &users {
        let id = store.insert_user(user.clone()).await?;
        if user.role == Role::Officer && officer_id.is_none() {
            officer_id = Some(id);
        }
    }

    let now = Utc::now();
    for (idx, demo) in DEMO_COMPLAINTS.iter().enumerate() {
        let Some(reporter) = store.find_user_by_email(demo.reporter_email).await? else {
            log::warn!("   ⚠️  Demo reporter {} missing, skipping complaint", demo.reporter_email);
            continue;
        };
        let reporter_id = reporter.id.map(|id| id.to_hex()).unwrap_or_default();

        let submitted = now - Duration::days(demo.days_ago);
        let actions: Vec<Action> = demo
            .actions
            .iter()
            .enumerate()
            .map(|(step, (action_type, remarks))| Action {
                id: None,
                complaint_id: String::new(),
                officer_id: officer_id.clone(),
                action_type: *action_type,
                remarks: remarks.to_string(),
                action_timestamp: to_iso(submitted + Duration::hours(6 * (step as i64 + 1))),
            })
            .collect();

        let complaint_id = store
            .insert_complaint(Complaint {
                id: None,
                user_id: reporter_id,
                image_url: demo.image_url.to_string(),
                timestamp: to_iso(submitted),
                status: derive_status(&actions),
                violation_type_manual: demo.violation_type_manual.to_string(),
                location_geotag: demo.location_geotag.to_string(),
                zone: reporter.location_zone.clone(),
                comments_citizen: demo.comments_citizen.to_string(),
            })
            .await?;

        store
            .upsert_ml_data(MlExtractedData {
                id: None,
                complaint_id: complaint_id.clone(),
                license_plate: format!("DL0{}AB12{}", idx + 1, idx + 1),
                vehicle_type: demo.vehicle_type.to_string(),
                violation_type_ai: demo.violation_type_manual.to_string(),
                confidence_score: 0.9 - idx as f64 * 0.05,
            })
            .await?;

        for mut action in actions {
            action.complaint_id = complaint_id.clone();
            store.insert_action(action).await?;
        }

        store
            .upsert_feedback(Feedback {
                id: None,
                complaint_id: complaint_id.clone(),
                rating: Some(4.0),
                comments_feedback: "Resolved quickly, thanks!".to_string(),
                submitted_on: to_iso(now),
            })
            .await?;

        log::debug!("   ✅ Seeded complaint {} ({})", complaint_id, demo.violation_type_manual);
    }

    log::info!(
        "✅ Demo seed complete: {} users, {} complaints",
        users.len(),
        DEMO_COMPLAINTS.len()
    );
    Ok(true)
}
