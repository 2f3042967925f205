use crate::{
    database::Store,
    models::{AnalyticsSummary, ComplaintStatus, GroupField, StatusTotals},
    utils::AppError,
};

/// Resolution time is not tracked yet; dashboards show this fixed figure.
pub const PLACEHOLDER_AVG_RESOLUTION_HOURS: u32 = 36;

pub async fn summary(store: &dyn Store) -> Result<AnalyticsSummary, AppError> {
    let totals = StatusTotals {
        all: store.count_complaints(None).await?,
        resolved: store.count_complaints(Some(ComplaintStatus::Resolved)).await?,
        pending: store.count_complaints(Some(ComplaintStatus::Pending)).await?,
        under_review: store.count_complaints(Some(ComplaintStatus::UnderReview)).await?,
    };

    Ok(AnalyticsSummary {
        totals,
        hotspots: store.group_complaints(GroupField::Zone).await?,
        violations: store.group_complaints(GroupField::ViolationType).await?,
        avg_resolution_hours: PLACEHOLDER_AVG_RESOLUTION_HOURS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryStore;
    use crate::models::{Complaint, GroupCount};

    fn complaint(status: ComplaintStatus, zone: &str, violation: &str) -> Complaint {
        Complaint {
            id: None,
            user_id: "u1".into(),
            image_url: String::new(),
            timestamp: "2026-01-01T00:00:00Z".into(),
            status,
            violation_type_manual: violation.into(),
            location_geotag: "0,0".into(),
            zone: Some(zone.into()),
            comments_citizen: String::new(),
        }
    }

    #[tokio::test]
    async fn test_empty_store() {
        let report = summary(&InMemoryStore::new()).await.unwrap();
        assert_eq!(report.totals, StatusTotals::default());
        assert!(report.hotspots.is_empty());
        assert!(report.violations.is_empty());
        assert_eq!(report.avg_resolution_hours, 36);
    }

    #[tokio::test]
    async fn test_totals_add_up_and_groups_sorted() {
        let store = InMemoryStore::new();
        let rows = [
            (ComplaintStatus::Pending, "Central Delhi", "Signal Jump"),
            (ComplaintStatus::Pending, "South Mumbai", "Signal Jump"),
            (ComplaintStatus::UnderReview, "South Mumbai", "No Helmet"),
            (ComplaintStatus::Resolved, "South Mumbai", "Signal Jump"),
            (ComplaintStatus::Resolved, "Central Delhi", "Wrong Parking"),
        ];
        for (status, zone, violation) in rows {
            store.insert_complaint(complaint(status, zone, violation)).await.unwrap();
        }

        let report = summary(&store).await.unwrap();
        let t = &report.totals;
        assert_eq!(t.all, 5);
        assert_eq!(t.all, t.pending + t.under_review + t.resolved);
        assert_eq!((t.pending, t.under_review, t.resolved), (2, 1, 2));

        assert_eq!(
            report.hotspots,
            vec![
                GroupCount { key: Some("South Mumbai".into()), count: 3 },
                GroupCount { key: Some("Central Delhi".into()), count: 2 },
            ]
        );
        assert_eq!(report.violations[0], GroupCount { key: Some("Signal Jump".into()), count: 3 });
        assert_eq!(report.violations.len(), 3);
    }

    #[tokio::test]
    async fn test_serialized_shape() {
        let store = InMemoryStore::new();
        store
            .insert_complaint(complaint(ComplaintStatus::Pending, "Chennai Central", "Lane Cutting"))
            .await
            .unwrap();

        let json = serde_json::to_value(summary(&store).await.unwrap()).unwrap();
        assert_eq!(json["totals"]["under_review"], 0);
        assert_eq!(json["hotspots"][0]["_id"], "Chennai Central");
        assert_eq!(json["hotspots"][0]["count"], 1);
        assert_eq!(json["avg_resolution_hours"], 36);
    }
}
