use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize, Serializer};

use super::action::ActionResponse;
use super::feedback::FeedbackResponse;
use super::ml_data::{MlDataResponse, MlPayloadInput};

pub const DEFAULT_VIOLATION_TYPE: &str = "Unspecified";

/// Complaint lifecycle status. Only officer actions move it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum ComplaintStatus {
    Pending,
    #[serde(rename = "Under Review")]
    UnderReview,
    Resolved,
}

impl ComplaintStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "Pending",
            ComplaintStatus::UnderReview => "Under Review",
            ComplaintStatus::Resolved => "Resolved",
        }
    }
}

/// Complaint document (`complaints` collection).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Complaint {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Reporter id (hex string of the user's `_id`)
    pub user_id: String,

    pub image_url: String,

    /// ISO-8601 UTC submission time
    pub timestamp: String,

    pub status: ComplaintStatus,

    pub violation_type_manual: String,

    /// "lat,long"
    pub location_geotag: String,

    #[serde(default)]
    pub zone: Option<String>,

    #[serde(default)]
    pub comments_citizen: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateComplaintRequest {
    pub user_id: Option<String>,
    pub image_base64: Option<String>,
    pub location_geotag: Option<String>,
    pub timestamp: Option<String>,
    pub violation_type_manual: Option<String>,
    pub comments_citizen: Option<String>,
    /// Client-side inference result; generated when absent.
    pub ml_payload: Option<MlPayloadInput>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateComplaintResponse {
    pub complaint_id: String,
}

/// Query string of `GET /api/complaints`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ComplaintQuery {
    /// Exact status; `All` disables the filter
    pub status: Option<String>,
    pub zone: Option<String>,
    pub violation_type_manual: Option<String>,
    /// Sort field, defaults to `timestamp`
    pub sort: Option<String>,
    /// `asc` or `desc` (default)
    pub order: Option<String>,
}

/// Store-level complaint filter. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplaintFilter {
    pub user_id: Option<String>,
    pub status: Option<String>,
    pub zone: Option<String>,
    pub violation_type_manual: Option<String>,
}

impl ComplaintFilter {
    pub fn for_user(user_id: &str) -> Self {
        Self {
            user_id: Some(user_id.to_string()),
            ..Self::default()
        }
    }

    pub fn matches(&self, complaint: &Complaint) -> bool {
        let eq = |wanted: &Option<String>, actual: Option<&str>| match wanted {
            Some(w) => actual == Some(w.as_str()),
            None => true,
        };

        eq(&self.user_id, Some(complaint.user_id.as_str()))
            && eq(&self.status, Some(complaint.status.as_str()))
            && eq(&self.zone, complaint.zone.as_deref())
            && eq(&self.violation_type_manual, Some(complaint.violation_type_manual.as_str()))
    }
}

impl From<&ComplaintQuery> for ComplaintFilter {
    fn from(query: &ComplaintQuery) -> Self {
        let non_empty = |v: &Option<String>| v.as_ref().filter(|s| !s.is_empty()).cloned();

        ComplaintFilter {
            user_id: None,
            status: non_empty(&query.status).filter(|s| s != "All"),
            zone: non_empty(&query.zone),
            violation_type_manual: non_empty(&query.violation_type_manual),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Timestamp,
    Status,
    Zone,
    ViolationType,
    UserId,
}

impl SortField {
    /// Unknown fields fall back to `timestamp`.
    pub fn parse(field: Option<&str>) -> Self {
        match field.unwrap_or("timestamp") {
            "status" => SortField::Status,
            "zone" => SortField::Zone,
            "violation_type_manual" => SortField::ViolationType,
            "user_id" => SortField::UserId,
            "timestamp" => SortField::Timestamp,
            other => {
                log::warn!("⚠️  Unknown sort field '{}', using timestamp", other);
                SortField::Timestamp
            }
        }
    }

    pub fn document_key(&self) -> &'static str {
        match self {
            SortField::Timestamp => "timestamp",
            SortField::Status => "status",
            SortField::Zone => "zone",
            SortField::ViolationType => "violation_type_manual",
            SortField::UserId => "user_id",
        }
    }

    pub fn key_of(&self, complaint: &Complaint) -> String {
        match self {
            SortField::Timestamp => complaint.timestamp.clone(),
            SortField::Status => complaint.status.as_str().to_string(),
            SortField::Zone => complaint.zone.clone().unwrap_or_default(),
            SortField::ViolationType => complaint.violation_type_manual.clone(),
            SortField::UserId => complaint.user_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplaintSort {
    pub field: SortField,
    pub descending: bool,
}

impl Default for ComplaintSort {
    fn default() -> Self {
        Self {
            field: SortField::Timestamp,
            descending: true,
        }
    }
}

impl From<&ComplaintQuery> for ComplaintSort {
    fn from(query: &ComplaintQuery) -> Self {
        ComplaintSort {
            field: SortField::parse(query.sort.as_deref()),
            // anything but an explicit "desc" sorts ascending
            descending: query.order.as_deref().unwrap_or("desc") == "desc",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ComplaintResponse {
    pub id: String,
    pub user_id: String,
    pub image_url: String,
    pub timestamp: String,
    pub status: ComplaintStatus,
    pub violation_type_manual: String,
    pub location_geotag: String,
    pub zone: Option<String>,
    pub comments_citizen: String,
}

impl From<Complaint> for ComplaintResponse {
    fn from(c: Complaint) -> Self {
        ComplaintResponse {
            id: c.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_id: c.user_id,
            image_url: c.image_url,
            timestamp: c.timestamp,
            status: c.status,
            violation_type_manual: c.violation_type_manual,
            location_geotag: c.location_geotag,
            zone: c.zone,
            comments_citizen: c.comments_citizen,
        }
    }
}

/// Complaint joined with its ML payload and action history (list views).
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ComplaintWithHistory {
    #[serde(flatten)]
    pub complaint: ComplaintResponse,
    #[serde(serialize_with = "object_or_empty")]
    pub ml_data: Option<MlDataResponse>,
    pub actions: Vec<ActionResponse>,
}

/// Single complaint view: history plus feedback.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ComplaintDetail {
    #[serde(flatten)]
    pub complaint: ComplaintResponse,
    #[serde(serialize_with = "object_or_empty")]
    pub ml_data: Option<MlDataResponse>,
    pub actions: Vec<ActionResponse>,
    #[serde(serialize_with = "object_or_empty")]
    pub feedback: Option<FeedbackResponse>,
}

// Missing joins render as `{}` rather than `null`.
fn object_or_empty<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    use serde::ser::SerializeMap;

    match value {
        Some(v) => v.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}
