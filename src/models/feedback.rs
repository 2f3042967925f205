use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Citizen feedback (`feedback` collection), at most one per complaint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub complaint_id: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub comments_feedback: String,
    pub submitted_on: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct FeedbackRequest {
    /// Free-form score; fractional values such as 4.5 are kept as sent
    pub rating: Option<f64>,
    pub comments_feedback: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FeedbackResponse {
    pub id: String,
    pub complaint_id: String,
    pub rating: Option<f64>,
    pub comments_feedback: String,
    pub submitted_on: String,
}

impl From<Feedback> for FeedbackResponse {
    fn from(f: Feedback) -> Self {
        FeedbackResponse {
            id: f.id.map(|id| id.to_hex()).unwrap_or_default(),
            complaint_id: f.complaint_id,
            rating: f.rating,
            comments_feedback: f.comments_feedback,
            submitted_on: f.submitted_on,
        }
    }
}
