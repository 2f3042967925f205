use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Mock inference result (`ml_extracted_data` collection), one per complaint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlExtractedData {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub complaint_id: String,
    pub license_plate: String,
    pub vehicle_type: String,
    pub violation_type_ai: String,
    /// 0.78 - 0.97 for generated payloads
    pub confidence_score: f64,
}

/// ML payload supplied by the client when creating a complaint.
/// Missing fields are taken from a generated payload.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct MlPayloadInput {
    pub license_plate: Option<String>,
    pub vehicle_type: Option<String>,
    pub violation_type_ai: Option<String>,
    pub confidence_score: Option<f64>,
}

impl MlPayloadInput {
    /// Overlays the supplied fields on `generated`, keeping its ids.
    pub fn fill(self, generated: MlExtractedData) -> MlExtractedData {
        MlExtractedData {
            license_plate: self.license_plate.unwrap_or(generated.license_plate),
            vehicle_type: self.vehicle_type.unwrap_or(generated.vehicle_type),
            violation_type_ai: self.violation_type_ai.unwrap_or(generated.violation_type_ai),
            confidence_score: self.confidence_score.unwrap_or(generated.confidence_score),
            ..generated
        }
    }
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct ProcessImageRequest {
    /// Fresh UUID when absent
    pub complaint_id: Option<String>,
    pub manual_violation: Option<String>,
    /// Defaults to true
    pub persist: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MlDataResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub complaint_id: String,
    pub license_plate: String,
    pub vehicle_type: String,
    pub violation_type_ai: String,
    pub confidence_score: f64,
}

impl From<MlExtractedData> for MlDataResponse {
    fn from(ml: MlExtractedData) -> Self {
        MlDataResponse {
            id: ml.id.map(|id| id.to_hex()),
            complaint_id: ml.complaint_id,
            license_plate: ml.license_plate,
            vehicle_type: ml.vehicle_type,
            violation_type_ai: ml.violation_type_ai,
            confidence_score: ml.confidence_score,
        }
    }
}
