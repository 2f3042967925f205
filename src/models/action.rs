use std::str::FromStr;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::complaint::ComplaintStatus;

/// Officer disposition. Some types move the complaint's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum ActionType {
    #[serde(rename = "Issued Notice")]
    IssuedNotice,
    #[serde(rename = "Mark Resolved")]
    MarkResolved,
    #[serde(rename = "Request More Info")]
    RequestMoreInfo,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::IssuedNotice => "Issued Notice",
            ActionType::MarkResolved => "Mark Resolved",
            ActionType::RequestMoreInfo => "Request More Info",
        }
    }

    /// Status this action forces on its complaint, if any.
    ///
    /// `Request More Info` leaves the status untouched. That is a known product
    /// gap (a citizen-side "awaiting info" state does not exist yet).
    pub fn target_status(&self) -> Option<ComplaintStatus> {
        match self {
            ActionType::IssuedNotice => Some(ComplaintStatus::UnderReview),
            ActionType::MarkResolved => Some(ComplaintStatus::Resolved),
            ActionType::RequestMoreInfo => None,
        }
    }

    pub fn apply(&self, current: ComplaintStatus) -> ComplaintStatus {
        self.target_status().unwrap_or(current)
    }
}

impl FromStr for ActionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Issued Notice" => Ok(ActionType::IssuedNotice),
            "Mark Resolved" => Ok(ActionType::MarkResolved),
            "Request More Info" => Ok(ActionType::RequestMoreInfo),
            other => Err(format!("Invalid action type '{}'", other)),
        }
    }
}

/// Audit log entry (`actions` collection). Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub complaint_id: String,
    #[serde(default)]
    pub officer_id: Option<String>,
    pub action_type: ActionType,
    #[serde(default)]
    pub remarks: String,
    pub action_timestamp: String,
}

/// Status implied by an ordered action history, starting from `Pending`.
pub fn derive_status<'a, I>(actions: I) -> ComplaintStatus
where
    I: IntoIterator<Item = &'a Action>,
{
    actions
        .into_iter()
        .fold(ComplaintStatus::Pending, |status, action| action.action_type.apply(status))
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LogActionRequest {
    pub officer_id: Option<String>,
    /// `Issued Notice`, `Mark Resolved` or `Request More Info`
    pub action_type: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ActionResponse {
    pub id: String,
    pub complaint_id: String,
    pub officer_id: Option<String>,
    pub action_type: ActionType,
    pub remarks: String,
    pub action_timestamp: String,
}

impl From<Action> for ActionResponse {
    fn from(a: Action) -> Self {
        ActionResponse {
            id: a.id.map(|id| id.to_hex()).unwrap_or_default(),
            complaint_id: a.complaint_id,
            officer_id: a.officer_id,
            action_type: a.action_type,
            remarks: a.remarks,
            action_timestamp: a.action_timestamp,
        }
    }
}
