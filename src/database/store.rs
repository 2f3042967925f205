use async_trait::async_trait;

use crate::models::{
    Action, Complaint, ComplaintFilter, ComplaintSort, ComplaintStatus, Feedback, GroupCount,
    GroupField, MlExtractedData, User,
};
use crate::utils::AppError;

pub const USERS: &str = "users";
pub const COMPLAINTS: &str = "complaints";
pub const ML_EXTRACTED_DATA: &str = "ml_extracted_data";
pub const ACTIONS: &str = "actions";
pub const FEEDBACK: &str = "feedback";

/// Document store used by the handlers.
///
/// Ids are passed around as strings. A string that is not a valid ObjectId is
/// still used as a lookup key, so malformed ids simply find nothing.
/// Cross-collection references (`user_id`, `complaint_id`) are not enforced.
#[async_trait]
pub trait Store: Send + Sync {
    async fn count_users(&self) -> Result<u64, AppError>;

    async fn find_user(&self, id: &str) -> Result<Option<User>, AppError>;

    /// `email` must already be normalized.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Fails with [`AppError::Conflict`] when the email is taken.
    async fn insert_user(&self, user: User) -> Result<String, AppError>;

    async fn insert_complaint(&self, complaint: Complaint) -> Result<String, AppError>;

    async fn find_complaint(&self, id: &str) -> Result<Option<Complaint>, AppError>;

    async fn find_complaints(
        &self,
        filter: &ComplaintFilter,
        sort: ComplaintSort,
    ) -> Result<Vec<Complaint>, AppError>;

    /// Returns whether a complaint matched.
    async fn set_complaint_status(&self, id: &str, status: ComplaintStatus) -> Result<bool, AppError>;

    /// `None` counts every complaint.
    async fn count_complaints(&self, status: Option<ComplaintStatus>) -> Result<u64, AppError>;

    /// Counts per distinct value of `field`, sorted by count descending.
    async fn group_complaints(&self, field: GroupField) -> Result<Vec<GroupCount>, AppError>;

    /// Insert or replace the payload keyed by its `complaint_id`.
    async fn upsert_ml_data(&self, data: MlExtractedData) -> Result<(), AppError>;

    async fn find_ml_data(&self, complaint_id: &str) -> Result<Option<MlExtractedData>, AppError>;

    async fn insert_action(&self, action: Action) -> Result<String, AppError>;

    /// Oldest first.
    async fn find_actions(&self, complaint_id: &str) -> Result<Vec<Action>, AppError>;

    /// Insert or replace the feedback keyed by its `complaint_id`.
    async fn upsert_feedback(&self, feedback: Feedback) -> Result<(), AppError>;

    async fn find_feedback(&self, complaint_id: &str) -> Result<Option<Feedback>, AppError>;
}
