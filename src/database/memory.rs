use std::collections::BTreeMap;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::store::Store;
use crate::models::{
    sort_group_counts, Action, Complaint, ComplaintFilter, ComplaintSort, ComplaintStatus, Feedback,
    GroupCount, GroupField, MlExtractedData, User,
};
use crate::utils::AppError;

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    complaints: Vec<Complaint>,
    ml_data: Vec<MlExtractedData>,
    actions: Vec<Action>,
    feedback: Vec<Feedback>,
}

/// Process-local store used when no `MONGODB_URI` is configured, and by tests.
///
/// Behaves like the MongoDB store: ObjectId keys, unique emails, one ML payload
/// and one feedback per complaint. Data is lost on restart.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Collections>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn has_id(id: &Option<ObjectId>, raw: &str) -> bool {
    ObjectId::parse_str(raw).map(|oid| *id == Some(oid)).unwrap_or(false)
}

fn assign_id(id: &mut Option<ObjectId>) -> String {
    let oid = id.unwrap_or_else(ObjectId::new);
    *id = Some(oid);
    oid.to_hex()
}

#[async_trait]
impl Store for InMemoryStore {
    async fn count_users(&self) -> Result<u64, AppError> {
        Ok(self.inner.read().await.users.len() as u64)
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| has_id(&u.id, id)).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, mut user: User) -> Result<String, AppError> {
        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("User already exists".to_string()));
        }
        let id = assign_id(&mut user.id);
        inner.users.push(user);
        Ok(id)
    }

    async fn insert_complaint(&self, mut complaint: Complaint) -> Result<String, AppError> {
        let id = assign_id(&mut complaint.id);
        self.inner.write().await.complaints.push(complaint);
        Ok(id)
    }

    async fn find_complaint(&self, id: &str) -> Result<Option<Complaint>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.complaints.iter().find(|c| has_id(&c.id, id)).cloned())
    }

    async fn find_complaints(
        &self,
        filter: &ComplaintFilter,
        sort: ComplaintSort,
    ) -> Result<Vec<Complaint>, AppError> {
        let inner = self.inner.read().await;
        let mut complaints: Vec<Complaint> = inner
            .complaints
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();

        // ObjectIds grow monotonically, so `id` breaks ties by insertion order
        complaints.sort_by(|a, b| {
            let ordering = sort
                .field
                .key_of(a)
                .cmp(&sort.field.key_of(b))
                .then_with(|| a.id.cmp(&b.id));
            if sort.descending {
                ordering.reverse()
            } else {
                ordering
            }
        });

        Ok(complaints)
    }

    async fn set_complaint_status(&self, id: &str, status: ComplaintStatus) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;
        match inner.complaints.iter_mut().find(|c| has_id(&c.id, id)) {
            Some(complaint) => {
                complaint.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_complaints(&self, status: Option<ComplaintStatus>) -> Result<u64, AppError> {
        let inner = self.inner.read().await;
        let count = inner
            .complaints
            .iter()
            .filter(|c| status.map(|s| c.status == s).unwrap_or(true))
            .count();
        Ok(count as u64)
    }

    async fn group_complaints(&self, field: GroupField) -> Result<Vec<GroupCount>, AppError> {
        let inner = self.inner.read().await;
        let mut buckets: BTreeMap<Option<String>, u64> = BTreeMap::new();

        for complaint in &inner.complaints {
            let key = match field {
                GroupField::Zone => complaint.zone.clone(),
                GroupField::ViolationType => Some(complaint.violation_type_manual.clone()),
            };
            *buckets.entry(key).or_insert(0) += 1;
        }

        let mut groups: Vec<GroupCount> = buckets
            .into_iter()
            .map(|(key, count)| GroupCount { key, count })
            .collect();
        sort_group_counts(&mut groups);
        Ok(groups)
    }

    async fn upsert_ml_data(&self, mut data: MlExtractedData) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        match inner.ml_data.iter_mut().find(|m| m.complaint_id == data.complaint_id) {
            Some(existing) => {
                data.id = existing.id;
                *existing = data;
            }
            None => {
                assign_id(&mut data.id);
                inner.ml_data.push(data);
            }
        }
        Ok(())
    }

    async fn find_ml_data(&self, complaint_id: &str) -> Result<Option<MlExtractedData>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.ml_data.iter().find(|m| m.complaint_id == complaint_id).cloned())
    }

    async fn insert_action(&self, mut action: Action) -> Result<String, AppError> {
        let id = assign_id(&mut action.id);
        self.inner.write().await.actions.push(action);
        Ok(id)
    }

    async fn find_actions(&self, complaint_id: &str) -> Result<Vec<Action>, AppError> {
        let inner = self.inner.read().await;
        let mut actions: Vec<Action> = inner
            .actions
            .iter()
            .filter(|a| a.complaint_id == complaint_id)
            .cloned()
            .collect();
        // stable sort keeps insertion order for equal timestamps
        actions.sort_by(|a, b| a.action_timestamp.cmp(&b.action_timestamp));
        Ok(actions)
    }

    async fn upsert_feedback(&self, mut feedback: Feedback) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        match inner.feedback.iter_mut().find(|f| f.complaint_id == feedback.complaint_id) {
            Some(existing) => {
                feedback.id = existing.id;
                *existing = feedback;
            }
            None => {
                assign_id(&mut feedback.id);
                inner.feedback.push(feedback);
            }
        }
        Ok(())
    }

    async fn find_feedback(&self, complaint_id: &str) -> Result<Option<Feedback>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.feedback.iter().find(|f| f.complaint_id == complaint_id).cloned())
    }
}
