use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Bson, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use std::time::Duration;

use super::store::{Store, ACTIONS, COMPLAINTS, FEEDBACK, ML_EXTRACTED_DATA, USERS};
use crate::models::{
    sort_group_counts, Action, Complaint, ComplaintFilter, ComplaintSort, ComplaintStatus, Feedback,
    GroupCount, GroupField, MlExtractedData, User,
};
use crate::utils::AppError;

const DUPLICATE_KEY: i32 = 11000;

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, AppError> {
        let mut client_options = ClientOptions::parse(uri).await?;

        client_options.app_name = Some("citizens-eye-service".to_string());
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(Duration::from_secs(300));

        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await;

        Ok(mongodb)
    }

    /// Creates the indexes queries rely on. Unique indexes back the
    /// one-per-complaint and one-per-email rules.
    async fn ensure_indexes(&self) {
        log::info!("🔧 Creating database indexes...");

        let unique = || Some(IndexOptions::builder().unique(true).build());
        let indexes: Vec<(&str, Document, Option<IndexOptions>)> = vec![
            (USERS, doc! { "email": 1 }, unique()),
            (COMPLAINTS, doc! { "user_id": 1 }, None),
            (COMPLAINTS, doc! { "status": 1, "zone": 1 }, None),
            (ML_EXTRACTED_DATA, doc! { "complaint_id": 1 }, unique()),
            (ACTIONS, doc! { "complaint_id": 1, "action_timestamp": 1 }, None),
            (FEEDBACK, doc! { "complaint_id": 1 }, unique()),
        ];

        for (collection, keys, options) in indexes {
            let description = format!("{}({})", collection, keys.keys().cloned().collect::<Vec<_>>().join(", "));
            let model = match options {
                Some(options) => IndexModel::builder().keys(keys).options(options).build(),
                None => IndexModel::builder().keys(keys).build(),
            };

            match self.collection::<Document>(collection).create_index(model).await {
                Ok(_) => log::info!("   ✅ Index ready: {}", description),
                Err(e) => log::warn!("   ⚠️  Could not create index {}: {}", description, e),
            }
        }

        log::info!("✅ Database indexes ready");
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }
}

/// `_id` filter value: an ObjectId when the input parses as one, the raw string otherwise.
fn id_key(raw: &str) -> Bson {
    match ObjectId::parse_str(raw) {
        Ok(oid) => Bson::ObjectId(oid),
        Err(_) => Bson::String(raw.to_string()),
    }
}

fn inserted_id(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    matches!(
        e.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == DUPLICATE_KEY
    )
}

fn to_set_document<T: serde::Serialize>(value: &T) -> Result<Document, AppError> {
    let mut document = bson::to_document(value).map_err(|e| AppError::DatabaseError(e.to_string()))?;
    document.remove("_id");
    Ok(doc! { "$set": document })
}

fn complaint_filter_document(filter: &ComplaintFilter) -> Document {
    let mut document = Document::new();
    if let Some(user_id) = &filter.user_id {
        document.insert("user_id", user_id.as_str());
    }
    if let Some(status) = &filter.status {
        document.insert("status", status.as_str());
    }
    if let Some(zone) = &filter.zone {
        document.insert("zone", zone.as_str());
    }
    if let Some(violation) = &filter.violation_type_manual {
        document.insert("violation_type_manual", violation.as_str());
    }
    document
}

fn sort_document(sort: ComplaintSort) -> Document {
    let direction = if sort.descending { -1 } else { 1 };
    let mut document = Document::new();
    document.insert(sort.field.document_key(), direction);
    // tie-break on insertion order
    document.insert("_id", direction);
    document
}

fn group_count_from(document: &Document) -> GroupCount {
    let count = match document.get("count") {
        Some(Bson::Int32(n)) => (*n).max(0) as u64,
        Some(Bson::Int64(n)) => (*n).max(0) as u64,
        _ => 0,
    };

    GroupCount {
        key: document.get_str("_id").ok().map(String::from),
        count,
    }
}

#[async_trait]
impl Store for MongoDB {
    async fn count_users(&self) -> Result<u64, AppError> {
        Ok(self.collection::<User>(USERS).count_documents(doc! {}).await?)
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .collection::<User>(USERS)
            .find_one(doc! { "_id": id_key(id) })
            .await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .collection::<User>(USERS)
            .find_one(doc! { "email": email })
            .await?)
    }

    async fn insert_user(&self, user: User) -> Result<String, AppError> {
        match self.collection::<User>(USERS).insert_one(&user).await {
            Ok(result) => Ok(inserted_id(&result.inserted_id)),
            Err(e) if is_duplicate_key(&e) => Err(AppError::Conflict("User already exists".to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn insert_complaint(&self, complaint: Complaint) -> Result<String, AppError> {
        let result = self
            .collection::<Complaint>(COMPLAINTS)
            .insert_one(&complaint)
            .await?;
        Ok(inserted_id(&result.inserted_id))
    }

    async fn find_complaint(&self, id: &str) -> Result<Option<Complaint>, AppError> {
        Ok(self
            .collection::<Complaint>(COMPLAINTS)
            .find_one(doc! { "_id": id_key(id) })
            .await?)
    }

    async fn find_complaints(
        &self,
        filter: &ComplaintFilter,
        sort: ComplaintSort,
    ) -> Result<Vec<Complaint>, AppError> {
        let cursor = self
            .collection::<Complaint>(COMPLAINTS)
            .find(complaint_filter_document(filter))
            .sort(sort_document(sort))
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn set_complaint_status(&self, id: &str, status: ComplaintStatus) -> Result<bool, AppError> {
        let result = self
            .collection::<Complaint>(COMPLAINTS)
            .update_one(
                doc! { "_id": id_key(id) },
                doc! { "$set": { "status": status.as_str() } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn count_complaints(&self, status: Option<ComplaintStatus>) -> Result<u64, AppError> {
        let filter = match status {
            Some(status) => doc! { "status": status.as_str() },
            None => doc! {},
        };
        Ok(self
            .collection::<Complaint>(COMPLAINTS)
            .count_documents(filter)
            .await?)
    }

    async fn group_complaints(&self, field: GroupField) -> Result<Vec<GroupCount>, AppError> {
        let pipeline = vec![
            doc! { "$group": { "_id": format!("${}", field.document_key()), "count": { "$sum": 1 } } },
            doc! { "$sort": { "count": -1, "_id": 1 } },
        ];

        let documents: Vec<Document> = self
            .collection::<Complaint>(COMPLAINTS)
            .aggregate(pipeline)
            .await?
            .try_collect()
            .await?;

        let mut groups: Vec<GroupCount> = documents.iter().map(group_count_from).collect();
        // null keys sort differently server-side; normalize
        sort_group_counts(&mut groups);
        Ok(groups)
    }

    async fn upsert_ml_data(&self, data: MlExtractedData) -> Result<(), AppError> {
        self.collection::<MlExtractedData>(ML_EXTRACTED_DATA)
            .update_one(doc! { "complaint_id": data.complaint_id.as_str() }, to_set_document(&data)?)
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn find_ml_data(&self, complaint_id: &str) -> Result<Option<MlExtractedData>, AppError> {
        Ok(self
            .collection::<MlExtractedData>(ML_EXTRACTED_DATA)
            .find_one(doc! { "complaint_id": complaint_id })
            .await?)
    }

    async fn insert_action(&self, action: Action) -> Result<String, AppError> {
        let result = self.collection::<Action>(ACTIONS).insert_one(&action).await?;
        Ok(inserted_id(&result.inserted_id))
    }

    async fn find_actions(&self, complaint_id: &str) -> Result<Vec<Action>, AppError> {
        let cursor = self
            .collection::<Action>(ACTIONS)
            .find(doc! { "complaint_id": complaint_id })
            .sort(doc! { "action_timestamp": 1, "_id": 1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn upsert_feedback(&self, feedback: Feedback) -> Result<(), AppError> {
        self.collection::<Feedback>(FEEDBACK)
            .update_one(doc! { "complaint_id": feedback.complaint_id.as_str() }, to_set_document(&feedback)?)
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn find_feedback(&self, complaint_id: &str) -> Result<Option<Feedback>, AppError> {
        Ok(self
            .collection::<Feedback>(FEEDBACK)
            .find_one(doc! { "complaint_id": complaint_id })
            .await?)
    }
}
