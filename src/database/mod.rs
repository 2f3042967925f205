pub mod memory;
pub mod mongo;
pub mod store;

pub use memory::InMemoryStore;
pub use mongo::MongoDB;
pub use store::Store;

use std::sync::Arc;

use crate::config::Settings;
use crate::utils::AppError;

/// Opens MongoDB when a URI is configured, otherwise falls back to the in-memory store.
pub async fn connect(settings: &Settings) -> Result<Arc<dyn Store>, AppError> {
    if settings.uses_mongodb() {
        log::info!("📊 Connecting to MongoDB database '{}'", settings.mongodb_db);
        let db = MongoDB::new(&settings.mongodb_uri, &settings.mongodb_db).await?;
        log::info!("✅ MongoDB connected successfully");
        Ok(Arc::new(db))
    } else {
        log::warn!("⚠️  MONGODB_URI not set, using in-memory store (data is not persisted)");
        Ok(Arc::new(InMemoryStore::new()))
    }
}
