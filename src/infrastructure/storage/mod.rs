//! SQLite-backed request log

use async_trait::async_trait;
use std::sync::Arc;

use crate::application::errors::StorageError;
use crate::domain::entities::LogEntry;
use crate::domain::traits::RequestLog;
use crate::infrastructure::database::Database;

/// Runs blocking SQLite work off the async workers
pub struct SqliteRequestLog {
    db: Arc<Database>,
}

impl SqliteRequestLog {
    pub fn new(db: Database) -> Self {
        Self { db: Arc::new(db) }
    }
}

#[async_trait]
impl RequestLog for SqliteRequestLog {
    async fn ensure_schema(&self) -> Result<(), StorageError> {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || db.init_tables())
            .await
            .map_err(|e| StorageError::Task(e.to_string()))??;
        tracing::info!("Database {} created or already exists", self.db.path().display());
        Ok(())
    }

    async fn append(&self, entry: LogEntry) -> Result<(), StorageError> {
        let db = Arc::clone(&self.db);
        let user_name = entry.user_name.clone();
        let result = tokio::task::spawn_blocking(move || db.insert_request(&entry))
            .await
            .map_err(|e| StorageError::Task(e.to_string()))?;

        match result {
            Ok(()) => tracing::info!("Request from user {} logged", user_name),
            Err(e) => tracing::error!("Failed to log request from user {}: {}", user_name, e),
        }
        Ok(())
    }
}
