use async_trait::async_trait;
use crate::application::errors::StorageError;
use crate::domain::entities::LogEntry;

/// Append-only log of completed weather requests
#[async_trait]
pub trait RequestLog: Send + Sync {
    /// Create the backing table if it is missing
    async fn ensure_schema(&self) -> Result<(), StorageError>;

    /// Record one request. Write failures are logged and swallowed by
    /// implementations; an `Err` means something unexpected went wrong.
    async fn append(&self, entry: LogEntry) -> Result<(), StorageError>;
}
