//! The storage-access interface handlers are written against.

use async_trait::async_trait;
use catalog_core::record::{NewRecord, Record};
use catalog_core::resource::ResourceSpec;
use catalog_core::types::DbId;

use crate::error::StoreError;

/// Result of a revision-checked write.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// The row was written; carries the stored row with its new revision.
    Updated(Record),
    /// The row exists but its revision moved on since it was read.
    Stale,
    /// No row with that id exists any more.
    Missing,
}

/// CRUD access to resource tables.
///
/// Every method takes the [`ResourceSpec`] that selects the table, so one
/// store serves every resource. Implementations must bind all values as
/// parameters; only the descriptor's static table name may be formatted
/// into statement text.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All rows, ordered by id.
    async fn list(&self, resource: &'static ResourceSpec) -> Result<Vec<Record>, StoreError>;

    async fn find_by_id(
        &self,
        resource: &'static ResourceSpec,
        id: DbId,
    ) -> Result<Option<Record>, StoreError>;

    /// Insert a row, returning it with its storage-assigned id.
    async fn insert(
        &self,
        resource: &'static ResourceSpec,
        input: &NewRecord,
    ) -> Result<Record, StoreError>;

    /// Overwrite every column of `record`'s row, provided the stored
    /// revision still equals `record.revision`. A successful write bumps
    /// the revision by one.
    async fn update_if_unchanged(&self, record: &Record) -> Result<UpdateOutcome, StoreError>;

    /// Delete a row. Returns `true` if a row was removed.
    async fn delete(&self, resource: &'static ResourceSpec, id: DbId) -> Result<bool, StoreError>;

    /// Confirm the backing storage is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;

    /// Release pooled resources. Called once at shutdown.
    async fn close(&self);
}
