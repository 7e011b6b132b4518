//! In-process [`RecordStore`] used for local runs (`STORAGE=memory`) and
//! router-level tests.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use catalog_core::record::{NewRecord, Record};
use catalog_core::resource::ResourceSpec;
use catalog_core::types::DbId;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::store::{RecordStore, UpdateOutcome};

#[derive(Default)]
struct Table {
    last_id: DbId,
    rows: BTreeMap<DbId, Record>,
}

/// Record store holding every table in memory.
///
/// Thread-safe via interior `RwLock`; ids are assigned per table starting
/// at 1, mirroring BIGSERIAL.
#[derive(Default)]
pub struct MemoryRecordStore {
    tables: RwLock<HashMap<&'static str, Table>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn list(&self, resource: &'static ResourceSpec) -> Result<Vec<Record>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(resource.table)
            .map(|t| t.rows.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn find_by_id(
        &self,
        resource: &'static ResourceSpec,
        id: DbId,
    ) -> Result<Option<Record>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(resource.table)
            .and_then(|t| t.rows.get(&id))
            .cloned())
    }

    async fn insert(
        &self,
        resource: &'static ResourceSpec,
        input: &NewRecord,
    ) -> Result<Record, StoreError> {
        let mut tables = self.tables.write().await;
        let table = tables.entry(resource.table).or_default();
        table.last_id += 1;
        let record = Record::from_new(resource, table.last_id, input.clone());
        table.rows.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_if_unchanged(&self, record: &Record) -> Result<UpdateOutcome, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(stored) = tables
            .get_mut(record.resource.table)
            .and_then(|t| t.rows.get_mut(&record.id))
        else {
            return Ok(UpdateOutcome::Missing);
        };

        if stored.revision != record.revision {
            return Ok(UpdateOutcome::Stale);
        }

        *stored = Record {
            revision: record.revision + 1,
            ..record.clone()
        };
        Ok(UpdateOutcome::Updated(stored.clone()))
    }

    async fn delete(&self, resource: &'static ResourceSpec, id: DbId) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .get_mut(resource.table)
            .is_some_and(|t| t.rows.remove(&id).is_some()))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn close(&self) {
        let mut tables = self.tables.write().await;
        let rows: usize = tables.values().map(|t| t.rows.len()).sum();
        tables.clear();
        tracing::info!(rows, "In-memory store cleared");
    }
}
