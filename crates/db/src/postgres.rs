//! PostgreSQL-backed [`RecordStore`].

use async_trait::async_trait;
use catalog_core::record::{NewRecord, Record};
use catalog_core::resource::ResourceSpec;
use catalog_core::types::{DbId, Revision};
use sqlx::{FromRow, PgPool};

use crate::error::StoreError;
use crate::sql;
use crate::store::{RecordStore, UpdateOutcome};

/// Raw row shape shared by every resource table.
#[derive(Debug, FromRow)]
struct RecordRow {
    id: DbId,
    name: String,
    height: f64,
    weight: f64,
    avatar: String,
    color: Option<String>,
    revision: Revision,
}

impl RecordRow {
    fn into_record(self, resource: &'static ResourceSpec) -> Record {
        Record {
            resource,
            id: self.id,
            name: self.name,
            height: self.height,
            weight: self.weight,
            avatar: self.avatar,
            color: self.color,
            revision: self.revision,
        }
    }
}

/// Record store over a sqlx connection pool.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn list(&self, resource: &'static ResourceSpec) -> Result<Vec<Record>, StoreError> {
        let query = sql::select_all(resource);
        let rows = sqlx::query_as::<_, RecordRow>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| r.into_record(resource)).collect())
    }

    async fn find_by_id(
        &self,
        resource: &'static ResourceSpec,
        id: DbId,
    ) -> Result<Option<Record>, StoreError> {
        let query = sql::select_by_id(resource);
        let row = sqlx::query_as::<_, RecordRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.into_record(resource)))
    }

    async fn insert(
        &self,
        resource: &'static ResourceSpec,
        input: &NewRecord,
    ) -> Result<Record, StoreError> {
        let query = sql::insert(resource);
        let mut statement = sqlx::query_as::<_, RecordRow>(&query)
            .bind(&input.name)
            .bind(input.height)
            .bind(input.weight)
            .bind(&input.avatar);
        if resource.has_color {
            statement = statement.bind(&input.color);
        }
        let row = statement.fetch_one(&self.pool).await?;
        Ok(row.into_record(resource))
    }

    async fn update_if_unchanged(&self, record: &Record) -> Result<UpdateOutcome, StoreError> {
        let resource = record.resource;
        let query = sql::update_if_revision(resource);
        let mut statement = sqlx::query_as::<_, RecordRow>(&query)
            .bind(record.id)
            .bind(record.revision)
            .bind(&record.name)
            .bind(record.height)
            .bind(record.weight)
            .bind(&record.avatar);
        if resource.has_color {
            statement = statement.bind(&record.color);
        }

        if let Some(row) = statement.fetch_optional(&self.pool).await? {
            return Ok(UpdateOutcome::Updated(row.into_record(resource)));
        }

        let query = sql::exists(resource);
        let exists: bool = sqlx::query_scalar(&query)
            .bind(record.id)
            .fetch_one(&self.pool)
            .await?;
        Ok(if exists {
            UpdateOutcome::Stale
        } else {
            UpdateOutcome::Missing
        })
    }

    async fn delete(&self, resource: &'static ResourceSpec, id: DbId) -> Result<bool, StoreError> {
        let query = sql::delete(resource);
        let result = sqlx::query(&query).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }
}
