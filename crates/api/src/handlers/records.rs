//! Generic CRUD handlers, mounted once per [`ResourceSpec`].
//!
//! The resource a request targets arrives as an `Extension` set by
//! [`crate::routes::records::router`]; the handlers never look at table
//! names themselves.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use catalog_core::error::CoreError;
use catalog_core::record::{NewRecord, Record, RecordPatch};
use catalog_core::resource::ResourceSpec;
use catalog_core::types::DbId;
use catalog_db::UpdateOutcome;

use crate::error::{AppError, AppResult};
use crate::extract::{AppBody, AppPath};
use crate::response::Envelope;
use crate::state::AppState;

/// Read-merge-write attempts before an update gives up with 409.
pub const MAX_UPDATE_ATTEMPTS: u32 = 3;

type Resource = Extension<&'static ResourceSpec>;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a record or fail with 404.
async fn ensure_record_exists(
    state: &AppState,
    resource: &'static ResourceSpec,
    id: DbId,
) -> AppResult<Record> {
    state
        .store
        .find_by_id(resource, id)
        .await?
        .ok_or_else(|| AppError::Core(resource.not_found(id)))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /{resource}
pub async fn list(
    State(state): State<AppState>,
    Extension(resource): Resource,
) -> AppResult<Json<Envelope<Vec<Record>>>> {
    let records = state.store.list(resource).await?;
    tracing::debug!(resource = resource.path, count = records.len(), "Listed records");
    Ok(Json(Envelope::new(records, resource.listed_message())))
}

/// GET /{resource}/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Extension(resource): Resource,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<Envelope<Record>>> {
    let record = ensure_record_exists(&state, resource, id).await?;
    let message = resource.retrieved_message(&record.name);
    Ok(Json(Envelope::new(record, message)))
}

/// POST /{resource}
pub async fn create(
    State(state): State<AppState>,
    Extension(resource): Resource,
    AppBody(input): AppBody<NewRecord>,
) -> AppResult<(StatusCode, Json<Envelope<Record>>)> {
    input.check(resource)?;

    let record = state.store.insert(resource, &input).await?;
    tracing::info!(resource = resource.path, id = record.id, "Record created");

    let message = resource.added_message(&record.name);
    Ok((StatusCode::CREATED, Json(Envelope::new(record, message))))
}

/// PUT /{resource}/{id}
///
/// Read-merge-write guarded by the row revision. When another writer gets
/// in between the read and the write, the merge is redone on the fresh row,
/// so each stored version is exactly one payload applied to one snapshot.
pub async fn update(
    State(state): State<AppState>,
    Extension(resource): Resource,
    AppPath(id): AppPath<DbId>,
    AppBody(patch): AppBody<RecordPatch>,
) -> AppResult<Json<Envelope<Record>>> {
    for attempt in 1..=MAX_UPDATE_ATTEMPTS {
        let current = ensure_record_exists(&state, resource, id).await?;
        let merged = current.merge(&patch)?;

        match state.store.update_if_unchanged(&merged).await? {
            UpdateOutcome::Updated(record) => {
                tracing::info!(
                    resource = resource.path,
                    id,
                    revision = record.revision,
                    attempt,
                    "Record updated",
                );
                let message = resource.updated_message(&record.name);
                return Ok(Json(Envelope::new(record, message)));
            }
            UpdateOutcome::Missing => return Err(AppError::Core(resource.not_found(id))),
            UpdateOutcome::Stale => {
                tracing::debug!(
                    resource = resource.path,
                    id,
                    attempt,
                    "Revision moved, retrying update",
                );
            }
        }
    }

    tracing::warn!(resource = resource.path, id, "Update lost every revision race");
    Err(AppError::Core(CoreError::Conflict(format!(
        "{} with id {id} is being modified concurrently, retry the request",
        resource.singular
    ))))
}

/// DELETE /{resource}/{id}
///
/// Responds 200 whether or not a row matched.
pub async fn delete(
    State(state): State<AppState>,
    Extension(resource): Resource,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<Envelope<()>>> {
    let deleted = state.store.delete(resource, id).await?;
    if deleted {
        tracing::info!(resource = resource.path, id, "Record deleted");
    } else {
        tracing::debug!(resource = resource.path, id, "Delete matched no row");
    }
    Ok(Json(Envelope::empty(resource.deleted_message(id))))
}
