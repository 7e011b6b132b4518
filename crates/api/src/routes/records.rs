//! Route definitions shared by every table-backed resource.

use axum::routing::get;
use axum::{Extension, Router};
use catalog_core::resource::ResourceSpec;

use crate::handlers::{fallback, records};
use crate::state::AppState;

/// Routes for one resource, mounted at its path segment.
///
/// ```text
/// GET    /{path}, /{path}/    -> list
/// POST   /{path}, /{path}/    -> create
/// GET    /{path}/{id}         -> get_by_id
/// PUT    /{path}/{id}         -> update
/// DELETE /{path}/{id}         -> delete
/// ```
///
/// Any other method on these paths falls through to the "Route not found"
/// envelope rather than axum's bare 405.
pub fn router(resource: &'static ResourceSpec) -> Router<AppState> {
    let collection = get(records::list)
        .post(records::create)
        .fallback(fallback::route_not_found);
    let item = get(records::get_by_id)
        .put(records::update)
        .delete(records::delete)
        .fallback(fallback::route_not_found);

    Router::new()
        .route(&format!("/{}", resource.path), collection.clone())
        .route(&format!("/{}/", resource.path), collection)
        .route(&format!("/{}/{{id}}", resource.path), item)
        .layer(Extension(resource))
}
