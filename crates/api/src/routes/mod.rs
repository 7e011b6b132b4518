pub mod health;
pub mod records;

use axum::Router;
use catalog_core::resource::ResourceSpec;

use crate::state::AppState;

/// Build the resource route tree: one [`records::router`] per registered
/// resource.
///
/// ```text
/// /fashion, /fashion/{id}
/// /pokemon, /pokemon/{id}
/// ```
pub fn api_routes() -> Router<AppState> {
    ResourceSpec::all()
        .iter()
        .copied()
        .fold(Router::new(), |router, resource| {
            router.merge(records::router(resource))
        })
}
