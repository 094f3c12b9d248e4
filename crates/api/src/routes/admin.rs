//! Route definitions for the admin console.

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Admin routes mounted at `/admin`.
///
/// `{collection}` is one of `courses`, `teachers`, `schedules`,
/// `resources`, `workshops`, `events`, `enrollments`.
///
/// ```text
/// GET    /{collection}        -> list
/// POST   /{collection}        -> create
/// GET    /{collection}/{id}   -> get
/// PUT    /{collection}/{id}   -> update
/// DELETE /{collection}/{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{collection}", get(admin::list).post(admin::create))
        .route(
            "/{collection}/{id}",
            get(admin::get).put(admin::update).delete(admin::delete),
        )
}
