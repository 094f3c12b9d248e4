//! Route definitions for the public catalog pages.

use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Catalog routes mounted at the `/api/v1` root.
///
/// ```text
/// GET /home          -> home
/// GET /courses       -> list_courses
/// GET /courses/{id}  -> get_course
/// GET /teachers      -> list_teachers
/// GET /workshops     -> list_workshops
/// GET /events        -> list_events
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/home", get(catalog::home))
        .route("/courses", get(catalog::list_courses))
        .route("/courses/{id}", get(catalog::get_course))
        .route("/teachers", get(catalog::list_teachers))
        .route("/workshops", get(catalog::list_workshops))
        .route("/events", get(catalog::list_events))
}
