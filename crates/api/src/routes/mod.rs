pub mod admin;
pub mod catalog;
pub mod forms;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /home                                 featured courses + teachers
/// /courses                              course cards (viewer-aware)
/// /courses/{id}                         one course card
/// /teachers, /workshops, /events        listings
///
/// /leads                                enrollment lead (POST)
/// /contact                              contact form (POST)
/// /consultations                        consultation booking (POST)
/// /workshops/{id}/enroll                workshop enrollment (POST, auth)
///
/// /admin/{collection}                   list, create (admin only)
/// /admin/{collection}/{id}              get, update, delete (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(catalog::router())
        .merge(forms::router())
        .nest("/admin", admin::router())
}
