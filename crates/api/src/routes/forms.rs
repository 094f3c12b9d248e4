//! Route definitions for lead-capture and enrollment forms.

use axum::routing::post;
use axum::Router;

use crate::handlers::forms;
use crate::state::AppState;

/// Form submission routes mounted at the `/api/v1` root.
///
/// ```text
/// POST /leads                  -> submit_lead
/// POST /contact                -> submit_contact
/// POST /consultations          -> submit_consultation
/// POST /workshops/{id}/enroll  -> enroll_in_workshop (auth required)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/leads", post(forms::submit_lead))
        .route("/contact", post(forms::submit_contact))
        .route("/consultations", post(forms::submit_consultation))
        .route("/workshops/{id}/enroll", post(forms::enroll_in_workshop))
}
