//! Handlers for the public lead-capture and enrollment forms.
//!
//! Each handler loads the posted fields into a [`FormState`] and runs the
//! same submit flow the page runs: validate everything, block on any field
//! error, otherwise deliver upstream. Responses:
//!
//! - `201` with the success message,
//! - `422` with per-field errors and the field to focus,
//! - `502` with the failure message when upstream rejects the submission.

use std::future::Future;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use cadenza_client::ApiClientError;
use cadenza_core::error::CoreError;
use cadenza_core::forms::{FormKind, FormState, FormValues, SubmitOutcome};
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, SubmitAccepted};
use crate::state::AppState;

/// Flatten the fields of a JSON body that `kind` has rules for into string
/// values.
///
/// Numbers and booleans are stringified, `null` becomes empty. A nested
/// array or object under a ruled field is rejected; keys without a rule are
/// skipped whatever their shape.
pub fn form_input(
    kind: FormKind,
    body: &Map<String, Value>,
) -> Result<Vec<(String, String)>, CoreError> {
    let schema = kind.schema();
    body.iter()
        .filter(|(key, _)| schema.rule(key.as_str()).is_some())
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(CoreError::Validation(format!(
                        "Field '{key}' must be a single value"
                    )));
                }
            };
            Ok((key.clone(), text))
        })
        .collect()
}

/// Run the submit flow for `kind` and map its outcome to a response.
async fn submit_form<F, Fut>(
    kind: FormKind,
    body: Map<String, Value>,
    submitter: F,
) -> AppResult<impl IntoResponse>
where
    F: FnOnce(FormValues) -> Fut,
    Fut: Future<Output = Result<(), ApiClientError>>,
{
    let mut form = FormState::from_input(kind, form_input(kind, &body)?);

    match form.submit(submitter).await {
        SubmitOutcome::Submitted { message } => Ok((
            StatusCode::CREATED,
            Json(DataResponse {
                data: SubmitAccepted { message },
            }),
        )),
        SubmitOutcome::Blocked { message, focus } => Err(AppError::FormRejected {
            message,
            focus,
            fields: form.errors().clone(),
        }),
        SubmitOutcome::Failed { message } => Err(AppError::SubmissionFailed(message)),
        SubmitOutcome::InFlight => Err(AppError::Core(CoreError::Conflict(
            "A submission for this form is already in progress".into(),
        ))),
    }
}

/// POST /api/v1/leads
///
/// Course enrollment request from the catalog.
pub async fn submit_lead(
    State(state): State<AppState>,
    Json(body): Json<Map<String, Value>>,
) -> AppResult<impl IntoResponse> {
    let (upstream, _cancel) = state.request_upstream();
    submit_form(FormKind::Enrollment, body, |payload| async move {
        upstream.submit_lead(&payload).await
    })
    .await
}

/// POST /api/v1/contact
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(body): Json<Map<String, Value>>,
) -> AppResult<impl IntoResponse> {
    let (upstream, _cancel) = state.request_upstream();
    submit_form(FormKind::Contact, body, |payload| async move {
        upstream.submit_contact(&payload).await
    })
    .await
}

/// POST /api/v1/consultations
pub async fn submit_consultation(
    State(state): State<AppState>,
    Json(body): Json<Map<String, Value>>,
) -> AppResult<impl IntoResponse> {
    let (upstream, _cancel) = state.request_upstream();
    submit_form(FormKind::Consultation, body, |payload| async move {
        upstream.submit_consultation(&payload).await
    })
    .await
}

/// POST /api/v1/workshops/{id}/enroll
///
/// Requires a signed-in viewer; the token is forwarded upstream.
pub async fn enroll_in_workshop(
    State(state): State<AppState>,
    user: AuthUser,
    Path(workshop_id): Path<String>,
    Json(body): Json<Map<String, Value>>,
) -> AppResult<impl IntoResponse> {
    let (upstream, _cancel) = state.request_upstream();

    tracing::info!(user_id = %user.user_id, workshop_id = %workshop_id, "Workshop enrollment submitted");

    submit_form(FormKind::WorkshopEnrollment, body, |payload| async move {
        upstream
            .enroll_in_workshop(&workshop_id, &payload, &user.token)
            .await
    })
    .await
}
