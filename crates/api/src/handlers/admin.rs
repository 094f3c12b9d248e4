//! Handlers for the admin console (admin only).
//!
//! Generic CRUD over the upstream admin collections. Creates and updates of
//! collections that have a console form (resources, workshops, events,
//! manual enrollments) are validated with that form's rules first; the
//! original body is forwarded unchanged once it passes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use cadenza_core::catalog::AdminCollection;
use cadenza_core::error::CoreError;
use cadenza_core::forms::schema::BLOCKED_MESSAGE;
use cadenza_core::forms::FormState;
use serde_json::{Map, Value};

use super::forms::form_input;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

fn parse_collection(segment: &str) -> AppResult<AdminCollection> {
    AdminCollection::from_segment(segment).ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "AdminCollection",
            id: segment.to_string(),
        })
    })
}

/// Validate `body` against the collection's form, if it has one.
fn validate_body(collection: AdminCollection, body: &Map<String, Value>) -> AppResult<()> {
    let Some(kind) = collection.form_kind() else {
        return Ok(());
    };
    let mut form = FormState::from_input(kind, form_input(kind, body)?);
    match form.validate_all() {
        None => Ok(()),
        Some(focus) => {
            tracing::debug!(
                collection = collection.as_str(),
                focus = focus.field,
                "Admin form rejected"
            );
            Err(AppError::FormRejected {
                message: BLOCKED_MESSAGE,
                focus,
                fields: form.errors().clone(),
            })
        }
    }
}

/// GET /api/v1/admin/{collection}
pub async fn list(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> AppResult<impl IntoResponse> {
    let collection = parse_collection(&collection)?;
    let (upstream, _cancel) = state.request_upstream();
    let items = upstream.admin_list(collection, &admin.token).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/admin/{collection}/{id}
pub async fn get(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let collection = parse_collection(&collection)?;
    let (upstream, _cancel) = state.request_upstream();
    let item = upstream.admin_get(collection, &id, &admin.token).await?;
    Ok(Json(DataResponse { data: item }))
}

/// POST /api/v1/admin/{collection}
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Json(body): Json<Map<String, Value>>,
) -> AppResult<impl IntoResponse> {
    let collection = parse_collection(&collection)?;
    validate_body(collection, &body)?;

    let (upstream, _cancel) = state.request_upstream();
    let created = upstream
        .admin_create(collection, &body, &admin.token)
        .await?;

    tracing::info!(
        collection = collection.as_str(),
        user_id = %admin.user_id,
        "Admin record created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// PUT /api/v1/admin/{collection}/{id}
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    Json(body): Json<Map<String, Value>>,
) -> AppResult<impl IntoResponse> {
    let collection = parse_collection(&collection)?;
    validate_body(collection, &body)?;

    let (upstream, _cancel) = state.request_upstream();
    let updated = upstream
        .admin_update(collection, &id, &body, &admin.token)
        .await?;

    tracing::info!(
        collection = collection.as_str(),
        id = %id,
        user_id = %admin.user_id,
        "Admin record updated",
    );

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/admin/{collection}/{id}
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let collection = parse_collection(&collection)?;

    let (upstream, _cancel) = state.request_upstream();
    upstream.admin_delete(collection, &id, &admin.token).await?;

    tracing::info!(
        collection = collection.as_str(),
        id = %id,
        user_id = %admin.user_id,
        "Admin record deleted",
    );

    Ok(StatusCode::NO_CONTENT)
}
