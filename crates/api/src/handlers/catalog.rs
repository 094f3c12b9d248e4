//! Handlers for the public catalog pages.
//!
//! Course listings are reconciled against the viewer's enrollments so
//! enrolled courses render "Continue Learning" instead of a price. The home
//! page and the catalog page share [`viewer_enrollments`].

use axum::extract::{Path, State};
use axum::Json;
use cadenza_client::UpstreamApi;
use cadenza_core::catalog::Teacher;
use cadenza_core::reconcile::{
    course_cards, reconcile_enrollments, CourseCard, EnrolledIdSet,
};
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::AppResult;
use crate::middleware::auth::MaybeViewer;
use crate::response::DataResponse;
use crate::state::AppState;

/// Everything the home page renders from the API.
#[derive(Debug, Serialize)]
pub struct HomePage {
    pub featured_courses: Vec<CourseCard>,
    pub teachers: Vec<Teacher>,
}

/// Enrolled course ids for the viewer; empty for anonymous viewers or
/// whenever the lookup fails.
pub async fn viewer_enrollments(
    viewer: &MaybeViewer,
    upstream: &UpstreamApi,
    cancel: &CancellationToken,
) -> EnrolledIdSet {
    reconcile_enrollments(viewer.is_signed_in(), viewer, upstream, cancel).await
}

/// GET /api/v1/home
///
/// Featured courses (reconciled) and the teacher roster.
pub async fn home(
    State(state): State<AppState>,
    viewer: MaybeViewer,
) -> AppResult<Json<DataResponse<HomePage>>> {
    let (upstream, cancel) = state.request_upstream();

    let (courses, teachers, enrolled) = tokio::join!(
        upstream.list_courses(),
        upstream.list_teachers(),
        viewer_enrollments(&viewer, &upstream, &cancel),
    );

    let mut courses = courses?;
    courses.truncate(state.config.featured_courses);

    Ok(Json(DataResponse {
        data: HomePage {
            featured_courses: course_cards(courses, &enrolled),
            teachers: teachers?,
        },
    }))
}

/// GET /api/v1/courses
///
/// Full catalog as course cards.
pub async fn list_courses(
    State(state): State<AppState>,
    viewer: MaybeViewer,
) -> AppResult<Json<DataResponse<Vec<CourseCard>>>> {
    let (upstream, cancel) = state.request_upstream();

    let (courses, enrolled) = tokio::join!(
        upstream.list_courses(),
        viewer_enrollments(&viewer, &upstream, &cancel),
    );
    let courses = courses?;

    tracing::debug!(
        courses = courses.len(),
        enrolled = enrolled.len(),
        signed_in = viewer.is_signed_in(),
        "Catalog reconciled"
    );

    Ok(Json(DataResponse {
        data: course_cards(courses, &enrolled),
    }))
}

/// GET /api/v1/courses/{id}
pub async fn get_course(
    State(state): State<AppState>,
    viewer: MaybeViewer,
    Path(course_id): Path<String>,
) -> AppResult<Json<DataResponse<CourseCard>>> {
    let (upstream, cancel) = state.request_upstream();

    let (course, enrolled) = tokio::join!(
        upstream.get_course(&course_id),
        viewer_enrollments(&viewer, &upstream, &cancel),
    );

    Ok(Json(DataResponse {
        data: CourseCard::new(course?, &enrolled),
    }))
}

/// GET /api/v1/teachers
pub async fn list_teachers(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Teacher>>>> {
    let (upstream, _cancel) = state.request_upstream();
    let teachers = upstream.list_teachers().await?;
    Ok(Json(DataResponse { data: teachers }))
}

/// GET /api/v1/workshops
pub async fn list_workshops(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Value>>>> {
    let (upstream, _cancel) = state.request_upstream();
    let workshops = upstream.list_workshops().await?;
    Ok(Json(DataResponse { data: workshops }))
}

/// GET /api/v1/events
pub async fn list_events(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Value>>>> {
    let (upstream, _cancel) = state.request_upstream();
    let events = upstream.list_events().await?;
    Ok(Json(DataResponse { data: events }))
}
