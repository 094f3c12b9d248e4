//! Integration tests for [`UpstreamApi`] against an in-process axum stub.

use std::time::Duration;

use assert_matches::assert_matches;
use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use cadenza_client::{ApiClientError, UpstreamApi};
use cadenza_core::catalog::AdminCollection;
use cadenza_core::forms::FormValues;
use cadenza_core::reconcile::EnrollmentSource;
use cadenza_core::types::RecordId;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

async fn spawn_upstream(router: Router) -> UpstreamApi {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    UpstreamApi::new(format!("http://{addr}"), Duration::from_secs(5)).unwrap()
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

async fn enrollments(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    match bearer(&headers).as_deref() {
        Some("student-token") => Ok(Json(json!([
            { "enrollmentId": "e1", "courseId": "a" },
            { "enrollmentId": "e2", "course": { "_id": 7 } }
        ]))),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

fn stub() -> Router {
    Router::new()
        .route(
            "/courses",
            get(|| async {
                Json(json!([
                    { "_id": "a", "title": "Piano", "price": 100.0, "level": "Beginner" },
                    { "_id": 7, "title": "Violin" }
                ]))
            }),
        )
        .route("/me/enrollments", get(enrollments))
        .route(
            "/leads",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "database down") }),
        )
        .route(
            "/contact",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["email"], "asha@example.com");
                StatusCode::CREATED
            }),
        )
        .route(
            "/admin/resources/{id}",
            put(|Path(id): Path<String>, Json(body): Json<Value>| async move {
                Json(json!({ "_id": id, "title": body["title"] }))
            })
            .delete(|| async { StatusCode::NO_CONTENT }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Json(json!([]))
            }),
        )
}

#[tokio::test]
async fn lists_courses_with_mixed_id_types() {
    let api = spawn_upstream(stub()).await;
    let courses = api.list_courses().await.unwrap();
    assert_eq!(courses.len(), 2);
    assert_eq!(courses[0].id, RecordId::Text("a".into()));
    assert_eq!(courses[0].price, Some(100.0));
    assert_eq!(courses[1].id, RecordId::Number(7));
    assert_eq!(courses[1].price, None);
}

#[tokio::test]
async fn enrollments_require_bearer() {
    let api = spawn_upstream(stub()).await;

    let list = api.my_enrollments("student-token").await.unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[1].course_key().as_deref(), Some("7"));

    let err = api.my_enrollments("someone-else").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn failed_submission_carries_status_and_body() {
    let api = spawn_upstream(stub()).await;
    let payload = FormValues::new();
    let err = api.submit_lead(&payload).await.unwrap_err();
    assert_matches!(
        err,
        ApiClientError::Status { status: 500, ref body } if body == "database down"
    );
}

#[tokio::test]
async fn successful_submission_ignores_body() {
    let api = spawn_upstream(stub()).await;
    let mut payload = FormValues::new();
    payload.insert("email".into(), "asha@example.com".into());
    api.submit_contact(&payload).await.unwrap();
}

#[tokio::test]
async fn admin_update_and_delete() {
    let api = spawn_upstream(stub()).await;

    let updated = api
        .admin_update(
            AdminCollection::Resources,
            "r1",
            &json!({ "title": "Scales PDF" }),
            "admin-token",
        )
        .await
        .unwrap();
    assert_eq!(updated["_id"], "r1");
    assert_eq!(updated["title"], "Scales PDF");

    api.admin_delete(AdminCollection::Resources, "r1", "admin-token")
        .await
        .unwrap();
}

#[tokio::test]
async fn cancelled_request_returns_cancelled() {
    let api = spawn_upstream(stub()).await;
    let cancel = CancellationToken::new();
    let scoped = api.with_cancellation(cancel.clone());

    let pending = tokio::spawn(async move { scoped.get::<Value>("/slow", None).await });
    tokio::time::sleep(Duration::from_millis(50)).await;
    cancel.cancel();

    let result = pending.await.unwrap();
    assert_matches!(result, Err(ApiClientError::Cancelled));
}
