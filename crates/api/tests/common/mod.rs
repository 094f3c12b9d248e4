#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::Path;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::response::Response;
use axum::routing::{get as get_route, post as post_route};
use axum::{Json, Router};
use cadenza_api::auth::jwt::JwtConfig;
use cadenza_api::config::ServerConfig;
use cadenza_api::router::build_app_router;
use cadenza_api::state::AppState;
use cadenza_client::UpstreamApi;
use cadenza_core::roles::{ROLE_ADMIN, ROLE_STUDENT};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";
pub const OWNER_EMAIL: &str = "owner@school.com";

/// How the stubbed school API answers `GET /me/enrollments`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentsStub {
    /// Course `a` (by `courseId`) and course `7` (by nested `course._id`).
    Enrolled,
    /// 500 Internal Server Error.
    Failing,
}

/// What the stubbed school API returns for `/courses` and `/teachers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogStub {
    /// Fully populated records.
    Full,
    /// Records carrying nothing but their `_id`.
    Bare,
}

/// The application under test plus a counter of upstream writes.
pub struct TestApp {
    pub router: Router,
    /// Number of POST/PUT/DELETE requests the stubbed school API received.
    pub upstream_writes: Arc<AtomicUsize>,
    /// The server-wide shutdown token handed to `AppState`.
    pub shutdown: CancellationToken,
}

impl TestApp {
    pub fn writes(&self) -> usize {
        self.upstream_writes.load(Ordering::SeqCst)
    }
}

/// Build a test `ServerConfig` pointing at `upstream_url`.
pub fn test_config(upstream_url: String) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        upstream_url,
        upstream_timeout_secs: 5,
        admin_emails: vec![OWNER_EMAIL.to_string()],
        featured_courses: 1,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            issuer: None,
        },
    }
}

/// Build the full application router against a freshly spawned stub of the
/// school API.
pub async fn build_test_app() -> TestApp {
    build_test_app_with(EnrollmentsStub::Enrolled).await
}

pub async fn build_test_app_with(enrollments: EnrollmentsStub) -> TestApp {
    build_stubbed_app(enrollments, CatalogStub::Full).await
}

pub async fn build_test_app_with_catalog(catalog: CatalogStub) -> TestApp {
    build_stubbed_app(EnrollmentsStub::Enrolled, catalog).await
}

async fn build_stubbed_app(enrollments: EnrollmentsStub, catalog: CatalogStub) -> TestApp {
    let upstream_writes = Arc::new(AtomicUsize::new(0));
    let addr = spawn_upstream(enrollments, catalog, upstream_writes.clone()).await;

    let config = test_config(format!("http://{addr}"));
    let shutdown = CancellationToken::new();
    let upstream = UpstreamApi::new(
        config.upstream_url.clone(),
        Duration::from_secs(config.upstream_timeout_secs),
    )
    .expect("client should build");

    let state = AppState {
        upstream,
        config: Arc::new(config.clone()),
        shutdown: shutdown.clone(),
    };

    TestApp {
        router: build_app_router(state, &config),
        upstream_writes,
        shutdown,
    }
}

// ---------------------------------------------------------------------------
// Stubbed school API
// ---------------------------------------------------------------------------

fn has_bearer(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer "))
}

fn piano() -> Value {
    json!({ "_id": "a", "title": "Piano Foundations", "price": 120.0, "level": "Beginner" })
}

async fn spawn_upstream(
    enrollments: EnrollmentsStub,
    catalog: CatalogStub,
    writes: Arc<AtomicUsize>,
) -> std::net::SocketAddr {
    let counted = |writes: &Arc<AtomicUsize>, status: StatusCode| {
        let writes = writes.clone();
        move |Json(body): Json<Value>| async move {
            writes.fetch_add(1, Ordering::SeqCst);
            (status, Json(json!({ "_id": "new-1", "echo": body })))
        }
    };

    let router = Router::new()
        .route(
            "/courses",
            get_route(move || async move {
                match catalog {
                    CatalogStub::Full => Json(json!([
                        piano(),
                        { "_id": 7, "title": "Violin Intermediate", "price": 95.5 },
                        { "_id": "c", "title": "Music Theory", "price": 60.0 }
                    ])),
                    CatalogStub::Bare => Json(json!([{ "_id": "a" }, { "_id": "b" }])),
                }
            })
            .post(counted(&writes, StatusCode::CREATED)),
        )
        .route(
            "/courses/{id}",
            get_route(|Path(id): Path<String>| async move {
                if id == "a" {
                    Ok(Json(piano()))
                } else {
                    Err(StatusCode::NOT_FOUND)
                }
            }),
        )
        .route(
            "/teachers",
            get_route(move || async move {
                match catalog {
                    CatalogStub::Full => Json(json!([
                        { "_id": "t1", "name": "Mira Sen", "instrument": "Piano" }
                    ])),
                    CatalogStub::Bare => Json(json!([{ "_id": "t1" }])),
                }
            }),
        )
        .route("/workshops", get_route(|| async { Json(json!([])) }))
        .route("/events", get_route(|| async { Json(json!([])) }))
        .route(
            "/me/enrollments",
            get_route(move |headers: HeaderMap| async move {
                if !has_bearer(&headers) {
                    return Err(StatusCode::UNAUTHORIZED);
                }
                match enrollments {
                    EnrollmentsStub::Enrolled => Ok(Json(json!([
                        { "enrollmentId": "e1", "courseId": "a" },
                        { "enrollmentId": "e2", "course": { "_id": 7 } }
                    ]))),
                    EnrollmentsStub::Failing => Err(StatusCode::INTERNAL_SERVER_ERROR),
                }
            }),
        )
        .route("/leads", post_route(counted(&writes, StatusCode::CREATED)))
        .route(
            "/contact",
            post_route(counted(&writes, StatusCode::INTERNAL_SERVER_ERROR)),
        )
        .route(
            "/consultations",
            post_route(counted(&writes, StatusCode::CREATED)),
        )
        .route(
            "/workshops/{id}/enroll",
            post_route({
                let writes = writes.clone();
                move |headers: HeaderMap, Json(_body): Json<Value>| async move {
                    if !has_bearer(&headers) {
                        return StatusCode::UNAUTHORIZED;
                    }
                    writes.fetch_add(1, Ordering::SeqCst);
                    StatusCode::CREATED
                }
            }),
        )
        .route(
            "/admin/resources",
            get_route(|| async { Json(json!([{ "_id": "r1", "title": "Scales PDF" }])) })
                .post(counted(&writes, StatusCode::CREATED)),
        )
        .route(
            "/admin/events/{id}",
            axum::routing::delete({
                let writes = writes.clone();
                move || async move {
                    writes.fetch_add(1, Ordering::SeqCst);
                    StatusCode::NO_CONTENT
                }
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub server");
    });
    addr
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// Sign an access token the way the identity provider would.
pub fn mint_token(sub: &str, email: Option<&str>, role: Option<&str>) -> String {
    let claims = json!({
        "sub": sub,
        "email": email,
        "role": role,
        "exp": chrono::Utc::now().timestamp() + 600,
    });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("token should encode")
}

pub fn student_token() -> String {
    mint_token("student-1", Some("student@school.com"), Some(ROLE_STUDENT))
}

pub fn admin_token() -> String {
    mint_token("admin-1", Some("staff@school.com"), Some(ROLE_ADMIN))
}

/// An account with no role claim whose email is on the admin list.
pub fn owner_token() -> String {
    mint_token("owner-1", Some(OWNER_EMAIL), None)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
