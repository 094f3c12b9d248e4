//! REST client for the upstream school API.
//!
//! Wraps the catalog (`/courses`, `/teachers`, ...), the viewer's
//! enrollments, lead capture (`/leads`, `/contact`, `/consultations`) and
//! the admin collections using [`reqwest`]. Authenticated calls attach
//! `Authorization: Bearer <token>`.

use std::time::Duration;

use async_trait::async_trait;
use cadenza_core::catalog::{AdminCollection, Course, Enrollment, Teacher};
use cadenza_core::forms::FormValues;
use cadenza_core::reconcile::EnrollmentSource;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// HTTP client for the upstream API.
///
/// Cheap to clone: the inner [`reqwest::Client`] shares its connection pool.
#[derive(Debug, Clone)]
pub struct UpstreamApi {
    client: reqwest::Client,
    base_url: String,
    cancel: CancellationToken,
}

/// Errors from the upstream REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The upstream API returned a non-2xx status code.
    #[error("Upstream API error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response body was not the JSON we expected.
    #[error("Invalid upstream response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The request was abandoned through its cancellation token.
    #[error("Request cancelled")]
    Cancelled,
}

impl ApiClientError {
    /// HTTP status returned by upstream, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiClientError::Status { status, .. } => Some(*status),
            ApiClientError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Upstream path for an admin collection, optionally for one record.
///
/// Courses and teachers live at the top level; everything else under
/// `/admin`.
pub fn admin_path(collection: AdminCollection, id: Option<&str>) -> String {
    let base = match collection {
        AdminCollection::Courses | AdminCollection::Teachers => {
            format!("/{}", collection.as_str())
        }
        _ => format!("/admin/{}", collection.as_str()),
    };
    match id {
        Some(id) => format!("{base}/{id}"),
        None => base,
    }
}

impl UpstreamApi {
    /// Create a client with its own connection pool.
    ///
    /// * `base_url` - e.g. `https://api.example-school.com/api`.
    /// * `timeout` - per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// A handle whose requests are abandoned once `cancel` fires.
    pub fn with_cancellation(&self, cancel: CancellationToken) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            cancel,
        }
    }

    // ---- generic helpers ----

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<T, ApiClientError> {
        let response = self.send(self.client.get(self.url(path)), token).await?;
        Self::parse_response(response).await
    }

    pub async fn post<B, T>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, ApiClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(self.client.post(self.url(path)).json(body), token)
            .await?;
        Self::parse_response(response).await
    }

    pub async fn put<B, T>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, ApiClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(self.client.put(self.url(path)).json(body), token)
            .await?;
        Self::parse_response(response).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<(), ApiClientError> {
        let response = self.send(self.client.delete(self.url(path)), token).await?;
        Self::check_status(response).await
    }

    // ---- catalog ----

    pub async fn list_courses(&self) -> Result<Vec<Course>, ApiClientError> {
        self.get("/courses", None).await
    }

    pub async fn get_course(&self, id: &str) -> Result<Course, ApiClientError> {
        self.get(&format!("/courses/{id}"), None).await
    }

    pub async fn list_teachers(&self) -> Result<Vec<Teacher>, ApiClientError> {
        self.get("/teachers", None).await
    }

    pub async fn list_workshops(&self) -> Result<Vec<Value>, ApiClientError> {
        self.get("/workshops", None).await
    }

    pub async fn list_events(&self) -> Result<Vec<Value>, ApiClientError> {
        self.get("/events", None).await
    }

    /// `GET /me/enrollments` for the holder of `token`. Single page.
    pub async fn fetch_my_enrollments(
        &self,
        token: &str,
    ) -> Result<Vec<Enrollment>, ApiClientError> {
        self.get("/me/enrollments", Some(token)).await
    }

    // ---- lead capture ----

    /// `POST` a validated form payload, ignoring the response body.
    pub async fn submit_form(
        &self,
        path: &str,
        payload: &FormValues,
        token: Option<&str>,
    ) -> Result<(), ApiClientError> {
        let response = self
            .send(self.client.post(self.url(path)).json(payload), token)
            .await?;
        Self::check_status(response).await
    }

    pub async fn submit_lead(&self, payload: &FormValues) -> Result<(), ApiClientError> {
        self.submit_form("/leads", payload, None).await
    }

    pub async fn submit_contact(&self, payload: &FormValues) -> Result<(), ApiClientError> {
        self.submit_form("/contact", payload, None).await
    }

    pub async fn submit_consultation(&self, payload: &FormValues) -> Result<(), ApiClientError> {
        self.submit_form("/consultations", payload, None).await
    }

    pub async fn enroll_in_workshop(
        &self,
        workshop_id: &str,
        payload: &FormValues,
        token: &str,
    ) -> Result<(), ApiClientError> {
        self.submit_form(
            &format!("/workshops/{workshop_id}/enroll"),
            payload,
            Some(token),
        )
        .await
    }

    // ---- admin ----

    pub async fn admin_list(
        &self,
        collection: AdminCollection,
        token: &str,
    ) -> Result<Value, ApiClientError> {
        let response = self
            .send(self.client.get(self.url(&admin_path(collection, None))), Some(token))
            .await?;
        Self::parse_json_or_null(response).await
    }

    pub async fn admin_get(
        &self,
        collection: AdminCollection,
        id: &str,
        token: &str,
    ) -> Result<Value, ApiClientError> {
        let response = self
            .send(
                self.client.get(self.url(&admin_path(collection, Some(id)))),
                Some(token),
            )
            .await?;
        Self::parse_json_or_null(response).await
    }

    pub async fn admin_create<B: Serialize + ?Sized>(
        &self,
        collection: AdminCollection,
        body: &B,
        token: &str,
    ) -> Result<Value, ApiClientError> {
        let response = self
            .send(
                self.client
                    .post(self.url(&admin_path(collection, None)))
                    .json(body),
                Some(token),
            )
            .await?;
        Self::parse_json_or_null(response).await
    }

    pub async fn admin_update<B: Serialize + ?Sized>(
        &self,
        collection: AdminCollection,
        id: &str,
        body: &B,
        token: &str,
    ) -> Result<Value, ApiClientError> {
        let response = self
            .send(
                self.client
                    .put(self.url(&admin_path(collection, Some(id))))
                    .json(body),
                Some(token),
            )
            .await?;
        Self::parse_json_or_null(response).await
    }

    pub async fn admin_delete(
        &self,
        collection: AdminCollection,
        id: &str,
        token: &str,
    ) -> Result<(), ApiClientError> {
        self.delete(&admin_path(collection, Some(id)), Some(token))
            .await
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer token and send, racing the cancellation token.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        token: Option<&str>,
    ) -> Result<reqwest::Response, ApiClientError> {
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(ApiClientError::Cancelled),
            result = request.send() => Ok(result?),
        }
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`ApiClientError::Status`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ApiClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::debug!(status = status.as_u16(), %body, "Upstream returned an error status");
            return Err(ApiClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiClientError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Like [`Self::parse_response`] but an empty body becomes `null`.
    async fn parse_json_or_null(response: reqwest::Response) -> Result<Value, ApiClientError> {
        let response = Self::ensure_success(response).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), ApiClientError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl EnrollmentSource for UpstreamApi {
    type Error = ApiClientError;

    async fn my_enrollments(&self, token: &str) -> Result<Vec<Enrollment>, Self::Error> {
        self.fetch_my_enrollments(token).await
    }
}
