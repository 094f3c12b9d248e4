//! Bearer-token extractors for Axum handlers.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use cadenza_core::error::CoreError;
use cadenza_core::reconcile::TokenProvider;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a Bearer token in the `Authorization` header.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The identity provider's user id (from `claims.sub`).
    pub user_id: String,
    pub email: Option<String>,
    pub role: Option<String>,
    /// The raw token, forwarded to the upstream API.
    pub token: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
            token: token.to_string(),
        })
    }
}

/// The signed-in viewer on public pages, or `None`.
///
/// A missing, malformed or expired token degrades to an anonymous viewer
/// instead of rejecting the request: public pages always render.
#[derive(Debug, Clone)]
pub struct MaybeViewer(pub Option<AuthUser>);

impl MaybeViewer {
    pub fn is_signed_in(&self) -> bool {
        self.0.is_some()
    }
}

impl FromRequestParts<AppState> for MaybeViewer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key("authorization") {
            return Ok(MaybeViewer(None));
        }
        match AuthUser::from_request_parts(parts, state).await {
            Ok(user) => Ok(MaybeViewer(Some(user))),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unusable viewer token");
                Ok(MaybeViewer(None))
            }
        }
    }
}

#[async_trait]
impl TokenProvider for MaybeViewer {
    async fn bearer_token(&self) -> Result<Option<String>, CoreError> {
        Ok(self.0.as_ref().map(|user| user.token.clone()))
    }
}
