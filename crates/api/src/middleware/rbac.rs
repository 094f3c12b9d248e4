//! Role-based access control (RBAC) extractors.
//!
//! Admin access comes from an explicit `role` claim. The configured
//! `ADMIN_EMAILS` list is honoured as well so accounts whose provider
//! profile has no role claim can still be promoted.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use cadenza_core::error::CoreError;
use cadenza_core::roles::ROLE_ADMIN;

use super::auth::AuthUser;
use crate::config::ServerConfig;
use crate::error::AppError;
use crate::state::AppState;

/// Requires admin access. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

/// Whether `user` may use the admin console.
pub fn is_admin(user: &AuthUser, config: &ServerConfig) -> bool {
    user.role.as_deref() == Some(ROLE_ADMIN)
        || user
            .email
            .as_deref()
            .is_some_and(|email| config.is_admin_email(email))
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !is_admin(&user, &state.config) {
            tracing::warn!(user_id = %user.user_id, "Admin access denied");
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin access required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}
