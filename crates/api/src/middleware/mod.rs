//! Authentication and authorization middleware extractors.
//!
//! - [`auth::MaybeViewer`] -- The signed-in viewer, if any. Never rejects.
//! - [`auth::AuthUser`] -- Requires a valid Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role or a configured admin email.

pub mod auth;
pub mod rbac;
