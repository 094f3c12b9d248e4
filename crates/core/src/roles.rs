//! Well-known role claim values.
//!
//! These must match the roles the identity provider puts in the `role`
//! claim of its access tokens.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_STUDENT: &str = "student";
