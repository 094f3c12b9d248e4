//! Authentication primitives.
//!
//! - [`jwt`] -- verification of identity-provider access tokens.

pub mod jwt;
