//! Request handlers.
//!
//! Handlers delegate to the upstream API through [`cadenza_client`] and to
//! the domain logic in [`cadenza_core`], mapping errors via
//! [`crate::error::AppError`].

pub mod admin;
pub mod catalog;
pub mod forms;
