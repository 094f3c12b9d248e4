//! Cadenza domain logic.
//!
//! Pure logic shared by the site backend: catalog and enrollment types,
//! declarative form validation with its touched/error state machine, and
//! enrollment reconciliation. Nothing in this crate performs HTTP.

pub mod catalog;
pub mod error;
pub mod forms;
pub mod reconcile;
pub mod roles;
pub mod types;
