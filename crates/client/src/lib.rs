//! Client for the school's upstream REST API.
//!
//! Typed wrappers over the catalog, enrollment, lead-capture and admin
//! endpoints, built on [`reqwest`]. Every request can be abandoned through a
//! [`tokio_util::sync::CancellationToken`].

pub mod api;

pub use api::{admin_path, ApiClientError, UpstreamApi};
