//! Form validation engine.
//!
//! Provides the per-field validators, the declarative rule tables for every
//! site and admin form, live phone formatting, and the touched/error state
//! machine that drives submission.

pub mod phone;
pub mod rules;
pub mod schema;
pub mod state;

pub use rules::FieldRule;
pub use schema::{FormKind, FormSchema};
pub use state::{FocusTarget, FormState, FormValues, SubmitOutcome};
