//! Touched/error state machine for a single form instance.
//!
//! Lifecycle: created empty, mutated on every change and blur, fully reset
//! after a successful submit or an explicit [`FormState::reset`]. A failed
//! submit keeps the values so the user can retry.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use std::future::Future;

use serde::Serialize;

use super::schema::{FormKind, FormSchema, BLOCKED_MESSAGE};

/// Field values handed to the submitter, keyed by field name.
pub type FormValues = BTreeMap<String, String>;

/// Where the page moves focus when a submit is blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FocusTarget {
    pub field: &'static str,
    pub behavior: &'static str,
    pub block: &'static str,
}

impl FocusTarget {
    fn field(field: &'static str) -> Self {
        Self {
            field,
            behavior: "smooth",
            block: "center",
        }
    }
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// At least one field is invalid; the submitter was not called.
    Blocked {
        message: &'static str,
        focus: FocusTarget,
    },
    /// A submit for this form is already running.
    InFlight,
    Submitted { message: &'static str },
    /// The submitter failed. Values are preserved.
    Failed { message: &'static str },
}

#[derive(Debug, Clone)]
pub struct FormState {
    schema: &'static FormSchema,
    values: BTreeMap<&'static str, String>,
    errors: BTreeMap<&'static str, String>,
    touched: BTreeSet<&'static str>,
    submitting: bool,
}

impl FormState {
    pub fn new(kind: FormKind) -> Self {
        Self {
            schema: kind.schema(),
            values: BTreeMap::new(),
            errors: BTreeMap::new(),
            touched: BTreeSet::new(),
            submitting: false,
        }
    }

    /// Build a form pre-filled with already-entered values.
    ///
    /// Values are stored as given (no live formatting). Keys without a rule
    /// in the schema are dropped.
    pub fn from_input<I, K, V>(kind: FormKind, input: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = Self::new(kind);
        for (key, value) in input {
            match form.schema.rule(key.as_ref()) {
                Some(rule) => {
                    form.values.insert(rule.field, value.into());
                }
                None => {
                    tracing::debug!(form = ?kind, field = key.as_ref(), "Ignoring unknown form field");
                }
            }
        }
        form
    }

    pub fn kind(&self) -> FormKind {
        self.schema.kind
    }

    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<&'static str, String> {
        &self.errors
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.touched.contains(field)
    }

    pub fn touched(&self) -> &BTreeSet<&'static str> {
        &self.touched
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// `true` when nothing has been entered, touched or flagged.
    pub fn is_pristine(&self) -> bool {
        self.values.values().all(String::is_empty)
            && self.errors.is_empty()
            && self.touched.is_empty()
    }

    /// Record new input for `field`.
    ///
    /// Phone-like fields are reformatted live. Any existing error on the
    /// field is cleared straight away; the value is only re-validated on
    /// blur or submit. Returns `false` for a field the form does not have.
    pub fn on_change(&mut self, field: &str, raw: &str) -> bool {
        let Some(rule) = self.schema.rule(field) else {
            return false;
        };
        self.values.insert(rule.field, rule.format(raw));
        self.errors.remove(rule.field);
        true
    }

    /// Mark `field` touched and validate it. Returns the field's error.
    pub fn on_blur(&mut self, field: &str) -> Option<&str> {
        let rule = self.schema.rule(field)?;
        self.touched.insert(rule.field);
        match rule.validate(self.value(rule.field)) {
            Some(msg) => {
                self.errors.insert(rule.field, msg);
            }
            None => {
                self.errors.remove(rule.field);
            }
        }
        self.error(rule.field)
    }

    /// Touch and validate every field.
    ///
    /// Returns the focus target for the first invalid field in schema
    /// order, or `None` when the whole form is valid.
    pub fn validate_all(&mut self) -> Option<FocusTarget> {
        let mut first_invalid = None;
        for rule in self.schema.rules {
            self.touched.insert(rule.field);
            match rule.validate(self.value(rule.field)) {
                Some(msg) => {
                    self.errors.insert(rule.field, msg);
                    first_invalid.get_or_insert(rule.field);
                }
                None => {
                    self.errors.remove(rule.field);
                }
            }
        }
        first_invalid.map(FocusTarget::field)
    }

    /// Submission payload: trimmed values, empty optional fields omitted.
    pub fn payload(&self) -> FormValues {
        self.schema
            .rules
            .iter()
            .filter_map(|rule| {
                let value = self.value(rule.field).trim();
                if value.is_empty() && !rule.required {
                    None
                } else {
                    Some((rule.field.to_string(), value.to_string()))
                }
            })
            .collect()
    }

    /// First half of a submit: validate and enter the submitting state.
    ///
    /// On success returns the payload for the submitter. The caller must
    /// pass the submitter's result to [`FormState::finish_submit`].
    pub fn begin_submit(&mut self) -> Result<FormValues, SubmitOutcome> {
        if self.submitting {
            return Err(SubmitOutcome::InFlight);
        }
        if let Some(focus) = self.validate_all() {
            tracing::debug!(
                form = ?self.kind(),
                invalid = self.errors.len(),
                focus = focus.field,
                "Form submit blocked by validation"
            );
            return Err(SubmitOutcome::Blocked {
                message: BLOCKED_MESSAGE,
                focus,
            });
        }
        self.submitting = true;
        Ok(self.payload())
    }

    /// Second half of a submit. Always leaves the submitting state.
    ///
    /// Success resets the form; failure is logged and the values kept.
    pub fn finish_submit<E: Display>(&mut self, result: Result<(), E>) -> SubmitOutcome {
        self.submitting = false;
        match result {
            Ok(()) => {
                tracing::info!(form = ?self.kind(), "Form submitted");
                self.reset();
                SubmitOutcome::Submitted {
                    message: self.schema.success_message,
                }
            }
            Err(e) => {
                tracing::warn!(form = ?self.kind(), error = %e, "Form submission failed");
                SubmitOutcome::Failed {
                    message: self.schema.failure_message,
                }
            }
        }
    }

    /// Validate and, when the form is clean, run `submitter` on the payload.
    pub async fn submit<F, Fut, E>(&mut self, submitter: F) -> SubmitOutcome
    where
        F: FnOnce(FormValues) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Display,
    {
        let payload = match self.begin_submit() {
            Ok(payload) => payload,
            Err(outcome) => return outcome,
        };
        let result = submitter(payload).await;
        self.finish_submit(result)
    }

    /// Clear values, errors, touched fields and the submitting flag.
    pub fn reset(&mut self) {
        self.values.clear();
        self.errors.clear();
        self.touched.clear();
        self.submitting = false;
    }
}
