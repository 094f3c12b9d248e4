//! Field validators and the [`FieldRule`] type.
//!
//! Every validator takes the raw input and returns `None` when the value is
//! acceptable or `Some(message)` with a message fit to show next to the
//! field. Validators never fail or panic.

use std::sync::LazyLock;

use regex::Regex;

use super::phone::format_phone_input;

/// Letters, whitespace, apostrophes and hyphens.
pub const FULL_NAME_PATTERN: &str = r"^[a-zA-Z\s'-]+$";

/// Something `@` something `.` something, no whitespace.
pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// 10 to 15 ASCII digits.
pub const PHONE_DIGITS_PATTERN: &str = r"^[0-9]{10,15}$";

pub const FULL_NAME_MIN_CHARS: usize = 2;
pub const FULL_NAME_MAX_CHARS: usize = 100;
pub const COUNTRY_MIN_CHARS: usize = 2;
pub const SUBJECT_MIN_CHARS: usize = 3;
pub const MESSAGE_MIN_CHARS: usize = 10;
pub const TITLE_MIN_CHARS: usize = 3;

/// Statuses an admin may assign to a manual enrollment.
pub const ENROLLMENT_STATUSES: &[&str] = &["pending", "approved", "rejected"];

static FULL_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(FULL_NAME_PATTERN).expect("valid regex"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid regex"));
static PHONE_DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PHONE_DIGITS_PATTERN).expect("valid regex"));

/// Validator signature shared by every rule.
pub type Validator = fn(&str) -> Option<String>;

/// Live input formatter applied on every change.
pub type Formatter = fn(&str) -> String;

/// A named validator for one form field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub required: bool,
    validator: Validator,
    formatter: Option<Formatter>,
}

impl FieldRule {
    pub const fn required(field: &'static str, validator: Validator) -> Self {
        Self {
            field,
            required: true,
            validator,
            formatter: None,
        }
    }

    pub const fn optional(field: &'static str, validator: Validator) -> Self {
        Self {
            field,
            required: false,
            validator,
            formatter: None,
        }
    }

    /// Attach a live formatter (phone-like fields).
    pub const fn formatted(self, formatter: Formatter) -> Self {
        Self {
            formatter: Some(formatter),
            ..self
        }
    }

    pub fn validate(&self, raw: &str) -> Option<String> {
        (self.validator)(raw)
    }

    /// Apply the live formatter, if any.
    pub fn format(&self, raw: &str) -> String {
        match self.formatter {
            Some(f) => f(raw),
            None => raw.to_string(),
        }
    }
}

/// Optional phone rule with live formatting.
pub const fn optional_phone(field: &'static str) -> FieldRule {
    FieldRule::optional(field, validate_optional_phone).formatted(format_phone_input)
}

/// Required phone rule with live formatting.
pub const fn required_phone(field: &'static str) -> FieldRule {
    FieldRule::required(field, validate_required_phone).formatted(format_phone_input)
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn required_min_chars(raw: &str, label: &str, min: usize) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Some(format!("{label} is required"));
    }
    if char_len(value) < min {
        return Some(format!("{label} must be at least {min} characters"));
    }
    None
}

fn required_selection(raw: &str, message: &str) -> Option<String> {
    if raw.trim().is_empty() {
        Some(message.to_string())
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Contact details
// ---------------------------------------------------------------------------

pub fn validate_full_name(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Some("Full name is required".to_string());
    }
    let len = char_len(value);
    if len < FULL_NAME_MIN_CHARS {
        return Some(format!(
            "Full name must be at least {FULL_NAME_MIN_CHARS} characters"
        ));
    }
    if len > FULL_NAME_MAX_CHARS {
        return Some(format!(
            "Full name must be at most {FULL_NAME_MAX_CHARS} characters"
        ));
    }
    if !FULL_NAME_RE.is_match(value) {
        return Some(
            "Full name can only contain letters, spaces, hyphens and apostrophes".to_string(),
        );
    }
    None
}

pub fn validate_email(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Some("Email is required".to_string());
    }
    if !EMAIL_RE.is_match(value) {
        return Some("Please enter a valid email address".to_string());
    }
    None
}

/// Shared digit check. Spaces, hyphens and `+` are ignored.
fn phone_digits_error(raw: &str) -> Option<String> {
    let digits: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '+')
        .collect();
    if PHONE_DIGITS_RE.is_match(&digits) {
        None
    } else {
        Some("Please enter a valid phone number (10-15 digits)".to_string())
    }
}

/// Phone/WhatsApp where the field may be left empty.
pub fn validate_optional_phone(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }
    phone_digits_error(raw)
}

/// Phone where a number must be given (consultation, workshop enrollment).
pub fn validate_required_phone(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        return Some("Phone number is required".to_string());
    }
    phone_digits_error(raw)
}

pub fn validate_country(raw: &str) -> Option<String> {
    let value = raw.trim();
    if !value.is_empty() && char_len(value) < COUNTRY_MIN_CHARS {
        return Some(format!(
            "Country must be at least {COUNTRY_MIN_CHARS} characters"
        ));
    }
    None
}

// ---------------------------------------------------------------------------
// Contact form
// ---------------------------------------------------------------------------

pub fn validate_subject(raw: &str) -> Option<String> {
    required_min_chars(raw, "Subject", SUBJECT_MIN_CHARS)
}

pub fn validate_message(raw: &str) -> Option<String> {
    required_min_chars(raw, "Message", MESSAGE_MIN_CHARS)
}

// ---------------------------------------------------------------------------
// Selects
// ---------------------------------------------------------------------------

pub fn validate_course_selection(raw: &str) -> Option<String> {
    required_selection(raw, "Please select a course")
}

pub fn validate_date(raw: &str) -> Option<String> {
    required_selection(raw, "Please select a date")
}

pub fn validate_time(raw: &str) -> Option<String> {
    required_selection(raw, "Please select a time")
}

// ---------------------------------------------------------------------------
// Admin forms
// ---------------------------------------------------------------------------

pub fn validate_title(raw: &str) -> Option<String> {
    required_min_chars(raw, "Title", TITLE_MIN_CHARS)
}

pub fn validate_resource_type(raw: &str) -> Option<String> {
    required_selection(raw, "Please select a resource type")
}

pub fn validate_resource_url(raw: &str) -> Option<String> {
    required_selection(raw, "Resource link is required")
}

pub fn validate_location(raw: &str) -> Option<String> {
    required_selection(raw, "Location is required")
}

pub fn validate_capacity(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    match value.parse::<u32>() {
        Ok(n) if n > 0 => None,
        _ => Some("Capacity must be a positive whole number".to_string()),
    }
}

pub fn validate_price(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => None,
        _ => Some("Price must be a non-negative number".to_string()),
    }
}

pub fn validate_enrollment_status(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Some("Please select a status".to_string());
    }
    if !ENROLLMENT_STATUSES.contains(&value) {
        return Some(format!(
            "Status must be one of: {}",
            ENROLLMENT_STATUSES.join(", ")
        ));
    }
    None
}
