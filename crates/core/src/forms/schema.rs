//! Rule tables for every form on the site and in the admin console.
//!
//! Field order matters: the first invalid field in table order receives
//! focus when a submit is blocked.

use serde::{Deserialize, Serialize};

use super::rules::{
    optional_phone, required_phone, validate_capacity, validate_country, validate_course_selection,
    validate_date, validate_email, validate_enrollment_status, validate_full_name,
    validate_location, validate_message, validate_price, validate_resource_type,
    validate_resource_url, validate_subject, validate_time, validate_title, FieldRule,
};

/// Which form a [`FormSchema`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    /// Course enrollment lead from the catalog.
    Enrollment,
    Contact,
    Consultation,
    WorkshopEnrollment,
    /// Admin console: enroll a student by hand.
    ManualEnrollment,
    Resource,
    Workshop,
    Event,
}

/// A declarative rule table plus the messages shown after submit.
#[derive(Debug)]
pub struct FormSchema {
    pub kind: FormKind,
    pub rules: &'static [FieldRule],
    pub success_message: &'static str,
    pub failure_message: &'static str,
}

/// Aggregate message shown when a submit is blocked by field errors.
pub const BLOCKED_MESSAGE: &str = "Please fix the errors in the form before submitting";

impl FormSchema {
    pub fn rule(&self, field: &str) -> Option<&FieldRule> {
        self.rules.iter().find(|r| r.field == field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.field)
    }
}

impl FormKind {
    pub const ALL: [FormKind; 8] = [
        FormKind::Enrollment,
        FormKind::Contact,
        FormKind::Consultation,
        FormKind::WorkshopEnrollment,
        FormKind::ManualEnrollment,
        FormKind::Resource,
        FormKind::Workshop,
        FormKind::Event,
    ];

    pub fn schema(self) -> &'static FormSchema {
        match self {
            FormKind::Enrollment => &ENROLLMENT,
            FormKind::Contact => &CONTACT,
            FormKind::Consultation => &CONSULTATION,
            FormKind::WorkshopEnrollment => &WORKSHOP_ENROLLMENT,
            FormKind::ManualEnrollment => &MANUAL_ENROLLMENT,
            FormKind::Resource => &RESOURCE,
            FormKind::Workshop => &WORKSHOP,
            FormKind::Event => &EVENT,
        }
    }
}

static ENROLLMENT: FormSchema = FormSchema {
    kind: FormKind::Enrollment,
    rules: &[
        FieldRule::required("full_name", validate_full_name),
        FieldRule::required("email", validate_email),
        optional_phone("phone"),
        FieldRule::optional("country", validate_country),
        FieldRule::required("course_id", validate_course_selection),
    ],
    success_message: "Thank you! We have received your enrollment request and will contact you soon.",
    failure_message: "We could not submit your enrollment request. Please try again.",
};

static CONTACT: FormSchema = FormSchema {
    kind: FormKind::Contact,
    rules: &[
        FieldRule::required("full_name", validate_full_name),
        FieldRule::required("email", validate_email),
        optional_phone("phone"),
        FieldRule::required("subject", validate_subject),
        FieldRule::required("message", validate_message),
    ],
    success_message: "Your message has been sent. We will get back to you shortly.",
    failure_message: "We could not send your message. Please try again.",
};

static CONSULTATION: FormSchema = FormSchema {
    kind: FormKind::Consultation,
    rules: &[
        FieldRule::required("full_name", validate_full_name),
        FieldRule::required("email", validate_email),
        required_phone("phone"),
        FieldRule::required("preferred_date", validate_date),
        FieldRule::required("preferred_time", validate_time),
    ],
    success_message: "Your free consultation is booked. See you soon!",
    failure_message: "We could not book your consultation. Please try again.",
};

static WORKSHOP_ENROLLMENT: FormSchema = FormSchema {
    kind: FormKind::WorkshopEnrollment,
    rules: &[
        FieldRule::required("full_name", validate_full_name),
        FieldRule::required("email", validate_email),
        required_phone("phone"),
    ],
    success_message: "You are enrolled in the workshop!",
    failure_message: "We could not complete your workshop enrollment. Please try again.",
};

static MANUAL_ENROLLMENT: FormSchema = FormSchema {
    kind: FormKind::ManualEnrollment,
    rules: &[
        FieldRule::required("full_name", validate_full_name),
        FieldRule::required("email", validate_email),
        optional_phone("phone"),
        FieldRule::required("course_id", validate_course_selection),
        FieldRule::required("status", validate_enrollment_status),
    ],
    success_message: "Enrollment saved.",
    failure_message: "Failed to save enrollment.",
};

static RESOURCE: FormSchema = FormSchema {
    kind: FormKind::Resource,
    rules: &[
        FieldRule::required("title", validate_title),
        FieldRule::required("course_id", validate_course_selection),
        FieldRule::required("resource_type", validate_resource_type),
        FieldRule::required("url", validate_resource_url),
    ],
    success_message: "Resource saved.",
    failure_message: "Failed to save resource.",
};

static WORKSHOP: FormSchema = FormSchema {
    kind: FormKind::Workshop,
    rules: &[
        FieldRule::required("title", validate_title),
        FieldRule::required("date", validate_date),
        FieldRule::required("time", validate_time),
        FieldRule::optional("capacity", validate_capacity),
        FieldRule::optional("price", validate_price),
    ],
    success_message: "Workshop saved.",
    failure_message: "Failed to save workshop.",
};

static EVENT: FormSchema = FormSchema {
    kind: FormKind::Event,
    rules: &[
        FieldRule::required("title", validate_title),
        FieldRule::required("date", validate_date),
        FieldRule::required("time", validate_time),
        FieldRule::required("location", validate_location),
    ],
    success_message: "Event saved.",
    failure_message: "Failed to save event.",
};
