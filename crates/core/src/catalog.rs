//! Catalog and enrollment records as returned by the upstream API.
//!
//! Only the fields the site reasons about are typed. Everything else is
//! kept in a flattened `extra` map so records pass through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::forms::FormKind;
use crate::types::RecordId;

/// A course in the public catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A teacher profile shown on the home page and the teachers page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrument: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of the signed-in viewer's enrollment list.
///
/// Depending on the endpoint the course is either embedded (`course._id`)
/// or referenced (`courseId`). Use [`Enrollment::course_key`] instead of
/// reading either field directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    #[serde(rename = "enrollmentId", default, skip_serializing_if = "Option::is_none")]
    pub enrollment_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<EnrolledCourse>,
    #[serde(rename = "courseId", default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<RecordId>,
}

/// The embedded course of an [`Enrollment`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrolledCourse {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Enrollment {
    /// Enrollment referencing a course by `courseId` only.
    pub fn for_course_id(course_id: impl Into<RecordId>) -> Self {
        Self {
            enrollment_id: None,
            course: None,
            course_id: Some(course_id.into()),
        }
    }

    /// The enrolled course id: `course._id` when present, else `courseId`.
    pub fn course_key(&self) -> Option<String> {
        self.course
            .as_ref()
            .and_then(|c| c.id.as_ref())
            .or(self.course_id.as_ref())
            .map(RecordId::as_key)
    }
}

/// Collections the admin console manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminCollection {
    Courses,
    Teachers,
    Schedules,
    Resources,
    Workshops,
    Events,
    Enrollments,
}

impl AdminCollection {
    pub const ALL: [AdminCollection; 7] = [
        AdminCollection::Courses,
        AdminCollection::Teachers,
        AdminCollection::Schedules,
        AdminCollection::Resources,
        AdminCollection::Workshops,
        AdminCollection::Events,
        AdminCollection::Enrollments,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AdminCollection::Courses => "courses",
            AdminCollection::Teachers => "teachers",
            AdminCollection::Schedules => "schedules",
            AdminCollection::Resources => "resources",
            AdminCollection::Workshops => "workshops",
            AdminCollection::Events => "events",
            AdminCollection::Enrollments => "enrollments",
        }
    }

    /// Parse a URL path segment such as `"resources"`.
    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == segment)
    }

    /// The form whose rules gate creates and updates, if the console has one.
    pub fn form_kind(self) -> Option<FormKind> {
        match self {
            AdminCollection::Resources => Some(FormKind::Resource),
            AdminCollection::Workshops => Some(FormKind::Workshop),
            AdminCollection::Events => Some(FormKind::Event),
            AdminCollection::Enrollments => Some(FormKind::ManualEnrollment),
            AdminCollection::Courses | AdminCollection::Teachers | AdminCollection::Schedules => {
                None
            }
        }
    }
}
