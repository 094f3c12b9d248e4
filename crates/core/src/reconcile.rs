//! Enrollment reconciliation.
//!
//! Cross-references a signed-in viewer's enrollments with the catalog so
//! course cards can show "Continue Learning" instead of a price. This is a
//! best-effort enhancement: every failure degrades to "nothing enrolled" and
//! never blocks rendering the catalog itself.

use std::collections::HashSet;
use std::fmt::Display;

use async_trait::async_trait;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::catalog::{Course, Enrollment};
use crate::error::CoreError;
use crate::types::RecordId;

pub const LABEL_VIEW_DETAILS: &str = "View Details";
pub const LABEL_CONTINUE_LEARNING: &str = "Continue Learning";
pub const BADGE_ALREADY_ENROLLED: &str = "Already Enrolled";

/// Produces the viewer's bearer token. May fail or yield nothing.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn bearer_token(&self) -> Result<Option<String>, CoreError>;
}

/// Fetches the enrollments belonging to the holder of a bearer token.
#[async_trait]
pub trait EnrollmentSource: Send + Sync {
    type Error: Display + Send;

    async fn my_enrollments(&self, token: &str) -> Result<Vec<Enrollment>, Self::Error>;
}

/// Course ids the viewer is enrolled in. Always rebuilt from scratch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrolledIdSet {
    ids: HashSet<String>,
}

impl EnrolledIdSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Collect `course._id` (or `courseId`) of every enrollment as strings.
    /// Entries with neither are skipped.
    pub fn from_enrollments<'a, I>(enrollments: I) -> Self
    where
        I: IntoIterator<Item = &'a Enrollment>,
    {
        Self {
            ids: enrollments
                .into_iter()
                .filter_map(Enrollment::course_key)
                .collect(),
        }
    }

    /// Membership for a catalog id.
    ///
    /// Text and numeric ids share a canonical key, so `"7"` and `7` match
    /// each other.
    pub fn contains(&self, id: &RecordId) -> bool {
        self.ids.contains(&id.as_key())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Compute the viewer's enrolled set.
///
/// Returns the empty set when the viewer is signed out, when no token can
/// be obtained, when the enrollment fetch fails, or when `cancel` fires
/// before the fetch completes.
pub async fn reconcile_enrollments<T, S>(
    signed_in: bool,
    tokens: &T,
    source: &S,
    cancel: &CancellationToken,
) -> EnrolledIdSet
where
    T: TokenProvider + ?Sized,
    S: EnrollmentSource + ?Sized,
{
    if !signed_in {
        return EnrolledIdSet::empty();
    }

    let token = match tokens.bearer_token().await {
        Ok(Some(token)) if !token.trim().is_empty() => token,
        Ok(_) => {
            tracing::debug!("No bearer token available, skipping enrollment reconciliation");
            return EnrolledIdSet::empty();
        }
        Err(e) => {
            tracing::debug!(error = %e, "Token retrieval failed, skipping enrollment reconciliation");
            return EnrolledIdSet::empty();
        }
    };

    let fetched = tokio::select! {
        () = cancel.cancelled() => {
            tracing::debug!("Enrollment reconciliation cancelled");
            return EnrolledIdSet::empty();
        }
        result = source.my_enrollments(&token) => result,
    };

    match fetched {
        Ok(enrollments) => {
            let set = EnrolledIdSet::from_enrollments(&enrollments);
            tracing::debug!(
                enrollments = enrollments.len(),
                enrolled_courses = set.len(),
                "Enrollments reconciled"
            );
            set
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch enrollments, treating as none");
            EnrolledIdSet::empty()
        }
    }
}

/// A catalog course decorated for the viewer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseCard {
    pub course: Course,
    pub enrolled: bool,
    /// Price to display; `None` once the viewer is enrolled.
    pub display_price: Option<f64>,
    pub action_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<&'static str>,
}

impl CourseCard {
    pub fn new(course: Course, enrolled: &EnrolledIdSet) -> Self {
        let is_enrolled = enrolled.contains(&course.id);
        let (display_price, action_label, badge) = if is_enrolled {
            (None, LABEL_CONTINUE_LEARNING, Some(BADGE_ALREADY_ENROLLED))
        } else {
            (course.price, LABEL_VIEW_DETAILS, None)
        };
        Self {
            course,
            enrolled: is_enrolled,
            display_price,
            action_label,
            badge,
        }
    }
}

/// Decorate every course in catalog order.
pub fn course_cards(courses: Vec<Course>, enrolled: &EnrolledIdSet) -> Vec<CourseCard> {
    courses
        .into_iter()
        .map(|course| CourseCard::new(course, enrolled))
        .collect()
}
