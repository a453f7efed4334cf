//! Enrollment record linking one student to one formation.

use serde::{Deserialize, Serialize};

/// One row of `enrollments`.
///
/// The `(student_id, formation_id)` pair is unique: a student enrolls in a
/// given formation at most once. After creation only `enrollment_year` is
/// written back by the repository; the identity pair is immutable by
/// convention, not by constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    /// Store-assigned identity; `None` before the first save.
    pub enrollment_id: Option<i64>,
    /// Enrolled student reference key.
    pub student_id: String,
    /// Target formation reference key.
    pub formation_id: i64,
    /// Starting year of the enrollment (e.g. 2023).
    pub enrollment_year: i64,
}

impl Enrollment {
    /// Creates a not-yet-persisted enrollment.
    pub fn new(student_id: impl Into<String>, formation_id: i64, enrollment_year: i64) -> Self {
        Self {
            enrollment_id: None,
            student_id: student_id.into(),
            formation_id,
            enrollment_year,
        }
    }
}
