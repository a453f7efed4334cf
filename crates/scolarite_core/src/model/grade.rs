//! Grade record: a score for one subject within one enrollment.

use serde::{Deserialize, Serialize};

/// One row of `grades`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    /// Store-assigned identity; `None` before the first save.
    pub grade_id: Option<i64>,
    /// Graded enrollment reference key.
    pub enrollment_id: i64,
    /// Graded subject reference key.
    pub subject_id: i64,
    /// Awarded score; `None` while the result is pending.
    pub grade: Option<f64>,
}

impl Grade {
    /// Creates a not-yet-persisted grade.
    pub fn new(enrollment_id: i64, subject_id: i64, grade: Option<f64>) -> Self {
        Self {
            grade_id: None,
            enrollment_id,
            subject_id,
            grade,
        }
    }
}
