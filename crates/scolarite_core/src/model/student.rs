//! Student record keyed by a caller-supplied institutional id.

use serde::{Deserialize, Serialize};

/// One row of `students`.
///
/// `student_id` is the identity key itself (e.g. "S1001"), not a surrogate.
/// It is caller-supplied and never regenerated by the store; saving twice
/// with the same id updates the existing row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
}

impl Student {
    pub fn new(
        student_id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}
