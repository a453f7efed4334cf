//! Formation record: a multi-year program of study within a department.

use serde::{Deserialize, Serialize};

/// One row of `formations`.
///
/// `department_id` must reference an existing department at save time; the
/// store enforces this, not the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formation {
    /// Store-assigned identity; `None` before the first save.
    pub formation_id: Option<i64>,
    pub name: String,
    /// Program length in years; positive by UI contract.
    pub duration_years: i64,
    /// Owning department reference key.
    pub department_id: i64,
}

impl Formation {
    /// Creates a not-yet-persisted formation under the given department.
    pub fn new(name: impl Into<String>, duration_years: i64, department_id: i64) -> Self {
        Self {
            formation_id: None,
            name: name.into(),
            duration_years,
            department_id,
        }
    }
}
