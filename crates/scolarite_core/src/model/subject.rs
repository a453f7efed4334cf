//! Subject record: a credit-bearing course within a formation year.

use serde::{Deserialize, Serialize};

/// One row of `subjects`.
///
/// `year` ranges over 1..duration_years of the owning formation by UI
/// contract; the store does not enforce that range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Store-assigned identity; `None` before the first save.
    pub subject_id: Option<i64>,
    pub name: String,
    pub credits: i64,
    /// Year of study within the owning formation.
    pub year: i64,
    /// Owning formation reference key.
    pub formation_id: i64,
}

impl Subject {
    /// Creates a not-yet-persisted subject within the given formation.
    pub fn new(name: impl Into<String>, credits: i64, year: i64, formation_id: i64) -> Self {
        Self {
            subject_id: None,
            name: name.into(),
            credits,
            year,
            formation_id,
        }
    }
}
