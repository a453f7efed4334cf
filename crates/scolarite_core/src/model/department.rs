//! Department record: a named organizational unit owning formations.

use serde::{Deserialize, Serialize};

/// One row of `departments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Store-assigned identity; `None` before the first save.
    pub department_id: Option<i64>,
    /// Unique display name.
    pub name: String,
}

impl Department {
    /// Creates a not-yet-persisted department.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            department_id: None,
            name: name.into(),
        }
    }
}
