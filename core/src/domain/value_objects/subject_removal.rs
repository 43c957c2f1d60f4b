//! Outcome of removing a subject together with its dependent records.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Counts of rows removed in one subject deletion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRemoval {
    pub subject_id: Uuid,
    pub sessions_removed: u64,
    pub codes_removed: u64,
}
