use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An append-only record of one task completion within a session.
///
/// Completion sets are cleared whenever the destination changes, but points
/// are not. The history keeps the trail that explains the running total:
/// the session's points always equal the sum of `points` over its history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletionEntry {
    pub destination_id: u32,
    pub task_id: u32,
    /// Points awarded, copied from the task at completion time.
    pub points: u32,
    pub completed_at: DateTime<Utc>,
}
