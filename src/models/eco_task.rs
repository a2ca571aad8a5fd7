use serde::{Deserialize, Serialize};

/// A checklist item ("eco rule") that awards points when completed.
///
/// The same task list applies to every destination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EcoTask {
    pub id: u32,
    /// The rule text shown to the user.
    pub description: String,
    /// Reward for completing the task. Always positive.
    pub points: u32,
}
