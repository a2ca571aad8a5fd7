use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::destination::Destination;
use super::eco_task::EcoTask;

/// Read-only projection of a session, rebuilt after every state change.
///
/// This is everything a presentation layer needs to draw the screen: the
/// header (points), the search box, and either the destination grid or the
/// rule checklist of the selected destination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionView {
    pub session_id: Uuid,
    pub points: u32,
    pub filter_text: String,
    /// Destinations matching `filter_text`, in catalog order.
    pub destinations: Vec<Destination>,
    pub selected: Option<Destination>,
    /// Rules for the selected destination. Empty when nothing is selected.
    pub rules: Vec<RuleView>,
    /// Present only while the transient feedback flag is active and a
    /// destination is selected.
    pub feedback: Option<FeedbackView>,
    /// Total completions over the whole session, across destinations.
    pub completions: usize,
}

/// An eco task together with its completion status for the current
/// destination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleView {
    #[serde(flatten)]
    pub task: EcoTask,
    pub completed: bool,
}

/// The "+N Coins!" banner shown right after a completion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedbackView {
    pub points_awarded: u32,
    pub message: String,
}

impl FeedbackView {
    pub fn for_award(points_awarded: u32) -> Self {
        Self {
            points_awarded,
            message: format!("+{} Coins!", points_awarded),
        }
    }
}

/// Body of `PUT /session/filter`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetFilterInput {
    pub text: String,
}

/// Body of `PUT /session/destination`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectDestinationInput {
    pub destination_id: u32,
}

/// Query string of `GET /destinations`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DestinationQuery {
    /// Search text; omitted means no filtering.
    #[serde(default)]
    pub q: Option<String>,
}
