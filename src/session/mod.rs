//! Session state machine.
//!
//! A [`SessionState`] is an immutable snapshot. Every user action goes through
//! [`SessionState::apply`], which returns a brand new snapshot plus an optional
//! [`Effect`] for the runtime to carry out. The reducer is handed the current
//! time and never arms timers itself, so it can be exercised without a runtime
//! or a UI.

mod store;

pub use store::SessionStore;

use std::collections::BTreeSet;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::error::{CatalogKind, SessionError};
use crate::models::{CompletionEntry, FeedbackView, RuleView, SessionView};

/// How long the "+N Coins!" feedback stays up unless configured otherwise.
pub const DEFAULT_FEEDBACK_WINDOW: Duration = Duration::from_millis(1000);

/// A user (or timer) input to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Replace the search text.
    SetFilterText(String),
    /// Open the rule checklist of a destination. Clears completions.
    SelectDestination(u32),
    /// Go back to the destination grid. Clears completions.
    ClearSelection,
    /// Mark an eco task done for the selected destination.
    CompleteTask(u32),
    /// The feedback window armed with `generation` has elapsed.
    FeedbackElapsed { generation: u64 },
    /// Discard the session and start a fresh one.
    Reset,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetFilterText(_) => "set_filter_text",
            Self::SelectDestination(_) => "select_destination",
            Self::ClearSelection => "clear_selection",
            Self::CompleteTask(_) => "complete_task",
            Self::FeedbackElapsed { .. } => "feedback_elapsed",
            Self::Reset => "reset",
        }
    }
}

/// Work the runtime must perform after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Cancel any pending revert and dispatch
    /// [`Action::FeedbackElapsed`] with `generation` once the feedback
    /// window is over.
    ScheduleFeedbackRevert { generation: u64 },
}

/// Result of applying an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: SessionState,
    pub effect: Option<Effect>,
}

impl Transition {
    fn quiet(state: SessionState) -> Self {
        Self {
            state,
            effect: None,
        }
    }
}

/// Complete in-memory state of one user session.
///
/// Invariants upheld by [`SessionState::apply`]:
/// - `completed_task_ids` only holds ids of catalog tasks and is empty while
///   no destination is selected.
/// - `points` never decreases and equals the sum of `history` points. A
///   completion that would overflow `u32` is rejected.
/// - `transient_feedback_active` only turns off through
///   [`Action::FeedbackElapsed`] carrying the current `feedback_generation`.
///   Readers should go through [`SessionState::feedback_active_at`], which also
///   honours `feedback_until`, so the flag expires even if no timer delivers
///   the revert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub points: u32,
    pub filter_text: String,
    pub selected_destination_id: Option<u32>,
    pub completed_task_ids: BTreeSet<u32>,
    pub transient_feedback_active: bool,
    /// Identifies the pending feedback revert. Bumped on every completion so
    /// that a superseded timer cannot clear a newer flag.
    pub feedback_generation: u64,
    /// Length of the feedback window in milliseconds.
    pub feedback_window_ms: u64,
    /// End of the current feedback window.
    pub feedback_until: Option<DateTime<Utc>>,
    /// Points of the most recent completion, for the "+N Coins!" banner.
    pub last_award: Option<u32>,
    pub history: Vec<CompletionEntry>,
}

impl SessionState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: now,
            points: 0,
            filter_text: String::new(),
            selected_destination_id: None,
            completed_task_ids: BTreeSet::new(),
            transient_feedback_active: false,
            feedback_generation: 0,
            feedback_window_ms: DEFAULT_FEEDBACK_WINDOW.as_millis() as u64,
            feedback_until: None,
            last_award: None,
            history: Vec::new(),
        }
    }

    /// Use `window` instead of [`DEFAULT_FEEDBACK_WINDOW`].
    pub fn with_feedback_window(self, window: Duration) -> Self {
        Self {
            feedback_window_ms: u64::try_from(window.as_millis()).unwrap_or(u64::MAX),
            ..self
        }
    }

    /// Whether the feedback flag is still on at `now`. False once the
    /// window has run out, even if the revert has not been applied yet.
    pub fn feedback_active_at(&self, now: DateTime<Utc>) -> bool {
        self.transient_feedback_active && self.feedback_until.map_or(true, |until| now < until)
    }

    /// Compute the next snapshot. `self` is left untouched; on error the
    /// caller keeps the current snapshot.
    pub fn apply(
        &self,
        catalog: &Catalog,
        action: Action,
        now: DateTime<Utc>,
    ) -> Result<Transition, SessionError> {
        match action {
            Action::SetFilterText(text) => Ok(Transition::quiet(Self {
                filter_text: text,
                ..self.clone()
            })),
            Action::SelectDestination(id) => {
                if catalog.destination(id).is_none() {
                    return Err(SessionError::NotFound {
                        kind: CatalogKind::Destination,
                        id,
                    });
                }
                Ok(Transition::quiet(Self {
                    selected_destination_id: Some(id),
                    completed_task_ids: BTreeSet::new(),
                    ..self.clone()
                }))
            }
            Action::ClearSelection => Ok(Transition::quiet(Self {
                selected_destination_id: None,
                completed_task_ids: BTreeSet::new(),
                ..self.clone()
            })),
            Action::CompleteTask(id) => self.complete_task(catalog, id, now),
            Action::FeedbackElapsed { generation } => {
                if generation != self.feedback_generation || !self.transient_feedback_active {
                    return Ok(Transition::quiet(self.clone()));
                }
                Ok(Transition::quiet(Self {
                    transient_feedback_active: false,
                    feedback_until: None,
                    ..self.clone()
                }))
            }
            // The generation carries over so a revert armed before the reset
            // can never match a completion made after it.
            Action::Reset => Ok(Transition::quiet(Self {
                feedback_generation: self.feedback_generation,
                feedback_window_ms: self.feedback_window_ms,
                ..Self::new(now)
            })),
        }
    }

    fn complete_task(
        &self,
        catalog: &Catalog,
        task_id: u32,
        now: DateTime<Utc>,
    ) -> Result<Transition, SessionError> {
        let task = catalog.task(task_id).ok_or(SessionError::NotFound {
            kind: CatalogKind::Task,
            id: task_id,
        })?;
        let destination_id = self
            .selected_destination_id
            .ok_or(SessionError::NoDestinationSelected)?;

        if self.completed_task_ids.contains(&task_id) {
            return Ok(Transition::quiet(self.clone()));
        }

        let points = self
            .points
            .checked_add(task.points)
            .ok_or(SessionError::PointsOverflow)?;

        let mut next = self.clone();
        next.completed_task_ids.insert(task_id);
        next.points = points;
        next.transient_feedback_active = true;
        next.feedback_until = i64::try_from(self.feedback_window_ms)
            .ok()
            .and_then(TimeDelta::try_milliseconds)
            .and_then(|window| now.checked_add_signed(window));
        next.feedback_generation = self.feedback_generation + 1;
        next.last_award = Some(task.points);
        next.history.push(CompletionEntry {
            destination_id,
            task_id,
            points: task.points,
            completed_at: now,
        });

        let effect = Effect::ScheduleFeedbackRevert {
            generation: next.feedback_generation,
        };
        Ok(Transition {
            state: next,
            effect: Some(effect),
        })
    }

    /// Build the read-only projection handed to the presentation layer.
    pub fn view(&self, catalog: &Catalog) -> SessionView {
        self.view_at(catalog, Utc::now())
    }

    /// [`SessionState::view`] as seen at `now`.
    pub fn view_at(&self, catalog: &Catalog, now: DateTime<Utc>) -> SessionView {
        let selected = self
            .selected_destination_id
            .and_then(|id| catalog.destination(id))
            .cloned();

        let rules = if selected.is_some() {
            catalog
                .tasks
                .iter()
                .map(|task| RuleView {
                    task: task.clone(),
                    completed: self.completed_task_ids.contains(&task.id),
                })
                .collect()
        } else {
            Vec::new()
        };

        // The banner belongs to the rule checklist; the city grid never shows it.
        let feedback = if selected.is_some() && self.feedback_active_at(now) {
            self.last_award.map(FeedbackView::for_award)
        } else {
            None
        };

        SessionView {
            session_id: self.id,
            points: self.points,
            filter_text: self.filter_text.clone(),
            destinations: catalog.filter_destinations(&self.filter_text),
            selected,
            rules,
            feedback,
            completions: self.history.len(),
        }
    }
}
