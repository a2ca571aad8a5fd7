use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use super::{Action, Effect, SessionState};
use crate::catalog::Catalog;
use crate::error::SessionError;
use crate::models::SessionView;

/// Owner of the live session snapshot.
///
/// All actions funnel through [`SessionStore::dispatch`], which serializes
/// them behind one lock, swaps in the next snapshot, and runs the feedback
/// timer. Cloning the store yields another handle to the same session.
///
/// The feedback window is enforced by the deadline stored in the snapshot:
/// every read first applies an overdue revert, so the flag clears on time
/// with or without a tokio runtime. The timer only pushes the change out
/// when nobody is reading.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<Inner>>,
    catalog: Arc<Catalog>,
    feedback_duration: Duration,
}

struct Inner {
    state: SessionState,
    pending_revert: Option<CancellationToken>,
}

impl SessionStore {
    pub fn new(catalog: Arc<Catalog>, feedback_duration: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: SessionState::new(Utc::now()).with_feedback_window(feedback_duration),
                pending_revert: None,
            })),
            catalog,
            feedback_duration,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn feedback_duration(&self) -> Duration {
        self.feedback_duration
    }

    /// Copy of the current snapshot.
    pub fn snapshot(&self) -> SessionState {
        let now = Utc::now();
        let mut inner = self.lock();
        self.settle(&mut inner, now);
        inner.state.clone()
    }

    pub fn view(&self) -> SessionView {
        let now = Utc::now();
        let mut inner = self.lock();
        self.settle(&mut inner, now);
        inner.state.view_at(&self.catalog, now)
    }

    /// Time left until the current feedback window closes, if one is open.
    pub fn feedback_remaining(&self) -> Option<Duration> {
        let now = Utc::now();
        let mut inner = self.lock();
        self.settle(&mut inner, now);
        if !inner.state.transient_feedback_active {
            return None;
        }
        inner
            .state
            .feedback_until
            .and_then(|until| (until - now).to_std().ok())
    }

    /// Apply `action` and return the projection of the resulting snapshot.
    ///
    /// On error the current snapshot is kept.
    pub fn dispatch(&self, action: Action) -> Result<SessionView, SessionError> {
        let name = action.name();
        let is_reset = matches!(action, Action::Reset);
        let now = Utc::now();
        let mut inner = self.lock();
        self.settle(&mut inner, now);

        let transition = match inner.state.apply(&self.catalog, action, now) {
            Ok(transition) => transition,
            Err(e) => {
                tracing::warn!("Rejected {}: {}", name, e);
                return Err(e);
            }
        };

        if is_reset {
            if let Some(token) = inner.pending_revert.take() {
                token.cancel();
            }
        }

        let awarded = transition.state.points.saturating_sub(inner.state.points);
        if awarded > 0 {
            tracing::info!(
                "Task completed: +{} points (total {})",
                awarded,
                transition.state.points
            );
        }

        inner.state = transition.state;
        tracing::debug!(
            action = name,
            points = inner.state.points,
            selected = ?inner.state.selected_destination_id,
            completed = inner.state.completed_task_ids.len(),
            feedback = inner.state.transient_feedback_active,
            "Applied session action"
        );

        if let Some(Effect::ScheduleFeedbackRevert { generation }) = transition.effect {
            self.schedule_revert(&mut inner, generation);
        }

        Ok(inner.state.view_at(&self.catalog, now))
    }

    /// Apply the revert for a feedback window that ended before `now`.
    fn settle(&self, inner: &mut Inner, now: DateTime<Utc>) {
        let state = &inner.state;
        if !state.transient_feedback_active || state.feedback_active_at(now) {
            return;
        }
        let action = Action::FeedbackElapsed {
            generation: state.feedback_generation,
        };
        if let Ok(transition) = state.apply(&self.catalog, action, now) {
            tracing::trace!("Feedback window closed");
            inner.state = transition.state;
        }
    }

    /// Cancel the pending revert, if any, and arm a new one.
    fn schedule_revert(&self, inner: &mut Inner, generation: u64) {
        if let Some(token) = inner.pending_revert.take() {
            token.cancel();
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("No async runtime; feedback clears on the next read");
            return;
        };

        let token = CancellationToken::new();
        inner.pending_revert = Some(token.clone());

        let store = self.clone();
        let after = self.feedback_duration;
        handle.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::trace!(generation, "Feedback revert superseded");
                }
                _ = tokio::time::sleep(after) => {
                    // The reducer ignores stale generations, so a revert that
                    // races with a newer completion is harmless.
                    let _ = store.dispatch(Action::FeedbackElapsed { generation });
                }
            }
        });
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
