use std::sync::Arc;
use std::time::Duration;

use ecotourist::catalog::Catalog;
use ecotourist::error::SessionError;
use ecotourist::session::{Action, SessionStore};
use tokio::time::sleep;
use tokio_test::{assert_err, assert_ok};

fn setup() -> SessionStore {
    let catalog = Catalog::reference().expect("Failed to load reference catalog");
    SessionStore::new(Arc::new(catalog), Duration::from_millis(1000))
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

mod dispatch {
    use super::*;

    #[test]
    fn keeps_snapshot_on_rejected_action() {
        let store = setup();
        let before = store.snapshot();

        let err = assert_err!(store.dispatch(Action::CompleteTask(1)));
        assert_eq!(err, SessionError::NoDestinationSelected);
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn clones_share_the_session() {
        let store = setup();
        let other = store.clone();

        assert_ok!(store.dispatch(Action::SetFilterText("jai".to_string())));
        let view = other.view();
        assert_eq!(view.filter_text, "jai");
        assert_eq!(view.destinations.len(), 1);
        assert_eq!(view.session_id, store.snapshot().id);
    }

    #[test]
    fn feedback_clears_without_a_runtime() {
        let catalog = Catalog::reference().expect("Failed to load reference catalog");
        let store = SessionStore::new(Arc::new(catalog), ms(50));
        assert_ok!(store.dispatch(Action::SelectDestination(1)));
        let view = assert_ok!(store.dispatch(Action::CompleteTask(1)));
        assert_eq!(view.points, 5);
        assert!(view.feedback.is_some());
        assert!(store.feedback_remaining().is_some());

        std::thread::sleep(ms(300));

        assert!(store.view().feedback.is_none());
        assert!(store.feedback_remaining().is_none());
        let snapshot = store.snapshot();
        assert!(!snapshot.transient_feedback_active);
        assert!(snapshot.feedback_until.is_none());
        assert_eq!(snapshot.points, 5);
    }
}

mod feedback_timer {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn reverts_after_the_window() {
        let store = setup();
        assert_ok!(store.dispatch(Action::SelectDestination(1)));
        let view = assert_ok!(store.dispatch(Action::CompleteTask(1)));
        assert!(view.feedback.is_some());

        sleep(ms(999)).await;
        assert!(store.view().feedback.is_some());

        sleep(ms(2)).await;
        let snapshot = store.snapshot();
        assert!(!snapshot.transient_feedback_active);
        assert_eq!(snapshot.points, 5);
        assert_eq!(snapshot.completed_task_ids.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn new_completion_restarts_the_window() {
        let store = setup();
        assert_ok!(store.dispatch(Action::SelectDestination(1)));
        assert_ok!(store.dispatch(Action::CompleteTask(1)));

        sleep(ms(600)).await;
        assert_ok!(store.dispatch(Action::CompleteTask(2)));

        // The first window would have ended at 1000ms.
        sleep(ms(500)).await;
        assert!(store.view().feedback.is_some());

        sleep(ms(600)).await;
        assert!(store.view().feedback.is_none());
        assert_eq!(store.view().points, 10);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_completion_does_not_restart_the_window() {
        let store = setup();
        assert_ok!(store.dispatch(Action::SelectDestination(1)));
        assert_ok!(store.dispatch(Action::CompleteTask(1)));

        sleep(ms(600)).await;
        assert_ok!(store.dispatch(Action::CompleteTask(1)));

        sleep(ms(500)).await;
        assert!(store.view().feedback.is_none());
        assert_eq!(store.view().points, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_cancels_the_pending_revert() {
        let store = setup();
        assert_ok!(store.dispatch(Action::SelectDestination(1)));
        assert_ok!(store.dispatch(Action::CompleteTask(1)));

        sleep(ms(500)).await;
        let view = assert_ok!(store.dispatch(Action::Reset));
        assert_eq!(view.points, 0);
        assert!(view.feedback.is_none());

        assert_ok!(store.dispatch(Action::SelectDestination(2)));
        sleep(ms(100)).await;
        assert_ok!(store.dispatch(Action::CompleteTask(3)));

        sleep(ms(500)).await;
        assert!(store.view().feedback.is_some());

        sleep(ms(600)).await;
        assert!(store.view().feedback.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn selection_changes_do_not_touch_the_flag() {
        let store = setup();
        assert_ok!(store.dispatch(Action::SelectDestination(1)));
        assert_ok!(store.dispatch(Action::CompleteTask(1)));
        assert_ok!(store.dispatch(Action::ClearSelection));

        let snapshot = store.snapshot();
        assert!(snapshot.transient_feedback_active);
        assert!(snapshot.completed_task_ids.is_empty());

        sleep(ms(1001)).await;
        assert!(!store.snapshot().transient_feedback_active);
    }
}
