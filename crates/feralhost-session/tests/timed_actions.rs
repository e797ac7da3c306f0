//! Integration tests for timed actions shared between tasks.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use feralhost_session::{ConfirmationOutcome, TimedActions, resolve_confirmation};

// =========================================================================
// Concurrency
// =========================================================================

#[tokio::test]
async fn test_run_action_concurrent_presses_run_effect_once() {
    let actions = Arc::new(TimedActions::new());
    let hits = Arc::new(AtomicUsize::new(0));
    let token = {
        let hits = Arc::clone(&hits);
        actions.issue(Duration::from_secs(60), move || {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    };

    let mut tasks = Vec::new();
    for _ in 0..16 {
        let actions = Arc::clone(&actions);
        let token = token.clone();
        tasks.push(tokio::spawn(async move { actions.run_action(&token) }));
    }

    let mut successes = 0;
    for task in tasks {
        if task.await.unwrap() {
            successes += 1;
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_confirmation_expires_after_ttl() {
    let actions = TimedActions::new();
    let token = actions.issue(Duration::from_millis(20), || {});

    tokio::time::sleep(Duration::from_millis(50)).await;

    let outcome = resolve_confirmation(&actions, &format!("2fa/7/{token}"), "7");
    assert_eq!(outcome, Some(ConfirmationOutcome::Expired));
    assert!(actions.is_empty());
}
