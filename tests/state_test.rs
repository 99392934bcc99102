mod common;

use std::{sync::Arc, time::Duration};

use lyricist::management::{MemoryBackend, StateError, StateTracker};
use tokio::time::advance;

use common::DownBackend;

const TTL: Duration = Duration::from_secs(900);
const TIMEOUT: Duration = Duration::from_secs(2);

fn tracker() -> StateTracker {
    StateTracker::new(Arc::new(MemoryBackend::new()), TTL, TIMEOUT)
}

#[tokio::test]
async fn test_begin_issues_fresh_values() {
    let states = tracker();
    let first = states.begin().await.unwrap();
    let second = states.begin().await.unwrap();

    assert_ne!(first.attempt_id, second.attempt_id);
    assert_ne!(first.state, second.state);
    assert_ne!(first.attempt_id, first.state);
}

#[tokio::test]
async fn test_complete_succeeds_exactly_once() {
    let states = tracker();
    let pending = states.begin().await.unwrap();

    states
        .complete(&pending.attempt_id, &pending.state)
        .await
        .unwrap();

    let replay = states.complete(&pending.attempt_id, &pending.state).await;
    assert!(matches!(replay, Err(StateError::InvalidState)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_completes_admit_one() {
    let states = Arc::new(tracker());
    let pending = states.begin().await.unwrap();

    let handles: Vec<_> = (0..64)
        .map(|_| {
            let states = states.clone();
            let pending = pending.clone();
            tokio::spawn(async move {
                states
                    .complete(&pending.attempt_id, &pending.state)
                    .await
            })
        })
        .collect();

    let mut admitted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => admitted += 1,
            Err(StateError::InvalidState) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(admitted, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_begins_are_distinct() {
    let states = Arc::new(tracker());

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let states = states.clone();
            tokio::spawn(async move { states.begin().await.unwrap() })
        })
        .collect();

    let mut issued = Vec::new();
    for handle in handles {
        issued.push(handle.await.unwrap());
    }

    for pending in &issued {
        states
            .complete(&pending.attempt_id, &pending.state)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_mismatch_consumes_attempt() {
    let states = tracker();
    let pending = states.begin().await.unwrap();

    let forged = states.complete(&pending.attempt_id, "forged").await;
    assert!(matches!(forged, Err(StateError::InvalidState)));

    // The genuine state no longer works either
    let genuine = states.complete(&pending.attempt_id, &pending.state).await;
    assert!(matches!(genuine, Err(StateError::InvalidState)));
}

#[tokio::test]
async fn test_unknown_attempt_is_invalid() {
    let states = tracker();
    let result = states.complete("never-issued", "whatever").await;
    assert!(matches!(result, Err(StateError::InvalidState)));
}

#[tokio::test]
async fn test_attempts_are_independent() {
    let states = tracker();
    let first = states.begin().await.unwrap();
    let second = states.begin().await.unwrap();

    let crossed = states.complete(&first.attempt_id, &second.state).await;
    assert!(matches!(crossed, Err(StateError::InvalidState)));

    states
        .complete(&second.attempt_id, &second.state)
        .await
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_attempt_expires() {
    let states = tracker();
    let pending = states.begin().await.unwrap();

    advance(TTL + Duration::from_secs(1)).await;

    let late = states.complete(&pending.attempt_id, &pending.state).await;
    assert!(matches!(late, Err(StateError::InvalidState)));
}

#[tokio::test]
async fn test_store_failure_is_not_invalid_state() {
    let states = StateTracker::new(Arc::new(DownBackend), TTL, TIMEOUT);

    assert!(matches!(states.begin().await, Err(StateError::Store(_))));
    assert!(matches!(
        states.complete("a1", "s1").await,
        Err(StateError::Store(_))
    ));
}
