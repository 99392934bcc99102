use std::{sync::Arc, time::Duration};

use thiserror::Error;

use super::backend::{Backend, StoreError, bounded};
use crate::utils;

const STATE_PREFIX: &str = "state";

#[derive(Debug, Error)]
pub enum StateError {
    /// Unknown or already consumed attempt, or the presented state differs.
    #[error("invalid OAuth state")]
    InvalidState,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A login that has been started but not yet completed.
///
/// `attempt_id` goes to the browser as a cookie, `state` goes to the
/// provider's authorization URL and comes back on the callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLogin {
    pub attempt_id: String,
    pub state: String,
}

/// Issues and checks one-time anti-forgery states.
///
/// A pending login is consumed by the first `complete` call for its attempt,
/// whether or not the presented state matches. Abandoned logins simply expire
/// in the backend.
pub struct StateTracker {
    backend: Arc<dyn Backend>,
    ttl: Duration,
    timeout: Duration,
}

impl StateTracker {
    pub fn new(backend: Arc<dyn Backend>, ttl: Duration, timeout: Duration) -> Self {
        Self {
            backend,
            ttl,
            timeout,
        }
    }

    pub async fn begin(&self) -> Result<PendingLogin, StateError> {
        let pending = PendingLogin {
            attempt_id: utils::generate_id(),
            state: utils::generate_id(),
        };
        bounded(
            self.timeout,
            self.backend.put(
                &storage_key(&pending.attempt_id),
                pending.state.clone().into_bytes(),
                self.ttl,
            ),
        )
        .await?;
        Ok(pending)
    }

    pub async fn complete(&self, attempt_id: &str, presented_state: &str) -> Result<(), StateError> {
        let stored = bounded(self.timeout, self.backend.take(&storage_key(attempt_id)))
            .await?
            .ok_or(StateError::InvalidState)?;

        if stored == presented_state.as_bytes() {
            Ok(())
        } else {
            Err(StateError::InvalidState)
        }
    }
}

fn storage_key(attempt_id: &str) -> String {
    format!("{STATE_PREFIX}:{attempt_id}")
}
