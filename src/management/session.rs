use std::{fmt, sync::Arc, time::Duration};

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use super::backend::{Backend, StoreError, bounded};
use crate::utils;

const SESSION_PREFIX: &str = "session";

#[derive(Debug, Error)]
pub enum SessionError {
    /// No record under this id, or it expired.
    #[error("session not found")]
    NotFound,
    /// A record exists but cannot be read back.
    #[error("session record is corrupt: {0}")]
    Corrupt(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Opaque, unguessable session identifier.
///
/// Minted independently of the credential, so a client cannot synthesize a
/// session by forging a credential.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        Self(utils::generate_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn storage_key(&self) -> String {
        format!("{SESSION_PREFIX}:{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Ids are bearer secrets; logs only get a prefix.
impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(6).collect();
        write!(f, "SessionId({prefix}..)")
    }
}

/// One authenticated browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    /// Encrypted credential, `IV || ciphertext`.
    pub credential: Vec<u8>,
    pub last_activity: DateTime<Utc>,
}

/// Persisted form of a session: `{"token": "<base64>", "last_activity": "<rfc3339>"}`.
#[derive(Debug, Serialize, Deserialize)]
struct SessionRecord {
    #[serde(serialize_with = "to_base64", deserialize_with = "from_base64")]
    token: Vec<u8>,
    last_activity: DateTime<Utc>,
}

fn to_base64<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(bytes))
}

fn from_base64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let encoded = String::deserialize(deserializer)?;
    STANDARD.decode(encoded).map_err(serde::de::Error::custom)
}

impl SessionRecord {
    fn encode(&self) -> Result<Vec<u8>, SessionError> {
        serde_json::to_vec(self).map_err(|e| SessionError::Corrupt(e.to_string()))
    }

    fn decode(bytes: &[u8]) -> Result<Self, SessionError> {
        serde_json::from_slice(bytes).map_err(|e| SessionError::Corrupt(e.to_string()))
    }
}

/// Sessions keyed by id, with a sliding TTL enforced by the backend.
///
/// `touch` is the only mutator of an existing session. It is a single
/// overwrite-if-present call, so a `touch` that lands after a `delete`
/// cannot bring the session back.
pub struct SessionStore {
    backend: Arc<dyn Backend>,
    ttl: Duration,
    timeout: Duration,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn Backend>, ttl: Duration, timeout: Duration) -> Self {
        Self {
            backend,
            ttl,
            timeout,
        }
    }

    /// Sliding window measured from the most recent `create` or `touch`.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn create(&self, credential: Vec<u8>) -> Result<SessionId, SessionError> {
        let id = SessionId::generate();
        let record = SessionRecord {
            token: credential,
            last_activity: Utc::now(),
        };
        let bytes = record.encode()?;
        bounded(self.timeout, self.backend.put(&id.storage_key(), bytes, self.ttl)).await?;
        Ok(id)
    }

    pub async fn get(&self, id: &SessionId) -> Result<Session, SessionError> {
        let bytes = bounded(self.timeout, self.backend.fetch(&id.storage_key()))
            .await?
            .ok_or(SessionError::NotFound)?;
        let record = SessionRecord::decode(&bytes)?;
        Ok(Session {
            id: id.clone(),
            credential: record.token,
            last_activity: record.last_activity,
        })
    }

    /// Marks the session active now and restarts its TTL.
    pub async fn touch(&self, id: &SessionId) -> Result<(), SessionError> {
        let key = id.storage_key();
        let bytes = bounded(self.timeout, self.backend.fetch(&key))
            .await?
            .ok_or(SessionError::NotFound)?;
        let mut record = SessionRecord::decode(&bytes)?;
        record.last_activity = Utc::now();

        let refreshed = bounded(
            self.timeout,
            self.backend.refresh(&key, record.encode()?, self.ttl),
        )
        .await?;
        if refreshed {
            Ok(())
        } else {
            Err(SessionError::NotFound)
        }
    }

    /// Removes the session immediately, regardless of its TTL.
    pub async fn delete(&self, id: &SessionId) -> Result<(), SessionError> {
        let removed = bounded(self.timeout, self.backend.remove(&id.storage_key())).await?;
        if removed {
            Ok(())
        } else {
            Err(SessionError::NotFound)
        }
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        bounded(self.timeout, self.backend.ping()).await
    }
}
