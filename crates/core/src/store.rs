//! Session Storage
//!
//! The [`SessionStore`] trait is the only way interview state is read or
//! written. Writers must present the version they read; a stale version is a
//! [`InterviewError::Conflict`], which keeps two concurrent transitions on the
//! same session from both succeeding.

use crate::error::{InterviewError, Result};
use crate::session::SessionState;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A stored value together with the version it was stored at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    pub version: i64,
    pub value: T,
}

/// Durable map from session ID to [`SessionState`].
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads a session and its current version.
    ///
    /// Fails with `NotFound` for unknown IDs and `CorruptSession` when the
    /// stored record violates the state invariants.
    async fn get(&self, id: Uuid) -> Result<Versioned<SessionState>>;

    /// Inserts a new session at version 1. Fails with `DuplicateSession` if the ID exists.
    async fn create(&self, state: &SessionState) -> Result<()>;

    /// Replaces the session if it is still at `expected_version`, returning the new version.
    async fn compare_and_update(
        &self,
        id: Uuid,
        expected_version: i64,
        state: &SessionState,
    ) -> Result<i64>;
}

/// Rejects a loaded record that breaks the session invariants.
pub fn ensure_valid(state: SessionState) -> Result<SessionState> {
    match state.validate() {
        Ok(()) => Ok(state),
        Err(reason) => Err(InterviewError::CorruptSession {
            id: state.session_id,
            reason,
        }),
    }
}

/// A process-local store, used when no database is configured and in tests.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<Uuid, Versioned<SessionState>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, id: Uuid) -> Result<Versioned<SessionState>> {
        let record = self
            .sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(InterviewError::NotFound(id))?;
        Ok(Versioned {
            version: record.version,
            value: ensure_valid(record.value)?,
        })
    }

    async fn create(&self, state: &SessionState) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&state.session_id) {
            return Err(InterviewError::DuplicateSession(state.session_id));
        }
        sessions.insert(
            state.session_id,
            Versioned {
                version: 1,
                value: state.clone(),
            },
        );
        Ok(())
    }

    async fn compare_and_update(
        &self,
        id: Uuid,
        expected_version: i64,
        state: &SessionState,
    ) -> Result<i64> {
        let mut sessions = self.sessions.write().await;
        let record = sessions.get_mut(&id).ok_or(InterviewError::NotFound(id))?;
        if record.version != expected_version {
            return Err(InterviewError::Conflict(id));
        }
        record.version += 1;
        record.value = state.clone();
        Ok(record.version)
    }
}
