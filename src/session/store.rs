//! Session storage keyed by (flow kind, session id)

use super::{Session, SessionId};
use crate::flow::FlowKind;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Live sessions. Holds no validation logic.
#[derive(Debug, Default)]
pub struct SessionTable {
    sessions: HashMap<(FlowKind, SessionId), Session>,
}

impl SessionTable {
    pub fn get(&self, kind: FlowKind, id: &SessionId) -> Option<&Session> {
        self.sessions.get(&(kind, id.clone()))
    }

    /// Store a session. A session that is not waiting on a step is dropped
    /// instead, along with anything stored under its key.
    pub fn put(&mut self, session: Session) {
        let key = (session.kind, session.id.clone());
        if session.step.is_live() {
            self.sessions.insert(key, session);
        } else {
            self.sessions.remove(&key);
        }
    }

    pub fn remove(&mut self, kind: FlowKind, id: &SessionId) -> Option<Session> {
        self.sessions.remove(&(kind, id.clone()))
    }

    /// Drop every session of every conversation
    #[cfg(test)]
    pub fn clear_all(&mut self) -> usize {
        let cleared = self.sessions.len();
        self.sessions.clear();
        cleared
    }

    /// Drop every flow kind's session for one conversation
    pub fn clear_conversation(&mut self, id: &SessionId) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|(_, sid), _| sid != id);
        before - self.sessions.len()
    }

    /// Highest-priority flow with a live session for this conversation
    pub fn active_kind(&self, id: &SessionId) -> Option<FlowKind> {
        FlowKind::PRIORITY
            .into_iter()
            .find(|kind| self.get(*kind, id).is_some())
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Process-wide session store.
///
/// Every operation runs under one lock. Callers that need several operations
/// to appear atomic (one dispatch step) take the lock once via [`lock`].
///
/// [`lock`]: SessionStore::lock
#[derive(Debug, Default)]
pub struct SessionStore {
    table: Mutex<SessionTable>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclusive access for the duration of one request's state changes.
    ///
    /// Never hold the guard across an `.await`.
    pub fn lock(&self) -> MutexGuard<'_, SessionTable> {
        // A panic mid-update cannot leave the map itself inconsistent
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One-call operations, each under its own lock. Dispatch batches its
/// operations through [`SessionStore::lock`] instead.
#[cfg(test)]
impl SessionStore {
    pub fn get(&self, kind: FlowKind, id: &SessionId) -> Option<Session> {
        self.lock().get(kind, id).cloned()
    }

    pub fn put(&self, session: Session) {
        self.lock().put(session);
    }

    pub fn remove(&self, kind: FlowKind, id: &SessionId) -> Option<Session> {
        self.lock().remove(kind, id)
    }

    pub fn clear_all(&self) -> usize {
        self.lock().clear_all()
    }

    pub fn clear_conversation(&self, id: &SessionId) -> usize {
        self.lock().clear_conversation(id)
    }
}
