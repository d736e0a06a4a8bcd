//! In-process session storage for tests and single-process embedding.

use super::{SessionError, SessionId, SessionResult, SessionStore};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

type Sessions = HashMap<SessionId, HashMap<String, Vec<u8>>>;

/// Session store kept in a mutex-guarded map.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: Mutex<Sessions>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions that have been started.
    pub fn session_count(&self) -> SessionResult<usize> {
        Ok(self.lock()?.len())
    }

    fn lock(&self) -> SessionResult<MutexGuard<'_, Sessions>> {
        self.sessions.lock().map_err(|_| SessionError::Poisoned)
    }
}

impl SessionStore for MemorySessionStore {
    fn start(&self, session: &SessionId) -> SessionResult<()> {
        self.lock()?.entry(session.clone()).or_default();
        Ok(())
    }

    fn get(&self, session: &SessionId, key: &str) -> SessionResult<Option<Vec<u8>>> {
        let mut sessions = self.lock()?;
        let values = sessions.entry(session.clone()).or_default();
        Ok(values.get(key).cloned())
    }

    fn put(&self, session: &SessionId, key: &str, value: &[u8]) -> SessionResult<()> {
        let mut sessions = self.lock()?;
        sessions
            .entry(session.clone())
            .or_default()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
