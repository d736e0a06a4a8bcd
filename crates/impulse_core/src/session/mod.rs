//! Request-external session storage and the active selection built on it.
//!
//! # Responsibility
//! - Define the narrow storage contract (`SessionStore`) the core depends on.
//! - Provide SQLite and in-process implementations of that contract.
//! - Persist one active selection per session across stateless requests.
//!
//! # Invariants
//! - Every operation takes an explicit `SessionId`; there is no ambient
//!   "current session".
//! - `SessionStore::start` is idempotent; `get`/`put` start lazily.
//! - Values are opaque bytes to the store.

use crate::db::DbError;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod active;
pub mod memory_store;
pub mod snapshot;
pub mod sqlite_store;

pub type SessionResult<T> = Result<T, SessionError>;

/// Handle identifying one user session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wraps an identifier issued by the web layer (e.g. a session cookie).
    ///
    /// Surrounding whitespace is trimmed; an empty identifier is rejected.
    pub fn parse(value: &str) -> SessionResult<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(SessionError::InvalidSessionId(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Issues a fresh random session identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Session storage failures.
#[derive(Debug)]
pub enum SessionError {
    InvalidSessionId(String),
    Db(DbError),
    /// The in-process store lock was poisoned by a panicking writer.
    Poisoned,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSessionId(value) => write!(f, "invalid session id: `{value}`"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Poisoned => write!(f, "session storage lock poisoned"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidSessionId(_) | Self::Poisoned => None,
        }
    }
}

impl From<DbError> for SessionError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SessionError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage collaborator for per-session key/value blobs.
///
/// Writes for one `(session, key)` are last-writer-wins; implementations do
/// not serialize concurrent writers beyond making each `put` atomic.
pub trait SessionStore {
    /// Attaches session state, creating it on first use. Idempotent.
    fn start(&self, session: &SessionId) -> SessionResult<()>;
    fn get(&self, session: &SessionId, key: &str) -> SessionResult<Option<Vec<u8>>>;
    fn put(&self, session: &SessionId, key: &str, value: &[u8]) -> SessionResult<()>;
}

impl<S: SessionStore + ?Sized> SessionStore for &S {
    fn start(&self, session: &SessionId) -> SessionResult<()> {
        (**self).start(session)
    }

    fn get(&self, session: &SessionId, key: &str) -> SessionResult<Option<Vec<u8>>> {
        (**self).get(session, key)
    }

    fn put(&self, session: &SessionId, key: &str, value: &[u8]) -> SessionResult<()> {
        (**self).put(session, key, value)
    }
}
