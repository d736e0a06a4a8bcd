//! Active selection persisted across stateless requests.
//!
//! # Responsibility
//! - Install the entity a session is currently working with.
//! - Reconstruct that entity in any later request of the same session.
//!
//! # Invariants
//! - At most one selection per `(session, key)`; absent or exactly one.
//! - `set_active` overwrites unconditionally (last-writer-wins).
//! - Absence is `ContextError::NotFound`; an undecodable snapshot is
//!   `ContextError::Serialization`. The two are never conflated.
//!
//! # Concurrency
//! Concurrent installs for one session race; whichever write lands last wins.
//! No lock is taken around read-modify-write sequences by callers.

use super::snapshot::{decode_snapshot, encode_snapshot, SnapshotError};
use super::{SessionError, SessionId, SessionStore};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Session key holding the active system selection.
pub const ACTIVE_SYSTEM_KEY: &str = "active_system";

const RESELECT_MESSAGE: &str = "Could not find your active selection. Make sure the URL was not \
edited by hand; otherwise choose the system again from the Systems list.";

pub type ContextResult<T> = Result<T, ContextError>;

/// Failures while resolving or installing an active selection.
#[derive(Debug)]
pub enum ContextError {
    /// No selection has been installed for the session.
    NotFound { session: SessionId, key: String },
    /// A stored snapshot could not be turned back into an entity.
    Serialization(SnapshotError),
    Session(SessionError),
}

impl ContextError {
    /// Whether the user should be sent back to pick a selection again.
    pub fn requires_reselection(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Message suitable for showing to the end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { .. } => RESELECT_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl Display for ContextError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { session, key } => {
                write!(f, "no active selection `{key}` for session {session}")
            }
            Self::Serialization(err) => write!(f, "active selection is corrupt: {err}"),
            Self::Session(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ContextError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound { .. } => None,
            Self::Serialization(err) => Some(err),
            Self::Session(err) => Some(err),
        }
    }
}

impl From<SnapshotError> for ContextError {
    fn from(value: SnapshotError) -> Self {
        Self::Serialization(value)
    }
}

impl From<SessionError> for ContextError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

/// Resolves and installs the active selection of a session.
pub struct ActiveContextStore<S: SessionStore> {
    store: S,
    key: String,
}

impl<S: SessionStore> ActiveContextStore<S> {
    /// Tracks the active system under [`ACTIVE_SYSTEM_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, ACTIVE_SYSTEM_KEY)
    }

    /// Tracks a selection under a caller-chosen session key.
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Reconstructs the entity installed for `session`.
    ///
    /// # Errors
    /// - `NotFound` when nothing was installed; callers must ask the user to
    ///   choose again rather than fall back to a default.
    /// - `Serialization` when the stored snapshot does not decode as `T`.
    pub fn resolve_active<T: DeserializeOwned>(&self, session: &SessionId) -> ContextResult<T> {
        let Some(bytes) = self.store.get(session, &self.key)? else {
            info!(
                "event=active_resolve module=session status=not_found session_id={} key={}",
                session, self.key
            );
            return Err(ContextError::NotFound {
                session: session.clone(),
                key: self.key.clone(),
            });
        };

        match decode_snapshot(&bytes) {
            Ok(entity) => {
                debug!(
                    "event=active_resolve module=session status=ok session_id={} key={} bytes={}",
                    session,
                    self.key,
                    bytes.len()
                );
                Ok(entity)
            }
            Err(err) => {
                warn!(
                    "event=active_resolve module=session status=error session_id={} key={} error_code=snapshot_corrupt error={}",
                    session, self.key, err
                );
                Err(err.into())
            }
        }
    }

    /// Installs `entity` as the active selection, replacing any prior one.
    pub fn set_active<T: Serialize>(&self, session: &SessionId, entity: &T) -> ContextResult<()> {
        let bytes = encode_snapshot(entity)?;
        self.store.put(session, &self.key, &bytes)?;
        debug!(
            "event=active_install module=session status=ok session_id={} key={} bytes={}",
            session,
            self.key,
            bytes.len()
        );
        Ok(())
    }

    /// Whether a selection is installed, without decoding it.
    pub fn has_active(&self, session: &SessionId) -> ContextResult<bool> {
        Ok(self.store.get(session, &self.key)?.is_some())
    }
}
