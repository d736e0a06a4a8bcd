//! Service core between stateless web requests and the backend store.
//!
//! Three concerns live here: the active selection a session carries across
//! requests, the audit trail every tracked entity exposes, and the uniform
//! contract for delegating business logic to backend procedures.

pub mod backend;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod session;

pub use backend::delegate::{QueryDelegate, QueryError, QueryResult};
pub use backend::management::{IdentityProvider, ManagementQueries, PrivilegeLevel};
pub use backend::sqlite_transport::SqliteTransport;
pub use backend::{BackendTransport, BackendValue, RawResponse, TransportError};
pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, init_logging_from, logging_status};
pub use model::audit::{AuditTrail, Audited, UserId};
pub use model::system::{System, SystemId};
pub use session::active::{ActiveContextStore, ContextError, ContextResult, ACTIVE_SYSTEM_KEY};
pub use session::memory_store::MemorySessionStore;
pub use session::snapshot::SnapshotError;
pub use session::sqlite_store::SqliteSessionStore;
pub use session::{SessionError, SessionId, SessionResult, SessionStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
