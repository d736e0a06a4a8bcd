//! Management queries: caller identity and site configuration.
//!
//! # Responsibility
//! - Expose the backend's view of the current user and privilege level.
//! - Read site configuration directives.
//!
//! # See also
//! - `db::procedures` for the SQLite realization of these procedures.

use super::delegate::{QueryDelegate, QueryError, QueryResult};
use super::BackendTransport;
use crate::db::procedures::{
    PROC_GET_CURRENT_USER, PROC_GET_CURRENT_USER_LEVEL, PROC_GET_SITE_CONFIGURATION,
};
use crate::model::audit::UserId;
use std::fmt::{Display, Formatter};

/// Privilege level the backend grants the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrivilegeLevel {
    None,
    User,
    Program,
    Admin,
}

impl PrivilegeLevel {
    /// Backend spelling of the level.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::User => "USER",
            Self::Program => "PROGRAM",
            Self::Admin => "ADMIN",
        }
    }

    /// Parses the backend's level text, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "NONE" => Some(Self::None),
            "USER" => Some(Self::User),
            "PROGRAM" => Some(Self::Program),
            "ADMIN" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl Display for PrivilegeLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User/privilege collaborator consumed by callers needing identity.
pub trait IdentityProvider {
    fn current_user(&self) -> QueryResult<UserId>;
    fn current_privilege_level(&self) -> QueryResult<PrivilegeLevel>;
}

/// Query object for the management API procedures.
pub struct ManagementQueries<T: BackendTransport> {
    delegate: QueryDelegate<T>,
}

impl<T: BackendTransport> ManagementQueries<T> {
    pub fn new(transport: T) -> Self {
        Self {
            delegate: QueryDelegate::new(transport),
        }
    }

    /// Username the backend associates with this connection.
    pub fn current_user(&self) -> QueryResult<UserId> {
        self.delegate
            .call_text(PROC_GET_CURRENT_USER, &[])
            .map(UserId::from)
    }

    /// Privilege level text as reported by the backend.
    pub fn current_user_level(&self) -> QueryResult<String> {
        self.delegate.call_text(PROC_GET_CURRENT_USER_LEVEL, &[])
    }

    /// Value of one site configuration directive.
    pub fn site_configuration(&self, directive: &str) -> QueryResult<String> {
        self.delegate
            .call_text(PROC_GET_SITE_CONFIGURATION, &[directive.into()])
    }
}

impl<T: BackendTransport> IdentityProvider for ManagementQueries<T> {
    fn current_user(&self) -> QueryResult<UserId> {
        ManagementQueries::current_user(self)
    }

    fn current_privilege_level(&self) -> QueryResult<PrivilegeLevel> {
        let raw = self.current_user_level()?;
        PrivilegeLevel::parse(&raw).ok_or_else(|| QueryError::UnexpectedResult {
            operation: PROC_GET_CURRENT_USER_LEVEL.to_string(),
            expected: "privilege level",
            found: "text",
        })
    }
}
