//! Audit trail carried by every tracked domain entity.
//!
//! # Responsibility
//! - Hold creation time, last modification time and last modifier.
//! - Expose those facts read-only to any feature that renders provenance.
//!
//! # Invariants
//! - All three fields are set exactly once, at construction.
//! - No setters exist; a later modification yields a new `AuditTrail`.
//! - Timestamps are Unix epoch milliseconds supplied by the backend.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Opaque identifier of a backend user.
///
/// Usable as a foreign key for user lookups; the core never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Immutable creation/modification provenance of one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrail {
    created_at: i64,
    modified_at: i64,
    last_modifier: UserId,
}

impl AuditTrail {
    /// Builds a trail from trusted backend-supplied values.
    ///
    /// Validation of those values is the caller's concern; this constructor
    /// stores them as given.
    pub fn new(created_at: i64, modified_at: i64, last_modifier: impl Into<UserId>) -> Self {
        Self {
            created_at,
            modified_at,
            last_modifier: last_modifier.into(),
        }
    }

    /// Epoch milliseconds at which the entity was created.
    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// Epoch milliseconds of the latest modification.
    pub fn modified_at(&self) -> i64 {
        self.modified_at
    }

    /// User who performed the latest modification.
    pub fn last_modifier(&self) -> &UserId {
        &self.last_modifier
    }

    /// Returns a new trail for a later modification.
    ///
    /// `created_at` carries over; `self` is left untouched.
    pub fn revised(&self, modified_at: i64, modifier: impl Into<UserId>) -> Self {
        Self {
            created_at: self.created_at,
            modified_at,
            last_modifier: modifier.into(),
        }
    }
}

/// Capability of entities that embed an [`AuditTrail`].
///
/// Implementors only supply [`Audited::audit_trail`]; the provenance
/// accessors are derived from it.
pub trait Audited {
    fn audit_trail(&self) -> &AuditTrail;

    fn created_at(&self) -> i64 {
        self.audit_trail().created_at()
    }

    fn modified_at(&self) -> i64 {
        self.audit_trail().modified_at()
    }

    fn last_modifier(&self) -> &UserId {
        self.audit_trail().last_modifier()
    }
}

impl Audited for AuditTrail {
    fn audit_trail(&self) -> &AuditTrail {
        self
    }
}
