//! Managed system entity.
//!
//! # Responsibility
//! - Describe one host/device tracked by the backend.
//! - Serve as the entity a session selects as its "active system".
//!
//! # Invariants
//! - `audit` is fixed at construction and only reachable through `Audited`.
//! - A revision produces a new `System`; descriptive fields stay as built.

use crate::model::audit::{AuditTrail, Audited, UserId};
use serde::{Deserialize, Serialize};

/// Backend-assigned numeric identity of a system.
pub type SystemId = i64;

/// A system registered in the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct System {
    id: SystemId,
    name: String,
    owner: UserId,
    os_name: Option<String>,
    comment: Option<String>,
    audit: AuditTrail,
}

impl System {
    /// Materializes a system from backend-supplied values.
    pub fn new(
        id: SystemId,
        name: impl Into<String>,
        owner: impl Into<UserId>,
        audit: AuditTrail,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            owner: owner.into(),
            os_name: None,
            comment: None,
            audit,
        }
    }

    /// Sets the operating system name while building.
    pub fn with_os_name(mut self, os_name: impl Into<String>) -> Self {
        self.os_name = Some(os_name.into());
        self
    }

    /// Sets the free-form comment while building.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn id(&self) -> SystemId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn os_name(&self) -> Option<&str> {
        self.os_name.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Returns a copy reflecting a later modification by `modifier`.
    pub fn revised(&self, modified_at: i64, modifier: impl Into<UserId>) -> Self {
        Self {
            audit: self.audit.revised(modified_at, modifier),
            ..self.clone()
        }
    }
}

impl Audited for System {
    fn audit_trail(&self) -> &AuditTrail {
        &self.audit
    }
}
