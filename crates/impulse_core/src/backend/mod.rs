//! Delegation of business operations to backend procedures.
//!
//! # Responsibility
//! - Define the transport contract the core uses to reach the backend.
//! - Classify every raw response as success or failure before callers see it.
//! - Host the domain query objects built on that delegation.
//!
//! # Invariants
//! - Callers never receive a `RawResponse`; only `QueryDelegate` inspects it.
//! - No retries and no caching: one call is one round trip.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod delegate;
pub mod management;
pub mod sqlite_transport;

/// Scalar value exchanged with the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl BackendValue {
    /// Short type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Text(_) => "text",
            Self::Blob(_) => "blob",
        }
    }
}

impl From<&str> for BackendValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for BackendValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for BackendValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for BackendValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<bool> for BackendValue {
    fn from(value: bool) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl<T: Into<BackendValue>> From<Option<T>> for BackendValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Unclassified backend reply.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResponse {
    Success(BackendValue),
    /// The backend flagged the call as failed.
    Error {
        /// Backend-specific code, when the backend reports one.
        code: Option<String>,
        message: String,
    },
}

/// Transport failure that carries no backend error marker.
#[derive(Debug)]
pub struct TransportError {
    message: String,
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for TransportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|err| err as &(dyn Error + 'static))
    }
}

/// Backend transport collaborator.
///
/// Implementations perform exactly one round trip per call and report
/// backend-flagged failures as `RawResponse::Error`, not as `Err`.
pub trait BackendTransport {
    fn execute(
        &self,
        operation: &str,
        params: &[BackendValue],
    ) -> Result<RawResponse, TransportError>;
}

impl<T: BackendTransport + ?Sized> BackendTransport for &T {
    fn execute(
        &self,
        operation: &str,
        params: &[BackendValue],
    ) -> Result<RawResponse, TransportError> {
        (**self).execute(operation, params)
    }
}

#[cfg(test)]
mod tests {
    use super::BackendValue;

    #[test]
    fn option_conversion_maps_none_to_null() {
        assert_eq!(BackendValue::from(None::<&str>), BackendValue::Null);
        assert_eq!(
            BackendValue::from(Some("x")),
            BackendValue::Text("x".to_string())
        );
    }
}
