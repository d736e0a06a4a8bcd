//! Uniform delegation of one call to a backend procedure.
//!
//! # Responsibility
//! - Validate the operation name before anything is sent.
//! - Apply the single error-detection rule to every raw response.
//! - Extract typed values from success payloads.
//!
//! # Invariants
//! - An error-flagged response always becomes `QueryError::Backend` with the
//!   backend message preserved verbatim, whatever its code.
//! - Success payloads of the wrong shape are `UnexpectedResult`, not `Backend`.
//! - Parameter values are never logged.

use super::{BackendTransport, BackendValue, RawResponse, TransportError};
use log::{debug, error, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

static OPERATION_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Za-z_][A-Za-z0-9_]*\.)?[A-Za-z_][A-Za-z0-9_]*$")
        .expect("operation name pattern is valid")
});

pub type QueryResult<T> = Result<T, QueryError>;

/// Classified failure of a delegated call.
#[derive(Debug)]
pub enum QueryError {
    /// The backend flagged the call as failed.
    Backend {
        operation: String,
        code: Option<String>,
        message: String,
    },
    InvalidOperation(String),
    /// The backend succeeded but returned a payload of another shape.
    UnexpectedResult {
        operation: String,
        expected: &'static str,
        found: &'static str,
    },
    Transport {
        operation: String,
        source: TransportError,
    },
}

impl QueryError {
    /// Backend-supplied message, when the backend flagged the call.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Backend { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backend {
                operation, message, ..
            } => write!(f, "backend call `{operation}` failed: {message}"),
            Self::InvalidOperation(name) => write!(f, "invalid backend operation name `{name}`"),
            Self::UnexpectedResult {
                operation,
                expected,
                found,
            } => write!(
                f,
                "backend call `{operation}` returned {found}, expected {expected}"
            ),
            Self::Transport { operation, source } => {
                write!(f, "transport failed during `{operation}`: {source}")
            }
        }
    }
}

impl Error for QueryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Fail-fast wrapper around a backend transport.
pub struct QueryDelegate<T: BackendTransport> {
    transport: T,
}

impl<T: BackendTransport> QueryDelegate<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Calls `operation` with `params` and returns the classified result.
    ///
    /// # Errors
    /// - `InvalidOperation` when `operation` is not an identifier, optionally
    ///   schema-qualified. The transport is not contacted.
    /// - `Backend` when the backend flags the call as failed.
    /// - `Transport` when the round trip itself fails.
    pub fn call(&self, operation: &str, params: &[BackendValue]) -> QueryResult<BackendValue> {
        if !OPERATION_NAME.is_match(operation) {
            return Err(QueryError::InvalidOperation(operation.to_string()));
        }

        let started_at = Instant::now();
        let response = self.transport.execute(operation, params).map_err(|source| {
            error!(
                "event=backend_call module=backend status=error operation={} duration_ms={} error_code=transport_failed error={}",
                operation,
                started_at.elapsed().as_millis(),
                source
            );
            QueryError::Transport {
                operation: operation.to_string(),
                source,
            }
        })?;

        match response {
            RawResponse::Success(value) => {
                debug!(
                    "event=backend_call module=backend status=ok operation={} params={} duration_ms={}",
                    operation,
                    params.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            RawResponse::Error { code, message } => {
                warn!(
                    "event=backend_call module=backend status=error operation={} duration_ms={} error_code={}",
                    operation,
                    started_at.elapsed().as_millis(),
                    code.as_deref().unwrap_or("unknown")
                );
                Err(QueryError::Backend {
                    operation: operation.to_string(),
                    code,
                    message,
                })
            }
        }
    }

    /// Calls `operation` and requires a text result.
    pub fn call_text(&self, operation: &str, params: &[BackendValue]) -> QueryResult<String> {
        match self.call(operation, params)? {
            BackendValue::Text(value) => Ok(value),
            other => Err(unexpected(operation, "text", &other)),
        }
    }

    /// Calls `operation` and accepts a text or null result.
    pub fn call_optional_text(
        &self,
        operation: &str,
        params: &[BackendValue],
    ) -> QueryResult<Option<String>> {
        match self.call(operation, params)? {
            BackendValue::Text(value) => Ok(Some(value)),
            BackendValue::Null => Ok(None),
            other => Err(unexpected(operation, "text or null", &other)),
        }
    }

    /// Calls `operation` and requires an integer result.
    pub fn call_integer(&self, operation: &str, params: &[BackendValue]) -> QueryResult<i64> {
        match self.call(operation, params)? {
            BackendValue::Integer(value) => Ok(value),
            other => Err(unexpected(operation, "integer", &other)),
        }
    }
}

fn unexpected(operation: &str, expected: &'static str, found: &BackendValue) -> QueryError {
    QueryError::UnexpectedResult {
        operation: operation.to_string(),
        expected,
        found: found.type_name(),
    }
}
