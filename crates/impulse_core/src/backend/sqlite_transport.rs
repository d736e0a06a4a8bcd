//! SQLite transport: procedures invoked as `SELECT <operation>(?1, ...)`.
//!
//! Schema-qualified operations (`api.get_current_user`) call the unqualified
//! function, since SQLite functions live in one flat namespace per connection.
//!
//! # Invariants
//! - One prepared statement and one row per call.
//! - SQLite statement failures are reported as the backend error marker;
//!   anything else is a transport failure.

use super::{BackendTransport, BackendValue, RawResponse, TransportError};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

/// Transport executing procedures on a borrowed SQLite connection.
pub struct SqliteTransport<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTransport<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl BackendTransport for SqliteTransport<'_> {
    fn execute(
        &self,
        operation: &str,
        params: &[BackendValue],
    ) -> Result<RawResponse, TransportError> {
        let procedure = sqlite_function_name(operation).ok_or_else(|| {
            TransportError::new(format!("refusing to execute operation `{operation}`"))
        })?;

        let sql = format!("SELECT {procedure}({});", placeholders(params.len()));
        let bind_values = params.iter().map(to_sql_value);
        let result = self
            .conn
            .query_row(&sql, params_from_iter(bind_values), |row| {
                row.get::<_, Value>(0)
            });

        match result {
            Ok(value) => Ok(RawResponse::Success(from_sql_value(value))),
            Err(rusqlite::Error::SqliteFailure(err, message)) => Ok(RawResponse::Error {
                code: Some(err.extended_code.to_string()),
                message: message.unwrap_or_else(|| err.to_string()),
            }),
            Err(rusqlite::Error::UserFunctionError(err)) => Ok(RawResponse::Error {
                code: None,
                message: err.to_string(),
            }),
            Err(other) => Err(TransportError::with_source(
                format!("sqlite call `{operation}` failed"),
                other,
            )),
        }
    }
}

/// Maps an operation name onto a callable SQLite function name.
///
/// SQLite functions have no schema, so a qualifier such as `api.` is dropped.
/// The result is spliced into SQL text and must be a bare identifier.
fn sqlite_function_name(operation: &str) -> Option<&str> {
    let name = match operation.split_once('.') {
        Some((schema, name)) if is_identifier(schema) => name,
        Some(_) => return None,
        None => operation,
    };
    is_identifier(name).then_some(name)
}

fn is_identifier(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn placeholders(count: usize) -> String {
    (1..=count)
        .map(|index| format!("?{index}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn to_sql_value(value: &BackendValue) -> Value {
    match value {
        BackendValue::Null => Value::Null,
        BackendValue::Integer(v) => Value::Integer(*v),
        BackendValue::Real(v) => Value::Real(*v),
        BackendValue::Text(v) => Value::Text(v.clone()),
        BackendValue::Blob(v) => Value::Blob(v.clone()),
    }
}

fn from_sql_value(value: Value) -> BackendValue {
    match value {
        Value::Null => BackendValue::Null,
        Value::Integer(v) => BackendValue::Integer(v),
        Value::Real(v) => BackendValue::Real(v),
        Value::Text(v) => BackendValue::Text(v),
        Value::Blob(v) => BackendValue::Blob(v),
    }
}
