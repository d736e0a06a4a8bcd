//! Backend API procedures for the SQLite reference backend.
//!
//! # Responsibility
//! - Register the management procedures as SQLite scalar functions so they
//!   can be invoked as `SELECT <procedure>(...)`.
//! - Raise backend errors the same way a stored procedure would.
//!
//! # Invariants
//! - Procedures are bound per connection; a new connection must install them.
//! - `get_site_configuration` sees the table contents as of the latest
//!   installation, not live rows.

use super::DbResult;
use log::debug;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use std::collections::HashMap;

pub const PROC_GET_CURRENT_USER: &str = "get_current_user";
pub const PROC_GET_CURRENT_USER_LEVEL: &str = "get_current_user_level";
pub const PROC_GET_SITE_CONFIGURATION: &str = "get_site_configuration";

/// Identity the backend reports for the connection's caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendUser {
    pub username: String,
    /// Raw privilege level text, e.g. `ADMIN`.
    pub level: String,
}

impl BackendUser {
    pub fn new(username: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            level: level.into(),
        }
    }
}

/// Installs the management API procedures on `conn`.
///
/// `get_site_configuration` answers from a copy of `site_configuration` taken
/// here, so rows written afterwards stay invisible to it. Call this again
/// after changing the table; re-registration replaces the previous functions.
///
/// # Errors
/// - Returns an error when `site_configuration` cannot be read or a function
///   cannot be registered.
pub fn install_api_procedures(conn: &Connection, user: &BackendUser) -> DbResult<()> {
    let flags = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;

    let username = user.username.clone();
    conn.create_scalar_function(PROC_GET_CURRENT_USER, 0, flags, move |_| {
        Ok(username.clone())
    })?;

    let level = user.level.clone();
    conn.create_scalar_function(PROC_GET_CURRENT_USER_LEVEL, 0, flags, move |_| {
        Ok(level.clone())
    })?;

    let directives = load_site_configuration(conn)?;
    conn.create_scalar_function(PROC_GET_SITE_CONFIGURATION, 1, flags, move |ctx| {
        let directive: String = ctx.get(0)?;
        directives.get(directive.as_str()).cloned().ok_or_else(|| {
            rusqlite::Error::UserFunctionError(
                format!("unknown site configuration directive: {directive}").into(),
            )
        })
    })?;

    debug!(
        "event=procedures_install module=db status=ok user={}",
        user.username
    );
    Ok(())
}

fn load_site_configuration(conn: &Connection) -> DbResult<HashMap<String, String>> {
    let mut stmt = conn.prepare("SELECT directive, value FROM site_configuration;")?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
    let mut directives = HashMap::new();
    for row in rows {
        let (directive, value): (String, String) = row?;
        directives.insert(directive, value);
    }
    Ok(directives)
}
