//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `impulse_core` wiring end to end: config, logging, database,
//!   backend procedures and the active selection.
//! - Keep output deterministic for quick local sanity checks.

use impulse_core::db::{install_api_procedures, open_db, open_db_in_memory};
use impulse_core::{
    init_logging_from, ActiveContextStore, AuditTrail, CoreConfig, IdentityProvider,
    ManagementQueries, SessionId, SqliteSessionStore, SqliteTransport, System,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("impulse_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = CoreConfig::from_env();
    init_logging_from(&config)?;

    let conn = match &config.db_path {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    install_api_procedures(&conn, &config.backend_user)?;

    let queries = ManagementQueries::new(SqliteTransport::new(&conn));
    let user = queries.current_user()?;
    let level = queries.current_privilege_level()?;
    println!("impulse_core version={}", impulse_core::core_version());
    println!("impulse_core user={user} level={level}");

    let session = SessionId::generate();
    let store = ActiveContextStore::new(SqliteSessionStore::new(&conn));
    let probe = System::new(0, "smoke-probe", user.clone(), AuditTrail::new(0, 0, user));
    store.set_active(&session, &probe)?;
    let resolved: System = store.resolve_active(&session)?;
    log::info!(
        "event=cli_probe module=cli status=ok session_id={} system={}",
        session,
        resolved.name()
    );
    println!("impulse_core active_system={}", resolved.name());

    Ok(())
}
