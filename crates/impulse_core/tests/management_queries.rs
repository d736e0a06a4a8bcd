use impulse_core::db::{install_api_procedures, open_db_in_memory, BackendUser};
use impulse_core::{
    IdentityProvider, ManagementQueries, PrivilegeLevel, QueryDelegate, QueryError,
    SqliteTransport, UserId,
};

#[test]
fn current_user_and_level_come_from_backend() {
    let conn = open_db_in_memory().unwrap();
    install_api_procedures(&conn, &BackendUser::new("jdoe", "ADMIN")).unwrap();
    let queries = ManagementQueries::new(SqliteTransport::new(&conn));

    assert_eq!(queries.current_user().unwrap(), UserId::new("jdoe"));
    assert_eq!(queries.current_user_level().unwrap(), "ADMIN");
    assert_eq!(
        queries.current_privilege_level().unwrap(),
        PrivilegeLevel::Admin
    );
}

#[test]
fn identity_provider_is_usable_as_trait_object() {
    let conn = open_db_in_memory().unwrap();
    install_api_procedures(&conn, &BackendUser::new("svc", "program")).unwrap();
    let queries = ManagementQueries::new(SqliteTransport::new(&conn));
    let provider: &dyn IdentityProvider = &queries;

    assert_eq!(provider.current_user().unwrap().as_str(), "svc");
    assert_eq!(
        provider.current_privilege_level().unwrap(),
        PrivilegeLevel::Program
    );
}

#[test]
fn unknown_level_text_is_unexpected_result() {
    let conn = open_db_in_memory().unwrap();
    install_api_procedures(&conn, &BackendUser::new("jdoe", "superuser")).unwrap();
    let queries = ManagementQueries::new(SqliteTransport::new(&conn));

    let err = queries.current_privilege_level().unwrap_err();
    assert!(matches!(err, QueryError::UnexpectedResult { .. }));
}

#[test]
fn site_configuration_reads_directives() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO site_configuration (directive, value) VALUES ('motd', 'hello');",
        [],
    )
    .unwrap();
    install_api_procedures(&conn, &BackendUser::new("jdoe", "USER")).unwrap();
    let queries = ManagementQueries::new(SqliteTransport::new(&conn));

    assert_eq!(queries.site_configuration("motd").unwrap(), "hello");
    assert_eq!(queries.site_configuration("dhcp_auto_api").unwrap(), "TRUE");

    let err = queries.site_configuration("missing").unwrap_err();
    assert!(matches!(err, QueryError::Backend { .. }));
}

#[test]
fn procedures_are_missing_until_installed() {
    let conn = open_db_in_memory().unwrap();
    let queries = ManagementQueries::new(SqliteTransport::new(&conn));

    let err = queries.current_user().unwrap_err();
    assert!(matches!(err, QueryError::Backend { .. }));
}

#[test]
fn site_configuration_changes_are_visible_after_reinstall() {
    let conn = open_db_in_memory().unwrap();
    let user = BackendUser::new("jdoe", "ADMIN");
    install_api_procedures(&conn, &user).unwrap();
    conn.execute(
        "INSERT INTO site_configuration (directive, value) VALUES ('motd', 'late');",
        [],
    )
    .unwrap();

    {
        let queries = ManagementQueries::new(SqliteTransport::new(&conn));
        let err = queries.site_configuration("motd").unwrap_err();
        assert!(matches!(err, QueryError::Backend { .. }));
    }

    install_api_procedures(&conn, &user).unwrap();
    let queries = ManagementQueries::new(SqliteTransport::new(&conn));
    assert_eq!(queries.site_configuration("motd").unwrap(), "late");
}

#[test]
fn schema_qualified_procedure_reaches_the_real_procedure() {
    let conn = open_db_in_memory().unwrap();
    install_api_procedures(&conn, &BackendUser::new("jdoe", "USER")).unwrap();
    let delegate = QueryDelegate::new(SqliteTransport::new(&conn));

    assert_eq!(delegate.call_text("api.get_current_user", &[]).unwrap(), "jdoe");

    let err = delegate
        .call_text("api.get_site_configuration", &["bogus".into()])
        .unwrap_err();
    assert_eq!(
        err.backend_message(),
        Some("unknown site configuration directive: bogus")
    );
}
