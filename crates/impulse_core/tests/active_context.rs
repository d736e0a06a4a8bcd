use impulse_core::db::{open_db, open_db_in_memory};
use impulse_core::{
    ActiveContextStore, AuditTrail, ContextError, MemorySessionStore, SessionId, SessionStore,
    SqliteSessionStore, System, ACTIVE_SYSTEM_KEY,
};
use serde::{Deserialize, Serialize};

fn system(id: i64) -> System {
    System::new(id, format!("host{id}"), "jdoe", AuditTrail::new(1_000, 2_000, "jdoe"))
}

#[test]
fn select_reselect_scenario() {
    let conn = open_db_in_memory().unwrap();
    let store = ActiveContextStore::new(SqliteSessionStore::new(&conn));
    let session = SessionId::parse("abc").unwrap();

    let err = store.resolve_active::<System>(&session).unwrap_err();
    assert!(matches!(err, ContextError::NotFound { .. }));

    store.set_active(&session, &system(42)).unwrap();
    assert_eq!(store.resolve_active::<System>(&session).unwrap(), system(42));

    store.set_active(&session, &system(7)).unwrap();
    assert_eq!(store.resolve_active::<System>(&session).unwrap(), system(7));
}

#[test]
fn round_trip_preserves_every_field() {
    let store = ActiveContextStore::new(MemorySessionStore::new());
    let session = SessionId::generate();
    let original = System::new(9, "edge-rtr", "netops", AuditTrail::new(-5, 0, "admin"))
        .with_os_name("Cisco IOS")
        .with_comment("ünïcode \"quoted\"\nmultiline");

    store.set_active(&session, &original).unwrap();

    assert_eq!(store.resolve_active::<System>(&session).unwrap(), original);
}

#[test]
fn selection_survives_across_independent_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sessions.db");
    let session = SessionId::parse("request-spanning").unwrap();

    {
        let conn = open_db(&path).unwrap();
        let store = ActiveContextStore::new(SqliteSessionStore::new(&conn));
        store.set_active(&session, &system(42)).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let store = ActiveContextStore::new(SqliteSessionStore::new(&conn));
    assert_eq!(store.resolve_active::<System>(&session).unwrap(), system(42));
}

#[test]
fn sessions_do_not_see_each_other() {
    let conn = open_db_in_memory().unwrap();
    let store = ActiveContextStore::new(SqliteSessionStore::new(&conn));
    let alice = SessionId::parse("alice").unwrap();
    let bob = SessionId::parse("bob").unwrap();

    store.set_active(&alice, &system(1)).unwrap();

    assert!(store.has_active(&alice).unwrap());
    assert!(!store.has_active(&bob).unwrap());
    let err = store.resolve_active::<System>(&bob).unwrap_err();
    assert!(err.requires_reselection());
}

#[test]
fn corrupt_snapshot_is_a_serialization_error() {
    let conn = open_db_in_memory().unwrap();
    let sessions = SqliteSessionStore::new(&conn);
    let session = SessionId::parse("abc").unwrap();
    sessions
        .put(&session, ACTIVE_SYSTEM_KEY, b"\xff\xfe garbage")
        .unwrap();

    let store = ActiveContextStore::new(&sessions);
    let err = store.resolve_active::<System>(&session).unwrap_err();

    assert!(matches!(err, ContextError::Serialization(_)));
    assert!(!err.requires_reselection());
}

#[test]
fn snapshot_of_other_type_is_a_serialization_error() {
    #[derive(Serialize, Deserialize)]
    struct Zone {
        zone: String,
    }

    let store = ActiveContextStore::new(MemorySessionStore::new());
    let session = SessionId::parse("abc").unwrap();
    store
        .set_active(
            &session,
            &Zone {
                zone: "example.com".to_string(),
            },
        )
        .unwrap();

    let err = store.resolve_active::<System>(&session).unwrap_err();
    assert!(matches!(err, ContextError::Serialization(_)));
}

#[test]
fn resolve_lazily_starts_session_storage() {
    let conn = open_db_in_memory().unwrap();
    let store = ActiveContextStore::new(SqliteSessionStore::new(&conn));
    let session = SessionId::parse("fresh").unwrap();

    let _ = store.resolve_active::<System>(&session);
    let _ = store.resolve_active::<System>(&session);

    let started: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sessions WHERE session_id = ?1;",
            [session.as_str()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(started, 1);
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoadReading {
    host: String,
    load: f64,
    samples: Vec<f64>,
}

fn bits(values: &[f64]) -> Vec<u64> {
    values.iter().map(|value| value.to_bits()).collect()
}

#[test]
fn float_fields_round_trip_bit_for_bit() {
    let edge_values = vec![
        0.1,
        0.30000000000000004,
        -0.0,
        f64::MIN_POSITIVE,
        5e-324,
        1.0715660391465826e-75,
        f64::MAX,
        f64::MIN,
        f64::EPSILON,
        std::f64::consts::PI,
    ];
    let conn = open_db_in_memory().unwrap();
    let store = ActiveContextStore::new(SqliteSessionStore::new(&conn));
    let session = SessionId::parse("metrics").unwrap();

    for value in &edge_values {
        let reading = LoadReading {
            host: "web01".to_string(),
            load: *value,
            samples: edge_values.clone(),
        };
        store.set_active(&session, &reading).unwrap();

        let resolved: LoadReading = store.resolve_active(&session).unwrap();
        assert_eq!(resolved.host, reading.host);
        assert_eq!(resolved.load.to_bits(), value.to_bits(), "{value:e}");
        assert_eq!(bits(&resolved.samples), bits(&edge_values));
    }
}

#[test]
fn non_finite_floats_are_restored_exactly() {
    let store = ActiveContextStore::new(MemorySessionStore::new());
    let session = SessionId::parse("metrics").unwrap();
    let quiet_nan_with_payload = f64::from_bits(0x7ff8_0000_0000_beef);

    for value in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN, quiet_nan_with_payload] {
        let reading = LoadReading {
            host: "web01".to_string(),
            load: value,
            samples: vec![value, 1.5],
        };
        store.set_active(&session, &reading).unwrap();

        let resolved: LoadReading = store.resolve_active(&session).unwrap();
        assert_eq!(resolved.load.to_bits(), value.to_bits());
        assert_eq!(bits(&resolved.samples), bits(&reading.samples));
    }
}

#[test]
fn pseudo_random_floats_round_trip_bit_for_bit() {
    let store = ActiveContextStore::new(MemorySessionStore::new());
    let session = SessionId::parse("metrics").unwrap();
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    let mut next_bits = move || {
        // xorshift64
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    for _ in 0..200 {
        let samples: Vec<f64> = (0..64).map(|_| f64::from_bits(next_bits())).collect();
        let reading = LoadReading {
            host: "batch".to_string(),
            load: samples[0],
            samples,
        };
        store.set_active(&session, &reading).unwrap();

        let resolved: LoadReading = store.resolve_active(&session).unwrap();
        assert_eq!(resolved.load.to_bits(), reading.load.to_bits());
        assert_eq!(bits(&resolved.samples), bits(&reading.samples));
    }
}
