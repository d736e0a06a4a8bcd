use impulse_core::{AuditTrail, Audited, System, UserId};

#[test]
fn constructed_fields_read_back_unchanged() {
    let cases = [
        (0, 0, "root"),
        (1_300_000_000_000, 1_300_000_000_500, "jdoe"),
        (-86_400_000, i64::MAX, ""),
    ];

    for (created, modified, user) in cases {
        let trail = AuditTrail::new(created, modified, user);
        for _ in 0..2 {
            assert_eq!(trail.created_at(), created);
            assert_eq!(trail.modified_at(), modified);
            assert_eq!(trail.last_modifier(), &UserId::new(user));
        }
    }
}

#[test]
fn entity_exposes_its_embedded_trail() {
    let trail = AuditTrail::new(100, 200, "jdoe");
    let system = System::new(42, "web01", "jdoe", trail.clone());

    assert_eq!(system.audit_trail(), &trail);
    assert_eq!(system.created_at(), 100);
    assert_eq!(system.modified_at(), 200);
    assert_eq!(system.last_modifier().as_str(), "jdoe");
}

#[test]
fn generic_provenance_rendering_works_for_any_audited_type() {
    fn provenance(entity: &impl Audited) -> String {
        format!(
            "created {} modified {} by {}",
            entity.created_at(),
            entity.modified_at(),
            entity.last_modifier()
        )
    }

    let system = System::new(1, "db01", "asmith", AuditTrail::new(5, 6, "asmith"));
    assert_eq!(provenance(&system), "created 5 modified 6 by asmith");
    assert_eq!(
        provenance(&AuditTrail::new(7, 8, "jdoe")),
        "created 7 modified 8 by jdoe"
    );
}

#[test]
fn modification_produces_new_instance() {
    let system = System::new(1, "db01", "asmith", AuditTrail::new(5, 6, "asmith"));
    let revised = system.revised(9, "jdoe");

    assert_ne!(system, revised);
    assert_eq!(system.modified_at(), 6);
    assert_eq!(revised.modified_at(), 9);
    assert_eq!(revised.created_at(), system.created_at());
}
