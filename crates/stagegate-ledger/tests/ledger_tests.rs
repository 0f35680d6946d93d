//! Ledger and audit trail behaviour across crate boundaries

use pretty_assertions::assert_eq;
use stagegate_ledger::audit::verify_chain;
use stagegate_ledger::{
    AuditEntry, AuditError, AuditEvent, AuditOutcome, AuditTrail, CompletionRecord, LedgerChange,
    SharedLedger,
};
use stagegate_model::{Role, TaskId, UserId};

fn t(id: u32) -> TaskId {
    TaskId::new(id).unwrap()
}

fn attempt(task: u32, outcome: AuditOutcome) -> AuditEvent {
    AuditEvent {
        actor: Some(UserId::from("7")),
        actor_role: Some(Role::EsporaManagement),
        task: t(task),
        row_role: Role::EsporaManagement,
        requested: true,
        outcome,
    }
}

#[test]
fn exported_trail_still_verifies() {
    let mut trail = AuditTrail::new();
    trail.append(attempt(53, AuditOutcome::Applied));
    trail.append(attempt(55, AuditOutcome::Denied {
        reason: "task-locked".into(),
    }));
    trail.append(attempt(54, AuditOutcome::Applied));

    let json = serde_json::to_string(trail.entries()).unwrap();
    let restored: Vec<AuditEntry> = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, trail.entries().to_vec());
    assert_eq!(verify_chain(&restored), Ok(()));
}

#[test]
fn edited_export_fails_verification() {
    let mut trail = AuditTrail::new();
    trail.append(attempt(53, AuditOutcome::Applied));
    trail.append(attempt(54, AuditOutcome::Applied));

    let mut value = serde_json::to_value(trail.entries()).unwrap();
    value[0]["task"] = serde_json::json!(58);
    let edited: Vec<AuditEntry> = serde_json::from_value(value).unwrap();

    assert_eq!(
        verify_chain(&edited),
        Err(AuditError::IntegrityViolation { sequence: 0 })
    );
}

#[test]
fn outcome_is_tagged_in_json() {
    let value = serde_json::to_value(AuditOutcome::Denied {
        reason: "permission-denied".into(),
    })
    .unwrap();
    assert_eq!(
        value,
        serde_json::json!({"outcome": "denied", "reason": "permission-denied"})
    );
}

#[test]
fn shared_ledger_snapshot_is_detached() {
    let shared = SharedLedger::default();
    assert_eq!(
        shared.compare_and_set(t(101), Role::AlphaSsc, false, true),
        Ok(LedgerChange::Inserted)
    );

    let snapshot = shared.snapshot();
    shared
        .compare_and_set(t(101), Role::AlphaSsc, true, false)
        .unwrap();

    assert!(snapshot.is_completed(t(101), Role::AlphaSsc));
    assert!(!shared.is_completed(t(101), Role::AlphaSsc));
    assert_eq!(shared.query(t(101), Role::AlphaSsc), None::<CompletionRecord>);
}
