//! End-to-end scenarios: sessions, catalog files, panels and the matrix

use pretty_assertions::assert_eq;
use stagegate_core::{
    AccessError, AccessEvaluator, ButtonState, Catalog, ClientRegistry, ConfigError, ProjectState,
    Session, UserDirectory,
};
use stagegate_graph::GraphError;
use stagegate_ledger::AuditOutcome;
use stagegate_model::{panels_for, ClientId, Panel, Role};
use stagegate_test_utils::{builtin_catalog, state_with, task, transitive_catalog, user_with_role};
use std::io::Write;
use std::sync::Arc;

fn signed_in(username: &str) -> Session {
    let user = UserDirectory::demo().sign_in(username).unwrap();
    let mut session = Session::start(Arc::new(builtin_catalog()), user);
    session
        .select_client(&ClientRegistry::demo(), &ClientId::from("1"))
        .unwrap();
    session
}

#[test]
fn completing_task_one_unlocks_and_relocks_task_two() {
    let mut session = signed_in("sales");
    let sales = session.user().clone();

    {
        let eval = session.evaluator().unwrap();
        assert!(!eval.is_unlocked(Some(&sales), task(2), Role::AlphaSales));
    }

    session.toggle(task(1), Role::AlphaSales, true).unwrap();
    {
        let eval = session.evaluator().unwrap();
        assert!(eval.is_unlocked(Some(&sales), task(2), Role::AlphaSales));
        assert!(eval.is_completed(task(1), Role::AlphaSales));
    }

    session.toggle(task(1), Role::AlphaSales, false).unwrap();
    let eval = session.evaluator().unwrap();
    assert!(!eval.is_unlocked(Some(&sales), task(2), Role::AlphaSales));
    assert!(!eval.is_completed(task(1), Role::AlphaSales));
}

#[test]
fn ssc_cannot_toggle_strategy_row() {
    let mut session = signed_in("ssc");

    let err = session
        .toggle(task(20), Role::EsporaStrategy, true)
        .unwrap_err();
    assert_eq!(
        err,
        AccessError::PermissionDenied {
            actor: Role::AlphaSsc,
            row: Role::EsporaStrategy
        }
    );

    let state = session.project(&ClientId::from("1")).unwrap();
    assert!(state.ledger().is_empty());
    let entry = &state.audit().entries()[0];
    assert_eq!(
        entry.outcome,
        AuditOutcome::Denied {
            reason: "permission-denied".into()
        }
    );
    assert!(state.audit().verify_integrity().is_ok());
}

#[test]
fn uncompleting_a_locked_task_is_refused() {
    let catalog = builtin_catalog();
    let mut state = state_with(&catalog, Role::AlphaSales, [1, 2]);
    let sales = user_with_role(Role::AlphaSales);
    let mut eval = AccessEvaluator::new(&catalog, &mut state);

    eval.set_completion(Some(&sales), task(1), Role::AlphaSales, false)
        .unwrap();
    assert_eq!(
        eval.button_state(Some(&sales), task(2), Role::AlphaSales),
        ButtonState::Completed
    );
    assert!(matches!(
        eval.set_completion(Some(&sales), task(2), Role::AlphaSales, false),
        Err(AccessError::TaskLocked { .. })
    ));
}

#[test]
fn transitive_policy_relocks_the_whole_chain() {
    let catalog = transitive_catalog();
    let mut state = state_with(&catalog, Role::AlphaSales, [1, 2, 3, 4]);
    let sales = user_with_role(Role::AlphaSales);
    let mut eval = AccessEvaluator::new(&catalog, &mut state);

    assert!(eval.is_unlocked(Some(&sales), task(5), Role::AlphaSales));
    eval.set_completion(Some(&sales), task(1), Role::AlphaSales, false)
        .unwrap();
    assert!(!eval.is_unlocked(Some(&sales), task(5), Role::AlphaSales));
    assert_eq!(
        eval.outstanding_prerequisites(task(5), Role::AlphaSales),
        vec![task(1)]
    );

    let one_hop = builtin_catalog();
    let mut other = state_with(&one_hop, Role::AlphaSales, [2, 3, 4]);
    let eval = AccessEvaluator::new(&one_hop, &mut other);
    assert!(eval.is_unlocked(Some(&sales), task(5), Role::AlphaSales));
}

#[test]
fn accompaniment_lanes_close_on_their_own_milestones() {
    let catalog = builtin_catalog();
    let first_lane: Vec<u32> = (60..=70).collect();
    let mut state = state_with(&catalog, Role::EsporaAccompaniment, first_lane);
    let user = user_with_role(Role::EsporaAccompaniment);
    let eval = AccessEvaluator::new(&catalog, &mut state);

    assert!(eval.is_unlocked(Some(&user), task(82), Role::EsporaAccompaniment));
    assert!(!eval.is_unlocked(Some(&user), task(83), Role::EsporaAccompaniment));
    assert!(eval.is_unlocked(Some(&user), task(71), Role::EsporaAccompaniment));
}

#[test]
fn task_outside_row_is_rejected() {
    let mut session = signed_in("strategy");
    assert_eq!(
        session.toggle(task(1), Role::EsporaStrategy, true),
        Err(AccessError::TaskNotInRow {
            task: task(1),
            role: Role::EsporaStrategy
        })
    );
    assert_eq!(
        session.toggle(task(500), Role::EsporaStrategy, true),
        Err(AccessError::UnknownTask(task(500)))
    );
}

#[test]
fn sessions_keep_clients_apart() {
    let registry = ClientRegistry::demo();
    let mut session = signed_in("diffusion");
    session.toggle(task(30), Role::EsporaDiffusion, true).unwrap();

    session
        .select_client(&registry, &ClientId::from("4"))
        .unwrap();
    let snapshot = session.matrix().unwrap();
    let row = snapshot.row(Role::EsporaDiffusion).unwrap();
    assert!(row.controls().all(|c| c.state != ButtonState::Completed));

    session
        .select_client(&registry, &ClientId::from("1"))
        .unwrap();
    let snapshot = session.matrix().unwrap();
    let row = snapshot.row(Role::EsporaDiffusion).unwrap();
    assert_eq!(
        row.controls().filter(|c| c.state == ButtonState::Completed).count(),
        1
    );
    session.end();
}

#[test]
fn matrix_snapshot_for_management() {
    let mut session = signed_in("management");
    let snapshot = session.matrix().unwrap();

    assert_eq!(snapshot.viewer, Some(Role::EsporaManagement));
    let active: Vec<Role> = snapshot
        .rows
        .iter()
        .filter(|r| r.access.is_active)
        .map(|r| r.role)
        .collect();
    assert_eq!(active, vec![Role::EsporaManagement]);

    let row = snapshot.row(Role::EsporaManagement).unwrap();
    let has_access: Vec<bool> = row.cells.iter().map(|c| c.has_access).collect();
    assert_eq!(has_access, vec![false, true, true, true, true]);
    let presentation: Vec<u32> = row.cells[3].controls.iter().map(|c| c.task.get()).collect();
    assert_eq!(presentation, vec![59]);

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["viewer"], "espora-management");
    assert_eq!(json["rows"].as_array().unwrap().len(), 8);
    assert_eq!(json["rows"][0]["cells"][0]["controls"][0]["state"], "unlocked");
}

#[test]
fn panels_follow_permissions() {
    let catalog = builtin_catalog();
    let table = catalog.permissions();

    let panels = |role| {
        panels_for(table, Some(role))
            .into_iter()
            .map(|p| p.panel)
            .collect::<Vec<_>>()
    };

    assert_eq!(panels(Role::SuperAdmin), Panel::ALL.to_vec());
    assert_eq!(
        panels(Role::EsporaManagement),
        vec![
            Panel::ClientManagement,
            Panel::UserManagement,
            Panel::SystemConfig,
            Panel::Analytics
        ]
    );
    assert_eq!(
        panels(Role::TestankStudies),
        vec![Panel::ClientManagement, Panel::Analytics]
    );
    assert!(panels_for(table, None).is_empty());

    let sales = panels_for(table, Some(Role::AlphaSales));
    assert!(sales[0].can_create && sales[0].can_edit && !sales[0].can_delete);
}

#[test]
fn catalog_files_load_by_extension() {
    let dir = tempfile::tempdir().unwrap();

    let yaml = dir.path().join("catalog.yaml");
    std::fs::write(&yaml, include_str!("../config/default.yaml")).unwrap();
    let from_yaml = Catalog::from_path(&yaml).unwrap();
    assert_eq!(from_yaml.graph().task_count(), builtin_catalog().graph().task_count());

    let toml_path = dir.path().join("catalog.toml");
    let mut file = std::fs::File::create(&toml_path).unwrap();
    writeln!(
        file,
        r#"
unlock_policy = "transitive"

[[roles]]
role = "super-admin"
permissions = ["view-clients"]

[[roles]]
role = "espora-production"
permissions = ["view-clients"]
stages = ["development"]

[[dependencies]]
task = 41
requires = [40]

[[layout]]
role = "espora-production"
stage = "development"
cell = {{ kind = "track", steps = [40], milestones = [41] }}
"#
    )
    .unwrap();
    let from_toml = Catalog::from_path(&toml_path).unwrap();
    assert_eq!(from_toml.graph().task_count(), 2);
    assert_eq!(from_toml.rows().collect::<Vec<_>>(), vec![Role::EsporaProduction]);

    let json_path = dir.path().join("catalog.json");
    std::fs::write(
        &json_path,
        r#"{"roles": [{"role": "super-admin"}], "dependencies": [{"task": 7, "requires": [7]}]}"#,
    )
    .unwrap();
    assert!(matches!(
        Catalog::from_path(&json_path),
        Err(ConfigError::Graph(GraphError::SelfDependency(_)))
    ));

    assert!(matches!(
        Catalog::from_path(dir.path().join("missing.yaml")),
        Err(ConfigError::Io { .. })
    ));
}

#[test]
fn cyclic_catalog_is_rejected() {
    let source = r"
roles:
  - role: super-admin
dependencies:
  - { task: 1, requires: [3] }
  - { task: 2, requires: [1] }
  - { task: 3, requires: [2] }
";
    match Catalog::from_yaml_str(source) {
        Err(ConfigError::Graph(GraphError::CyclicDependency { cycle })) => {
            assert_eq!(cycle, vec![task(1), task(2), task(3)]);
        }
        other => panic!("expected a cycle error, got {other:?}"),
    }
}

#[test]
fn audit_trail_records_every_attempt() {
    let catalog = builtin_catalog();
    let mut state = ProjectState::new();
    let studies = user_with_role(Role::TestankStudies);
    let mut eval = AccessEvaluator::new(&catalog, &mut state);

    eval.set_completion(Some(&studies), task(90), Role::TestankStudies, true)
        .unwrap();
    let _ = eval.set_completion(Some(&studies), task(92), Role::TestankStudies, true);
    let _ = eval.set_completion(None, task(91), Role::TestankStudies, true);

    let trail = state.audit();
    assert_eq!(trail.len(), 3);
    let outcomes: Vec<_> = trail.entries().iter().map(|e| e.outcome.clone()).collect();
    assert_eq!(
        outcomes,
        vec![
            AuditOutcome::Applied,
            AuditOutcome::Denied {
                reason: "task-locked".into()
            },
            AuditOutcome::Denied {
                reason: "no-user".into()
            },
        ]
    );
    assert_eq!(trail.entries()[2].actor, None);
    assert!(trail.verify_integrity().is_ok());
}
