//! Access rule properties over the built-in catalog

use proptest::prelude::*;
use stagegate_core::{AccessEvaluator, ButtonState, ProjectState, RowAccess};
use stagegate_model::{Role, TaskId};
use stagegate_test_utils::{admin, builtin_catalog, state_with, task, user_with_role};
use std::collections::HashMap;

/// Every (role, task) pair rendered somewhere in the matrix
fn placed_pairs() -> Vec<(Role, TaskId)> {
    let catalog = builtin_catalog();
    catalog
        .rows()
        .flat_map(|role| {
            catalog
                .layout()
                .row_tasks(role)
                .into_iter()
                .map(move |task| (role, task))
        })
        .collect()
}

fn ordinary_roles() -> impl Iterator<Item = Role> {
    Role::ALL.into_iter().filter(|r| !r.is_super_admin())
}

#[test]
fn other_rows_are_never_interactive() {
    for own in ordinary_roles() {
        let user = user_with_role(own);
        for row in Role::ALL {
            let access = stagegate_core::row_access(Some(&user), row);
            if row == own {
                assert_eq!(access, RowAccess::FULL);
            } else {
                assert!(!access.can_interact, "{own} can interact with {row}");
                assert!(!access.is_active);
            }
        }
    }
}

#[test]
fn super_admin_has_full_access_everywhere() {
    let admin = admin();
    for row in Role::ALL {
        assert_eq!(stagegate_core::row_access(Some(&admin), row), RowAccess::FULL);
    }
}

#[test]
fn every_dependency_gates_its_dependent() {
    let catalog = builtin_catalog();
    let graph = catalog.graph();

    for dependent in graph.tasks() {
        for prerequisite in graph.prerequisites_of(dependent) {
            let role = catalog
                .rows()
                .find(|r| catalog.layout().row_contains(*r, prerequisite))
                .unwrap();
            let user = user_with_role(role);
            let mut state = ProjectState::new();
            let mut eval = AccessEvaluator::new(&catalog, &mut state);

            assert!(!eval.is_unlocked(Some(&user), dependent, role));
            eval.set_completion(Some(&admin()), prerequisite, role, true).unwrap();
            assert!(
                eval.is_unlocked(Some(&user), dependent, role),
                "{dependent} should unlock once {prerequisite} is done for {role}"
            );
        }
    }
}

#[test]
fn completion_is_per_role() {
    let catalog = builtin_catalog();
    let mut state = state_with(&catalog, Role::AlphaSales, [1]);
    let eval = AccessEvaluator::new(&catalog, &mut state);
    let ssc = user_with_role(Role::AlphaSsc);

    assert!(eval.is_completed(task(1), Role::AlphaSales));
    assert!(!eval.is_completed(task(1), Role::AlphaSsc));
    assert!(!eval.is_unlocked(Some(&ssc), task(2), Role::AlphaSsc));
}

#[test]
fn shared_milestone_completes_independently() {
    let catalog = builtin_catalog();
    let mut state = ProjectState::new();
    let mut eval = AccessEvaluator::new(&catalog, &mut state);
    let strategy = user_with_role(Role::EsporaStrategy);

    eval.set_completion(Some(&strategy), task(101), Role::EsporaStrategy, true)
        .unwrap();

    assert_eq!(
        eval.button_state(Some(&strategy), task(101), Role::EsporaStrategy),
        ButtonState::Completed
    );
    for role in catalog.rows().filter(|r| *r != Role::EsporaStrategy) {
        assert_eq!(
            eval.button_state(Some(&strategy), task(101), role),
            ButtonState::Unlocked
        );
    }
}

proptest! {
    #[test]
    fn prop_one_record_per_pair(
        writes in proptest::collection::vec((any::<prop::sample::Index>(), any::<bool>()), 0..60)
    ) {
        let pairs = placed_pairs();
        let catalog = builtin_catalog();
        let admin = admin();
        let mut state = ProjectState::new();
        let mut eval = AccessEvaluator::new(&catalog, &mut state);
        let mut last = HashMap::new();

        for (index, completed) in writes {
            let (role, task) = *index.get(&pairs);
            eval.set_completion(Some(&admin), task, role, completed).unwrap();
            last.insert((task, role), completed);
        }

        let expected = last.values().filter(|c| **c).count();
        prop_assert_eq!(state.ledger().len(), expected);
    }

    #[test]
    fn prop_completing_twice_equals_once(index in any::<prop::sample::Index>()) {
        let pairs = placed_pairs();
        let (role, task) = *index.get(&pairs);
        let catalog = builtin_catalog();
        let admin = admin();

        let mut once = ProjectState::new();
        AccessEvaluator::new(&catalog, &mut once)
            .set_completion(Some(&admin), task, role, true)
            .unwrap();

        let mut twice = ProjectState::new();
        let mut eval = AccessEvaluator::new(&catalog, &mut twice);
        eval.set_completion(Some(&admin), task, role, true).unwrap();
        eval.set_completion(Some(&admin), task, role, true).unwrap();

        prop_assert_eq!(once.ledger().len(), twice.ledger().len());
        prop_assert!(twice.ledger().is_completed(task, role));
    }

    #[test]
    fn prop_super_admin_sees_everything_unlocked(
        completed in proptest::collection::vec(any::<prop::sample::Index>(), 0..30)
    ) {
        let pairs = placed_pairs();
        let catalog = builtin_catalog();
        let admin = admin();
        let mut state = ProjectState::new();
        let mut eval = AccessEvaluator::new(&catalog, &mut state);

        for index in completed {
            let (role, task) = *index.get(&pairs);
            eval.set_completion(Some(&admin), task, role, true).unwrap();
        }

        for (role, task) in &pairs {
            prop_assert!(eval.is_unlocked(Some(&admin), *task, *role));
            prop_assert_ne!(eval.button_state(Some(&admin), *task, *role), ButtonState::Locked);
        }
    }

    #[test]
    fn prop_denials_leave_ledger_untouched(
        index in any::<prop::sample::Index>(),
        actor_index in 0..8usize,
        completed in any::<bool>(),
    ) {
        let pairs = placed_pairs();
        let (role, task) = *index.get(&pairs);
        let actor_role = ordinary_roles().nth(actor_index).unwrap();
        prop_assume!(actor_role != role);

        let catalog = builtin_catalog();
        let actor = user_with_role(actor_role);
        let mut state = ProjectState::new();
        let mut eval = AccessEvaluator::new(&catalog, &mut state);

        let err = eval.set_completion(Some(&actor), task, role, completed).unwrap_err();
        prop_assert!(err.is_denial());
        prop_assert!(state.ledger().is_empty());
        prop_assert_eq!(state.audit().len(), 1);
    }
}
