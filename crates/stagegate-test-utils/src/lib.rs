//! Testing utilities for the stagegate workspace
//!
//! Shared fixtures: the built-in catalog, one demo user per role, and a
//! shorthand for task ids.

#![allow(missing_docs)]

use stagegate_core::{AccessEvaluator, Catalog, ProjectState, UnlockPolicy, UserDirectory};
use stagegate_model::{Role, TaskId, User};

pub fn task(id: u32) -> TaskId {
    TaskId::new(id).unwrap()
}

pub fn builtin_catalog() -> Catalog {
    Catalog::builtin().unwrap()
}

pub fn transitive_catalog() -> Catalog {
    builtin_catalog().with_unlock_policy(UnlockPolicy::Transitive)
}

/// Demo user holding `role`
pub fn user_with_role(role: Role) -> User {
    UserDirectory::demo()
        .iter()
        .find(|u| u.role == role)
        .cloned()
        .unwrap()
}

pub fn admin() -> User {
    user_with_role(Role::SuperAdmin)
}

/// Complete `tasks` in order for `role`, acting as a super-admin
pub fn complete_all(evaluator: &mut AccessEvaluator<'_>, role: Role, tasks: impl IntoIterator<Item = u32>) {
    let admin = admin();
    for id in tasks {
        evaluator
            .set_completion(Some(&admin), task(id), role, true)
            .unwrap();
    }
}

/// Fresh state with `tasks` already completed for `role`
pub fn state_with(catalog: &Catalog, role: Role, tasks: impl IntoIterator<Item = u32>) -> ProjectState {
    let mut state = ProjectState::new();
    complete_all(&mut AccessEvaluator::new(catalog, &mut state), role, tasks);
    state
}
