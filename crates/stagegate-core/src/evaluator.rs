//! Access evaluator
//!
//! Answers every question the stage matrix asks:
//! - may the current user see and interact with a row ([`RowAccess`])
//! - is a task unlocked for a role
//! - what state a task control shows ([`ButtonState`])
//! - may a completion toggle be applied, and apply it
//!
//! Completion state lives in a [`ProjectState`] owned by the caller (one
//! per client). The evaluator borrows it mutably; nothing is global.
//!
//! Rules:
//! - No user: row invisible and inert. Super-admin: every row active and
//!   interactive. Anyone else: only their own row, fully.
//! - A super-admin actor sees every task unlocked. For anyone else a task is
//!   unlocked when its prerequisites are completed *for the same role*:
//!   direct prerequisites under [`UnlockPolicy::OneHop`], every ancestor
//!   under [`UnlockPolicy::Transitive`].
//! - A toggle needs a user who may interact with the row, a task rendered in
//!   that row, and the task unlocked. Both directions are gated the same way.

use crate::catalog::Catalog;
use crate::config::UnlockPolicy;
use crate::error::AccessError;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use stagegate_ledger::{
    AuditEvent, AuditOutcome, AuditTrail, CompletionLedger, LedgerChange,
};
use stagegate_model::{Role, TaskId, User};

/// Row visibility and interactivity for the current user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowAccess {
    /// Row rendered as highlighted
    pub is_active: bool,
    /// Controls in the row accept clicks
    pub can_interact: bool,
}

impl RowAccess {
    /// Neither active nor interactive
    pub const NONE: RowAccess = RowAccess {
        is_active: false,
        can_interact: false,
    };

    /// Active and interactive
    pub const FULL: RowAccess = RowAccess {
        is_active: true,
        can_interact: true,
    };
}

/// Row access of `user` on the row owned by `row`
#[must_use]
pub fn row_access(user: Option<&User>, row: Role) -> RowAccess {
    match user {
        None => RowAccess::NONE,
        Some(user) if user.is_super_admin() => RowAccess::FULL,
        Some(user) if user.role == row => RowAccess::FULL,
        Some(_) => RowAccess::NONE,
    }
}

/// Visual state of a task control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ButtonState {
    /// A completion record exists
    Completed,
    /// Not completed, prerequisites satisfied
    Unlocked,
    /// Not completed, prerequisites outstanding
    Locked,
}

impl ButtonState {
    /// Single-character marker used by the text renderer
    #[must_use]
    pub const fn marker(self) -> char {
        match self {
            ButtonState::Completed => '#',
            ButtonState::Unlocked => 'o',
            ButtonState::Locked => '.',
        }
    }
}

/// One rendered task control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskControl {
    /// Task behind the control
    pub task: TaskId,
    /// Derived state
    pub state: ButtonState,
    /// Rendered as a milestone
    pub prominent: bool,
    /// Clicking would be accepted
    pub interactive: bool,
}

/// Result of an accepted toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// Toggled task
    pub task: TaskId,
    /// Row toggled
    pub role: Role,
    /// Requested completion state, now in force
    pub completed: bool,
    /// What the ledger did
    pub change: LedgerChange,
}

impl ToggleOutcome {
    /// Whether completion state flipped
    #[inline]
    #[must_use]
    pub fn changed(&self) -> bool {
        self.change.flipped()
    }
}

/// Mutable per-project state: the completion ledger and its audit trail
#[derive(Debug, Clone, Default)]
pub struct ProjectState {
    ledger: CompletionLedger,
    audit: AuditTrail,
}

impl ProjectState {
    /// Fresh state with nothing completed
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing ledger with an empty trail
    #[must_use]
    pub fn from_ledger(ledger: CompletionLedger) -> Self {
        Self {
            ledger,
            audit: AuditTrail::new(),
        }
    }

    /// Completion records
    #[inline]
    #[must_use]
    pub fn ledger(&self) -> &CompletionLedger {
        &self.ledger
    }

    /// Toggle attempts so far
    #[inline]
    #[must_use]
    pub fn audit(&self) -> &AuditTrail {
        &self.audit
    }
}

/// Rule engine bound to one catalog and one project's state
#[derive(Debug)]
pub struct AccessEvaluator<'a> {
    catalog: &'a Catalog,
    state: &'a mut ProjectState,
}

impl<'a> AccessEvaluator<'a> {
    /// Bind `catalog` to `state`
    pub fn new(catalog: &'a Catalog, state: &'a mut ProjectState) -> Self {
        Self { catalog, state }
    }

    /// Catalog in use
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        self.catalog
    }

    /// State in use
    #[inline]
    #[must_use]
    pub fn state(&self) -> &ProjectState {
        &*self.state
    }

    /// See [`row_access`]
    #[inline]
    #[must_use]
    pub fn row_access(&self, user: Option<&User>, row: Role) -> RowAccess {
        row_access(user, row)
    }

    /// Whether `role` has completed `task`
    #[inline]
    #[must_use]
    pub fn is_completed(&self, task: TaskId, role: Role) -> bool {
        self.state.ledger.is_completed(task, role)
    }

    /// Prerequisites of `task` not yet completed for `role`, ascending
    ///
    /// Which prerequisites count depends on the catalog's unlock policy.
    #[must_use]
    pub fn outstanding_prerequisites(&self, task: TaskId, role: Role) -> Vec<TaskId> {
        let graph = self.catalog.graph();
        let required = match self.catalog.unlock_policy() {
            UnlockPolicy::OneHop => graph.prerequisites_of(task),
            UnlockPolicy::Transitive => graph.ancestors_of(task),
        };
        required
            .into_iter()
            .filter(|prerequisite| !self.is_completed(*prerequisite, role))
            .collect()
    }

    /// Whether `task` is unlocked for `role` as seen by `actor`
    #[must_use]
    pub fn is_unlocked(&self, actor: Option<&User>, task: TaskId, role: Role) -> bool {
        if actor.is_some_and(User::is_super_admin) {
            return true;
        }
        self.outstanding_prerequisites(task, role).is_empty()
    }

    /// State a control for (task, role) shows to `actor`
    #[must_use]
    pub fn button_state(&self, actor: Option<&User>, task: TaskId, role: Role) -> ButtonState {
        if self.is_completed(task, role) {
            ButtonState::Completed
        } else if self.is_unlocked(actor, task, role) {
            ButtonState::Unlocked
        } else {
            ButtonState::Locked
        }
    }

    /// Control for (task, role) as rendered for `actor`
    #[must_use]
    pub fn control(&self, actor: Option<&User>, task: TaskId, role: Role, prominent: bool) -> TaskControl {
        TaskControl {
            task,
            state: self.button_state(actor, task, role),
            prominent,
            interactive: self.row_access(actor, role).can_interact
                && self.is_unlocked(actor, task, role),
        }
    }

    /// Check whether `actor` may set completion of (task, role)
    ///
    /// # Errors
    /// In order of precedence: [`AccessError::NoUser`],
    /// [`AccessError::PermissionDenied`], [`AccessError::UnknownTask`],
    /// [`AccessError::TaskNotInRow`], [`AccessError::TaskLocked`].
    pub fn check_toggle(&self, actor: Option<&User>, task: TaskId, role: Role) -> Result<(), AccessError> {
        let user = actor.ok_or(AccessError::NoUser)?;

        if !self.row_access(actor, role).can_interact {
            return Err(AccessError::PermissionDenied {
                actor: user.role,
                row: role,
            });
        }
        if !self.catalog.knows_task(task) {
            return Err(AccessError::UnknownTask(task));
        }
        if !self.catalog.layout().row_contains(role, task) {
            return Err(AccessError::TaskNotInRow { task, role });
        }
        if !self.is_unlocked(actor, task, role) {
            return Err(AccessError::TaskLocked {
                task,
                role,
                waiting_on: self.outstanding_prerequisites(task, role),
            });
        }
        Ok(())
    }

    /// Mark (task, role) completed or not completed
    ///
    /// The attempt is appended to the audit trail whatever the result.
    /// Completing an already completed pair replaces its record with a fresh
    /// timestamp.
    ///
    /// # Errors
    /// See [`Self::check_toggle`]. The ledger is untouched on error.
    pub fn set_completion(
        &mut self,
        actor: Option<&User>,
        task: TaskId,
        role: Role,
        completed: bool,
    ) -> Result<ToggleOutcome, AccessError> {
        let event = |outcome| AuditEvent {
            actor: actor.map(|u| u.id.clone()),
            actor_role: actor.map(|u| u.role),
            task,
            row_role: role,
            requested: completed,
            outcome,
        };

        if let Err(err) = self.check_toggle(actor, task, role) {
            tracing::warn!(%task, %role, completed, error = %err, "completion toggle denied");
            self.state.audit.append(event(AuditOutcome::Denied {
                reason: err.kind().to_string(),
            }));
            return Err(err);
        }

        let change = self.state.ledger.set(task, role, completed, Utc::now());
        let outcome = if change.flipped() {
            tracing::info!(%task, %role, completed, "completion toggled");
            AuditOutcome::Applied
        } else {
            tracing::debug!(%task, %role, completed, ?change, "completion unchanged");
            AuditOutcome::Unchanged
        };
        self.state.audit.append(event(outcome));

        Ok(ToggleOutcome {
            task,
            role,
            completed,
            change,
        })
    }
}
