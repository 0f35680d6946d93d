//! Lock-guarded ledger for multi-writer backends
//!
//! Writers read the state they expect, then commit with
//! [`SharedLedger::compare_and_set`]. The check and the write happen under
//! one write lock, so the per-key uniqueness invariant holds under
//! concurrent writers.

use crate::error::LedgerError;
use crate::ledger::{CompletionLedger, LedgerChange};
use crate::record::CompletionRecord;
use chrono::Utc;
use parking_lot::RwLock;
use stagegate_model::{Role, TaskId};
use std::sync::Arc;

/// Cloneable handle to one ledger
#[derive(Debug, Clone, Default)]
pub struct SharedLedger {
    inner: Arc<RwLock<CompletionLedger>>,
}

impl SharedLedger {
    /// Wrap an existing ledger
    #[must_use]
    pub fn new(ledger: CompletionLedger) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    /// Whether (task, role) is completed right now
    #[must_use]
    pub fn is_completed(&self, task: TaskId, role: Role) -> bool {
        self.inner.read().is_completed(task, role)
    }

    /// Copy of the record for (task, role)
    #[must_use]
    pub fn query(&self, task: TaskId, role: Role) -> Option<CompletionRecord> {
        self.inner.read().query(task, role).cloned()
    }

    /// Set completion if the current state still equals `expected`
    ///
    /// # Errors
    /// [`LedgerError::Conflict`] when another writer got there first; the
    /// ledger is left unchanged.
    pub fn compare_and_set(
        &self,
        task: TaskId,
        role: Role,
        expected: bool,
        completed: bool,
    ) -> Result<LedgerChange, LedgerError> {
        let mut guard = self.inner.write();
        let actual = guard.is_completed(task, role);
        if actual != expected {
            tracing::debug!(%task, %role, expected, actual, "compare-and-set conflict");
            return Err(LedgerError::Conflict {
                task,
                role,
                expected,
                actual,
            });
        }
        Ok(guard.set(task, role, completed, Utc::now()))
    }

    /// Run `f` with shared access to the ledger
    pub fn read<R>(&self, f: impl FnOnce(&CompletionLedger) -> R) -> R {
        f(&self.inner.read())
    }

    /// Copy of the whole ledger
    #[must_use]
    pub fn snapshot(&self) -> CompletionLedger {
        self.inner.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn t(id: u32) -> TaskId {
        TaskId::new(id).unwrap()
    }

    #[test]
    fn stale_expectation_conflicts() {
        let ledger = SharedLedger::default();
        ledger.compare_and_set(t(1), Role::AlphaSales, false, true).unwrap();

        let err = ledger
            .compare_and_set(t(1), Role::AlphaSales, false, true)
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::Conflict {
                task: t(1),
                role: Role::AlphaSales,
                expected: false,
                actual: true
            }
        );
    }

    #[test]
    fn concurrent_writers_insert_exactly_once() {
        let ledger = SharedLedger::default();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = ledger.clone();
                thread::spawn(move || ledger.compare_and_set(t(7), Role::AlphaSsc, false, true))
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(Result::is_ok)
            .count();

        assert_eq!(winners, 1);
        assert_eq!(ledger.read(CompletionLedger::len), 1);
    }
}
