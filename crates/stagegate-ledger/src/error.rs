//! Ledger and audit errors

use stagegate_model::{Role, TaskId};

/// Concurrent-writer failures on a [`SharedLedger`](crate::SharedLedger)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Another writer changed the key since it was read
    #[error("completion of task {task} for {role} is {actual}, expected {expected}")]
    Conflict {
        /// Contended task
        task: TaskId,
        /// Contended row
        role: Role,
        /// State the writer read
        expected: bool,
        /// State found at commit
        actual: bool,
    },
}

/// Audit trail failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuditError {
    /// Entry hash or chain link does not match
    #[error("audit trail integrity violation at entry {sequence}")]
    IntegrityViolation {
        /// First entry that fails to verify
        sequence: u64,
    },
}
