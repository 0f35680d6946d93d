//! Completion ledger
//!
//! Keyed by (task, role). Inserting for an existing key replaces the record;
//! completion is never global, the same task completes independently per
//! role.

use crate::record::CompletionRecord;
use chrono::{DateTime, Utc};
use stagegate_model::{Role, TaskId};
use std::collections::BTreeMap;

/// Effect of a write on the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerChange {
    /// New record for a previously incomplete pair
    Inserted,
    /// Existing record superseded (timestamp refreshed)
    Replaced,
    /// Record removed
    Removed,
    /// Pair was already incomplete; nothing removed
    Unchanged,
}

impl LedgerChange {
    /// Whether completion state flipped
    #[inline]
    #[must_use]
    pub fn flipped(self) -> bool {
        matches!(self, LedgerChange::Inserted | LedgerChange::Removed)
    }
}

/// Set of completion records, unique per (task, role)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionLedger {
    records: BTreeMap<(TaskId, Role), CompletionRecord>,
}

impl CompletionLedger {
    /// Create an empty ledger
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `record`, replacing any record for the same key
    ///
    /// Returns the superseded record.
    pub fn upsert(&mut self, record: CompletionRecord) -> Option<CompletionRecord> {
        self.records.insert(record.key(), record)
    }

    /// Remove the record for (task, role)
    pub fn remove(&mut self, task: TaskId, role: Role) -> Option<CompletionRecord> {
        self.records.remove(&(task, role))
    }

    /// Record for (task, role), if completed
    #[must_use]
    pub fn query(&self, task: TaskId, role: Role) -> Option<&CompletionRecord> {
        self.records.get(&(task, role))
    }

    /// Whether (task, role) is completed
    #[inline]
    #[must_use]
    pub fn is_completed(&self, task: TaskId, role: Role) -> bool {
        self.records.contains_key(&(task, role))
    }

    /// Set completion of (task, role) at time `at`
    ///
    /// `true` upserts a record stamped `at`; `false` removes any record.
    pub fn set(&mut self, task: TaskId, role: Role, completed: bool, at: DateTime<Utc>) -> LedgerChange {
        if completed {
            match self.upsert(CompletionRecord::new(task, role, at)) {
                Some(_) => LedgerChange::Replaced,
                None => LedgerChange::Inserted,
            }
        } else {
            match self.remove(task, role) {
                Some(_) => LedgerChange::Removed,
                None => LedgerChange::Unchanged,
            }
        }
    }

    /// Records held by `role`, by ascending task id
    pub fn records_for_role(&self, role: Role) -> impl Iterator<Item = &CompletionRecord> + '_ {
        self.records.values().filter(move |r| r.role == role)
    }

    /// All records, by ascending (task, role)
    pub fn iter(&self) -> impl Iterator<Item = &CompletionRecord> + '_ {
        self.records.values()
    }

    /// Number of completed pairs
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing is completed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop every record
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl FromIterator<CompletionRecord> for CompletionLedger {
    fn from_iter<I: IntoIterator<Item = CompletionRecord>>(iter: I) -> Self {
        let mut ledger = Self::new();
        for record in iter {
            ledger.upsert(record);
        }
        ledger
    }
}
