//! Hash-chained audit trail of completion toggles
//!
//! Every toggle attempt is appended, whether it was applied or denied. Each
//! entry hashes its own fields together with the previous entry's hash, so
//! editing or dropping an entry breaks the chain.

use crate::error::AuditError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use stagegate_model::{Role, TaskId, UserId};
use ulid::Ulid;

/// What happened to a toggle attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum AuditOutcome {
    /// Completion state flipped
    Applied,
    /// Accepted but state already matched (or record refreshed)
    Unchanged,
    /// Rejected; ledger untouched
    Denied {
        /// Short rejection kind
        reason: String,
    },
}

impl AuditOutcome {
    fn tag(&self) -> String {
        match self {
            AuditOutcome::Applied => "applied".to_string(),
            AuditOutcome::Unchanged => "unchanged".to_string(),
            AuditOutcome::Denied { reason } => format!("denied:{reason}"),
        }
    }
}

/// Fields supplied by the caller for one attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Acting user, if signed in
    pub actor: Option<UserId>,
    /// Role of the acting user
    pub actor_role: Option<Role>,
    /// Task toggled
    pub task: TaskId,
    /// Row the toggle targeted
    pub row_role: Role,
    /// Requested completion state
    pub requested: bool,
    /// What happened
    pub outcome: AuditOutcome,
}

/// Sealed entry in the trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Position in the trail, from 0
    pub sequence: u64,
    /// Unique entry id
    pub id: Ulid,
    /// When the entry was sealed
    pub at: DateTime<Utc>,
    /// Acting user, if signed in
    pub actor: Option<UserId>,
    /// Role of the acting user
    pub actor_role: Option<Role>,
    /// Task toggled
    pub task: TaskId,
    /// Row the toggle targeted
    pub row_role: Role,
    /// Requested completion state
    pub requested: bool,
    /// What happened
    pub outcome: AuditOutcome,
    /// Hash of the previous entry, zeroes for the first
    pub prev_hash: [u8; 32],
    /// SHA-256 over this entry and `prev_hash`
    pub hash: [u8; 32],
}

impl AuditEntry {
    /// Hex form of [`Self::hash`]
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }
}

/// Append-only audit log
#[derive(Debug, Clone, Default)]
pub struct AuditTrail {
    entries: Vec<AuditEntry>,
}

impl AuditTrail {
    /// Create an empty trail
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seal `event` and append it, returning the new entry
    pub fn append(&mut self, event: AuditEvent) -> &AuditEntry {
        let prev_hash = self.entries.last().map_or([0u8; 32], |e| e.hash);
        let mut entry = AuditEntry {
            sequence: self.entries.len() as u64,
            id: Ulid::new(),
            at: Utc::now(),
            actor: event.actor,
            actor_role: event.actor_role,
            task: event.task,
            row_role: event.row_role,
            requested: event.requested,
            outcome: event.outcome,
            prev_hash,
            hash: [0u8; 32],
        };
        entry.hash = compute_hash(&entry);
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    /// Entries in append order
    #[must_use]
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    /// Hash of the newest entry (all zeroes when empty)
    #[must_use]
    pub fn head(&self) -> [u8; 32] {
        self.entries.last().map_or([0u8; 32], |e| e.hash)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Re-hash every entry and check the chain
    ///
    /// # Errors
    /// [`AuditError::IntegrityViolation`] naming the first bad entry.
    pub fn verify_integrity(&self) -> Result<(), AuditError> {
        verify_chain(&self.entries)
    }
}

/// Check a sequence of entries as produced by [`AuditTrail::append`]
///
/// # Errors
/// [`AuditError::IntegrityViolation`] naming the first bad entry.
pub fn verify_chain(entries: &[AuditEntry]) -> Result<(), AuditError> {
    let mut prev = [0u8; 32];
    for (position, entry) in entries.iter().enumerate() {
        if entry.sequence != position as u64
            || entry.prev_hash != prev
            || entry.hash != compute_hash(entry)
        {
            return Err(AuditError::IntegrityViolation {
                sequence: position as u64,
            });
        }
        prev = entry.hash;
    }
    Ok(())
}

fn compute_hash(entry: &AuditEntry) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(entry.sequence.to_le_bytes());
    hasher.update(entry.id.to_bytes());
    hasher.update(entry.at.timestamp_micros().to_le_bytes());
    hasher.update(entry.actor.as_ref().map_or("", |a| a.0.as_str()).as_bytes());
    hasher.update([0]);
    hasher.update(entry.actor_role.map_or("", Role::as_str).as_bytes());
    hasher.update([0]);
    hasher.update(entry.task.get().to_le_bytes());
    hasher.update(entry.row_role.as_str().as_bytes());
    hasher.update([0]);
    hasher.update([u8::from(entry.requested)]);
    hasher.update(entry.outcome.tag().as_bytes());
    hasher.update([0]);
    hasher.update(entry.prev_hash);
    hasher.finalize().into()
}
