//! Stagegate Ledger
//!
//! The only mutable state of the access core:
//! - [`CompletionLedger`]: which (task, role) pairs are complete, and since when
//! - [`SharedLedger`]: the same ledger behind a lock, with per-key
//!   compare-and-set for backends with several concurrent writers
//! - [`AuditTrail`]: append-only, hash-chained record of every toggle attempt
//!
//! The ledger enforces one invariant: at most one [`CompletionRecord`] per
//! (task, role). Access rules live in `stagegate-core`; nothing here checks
//! who is allowed to write.

#![warn(unreachable_pub)]

pub mod audit;
pub mod error;
pub mod ledger;
pub mod record;
pub mod shared;

pub use audit::{AuditEntry, AuditEvent, AuditOutcome, AuditTrail};
pub use error::{AuditError, LedgerError};
pub use ledger::{CompletionLedger, LedgerChange};
pub use record::CompletionRecord;
pub use shared::SharedLedger;
