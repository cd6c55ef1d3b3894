//! Audit logging for buildledger
//!
//! Records every create, update and delete of a client, category or
//! transaction with before/after values in an append-only JSONL log.
//!
//! - `AuditEntry`: one operation on one entity, with optional before/after
//!   JSON snapshots, changed fields in words, and a typed `BalanceChange`
//!   for category balance moves.
//! - `AuditLogger`: appends entries to `audit.log` and reads them back.

mod entry;
mod logger;

pub use entry::{AuditEntry, BalanceChange, EntityType, Operation};
pub use logger::AuditLogger;
