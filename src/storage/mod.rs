//! Storage layer for buildledger
//!
//! A local document store: one JSON file per collection, written with
//! atomic replaces, plus an all-or-nothing commit across collections.

pub mod atomic;
pub mod categories;
pub mod clients;
pub mod file_io;
pub mod init;
pub mod transactions;

pub use atomic::{AtomicStore, Committed, DocumentKey, ReadSet, WriteOp, WriteSet};
pub use categories::CategoryRepository;
pub use clients::ClientRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use transactions::TransactionRepository;

use std::sync::Mutex;

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::paths::LedgerPaths;
use crate::error::LedgerError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: LedgerPaths,
    pub clients: ClientRepository,
    pub categories: CategoryRepository,
    pub transactions: TransactionRepository,
    audit: AuditLogger,
    /// Serializes atomic commits
    commit_lock: Mutex<()>,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: LedgerPaths) -> Result<Self, LedgerError> {
        paths.ensure_directories()?;

        Ok(Self {
            clients: ClientRepository::new(paths.clients_file()),
            categories: CategoryRepository::new(paths.categories_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            audit: AuditLogger::new(paths.audit_log()),
            commit_lock: Mutex::new(()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), LedgerError> {
        self.clients.load()?;
        self.categories.load()?;
        self.transactions.load()?;
        tracing::debug!(
            clients = self.clients.count()?,
            categories = self.categories.count()?,
            transactions = self.transactions.count()?,
            "storage loaded"
        );
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// Audit trail reader
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Append to the audit trail after a change is committed
    ///
    /// The change is already on disk, so a failed write is only logged.
    pub fn record(&self, entry: AuditEntry) {
        if let Err(e) = self.audit.log(&entry) {
            tracing::warn!(
                error = %e,
                entity = %entry.entity_type,
                id = %entry.entity_id,
                "failed to write audit entry"
            );
        }
    }
}
