//! Transaction repository for JSON storage
//!
//! Manages loading and saving the `transactions` collection to
//! transactions.json, with lookup indexes by category and client.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::error::LedgerError;
use crate::models::{CategoryId, ClientId, Transaction, TransactionId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable transaction collection
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// Repository for transaction persistence with indexing
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    /// Index: category_id -> transaction_ids
    by_category: RwLock<HashMap<CategoryId, Vec<TransactionId>>>,
    /// Index: client_id -> transaction_ids
    by_client: RwLock<HashMap<ClientId, Vec<TransactionId>>>,
    last_revision: AtomicU64,
}

impl TransactionRepository {
    /// Create a new transaction repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_category: RwLock::new(HashMap::new()),
            by_client: RwLock::new(HashMap::new()),
            last_revision: AtomicU64::new(0),
        }
    }

    /// Load transactions from disk and build indexes
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let loaded: HashMap<_, _> = file_data
            .transactions
            .into_iter()
            .map(|txn| (txn.id, txn))
            .collect();

        let max_revision = loaded.values().map(|t| t.revision).max().unwrap_or(0);
        self.last_revision.store(max_revision, Ordering::SeqCst);

        self.replace_all(loaded)
    }

    /// Save transactions to disk, newest first
    pub fn save(&self) -> Result<(), LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.as_uuid().cmp(b.id.as_uuid())));

        write_json_atomic(&self.path, &TransactionData { transactions })
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all transactions, newest first
    pub fn get_all(&self) -> Result<Vec<Transaction>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(transactions)
    }

    /// Get transactions for a category, newest first
    pub fn get_by_category(&self, category_id: CategoryId) -> Result<Vec<Transaction>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_category = self
            .by_category
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let ids = by_category.get(&category_id).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut transactions: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(transactions)
    }

    /// Get transactions linked to a client, newest first
    pub fn get_by_client(&self, client_id: ClientId) -> Result<Vec<Transaction>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_client = self
            .by_client
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let ids = by_client.get(&client_id).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut transactions: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(transactions)
    }

    /// Current revision of a transaction, `None` if it doesn't exist
    pub fn revision_of(&self, id: TransactionId) -> Result<Option<u64>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).map(|t| t.revision))
    }

    /// Insert or update a transaction, assigning it a fresh revision
    pub fn upsert(&self, mut txn: Transaction) -> Result<u64, LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_category = self
            .by_category
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_client = self
            .by_client
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        // Remove from old indexes if updating
        if let Some(old) = data.get(&txn.id) {
            if let Some(ids) = by_category.get_mut(&old.category_id) {
                ids.retain(|&id| id != txn.id);
            }
            if let Some(client_id) = old.client_id {
                if let Some(ids) = by_client.get_mut(&client_id) {
                    ids.retain(|&id| id != txn.id);
                }
            }
        }

        by_category.entry(txn.category_id).or_default().push(txn.id);
        if let Some(client_id) = txn.client_id {
            by_client.entry(client_id).or_default().push(txn.id);
        }

        let revision = self.last_revision.fetch_add(1, Ordering::SeqCst) + 1;
        txn.revision = revision;
        data.insert(txn.id, txn);
        Ok(revision)
    }

    /// Delete a transaction
    pub fn delete(&self, id: TransactionId) -> Result<bool, LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_category = self
            .by_category
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_client = self
            .by_client
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let Some(txn) = data.remove(&id) else {
            return Ok(false);
        };

        if let Some(ids) = by_category.get_mut(&txn.category_id) {
            ids.retain(|&tid| tid != id);
        }
        if let Some(client_id) = txn.client_id {
            if let Some(ids) = by_client.get_mut(&client_id) {
                ids.retain(|&tid| tid != id);
            }
        }

        Ok(true)
    }

    /// Count transactions
    pub fn count(&self) -> Result<usize, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }

    /// Copy of the in-memory collection, used to roll back a failed commit
    pub(crate) fn snapshot(&self) -> Result<HashMap<TransactionId, Transaction>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.clone())
    }

    /// Replace the in-memory collection with a snapshot and rebuild indexes
    pub(crate) fn restore(
        &self,
        snapshot: HashMap<TransactionId, Transaction>,
    ) -> Result<(), LedgerError> {
        self.replace_all(snapshot)
    }

    fn replace_all(&self, transactions: HashMap<TransactionId, Transaction>) -> Result<(), LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_category = self
            .by_category
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_client = self
            .by_client
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        by_category.clear();
        by_client.clear();

        for (id, txn) in &transactions {
            by_category.entry(txn.category_id).or_default().push(*id);
            if let Some(client_id) = txn.client_id {
                by_client.entry(client_id).or_default().push(*id);
            }
        }

        *data = transactions;
        Ok(())
    }
}
