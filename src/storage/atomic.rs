//! All-or-nothing writes across collections
//!
//! A caller reads documents through an [`AtomicStore`], which records the
//! revision it saw for each one in a [`ReadSet`]. It then describes every
//! change in a [`WriteSet`] and hands both to [`AtomicStore::run_atomic`].
//! The commit is rejected with [`LedgerError::Conflict`] if any document in
//! the read set changed in the meantime; otherwise every write is applied and
//! persisted, or none is.

use std::fmt;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Category, CategoryId, Transaction, TransactionId};

use super::Storage;

/// Identifies one document across collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKey {
    Category(CategoryId),
    Transaction(TransactionId),
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category(id) => write!(f, "categories/{}", id),
            Self::Transaction(id) => write!(f, "transactions/{}", id),
        }
    }
}

/// Revisions observed while reading, `None` meaning "did not exist"
#[derive(Debug, Clone, Default)]
pub struct ReadSet {
    entries: Vec<(DocumentKey, Option<u64>)>,
}

impl ReadSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a read. Only the first observation of a document counts.
    pub fn record(&mut self, key: DocumentKey, revision: Option<u64>) {
        if !self.entries.iter().any(|(k, _)| *k == key) {
            self.entries.push((key, revision));
        }
    }

    pub fn revision(&self, key: DocumentKey) -> Option<Option<u64>> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, revision)| *revision)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(DocumentKey, Option<u64>)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One buffered mutation
#[derive(Debug, Clone)]
pub enum WriteOp {
    PutCategory(Category),
    PutTransaction(Transaction),
    DeleteTransaction(TransactionId),
}

impl WriteOp {
    pub fn key(&self) -> DocumentKey {
        match self {
            Self::PutCategory(c) => DocumentKey::Category(c.id),
            Self::PutTransaction(t) => DocumentKey::Transaction(t.id),
            Self::DeleteTransaction(id) => DocumentKey::Transaction(*id),
        }
    }
}

/// Ordered list of mutations applied together
#[derive(Debug, Clone, Default)]
pub struct WriteSet {
    ops: Vec<WriteOp>,
}

impl WriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_category(mut self, category: Category) -> Self {
        self.ops.push(WriteOp::PutCategory(category));
        self
    }

    pub fn put_transaction(mut self, txn: Transaction) -> Self {
        self.ops.push(WriteOp::PutTransaction(txn));
        self
    }

    pub fn delete_transaction(mut self, id: TransactionId) -> Self {
        self.ops.push(WriteOp::DeleteTransaction(id));
        self
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    fn touches_categories(&self) -> bool {
        self.ops
            .iter()
            .any(|op| matches!(op.key(), DocumentKey::Category(_)))
    }

    fn touches_transactions(&self) -> bool {
        self.ops
            .iter()
            .any(|op| matches!(op.key(), DocumentKey::Transaction(_)))
    }
}

/// Receipt of a successful commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Committed {
    /// Number of write operations applied
    pub writes: usize,
}

/// A document store with an all-or-nothing commit
pub trait AtomicStore {
    /// Read a category and record its revision in `reads`
    fn read_category(
        &self,
        id: CategoryId,
        reads: &mut ReadSet,
    ) -> LedgerResult<Option<Category>>;

    /// Read a transaction and record its revision in `reads`
    fn read_transaction(
        &self,
        id: TransactionId,
        reads: &mut ReadSet,
    ) -> LedgerResult<Option<Transaction>>;

    /// Apply `writes` if nothing in `reads` changed since it was read
    fn run_atomic(&self, reads: ReadSet, writes: WriteSet) -> LedgerResult<Committed>;
}

impl AtomicStore for Storage {
    fn read_category(
        &self,
        id: CategoryId,
        reads: &mut ReadSet,
    ) -> LedgerResult<Option<Category>> {
        let category = self.categories.get(id)?;
        reads.record(DocumentKey::Category(id), category.as_ref().map(|c| c.revision));
        Ok(category)
    }

    fn read_transaction(
        &self,
        id: TransactionId,
        reads: &mut ReadSet,
    ) -> LedgerResult<Option<Transaction>> {
        let txn = self.transactions.get(id)?;
        reads.record(DocumentKey::Transaction(id), txn.as_ref().map(|t| t.revision));
        Ok(txn)
    }

    fn run_atomic(&self, reads: ReadSet, writes: WriteSet) -> LedgerResult<Committed> {
        let _guard = self
            .commit_lock
            .lock()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire commit lock: {}", e)))?;

        for (key, seen) in reads.iter() {
            let current = self.current_revision(*key)?;
            if current != *seen {
                tracing::debug!(%key, ?seen, ?current, "atomic commit rejected");
                return Err(LedgerError::Conflict(format!(
                    "{} changed since it was read",
                    key
                )));
            }
        }

        let touches_categories = writes.touches_categories();
        let touches_transactions = writes.touches_transactions();

        let category_snapshot = if touches_categories {
            Some(self.categories.snapshot()?)
        } else {
            None
        };
        let transaction_snapshot = if touches_transactions {
            Some(self.transactions.snapshot()?)
        } else {
            None
        };

        let outcome = self
            .apply_writes(&writes)
            .and_then(|_| self.persist(touches_categories, touches_transactions));

        if let Err(err) = outcome {
            tracing::warn!(error = %err, "atomic commit failed, rolling back");
            self.roll_back(category_snapshot, transaction_snapshot);
            return Err(err);
        }

        tracing::debug!(writes = writes.len(), "atomic commit applied");
        Ok(Committed {
            writes: writes.len(),
        })
    }
}

impl Storage {
    fn current_revision(&self, key: DocumentKey) -> LedgerResult<Option<u64>> {
        match key {
            DocumentKey::Category(id) => self.categories.revision_of(id),
            DocumentKey::Transaction(id) => self.transactions.revision_of(id),
        }
    }

    fn apply_writes(&self, writes: &WriteSet) -> LedgerResult<()> {
        for op in writes.ops() {
            match op {
                WriteOp::PutCategory(category) => {
                    self.categories.upsert(category.clone())?;
                }
                WriteOp::PutTransaction(txn) => {
                    self.transactions.upsert(txn.clone())?;
                }
                WriteOp::DeleteTransaction(id) => {
                    if !self.transactions.delete(*id)? {
                        return Err(LedgerError::transaction_not_found(id.to_string()));
                    }
                }
            }
        }
        Ok(())
    }

    fn persist(&self, categories: bool, transactions: bool) -> LedgerResult<()> {
        if categories {
            self.categories.save()?;
        }
        if transactions {
            self.transactions.save()?;
        }
        Ok(())
    }

    fn roll_back(
        &self,
        categories: Option<std::collections::HashMap<CategoryId, Category>>,
        transactions: Option<std::collections::HashMap<TransactionId, Transaction>>,
    ) {
        if let Some(snapshot) = categories {
            if let Err(e) = self.categories.restore(snapshot).and_then(|_| self.categories.save()) {
                tracing::error!(error = %e, "failed to restore categories after aborted commit");
            }
        }
        if let Some(snapshot) = transactions {
            if let Err(e) = self
                .transactions
                .restore(snapshot)
                .and_then(|_| self.transactions.save())
            {
                tracing::error!(error = %e, "failed to restore transactions after aborted commit");
            }
        }
    }
}
