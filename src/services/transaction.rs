//! Transaction service
//!
//! Provides business logic for transaction management. Recording or removing
//! a transaction always moves its category balance in the same atomic commit.

use chrono::{DateTime, Utc};

use crate::audit::{AuditEntry, EntityType, Operation};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Category, CategoryId, ClientId, Money, Transaction, TransactionId, TransactionType,
};
use crate::storage::{AtomicStore, ReadSet, Storage, WriteSet};

/// Outcome of a balance-correcting deletion
#[derive(Debug, Clone)]
pub struct DeletedTransaction {
    /// The removed transaction
    pub transaction: Transaction,
    /// The category as it was before the correction
    pub category_before: Category,
    /// The category after the correction
    pub category_after: Category,
}

impl DeletedTransaction {
    pub fn previous_balance(&self) -> Money {
        self.category_before.balance
    }

    pub fn new_balance(&self) -> Money {
        self.category_after.balance
    }
}

/// Delete a transaction and give its amount back to its category
///
/// The transaction and its category are read through `store`, the category
/// balance is moved by [`Transaction::reversal`], and both the balance update
/// and the removal are submitted as one commit. If either document is
/// missing, or either changed before the commit, nothing is written.
pub fn delete_with_balance_correction<S: AtomicStore + ?Sized>(
    store: &S,
    id: TransactionId,
) -> LedgerResult<DeletedTransaction> {
    let mut reads = ReadSet::new();

    let transaction = store
        .read_transaction(id, &mut reads)?
        .ok_or_else(|| LedgerError::transaction_not_found(id.to_string()))?;

    let category_before = store
        .read_category(transaction.category_id, &mut reads)?
        .ok_or_else(|| LedgerError::category_not_found(transaction.category_id.to_string()))?;

    let mut category_after = category_before.clone();
    category_after
        .adjust_balance(transaction.reversal())
        .map_err(|e| LedgerError::Validation(e.to_string()))?;

    let writes = WriteSet::new()
        .put_category(category_after.clone())
        .delete_transaction(id);

    store.run_atomic(reads, writes)?;

    tracing::debug!(
        transaction = %id,
        category = %category_after.id,
        from = %category_before.balance,
        to = %category_after.balance,
        "transaction deleted with balance correction"
    );

    Ok(DeletedTransaction {
        transaction,
        category_before,
        category_after,
    })
}

/// Record a transaction and apply it to its category balance
///
/// Returns the stored transaction and the updated category.
pub fn create_with_balance<S: AtomicStore + ?Sized>(
    store: &S,
    transaction: Transaction,
) -> LedgerResult<(Transaction, Category)> {
    let mut reads = ReadSet::new();

    if store
        .read_transaction(transaction.id, &mut reads)?
        .is_some()
    {
        return Err(LedgerError::Duplicate {
            entity_type: "Transaction",
            identifier: transaction.id.to_string(),
        });
    }

    let mut category = store
        .read_category(transaction.category_id, &mut reads)?
        .ok_or_else(|| LedgerError::category_not_found(transaction.category_id.to_string()))?;
    category
        .adjust_balance(transaction.balance_effect())
        .map_err(|e| LedgerError::Validation(e.to_string()))?;

    let writes = WriteSet::new()
        .put_category(category.clone())
        .put_transaction(transaction.clone());

    store.run_atomic(reads, writes)?;

    Ok((transaction, category))
}

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Filter by category
    pub category_id: Option<CategoryId>,
    /// Filter by client
    pub client_id: Option<ClientId>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by category
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Filter by client
    pub fn client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    /// Limit results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub category_id: CategoryId,
    pub kind: TransactionType,
    pub amount: Money,
    pub date: Option<DateTime<Utc>>,
    pub from_user: Option<String>,
    pub to_user: Option<String>,
    pub description: Option<String>,
    pub client_id: Option<ClientId>,
}

impl<'a> TransactionService<'a> {
    /// Create a new transaction service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new transaction and apply it to its category
    pub fn create(&self, input: CreateTransactionInput) -> LedgerResult<Transaction> {
        if let Some(client_id) = input.client_id {
            self.storage
                .clients
                .get(client_id)?
                .ok_or_else(|| LedgerError::client_not_found(client_id.to_string()))?;
        }

        let mut txn = Transaction::new(
            input.category_id,
            input.kind,
            input.amount,
            input.date.unwrap_or_else(Utc::now),
        );
        txn.from_user = input.from_user.unwrap_or_default().trim().to_string();
        txn.to_user = input.to_user.unwrap_or_default().trim().to_string();
        txn.description = input.description.unwrap_or_default().trim().to_string();
        txn.client_id = input.client_id;

        txn.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let category_before = self
            .storage
            .categories
            .get(txn.category_id)?
            .ok_or_else(|| LedgerError::category_not_found(txn.category_id.to_string()))?;

        let (txn, category) = create_with_balance(self.storage, txn)?;

        self.storage.record(
            AuditEntry::new(Operation::Create, EntityType::Transaction, txn.id.to_string())
                .labelled(txn.to_string())
                .with_after(&txn),
        );
        self.storage
            .record(AuditEntry::balance_moved(&category_before, &category));

        // Hand back the stored copy, which carries the assigned revision
        Ok(self.storage.transactions.get(txn.id)?.unwrap_or(txn))
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> LedgerResult<Option<Transaction>> {
        self.storage.transactions.get(id)
    }

    /// Find a transaction by full ID or by a unique ID prefix
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<Transaction>> {
        if let Ok(id) = identifier.trim().parse::<TransactionId>() {
            return self.storage.transactions.get(id);
        }

        let mut matches: Vec<_> = self
            .storage
            .transactions
            .get_all()?
            .into_iter()
            .filter(|t| t.id.matches_prefix(identifier))
            .collect();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            n => Err(LedgerError::Validation(format!(
                "'{}' matches {} transactions, use a longer ID",
                identifier, n
            ))),
        }
    }

    /// List transactions, newest first, with optional filtering
    pub fn list(&self, filter: TransactionFilter) -> LedgerResult<Vec<Transaction>> {
        let mut transactions = if let Some(category_id) = filter.category_id {
            self.storage.transactions.get_by_category(category_id)?
        } else if let Some(client_id) = filter.client_id {
            self.storage.transactions.get_by_client(client_id)?
        } else {
            self.storage.transactions.get_all()?
        };

        if let Some(client_id) = filter.client_id {
            transactions.retain(|t| t.client_id == Some(client_id));
        }

        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }

        Ok(transactions)
    }

    /// Delete a transaction, correcting its category balance
    pub fn delete(&self, id: TransactionId) -> LedgerResult<DeletedTransaction> {
        let deleted = delete_with_balance_correction(self.storage, id)?;

        self.storage.record(
            AuditEntry::new(Operation::Delete, EntityType::Transaction, id.to_string())
                .labelled(deleted.transaction.to_string())
                .with_before(&deleted.transaction),
        );
        self.storage.record(AuditEntry::balance_moved(
            &deleted.category_before,
            &deleted.category_after,
        ));

        Ok(deleted)
    }

    /// Count transactions
    pub fn count(&self) -> LedgerResult<usize> {
        self.storage.transactions.count()
    }
}
