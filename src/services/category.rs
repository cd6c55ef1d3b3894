//! Category service
//!
//! Provides business logic for category management: creation with an
//! opening balance, lookup by name or ID, and listing.

use crate::audit::{AuditEntry, EntityType, Operation};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Category, CategoryId, Money, Transaction};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

/// A category with the transactions recorded against it
#[derive(Debug, Clone)]
pub struct CategoryWithTransactions {
    pub category: Category,
    pub transactions: Vec<Transaction>,
}

/// Parse an opening balance typed by a user or copied from an old record
///
/// Plain numbers (`"1000"`, `"-12.50"`) are tried first, then the legacy
/// formatted text (`"1 000 ₸"`).
pub fn parse_balance(input: &str) -> LedgerResult<Money> {
    Money::parse(input)
        .or_else(|_| Money::parse_formatted(input))
        .map_err(|e| LedgerError::Validation(e.to_string()))
}

impl<'a> CategoryService<'a> {
    /// Create a new category service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new category
    pub fn create(&self, name: &str, balance: Money, currency: &str) -> LedgerResult<Category> {
        let name = name.trim();

        if self.storage.categories.get_by_name(name)?.is_some() {
            return Err(LedgerError::Duplicate {
                entity_type: "Category",
                identifier: name.to_string(),
            });
        }

        let category = Category::with_balance(name, balance, currency.trim());
        category
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.record(
            AuditEntry::new(Operation::Create, EntityType::Category, category.id.to_string())
                .labelled(category.name.clone())
                .with_after(&category),
        );

        tracing::info!(category = %category.id, balance = %category.formatted_balance(), "category created");

        Ok(self.storage.categories.get(category.id)?.unwrap_or(category))
    }

    /// Get a category by ID
    pub fn get(&self, id: CategoryId) -> LedgerResult<Option<Category>> {
        self.storage.categories.get(id)
    }

    /// Find a category by name (case-insensitive), ID, or unique ID prefix
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<Category>> {
        if let Some(category) = self.storage.categories.get_by_name(identifier.trim())? {
            return Ok(Some(category));
        }

        if let Ok(id) = identifier.trim().parse::<CategoryId>() {
            return self.storage.categories.get(id);
        }

        let mut matches: Vec<_> = self
            .storage
            .categories
            .get_all()?
            .into_iter()
            .filter(|c| c.id.matches_prefix(identifier))
            .collect();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            n => Err(LedgerError::Validation(format!(
                "'{}' matches {} categories, use a longer ID",
                identifier, n
            ))),
        }
    }

    /// Find a category or fail with NotFound
    pub fn require(&self, identifier: &str) -> LedgerResult<Category> {
        self.find(identifier)?
            .ok_or_else(|| LedgerError::category_not_found(identifier))
    }

    /// List all categories, ordered by name
    pub fn list(&self) -> LedgerResult<Vec<Category>> {
        self.storage.categories.get_all()
    }

    /// A category together with its transactions, newest first
    pub fn with_transactions(&self, id: CategoryId) -> LedgerResult<CategoryWithTransactions> {
        let category = self
            .storage
            .categories
            .get(id)?
            .ok_or_else(|| LedgerError::category_not_found(id.to_string()))?;
        let transactions = self.storage.transactions.get_by_category(id)?;

        Ok(CategoryWithTransactions {
            category,
            transactions,
        })
    }

    /// Sum of all category balances, per currency symbol
    pub fn totals(&self) -> LedgerResult<Vec<(String, Money)>> {
        let mut totals: Vec<(String, Money)> = Vec::new();
        for category in self.storage.categories.get_all()? {
            match totals.iter_mut().find(|(symbol, _)| *symbol == category.currency) {
                Some((_, total)) => *total += category.balance,
                None => totals.push((category.currency.clone(), category.balance)),
            }
        }
        Ok(totals)
    }
}
