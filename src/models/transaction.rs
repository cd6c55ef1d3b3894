//! Transaction model
//!
//! A transaction moves money into (income) or out of (expense) a category.
//! The stored amount carries the direction: income is positive, expense is
//! negative.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{CategoryId, ClientId, TransactionId};
use super::money::Money;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Ok(Self::Income),
            "expense" | "out" => Ok(Self::Expense),
            other => Err(format!(
                "Unknown transaction type '{}'. Use 'income' or 'expense'",
                other
            )),
        }
    }
}

/// A money movement against a category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// The category whose balance this transaction affects
    pub category_id: CategoryId,

    /// Signed amount (positive for income, negative for expense)
    pub amount: Money,

    /// Income or expense
    #[serde(rename = "type")]
    pub kind: TransactionType,

    /// Who the money came from
    #[serde(default)]
    pub from_user: String,

    /// Who the money went to
    #[serde(default)]
    pub to_user: String,

    #[serde(default)]
    pub description: String,

    /// When the transaction happened
    pub date: DateTime<Utc>,

    /// Client this payment belongs to, if any
    #[serde(default)]
    pub client_id: Option<ClientId>,

    /// Document revision, bumped by the repository on every write
    #[serde(default)]
    pub revision: u64,
}

impl Transaction {
    /// Create a new transaction; the sign of `amount` is normalized to `kind`
    pub fn new(
        category_id: CategoryId,
        kind: TransactionType,
        amount: Money,
        date: DateTime<Utc>,
    ) -> Self {
        let amount = match kind {
            TransactionType::Income => amount.abs(),
            TransactionType::Expense => -amount.abs(),
        };

        Self {
            id: TransactionId::new(),
            category_id,
            amount,
            kind,
            from_user: String::new(),
            to_user: String::new(),
            description: String::new(),
            date,
            client_id: None,
            revision: 0,
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    /// How the category balance moves when this transaction is recorded
    pub fn balance_effect(&self) -> Money {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount.abs(),
        }
    }

    /// How the category balance moves when this transaction is removed
    ///
    /// Removing an expense gives back its absolute value; removing income
    /// takes its amount away again.
    pub fn reversal(&self) -> Money {
        match self.kind {
            TransactionType::Expense => self.amount.abs(),
            TransactionType::Income => -self.amount,
        }
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.amount.is_zero() {
            return Err(TransactionValidationError::ZeroAmount);
        }

        match self.kind {
            TransactionType::Income if self.amount.is_negative() => {
                Err(TransactionValidationError::SignMismatch(self.kind))
            }
            TransactionType::Expense if self.amount.is_positive() => {
                Err(TransactionValidationError::SignMismatch(self.kind))
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.kind,
            self.amount
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    ZeroAmount,
    SignMismatch(TransactionType),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroAmount => write!(f, "Transaction amount cannot be zero"),
            Self::SignMismatch(kind) => {
                write!(f, "Amount sign does not match transaction type '{}'", kind)
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}
