//! Category model
//!
//! A category is a balance bucket that transactions credit or debit. The
//! balance is kept as structured money; the currency symbol is stored beside
//! it and only joined with the value for display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;
use super::money::{Money, StoredAmount, DEFAULT_CURRENCY};

/// A balance category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "CategoryDocument")]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Category name
    pub name: String,

    /// Running balance
    pub balance: Money,

    /// Currency symbol shown after the balance
    pub currency: String,

    /// Document revision, bumped by the repository on every write
    pub revision: u64,

    /// When the category was created
    pub created_at: DateTime<Utc>,

    /// When the category was last modified
    pub updated_at: DateTime<Utc>,
}

/// A category as stored on disk
///
/// Older documents keep the balance as formatted text under `amount`
/// (`"1000 ₸"`) and carry no currency or timestamps. The currency is then
/// taken from the text, falling back to the default symbol.
#[derive(Deserialize)]
struct CategoryDocument {
    id: CategoryId,
    name: String,
    #[serde(alias = "amount")]
    balance: StoredAmount,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    revision: u64,
    #[serde(default = "Utc::now")]
    created_at: DateTime<Utc>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<CategoryDocument> for Category {
    type Error = String;

    fn try_from(doc: CategoryDocument) -> Result<Self, Self::Error> {
        let balance = doc.balance.to_money().map_err(|e| e.to_string())?;
        let currency = doc
            .currency
            .filter(|c| !c.trim().is_empty())
            .or_else(|| doc.balance.currency_suffix().map(str::to_string))
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

        Ok(Self {
            id: doc.id,
            name: doc.name,
            balance,
            currency,
            revision: doc.revision,
            created_at: doc.created_at,
            updated_at: doc.updated_at.unwrap_or(doc.created_at),
        })
    }
}

impl Category {
    /// Create a new category with a zero balance
    pub fn new(name: impl Into<String>, currency: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            name: name.into(),
            balance: Money::zero(),
            currency: currency.into(),
            revision: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new category with an opening balance
    pub fn with_balance(
        name: impl Into<String>,
        balance: Money,
        currency: impl Into<String>,
    ) -> Self {
        let mut category = Self::new(name, currency);
        category.balance = balance;
        category
    }

    /// Move the balance by `delta`
    ///
    /// Leaves the category untouched when the new balance would not fit.
    pub fn adjust_balance(&mut self, delta: Money) -> Result<(), CategoryValidationError> {
        self.balance = self
            .balance
            .checked_add(delta)
            .ok_or(CategoryValidationError::BalanceOutOfRange)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// The balance as display text, e.g. `"1200 ₸"`
    pub fn formatted_balance(&self) -> String {
        self.balance.format_with_suffix(&self.currency)
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if self.name.chars().count() > 50 {
            return Err(CategoryValidationError::NameTooLong(
                self.name.chars().count(),
            ));
        }

        if self.currency.trim().is_empty() {
            return Err(CategoryValidationError::EmptyCurrency);
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    EmptyCurrency,
    BalanceOutOfRange,
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
            Self::EmptyCurrency => write!(f, "Currency symbol cannot be empty"),
            Self::BalanceOutOfRange => write!(f, "Balance would be out of range"),
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category() {
        let category = Category::new("Cash", "₸");

        assert_eq!(category.name, "Cash");
        assert!(category.balance.is_zero());
        assert_eq!(category.revision, 0);
        assert_eq!(category.formatted_balance(), "0 ₸");
    }

    #[test]
    fn test_adjust_balance() {
        let mut category = Category::with_balance("Cash", Money::from_units(1000), "₸");

        category.adjust_balance(Money::from_units(200)).unwrap();
        assert_eq!(category.formatted_balance(), "1200 ₸");

        category.adjust_balance(Money::from_units(-500)).unwrap();
        assert_eq!(category.formatted_balance(), "700 ₸");
    }

    #[test]
    fn test_adjust_balance_out_of_range_keeps_balance() {
        let mut category = Category::with_balance("Cash", Money::from_minor(i64::MAX - 1), "₸");
        let before = category.updated_at;

        assert_eq!(
            category.adjust_balance(Money::from_minor(2)),
            Err(CategoryValidationError::BalanceOutOfRange)
        );
        assert_eq!(category.balance, Money::from_minor(i64::MAX - 1));
        assert_eq!(category.updated_at, before);
    }

    #[test]
    fn test_category_validation() {
        let mut category = Category::new("Valid", "₸");
        assert!(category.validate().is_ok());

        category.name = String::new();
        assert_eq!(category.validate(), Err(CategoryValidationError::EmptyName));

        category.name = "ж".repeat(51);
        assert_eq!(
            category.validate(),
            Err(CategoryValidationError::NameTooLong(51))
        );

        category.name = "Valid".into();
        category.currency = " ".into();
        assert_eq!(
            category.validate(),
            Err(CategoryValidationError::EmptyCurrency)
        );
    }

    #[test]
    fn test_serialization() {
        let category = Category::with_balance("Main", Money::from_minor(120050), "₸");
        let json = serde_json::to_string(&category).unwrap();
        let deserialized: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(category.id, deserialized.id);
        assert_eq!(category.balance, deserialized.balance);
        assert_eq!(deserialized.currency, "₸");
    }

    #[test]
    fn test_legacy_amount_text_is_accepted() {
        let category = Category::new("Main", "₸");
        let mut value = serde_json::to_value(&category).unwrap();
        let object = value.as_object_mut().unwrap();
        object.remove("balance");
        object.remove("revision");
        object.insert("amount".into(), serde_json::json!("1000 ₸"));

        let legacy: Category = serde_json::from_value(value).unwrap();
        assert_eq!(legacy.balance, Money::from_units(1000));
        assert_eq!(legacy.revision, 0);
        assert_eq!(legacy.currency, "₸");

        let rewritten = serde_json::to_value(&legacy).unwrap();
        assert_eq!(rewritten["balance"], serde_json::json!(100000));
        assert!(rewritten.get("amount").is_none());
    }

    #[test]
    fn test_legacy_document_without_currency() {
        let json = r#"{"id":"5b0c5f2e-7d5c-4a39-9a3c-1f0a3e6b2c11","name":"Main",
            "amount":"1000 $","created_at":"2025-01-01T00:00:00Z","updated_at":"2025-01-01T00:00:00Z"}"#;
        let legacy: Category = serde_json::from_str(json).unwrap();
        assert_eq!(legacy.balance, Money::from_units(1000));
        assert_eq!(legacy.currency, "$");

        let bare = r#"{"id":"5b0c5f2e-7d5c-4a39-9a3c-1f0a3e6b2c11","name":"Main","amount":"250"}"#;
        let legacy: Category = serde_json::from_str(bare).unwrap();
        assert_eq!(legacy.currency, DEFAULT_CURRENCY);
        assert_eq!(legacy.updated_at, legacy.created_at);
    }

    #[test]
    fn test_unparseable_legacy_balance_is_rejected() {
        let json = r#"{"id":"5b0c5f2e-7d5c-4a39-9a3c-1f0a3e6b2c11","name":"Main","amount":"n/a ₸"}"#;
        assert!(serde_json::from_str::<Category>(json).is_err());
    }
}
