//! Audit log entries
//!
//! An entry describes one committed change to a client, category or
//! transaction. Category balance moves carry a typed [`BalanceChange`], so
//! the trail of a category can be replayed against its stored balance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Category, Money};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Client,
    Category,
    Transaction,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Client => write!(f, "client"),
            Self::Category => write!(f, "category"),
            Self::Transaction => write!(f, "transaction"),
        }
    }
}

/// A category balance before and after one commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceChange {
    pub before: Money,
    pub after: Money,
}

impl BalanceChange {
    pub fn between(before: &Category, after: &Category) -> Self {
        Self {
            before: before.balance,
            after: after.balance,
        }
    }

    /// Signed movement; saturates like all money arithmetic
    pub fn delta(&self) -> Money {
        self.after - self.before
    }
}

/// One line of the audit log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub operation: Operation,
    pub entity_type: EntityType,
    pub entity_id: String,

    /// Client name, category name or transaction summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,

    /// Changed fields in words, e.g. `stage: building -> built`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<BalanceChange>,
}

impl AuditEntry {
    pub fn new(operation: Operation, entity_type: EntityType, entity_id: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id: entity_id.into(),
            label: None,
            before: None,
            after: None,
            changes: None,
            balance: None,
        }
    }

    /// The category update that accompanies recording or removing a
    /// transaction
    pub fn balance_moved(before: &Category, after: &Category) -> Self {
        Self::new(Operation::Update, EntityType::Category, after.id.to_string())
            .labelled(after.name.clone())
            .with_before(before)
            .with_after(after)
            .with_changes(format!(
                "balance: {} -> {}",
                before.formatted_balance(),
                after.formatted_balance()
            ))
            .with_balance(BalanceChange::between(before, after))
    }

    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_before<T: Serialize>(mut self, value: &T) -> Self {
        self.before = serde_json::to_value(value).ok();
        self
    }

    pub fn with_after<T: Serialize>(mut self, value: &T) -> Self {
        self.after = serde_json::to_value(value).ok();
        self
    }

    pub fn with_changes(mut self, changes: impl Into<String>) -> Self {
        self.changes = Some(changes.into());
        self
    }

    pub fn with_balance(mut self, balance: BalanceChange) -> Self {
        self.balance = Some(balance);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_moved_carries_typed_change() {
        let before = Category::with_balance("Cash", Money::from_units(1000), "₸");
        let mut after = before.clone();
        after.adjust_balance(Money::from_units(200)).unwrap();

        let entry = AuditEntry::balance_moved(&before, &after);

        assert_eq!(entry.operation, Operation::Update);
        assert_eq!(entry.entity_type, EntityType::Category);
        assert_eq!(entry.entity_id, after.id.to_string());
        assert_eq!(entry.label.as_deref(), Some("Cash"));
        assert_eq!(entry.changes.as_deref(), Some("balance: 1000 ₸ -> 1200 ₸"));

        let balance = entry.balance.unwrap();
        assert_eq!(balance.before, Money::from_units(1000));
        assert_eq!(balance.delta(), Money::from_units(200));
        assert_eq!(entry.after.unwrap()["balance"], serde_json::json!(120000));
    }

    #[test]
    fn test_stored_line_omits_empty_parts() {
        let entry = AuditEntry::new(Operation::Delete, EntityType::Transaction, "txn-1")
            .with_before(&serde_json::json!({"amount": -20000}));

        let line = serde_json::to_string(&entry).unwrap();
        assert!(line.contains(r#""operation":"delete""#));
        assert!(line.contains(r#""entity_type":"transaction""#));
        assert!(!line.contains("after"));
        assert!(!line.contains("balance"));

        let read: AuditEntry = serde_json::from_str(&line).unwrap();
        assert!(read.balance.is_none());
        assert_eq!(read.before.unwrap()["amount"], serde_json::json!(-20000));
    }
}
