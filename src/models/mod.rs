//! Core data models for buildledger
//!
//! Clients under construction, balance categories, the transactions that
//! move those balances, and the derived deadline and payment state.

pub mod category;
pub mod client;
pub mod deadline;
pub mod ids;
pub mod money;
pub mod progress;
pub mod transaction;

pub use category::Category;
pub use client::{Client, ClientStage};
pub use deadline::DeadlineStatus;
pub use ids::{CategoryId, ClientId, TransactionId};
pub use money::Money;
pub use progress::PaymentProgress;
pub use transaction::{Transaction, TransactionType};
