//! Service layer for buildledger
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, audit records, and cross-collection operations.

pub mod category;
pub mod client;
pub mod transaction;

pub use category::{parse_balance, CategoryService, CategoryWithTransactions};
pub use client::{ClientService, CreateClientInput};
pub use transaction::{
    create_with_balance, delete_with_balance_correction, CreateTransactionInput,
    DeletedTransaction, TransactionFilter, TransactionService,
};
