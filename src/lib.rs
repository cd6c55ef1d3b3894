//! buildledger - ledger for a small construction business
//!
//! This library provides the core of the buildledger terminal application:
//! clients whose construction is in progress, money categories with running
//! balances, and income/expense transactions against those categories.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (clients, categories, transactions, money,
//!   deadline and payment progress)
//! - `storage`: JSON document store with an all-or-nothing commit
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//! - `logging`: Diagnostic log setup
//!
//! # Example
//!
//! ```rust,ignore
//! use buildledger::config::{paths::LedgerPaths, settings::Settings};
//! use buildledger::services::TransactionService;
//! use buildledger::storage::Storage;
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut storage = Storage::new(paths)?;
//! storage.load_all()?;
//!
//! let deleted = TransactionService::new(&storage).delete(txn_id)?;
//! println!("{}", deleted.category_after.formatted_balance());
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
