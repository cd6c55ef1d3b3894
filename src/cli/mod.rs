//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod category;
pub mod client;
pub mod prompt;
pub mod transaction;

pub use category::{handle_category_command, CategoryCommands};
pub use client::{handle_client_command, ClientCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

/// Whether a command that reports its own outcome succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Failed,
}
