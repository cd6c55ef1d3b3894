//! Transaction CLI commands
//!
//! Implements CLI commands for transaction management.

use chrono::{DateTime, NaiveDate, Utc};
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::notification::Notification;
use crate::display::transaction::{
    format_signed_amount, format_transaction_details, format_transaction_register,
};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Category, Transaction, TransactionType};
use crate::services::{
    parse_balance, CategoryService, ClientService, CreateTransactionInput, DeletedTransaction,
    TransactionFilter, TransactionService,
};
use crate::storage::Storage;

use super::prompt::confirm_stdin;
use super::CommandStatus;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Add a new transaction and apply it to its category balance
    Add {
        /// Category name or ID
        category: String,
        /// Amount (e.g., "200" or "200.50"); the sign follows --type
        amount: String,
        /// income or expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: TransactionType,
        /// Who the money came from
        #[arg(long)]
        from: Option<String>,
        /// Who the money went to
        #[arg(long)]
        to: Option<String>,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
        /// Client number or ID this payment belongs to
        #[arg(long)]
        client: Option<String>,
        /// Date (YYYY-MM-DD or RFC 3339), defaults to now
        #[arg(long)]
        date: Option<String>,
    },
    /// List transactions, newest first
    List {
        /// Filter by category name or ID
        #[arg(short = 'C', long)]
        category: Option<String>,
        /// Filter by client number or ID
        #[arg(long)]
        client: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Show transaction details
    Show {
        /// Transaction ID
        id: String,
    },
    /// Delete a transaction and correct its category balance
    Delete {
        /// Transaction ID
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> LedgerResult<CommandStatus> {
    let service = TransactionService::new(storage);
    let category_service = CategoryService::new(storage);
    let client_service = ClientService::new(storage);

    match cmd {
        TransactionCommands::Add {
            category,
            amount,
            kind,
            from,
            to,
            description,
            client,
            date,
        } => {
            let category = category_service.require(&category)?;
            let amount = parse_balance(&amount)?;
            let date = date.as_deref().map(parse_date).transpose()?;
            let client_id = match client {
                Some(client) => Some(client_service.require(&client)?.id),
                None => None,
            };

            let txn = service.create(CreateTransactionInput {
                category_id: category.id,
                kind,
                amount,
                date,
                from_user: from,
                to_user: to,
                description,
                client_id,
            })?;
            let balance = category_service
                .get(category.id)?
                .map(|c| c.formatted_balance())
                .unwrap_or_default();

            println!("Created transaction:");
            println!("  ID:       {}", txn.id);
            println!("  Date:     {}", txn.date.format(&settings.date_format));
            println!("  Amount:   {}", format_signed_amount(&txn, &category.currency));
            println!("  Category: {} ({})", category.name, balance);
        }

        TransactionCommands::List {
            category,
            client,
            limit,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);
            let mut currency = settings.currency_symbol.clone();

            if let Some(name) = &category {
                let category = category_service.require(name)?;
                currency = category.currency.clone();
                filter = filter.category(category.id);
            }
            if let Some(client) = &client {
                filter = filter.client(client_service.require(client)?.id);
            }

            let transactions = service.list(filter)?;
            print!(
                "{}",
                format_transaction_register(
                    &transactions,
                    &currency,
                    &settings.date_format,
                    &settings.time_format
                )
            );
        }

        TransactionCommands::Show { id } => {
            let txn = service
                .find(&id)?
                .ok_or_else(|| LedgerError::transaction_not_found(&id))?;
            let category = category_service.get(txn.category_id)?;
            let currency = currency_of(category.as_ref(), settings);

            print!(
                "{}",
                format_transaction_details(
                    &txn,
                    category.as_ref().map(|c| c.name.as_str()),
                    &currency,
                    &settings.date_format,
                    &settings.time_format
                )
            );
        }

        TransactionCommands::Delete { id, force } => {
            return Ok(run_delete(storage, settings, &id, force));
        }
    }

    Ok(CommandStatus::Success)
}

/// The delete flow: confirm, delete with balance correction, notify
///
/// Every failure is logged and reported with the same notification; the
/// transaction and its category are left as they were.
pub fn run_delete(storage: &Storage, settings: &Settings, id: &str, force: bool) -> CommandStatus {
    let service = TransactionService::new(storage);

    let outcome = delete_confirmed(&service, id, |txn| {
        if force {
            return Ok(true);
        }
        let category = CategoryService::new(storage).get(txn.category_id)?;
        let currency = currency_of(category.as_ref(), settings);
        print!("{}", delete_summary(txn, &currency, &settings.date_format));
        Ok(confirm_stdin("Delete this transaction?")?)
    });

    match outcome {
        Ok(Some(deleted)) => {
            Notification::success("Transaction deleted").show();
            println!(
                "  {}: {} -> {}",
                deleted.category_after.name,
                deleted.category_before.formatted_balance(),
                deleted.category_after.formatted_balance()
            );
            CommandStatus::Success
        }
        Ok(None) => {
            println!("Cancelled.");
            CommandStatus::Success
        }
        Err(e) => {
            tracing::error!(error = %e, transaction = id, "error deleting transaction");
            Notification::error("Failed to delete transaction").show();
            CommandStatus::Failed
        }
    }
}

/// The category's own currency, or the configured one when it is gone
fn currency_of(category: Option<&Category>, settings: &Settings) -> String {
    category
        .map(|c| c.currency.clone())
        .unwrap_or_else(|| settings.currency_symbol.clone())
}

fn delete_summary(txn: &Transaction, currency: &str, date_format: &str) -> String {
    let mut out = String::from("About to delete transaction:\n");
    out.push_str(&format!("  Date:   {}\n", txn.date.format(date_format)));
    out.push_str(&format!("  Amount: {}\n", format_signed_amount(txn, currency)));
    if !txn.description.is_empty() {
        out.push_str(&format!("  Note:   {}\n", txn.description));
    }
    out
}

/// Look the transaction up, ask `confirm`, then delete it
///
/// Returns `None` when the deletion was declined.
fn delete_confirmed<F>(
    service: &TransactionService<'_>,
    id: &str,
    confirm: F,
) -> LedgerResult<Option<DeletedTransaction>>
where
    F: FnOnce(&Transaction) -> LedgerResult<bool>,
{
    let txn = service
        .find(id)?
        .ok_or_else(|| LedgerError::transaction_not_found(id))?;

    if !confirm(&txn)? {
        return Ok(None);
    }

    service.delete(txn.id).map(Some)
}

/// Parse `YYYY-MM-DD` (midnight UTC) or a full RFC 3339 timestamp
fn parse_date(s: &str) -> LedgerResult<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            LedgerError::Validation(format!(
                "Invalid date format: '{}'. Use YYYY-MM-DD",
                s
            ))
        })
}
