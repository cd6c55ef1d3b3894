//! Transaction display formatting
//!
//! Provides register and detail views. Amounts are shown unsigned with a
//! `+` or `-` marker and an arrow for the direction of the money.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Transaction, TransactionType};

/// Arrow for the direction of a transaction
pub fn direction_icon(kind: TransactionType) -> &'static str {
    match kind {
        TransactionType::Income => "↑",
        TransactionType::Expense => "↓",
    }
}

/// Amount as shown in lists, e.g. `"+ 300 ₸"` or `"- 200 ₸"`
pub fn format_signed_amount(txn: &Transaction, currency: &str) -> String {
    let sign = match txn.kind {
        TransactionType::Income => "+",
        TransactionType::Expense => "-",
    };
    format!("{} {}", sign, txn.amount.abs().format_with_suffix(currency))
}

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "")]
    direction: &'static str,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "ID")]
    id: String,
}

/// Format a list of transactions as a register
pub fn format_transaction_register(
    transactions: &[Transaction],
    currency: &str,
    date_format: &str,
    time_format: &str,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let stamp = format!("{} {}", date_format, time_format);
    let rows = transactions.iter().map(|txn| TransactionRow {
        direction: direction_icon(txn.kind),
        date: txn.date.format(&stamp).to_string(),
        from: txn.from_user.clone(),
        to: txn.to_user.clone(),
        amount: format_signed_amount(txn, currency),
        description: txn.description.clone(),
        id: txn.id.to_string(),
    });

    let mut output = Table::new(rows).with(Style::rounded()).to_string();
    output.push('\n');
    output
}

/// Format transaction details for display
pub fn format_transaction_details(
    txn: &Transaction,
    category_name: Option<&str>,
    currency: &str,
    date_format: &str,
    time_format: &str,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!(
        "Date:        {} {}\n",
        txn.date.format(date_format),
        txn.date.format(time_format)
    ));
    output.push_str(&format!(
        "Amount:      {} {}\n",
        direction_icon(txn.kind),
        format_signed_amount(txn, currency)
    ));
    output.push_str(&format!("Type:        {}\n", txn.kind));

    match category_name {
        Some(name) => output.push_str(&format!("Category:    {}\n", name)),
        None => output.push_str(&format!("Category:    {} (missing)\n", txn.category_id)),
    }

    if !txn.from_user.is_empty() {
        output.push_str(&format!("From:        {}\n", txn.from_user));
    }
    if !txn.to_user.is_empty() {
        output.push_str(&format!("To:          {}\n", txn.to_user));
    }
    if !txn.description.is_empty() {
        output.push_str(&format!("Description: {}\n", txn.description));
    }
    if let Some(client_id) = txn.client_id {
        output.push_str(&format!("Client:      {}\n", client_id));
    }

    output
}
