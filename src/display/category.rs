//! Category display formatting

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

use crate::models::{Category, Money};
use crate::services::CategoryWithTransactions;

use super::transaction::format_transaction_register;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    name: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "ID")]
    id: String,
}

/// Format categories as a table with their balances
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'buildledger category add <name>' to create one."
            .to_string();
    }

    let rows = categories.iter().map(|c| CategoryRow {
        name: c.name.clone(),
        balance: c.formatted_balance(),
        id: c.id.to_string(),
    });

    Table::new(rows)
        .with(Style::rounded())
        .modify(Columns::single(1), Alignment::right())
        .to_string()
}

/// Format per-currency totals, one line each
pub fn format_totals(totals: &[(String, Money)]) -> String {
    totals
        .iter()
        .map(|(symbol, total)| format!("Total: {}\n", total.format_with_suffix(symbol)))
        .collect()
}

/// Format category details with its transactions
pub fn format_category_details(
    details: &CategoryWithTransactions,
    date_format: &str,
    time_format: &str,
) -> String {
    let category = &details.category;
    let mut output = String::new();

    output.push_str(&format!("Category: {}\n", category.name));
    output.push_str(&format!("  ID:      {}\n", category.id));
    output.push_str(&format!("  Balance: {}\n", category.formatted_balance()));
    output.push_str(&format!(
        "  Created: {}\n",
        category.created_at.format(date_format)
    ));
    output.push('\n');

    output.push_str(&format_transaction_register(
        &details.transactions,
        &category.currency,
        date_format,
        time_format,
    ));

    output
}
