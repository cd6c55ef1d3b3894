//! Category CLI commands
//!
//! Implements CLI commands for category management.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::category::{format_category_details, format_category_list, format_totals};
use crate::error::LedgerResult;
use crate::models::Money;
use crate::services::{parse_balance, CategoryService};
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories with their balances
    List,

    /// Create a new category
    Add {
        /// Category name
        name: String,
        /// Opening balance, as a number ("1000") or formatted text ("1000 ₸")
        #[arg(short, long, allow_hyphen_values = true)]
        balance: Option<String>,
        /// Currency symbol, defaults to the configured one
        #[arg(long)]
        currency: Option<String>,
    },

    /// Show a category and its transactions
    Show {
        /// Category name or ID
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command(
    storage: &Storage,
    settings: &Settings,
    cmd: CategoryCommands,
) -> LedgerResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List => {
            let categories = service.list()?;
            println!("{}", format_category_list(&categories));
            if !categories.is_empty() {
                print!("{}", format_totals(&service.totals()?));
            }
        }

        CategoryCommands::Add {
            name,
            balance,
            currency,
        } => {
            let balance = match balance {
                Some(text) => parse_balance(&text)?,
                None => Money::zero(),
            };
            let currency = currency.unwrap_or_else(|| settings.currency_symbol.clone());

            let category = service.create(&name, balance, &currency)?;

            println!("Created category: {}", category.name);
            println!("  Balance: {}", category.formatted_balance());
            println!("  ID:      {}", category.id);
        }

        CategoryCommands::Show { category } => {
            let found = service.require(&category)?;
            let details = service.with_transactions(found.id)?;
            print!(
                "{}",
                format_category_details(&details, &settings.date_format, &settings.time_format)
            );
        }
    }

    Ok(())
}
