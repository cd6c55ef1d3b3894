//! Client CLI commands
//!
//! Implements CLI commands for clients under construction.

use chrono::Utc;
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::client::{format_client_details, format_client_table, ClientCard};
use crate::display::transaction::format_transaction_register;
use crate::error::LedgerResult;
use crate::models::ClientStage;
use crate::services::{parse_balance, ClientService, CreateClientInput};
use crate::storage::Storage;

/// Client subcommands
#[derive(Subcommand)]
pub enum ClientCommands {
    /// Register a new client
    Add {
        /// First name
        first_name: String,
        /// Last name
        last_name: String,
        /// Client number
        #[arg(short, long)]
        number: String,
        /// Construction duration in days
        #[arg(short, long)]
        days: u32,
        /// Name of the object being built
        #[arg(short, long)]
        object: Option<String>,
        /// Phone number
        #[arg(short, long)]
        phone: Option<String>,
        /// Construction address
        #[arg(short, long)]
        address: Option<String>,
        /// Contract amount
        #[arg(short, long)]
        contract: Option<String>,
        /// Stage (building, deposit, built)
        #[arg(short, long)]
        stage: Option<ClientStage>,
    },

    /// List client cards
    List {
        /// Only clients at this stage
        #[arg(short, long)]
        stage: Option<ClientStage>,
    },

    /// Show one client's card with deadline and payments
    Show {
        /// Client number or ID
        client: String,
    },

    /// Show or hide the icons on a client's card
    #[command(name = "toggle-icons")]
    ToggleIcons {
        /// Client number or ID
        client: String,
    },

    /// Move a client to another stage
    Stage {
        /// Client number or ID
        client: String,
        /// New stage (building, deposit, built)
        stage: ClientStage,
    },

    /// Payments linked to a client
    History {
        /// Client number or ID
        client: String,
    },
}

/// Handle a client command
pub fn handle_client_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ClientCommands,
) -> LedgerResult<()> {
    let service = ClientService::new(storage);

    match cmd {
        ClientCommands::Add {
            first_name,
            last_name,
            number,
            days,
            object,
            phone,
            address,
            contract,
            stage,
        } => {
            let contract_amount = contract.as_deref().map(parse_balance).transpose()?;

            let client = service.create(CreateClientInput {
                first_name,
                last_name,
                client_number: number,
                construction_days: days,
                object_name: object,
                phone,
                construction_address: address,
                contract_amount,
                stage,
                started_at: None,
            })?;

            println!("Created client: {}", client);
            println!("  Stage: {}", client.stage);
            println!("  ID:    {}", client.id);
        }

        ClientCommands::List { stage } => {
            let now = Utc::now();
            let clients = service.list(stage)?;

            let mut cards = Vec::with_capacity(clients.len());
            for (i, client) in clients.iter().enumerate() {
                let progress = service.payment_progress(client)?;
                cards.push(ClientCard::build(
                    client,
                    (i + 1).to_string(),
                    now,
                    progress,
                    settings.near_deadline_days,
                ));
            }

            println!("{}", format_client_table(&cards));
        }

        ClientCommands::Show { client } => {
            let client = service.require(&client)?;
            let progress = service.payment_progress(&client)?;
            let card = ClientCard::build(
                &client,
                "1",
                Utc::now(),
                progress,
                settings.near_deadline_days,
            );

            print!(
                "{}",
                format_client_details(&card, &settings.date_format, &settings.currency_symbol)
            );
        }

        ClientCommands::ToggleIcons { client } => {
            let client = service.require(&client)?;
            let updated = service.toggle_icons(client.id)?;
            let state = if updated.icons_visible { "shown" } else { "hidden" };
            println!("Icons {} for {}", state, updated);
        }

        ClientCommands::Stage { client, stage } => {
            let client = service.require(&client)?;
            let updated = service.set_stage(client.id, stage)?;
            println!("{} moved to {}", updated, updated.stage);
        }

        ClientCommands::History { client } => {
            let client = service.require(&client)?;
            let history = service.history(client.id)?;

            println!("Payments for {}", client);
            print!(
                "{}",
                format_transaction_register(
                    &history,
                    &settings.currency_symbol,
                    &settings.date_format,
                    &settings.time_format
                )
            );
        }
    }

    Ok(())
}
