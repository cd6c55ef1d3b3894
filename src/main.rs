use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use buildledger::cli::{
    handle_category_command, handle_client_command, handle_transaction_command, CategoryCommands,
    ClientCommands, CommandStatus, TransactionCommands,
};
use buildledger::config::{paths::LedgerPaths, settings::Settings};
use buildledger::storage::{init::initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "buildledger",
    author = "Kaylee Beyene",
    version,
    about = "Clients, balances and payments for a construction business",
    long_about = "buildledger keeps track of clients whose construction is in progress, \
                  money categories with running balances, and the income and expenses \
                  recorded against them, all from the command line."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Client management commands
    #[command(subcommand)]
    Client(ClientCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Initialize a new ledger
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    buildledger::logging::init();

    let paths = LedgerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let command = match cli.command {
        Some(command) => command,
        None => {
            println!("buildledger - construction business ledger");
            println!();
            println!("Run 'buildledger --help' for usage information.");
            println!("Run 'buildledger init' to set up a new ledger.");
            return Ok(ExitCode::SUCCESS);
        }
    };

    match command {
        Commands::Init => {
            println!("Initializing buildledger at: {}", paths.base_dir().display());
            initialize_storage(&paths)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Next steps:");
            println!("  buildledger category add Cash --balance 0");
            println!("  buildledger client add <first> <last> --number <no> --days <days>");
        }
        Commands::Client(cmd) => {
            handle_client_command(&open_storage(&paths)?, &settings, cmd)?;
        }
        Commands::Category(cmd) => {
            handle_category_command(&open_storage(&paths)?, &settings, cmd)?;
        }
        Commands::Transaction(cmd) => {
            let storage = open_storage(&paths)?;
            if handle_transaction_command(&storage, &settings, cmd)? == CommandStatus::Failed {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Config => {
            println!("buildledger Configuration");
            println!("=========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!("Initialized:      {}", paths.is_initialized());
            println!();
            println!("Settings:");
            println!("  Currency symbol:    {}", settings.currency_symbol);
            println!("  Near deadline days: {}", settings.near_deadline_days);
            println!("  Date format:        {}", settings.date_format);
            println!("  Time format:        {}", settings.time_format);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn open_storage(paths: &LedgerPaths) -> Result<Storage> {
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;
    Ok(storage)
}
