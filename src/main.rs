use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rolodex::cli::{handle_audit_command, handle_contact_command, AuditCommands, ContactCommands};
use rolodex::config::{paths::RolodexPaths, settings::Settings};
use rolodex::services::audit_interceptor;
use rolodex::storage::Storage;

#[derive(Parser)]
#[command(
    name = "rolodex",
    version,
    about = "Terminal-based contact manager with a full audit trail",
    long_about = "rolodex-cli is a terminal-based contact manager. Every create, \
                  update, and delete is recorded in an append-only audit ledger \
                  with before/after snapshots, so the history of every contact \
                  stays reconstructable."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Contact management commands
    #[command(subcommand)]
    Contact(ContactCommands),

    /// Audit trail commands
    #[command(subcommand)]
    Audit(AuditCommands),

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let paths = RolodexPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    let interceptor = audit_interceptor(&storage);

    match cli.command {
        Some(Commands::Contact(cmd)) => {
            handle_contact_command(&storage, &interceptor, &settings, cmd)?;
        }
        Some(Commands::Audit(cmd)) => {
            handle_audit_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Init) => {
            println!("Initializing rolodex at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Run 'rolodex contact add <name> <phone>' to add your first contact.");
        }
        Some(Commands::Config) => {
            println!("rolodex Configuration");
            println!("=====================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!();
            println!("Settings:");
            println!("  Strict audit: {}", settings.strict_audit);
            println!("  Date format:  {}", settings.date_format);
        }
        None => {
            println!("rolodex - Terminal-based contact manager with a full audit trail");
            println!();
            println!("Run 'rolodex --help' for usage information.");
        }
    }

    Ok(())
}
