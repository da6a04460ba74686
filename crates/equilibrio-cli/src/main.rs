use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod console;

#[derive(Parser)]
#[command(name = "equilibrio", version, about = "Equilibrio routine reminders")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the current routine and fire reminders until Ctrl-C
    Watch,
    /// Run a single evaluation cycle and print the reminders as JSON
    Check(commands::check::CheckArgs),
    /// Routine management
    Routine {
        #[command(subcommand)]
        action: commands::routine::RoutineAction,
    },
    /// Settings management
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Lock screen control
    Lock {
        #[command(subcommand)]
        action: commands::lock::LockAction,
    },
    /// Delivered reminder history
    Ledger {
        #[command(subcommand)]
        action: commands::ledger::LedgerAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Watch => commands::watch::run(),
        Commands::Check(args) => commands::check::run(args),
        Commands::Routine { action } => commands::routine::run(action),
        Commands::Settings { action } => commands::settings::run(action),
        Commands::Lock { action } => commands::lock::run(action),
        Commands::Ledger { action } => commands::ledger::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
