use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use eventra::cli::{
    handle_budget_command, handle_calendar_command, handle_event_command, handle_expense_command,
    handle_export_command, handle_invite_command, handle_reminder_command,
};
use eventra::config::{paths::EventraPaths, settings::Settings};
use eventra::reports::EventOverviewReport;
use eventra::storage::Storage;

/// Environment variable holding the log filter
const LOG_ENV: &str = "EVENTRA_LOG";

#[derive(Parser)]
#[command(
    name = "eventra",
    version,
    about = "Terminal-based event planner",
    long_about = "Eventra plans events from the command line: budgets split into \
                  categories by event type, expenses, invitations and RSVPs, \
                  reminders and calendar links."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Set up the data directory
    Init,

    /// Show current configuration and paths
    Config,

    /// Show recent changes from the audit log
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Upcoming and past events at a glance
    Overview,

    /// Event management commands
    #[command(subcommand)]
    Event(eventra::cli::EventCommands),

    /// Budget category commands
    #[command(subcommand)]
    Budget(eventra::cli::BudgetCommands),

    /// Expense commands
    #[command(subcommand)]
    Expense(eventra::cli::ExpenseCommands),

    /// Invitation and RSVP commands
    #[command(subcommand, alias = "invitation")]
    Invite(eventra::cli::InviteCommands),

    /// Reminder commands
    #[command(subcommand)]
    Reminder(eventra::cli::ReminderCommands),

    /// Calendar link and integration commands
    #[command(subcommand)]
    Calendar(eventra::cli::CalendarCommands),

    /// Export data
    #[command(subcommand)]
    Export(eventra::cli::ExportCommands),
}

fn init_logging() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set up logging: {}", e))?;

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    // Initialize paths and settings
    let paths = EventraPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    if !paths.is_initialized() {
        // Fixes the owner id for everything created from here on
        settings.save(&paths)?;
    }

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing Eventra at: {}", paths.base_dir().display());
            eventra::storage::initialize_storage(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Create your first event with:");
            println!("  eventra event create \"Summer Wedding\" --date 2026-06-20 \\");
            println!("      --location \"Rose Garden\" --category wedding --budget 15000");
        }
        Some(Commands::Config) => {
            println!("Eventra Configuration");
            println!("=====================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Export directory: {}", paths.export_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Owner ID:              {}", settings.owner_id);
            if let Some(name) = &settings.owner_name {
                println!("  Owner name:            {}", name);
            }
            println!("  Currency symbol:       {}", settings.currency_symbol);
            println!("  Date format:           {}", settings.date_format);
            println!("  Event duration:        {} hours", settings.event_duration_hours);
            println!("  Default reminder lead: {}", settings.default_reminder_lead);
            println!("  Setup completed:       {}", settings.setup_completed);
        }
        Some(Commands::Audit { limit }) => {
            let entries = storage.audit().read_recent(limit)?;
            if entries.is_empty() {
                println!("No changes recorded yet.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        Some(Commands::Overview) => {
            let today = chrono::Local::now().date_naive();
            let report = EventOverviewReport::generate(&storage, today)?;
            print!("{}", report.format_terminal());
        }
        Some(Commands::Event(cmd)) => handle_event_command(&storage, &settings, cmd)?,
        Some(Commands::Budget(cmd)) => handle_budget_command(&storage, &settings, cmd)?,
        Some(Commands::Expense(cmd)) => handle_expense_command(&storage, &settings, cmd)?,
        Some(Commands::Invite(cmd)) => handle_invite_command(&storage, &settings, cmd)?,
        Some(Commands::Reminder(cmd)) => handle_reminder_command(&storage, &settings, cmd)?,
        Some(Commands::Calendar(cmd)) => handle_calendar_command(&storage, &settings, cmd)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, cmd)?,
        None => {
            println!("Eventra - Terminal-based event planner");
            println!();
            println!("Run 'eventra --help' for usage information.");
            println!("Run 'eventra init' to get started.");
        }
    }

    Ok(())
}
