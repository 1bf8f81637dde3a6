//! Calendar CLI commands
//!
//! Generates calendar links and files for events and tracks the sync state of
//! each linked provider.

use std::fs;
use std::path::PathBuf;

use clap::Subcommand;

use crate::calendar::CalendarExport;
use crate::config::settings::Settings;
use crate::display::format_integration_list;
use crate::error::{EventraError, EventraResult};
use crate::models::{CalendarProvider, SyncStatus};
use crate::services::{CalendarService, EventService};
use crate::storage::Storage;

use super::parse_value;

/// Calendar subcommands
#[derive(Subcommand)]
pub enum CalendarCommands {
    /// Register a calendar provider for an event
    Add {
        /// Event title or ID
        event: String,
        /// google, outlook, apple or ical
        provider: String,
    },
    /// List an event's calendar integrations
    List {
        /// Event title or ID
        event: String,
    },
    /// Print a calendar link, or write an .ics file
    Link {
        /// Event title or ID
        event: String,
        /// google, outlook, apple or ical
        #[arg(default_value = "google")]
        provider: String,
        /// Where to write the .ics file (a directory or a file path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Record a sync outcome
    Status {
        /// Integration ID
        integration: String,
        /// pending, synced, failed or removed
        status: String,
        /// Error text for a failed sync
        #[arg(short, long)]
        error: Option<String>,
        /// Identifier of the copy in the external calendar
        #[arg(long)]
        external_id: Option<String>,
    },
    /// Remove a calendar integration
    Remove {
        /// Integration ID
        integration: String,
    },
}

/// Handle a calendar command
pub fn handle_calendar_command(
    storage: &Storage,
    settings: &Settings,
    cmd: CalendarCommands,
) -> EventraResult<()> {
    let events = EventService::new(storage);
    let service = CalendarService::new(storage);

    match cmd {
        CalendarCommands::Add { event, provider } => {
            let event = events.require(&event)?;
            let provider: CalendarProvider = parse_value(&provider)?;
            let integration = service.add(event.id, settings.owner_id, provider)?;
            println!("Added {} for {}", provider.label(), event.title);
            println!("  ID: {}", integration.id);
        }

        CalendarCommands::List { event } => {
            let event = events.require(&event)?;
            print!("{}", format_integration_list(&service.list_for_event(event.id)?));
        }

        CalendarCommands::Link {
            event,
            provider,
            output,
        } => {
            let event = events.require(&event)?;
            let provider: CalendarProvider = parse_value(&provider)?;
            let (export, _) = service.link(
                event.id,
                settings.owner_id,
                provider,
                settings.event_duration_hours,
            )?;

            match export {
                CalendarExport::Link(url) => {
                    if output.is_some() {
                        return Err(EventraError::Validation(format!(
                            "{} uses a link; --output only applies to apple and ical",
                            provider.label()
                        )));
                    }
                    println!("{}", url);
                }
                CalendarExport::IcsFile { file_name, content } => match output {
                    Some(target) => {
                        let path = if target.is_dir() {
                            target.join(&file_name)
                        } else {
                            target
                        };
                        fs::write(&path, content).map_err(|e| {
                            EventraError::Calendar(format!(
                                "Failed to write {}: {}",
                                path.display(),
                                e
                            ))
                        })?;
                        println!("Wrote {}", path.display());
                    }
                    None => print!("{}", content),
                },
            }
        }

        CalendarCommands::Status {
            integration,
            status,
            error,
            external_id,
        } => {
            let found = service.require(&integration)?;
            let status: SyncStatus = parse_value(&status)?;
            let updated = service.set_status(found.id, status, error, external_id)?;
            println!("{}: {}", updated.provider.label(), updated.sync_status);
            if let Some(error) = &updated.sync_error {
                println!("  Error: {}", error);
            }
        }

        CalendarCommands::Remove { integration } => {
            let found = service.require(&integration)?;
            let removed = service.remove(found.id)?;
            println!("Removed {}", removed.provider.label());
        }
    }

    Ok(())
}
