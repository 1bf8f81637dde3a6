//! Reminder CLI commands

use chrono::Utc;
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_reminder_list;
use crate::error::EventraResult;
use crate::models::{LeadTime, ReminderChannel};
use crate::services::{EventService, ReminderService, ReminderUpdate};
use crate::storage::Storage;

use super::parse_value;

/// Reminder subcommands
#[derive(Subcommand)]
pub enum ReminderCommands {
    /// Schedule a reminder before an event
    Add {
        /// Event title or ID
        event: String,
        /// email, sms or push
        #[arg(short, long, default_value = "email")]
        channel: String,
        /// How long before the start, e.g. "1 week", "3 days", "2h"
        #[arg(short, long)]
        before: Option<String>,
        /// Custom message
        #[arg(short, long)]
        message: Option<String>,
    },
    /// List an event's reminders
    List {
        /// Event title or ID
        event: String,
    },
    /// Edit an unsent reminder
    Edit {
        /// Reminder ID
        reminder: String,
        #[arg(short, long)]
        channel: Option<String>,
        #[arg(short, long)]
        before: Option<String>,
        #[arg(short, long)]
        message: Option<String>,
        #[arg(long, conflicts_with = "message")]
        clear_message: bool,
    },
    /// Delete a reminder
    Delete {
        /// Reminder ID
        reminder: String,
    },
    /// List unsent reminders whose time has come
    Due,
    /// Mark a reminder as delivered
    MarkSent {
        /// Reminder ID
        reminder: String,
    },
}

/// Handle a reminder command
pub fn handle_reminder_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReminderCommands,
) -> EventraResult<()> {
    let events = EventService::new(storage);
    let service = ReminderService::new(storage);

    match cmd {
        ReminderCommands::Add {
            event,
            channel,
            before,
            message,
        } => {
            let event = events.require(&event)?;
            let channel: ReminderChannel = parse_value(&channel)?;
            let lead_time = match before {
                Some(text) => parse_value::<LeadTime>(&text)?,
                None => settings.default_reminder_lead,
            };

            let reminder = service.add(event.id, settings.owner_id, channel, lead_time, message)?;
            println!("Added reminder: {} for {}", reminder, event.title);
            if let Some(at) = reminder.scheduled_for {
                println!("  Fires at: {} UTC", at.format("%Y-%m-%d %H:%M"));
            }
            println!("  ID:       {}", reminder.id);
        }

        ReminderCommands::List { event } => {
            let event = events.require(&event)?;
            print!("{}", format_reminder_list(&service.list_for_event(event.id)?));
        }

        ReminderCommands::Edit {
            reminder,
            channel,
            before,
            message,
            clear_message,
        } => {
            let found = service.require(&reminder)?;
            let changes = ReminderUpdate {
                channel: channel.as_deref().map(parse_value).transpose()?,
                lead_time: before.as_deref().map(parse_value).transpose()?,
                message: if clear_message { Some(None) } else { message.map(Some) },
            };

            let updated = service.update(found.id, changes)?;
            println!("Updated reminder: {}", updated);
        }

        ReminderCommands::Delete { reminder } => {
            let found = service.require(&reminder)?;
            let deleted = service.delete(found.id)?;
            println!("Deleted reminder: {}", deleted);
        }

        ReminderCommands::Due => {
            let due = service.due(Utc::now())?;
            if due.is_empty() {
                println!("No reminders are due.");
                return Ok(());
            }
            for reminder in &due {
                let title = events
                    .get(reminder.event_id)?
                    .map(|e| e.title)
                    .unwrap_or_default();
                println!("{}  {}  {}", reminder.id, title, reminder);
                if let Some(message) = &reminder.message {
                    println!("    {}", message);
                }
            }
        }

        ReminderCommands::MarkSent { reminder } => {
            let found = service.require(&reminder)?;
            let sent = service.mark_sent(found.id)?;
            println!("Marked reminder {} as sent", sent.id);
        }
    }

    Ok(())
}
