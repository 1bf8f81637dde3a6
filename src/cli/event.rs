//! Event CLI commands
//!
//! Implements CLI commands for creating, inspecting, editing and deleting
//! events.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{
    format_event_details, format_event_list, format_expense_list, format_invitation_list,
    format_reminder_list,
};
use crate::error::EventraResult;
use crate::models::{EventCategory, EventDraft};
use crate::services::{EventService, EventUpdate};
use crate::state::EventWorkspace;
use crate::storage::Storage;

use super::{parse_date, parse_money, parse_time, parse_value};

/// Event subcommands
#[derive(Subcommand)]
pub enum EventCommands {
    /// Create an event and its suggested budget categories
    Create {
        /// Event title
        title: String,
        /// Event date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
        /// Where the event takes place
        #[arg(short, long)]
        location: String,
        /// Category (wedding, party, trip, conference, birthday, corporate, other)
        #[arg(short, long, default_value = "other")]
        category: String,
        /// Total budget (e.g., "5000" or "5000.00")
        #[arg(short, long, default_value = "0")]
        budget: String,
        /// Expected number of guests
        #[arg(short, long, default_value = "0")]
        guests: u32,
        /// Start time (HH:MM)
        #[arg(short, long)]
        time: Option<String>,
        /// Free-form description
        #[arg(long)]
        description: Option<String>,
        /// Make the event public
        #[arg(long)]
        public: bool,
        /// Cap on invited guests
        #[arg(long)]
        max_guests: Option<u32>,
        /// Last day to RSVP (YYYY-MM-DD)
        #[arg(long)]
        rsvp_by: Option<String>,
    },
    /// List events
    List,
    /// Show an event with its budget, expenses, guests and reminders
    Show {
        /// Event title or ID
        event: String,
    },
    /// Edit an event
    Edit {
        /// Event title or ID
        event: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        time: Option<String>,
        /// Remove the start time
        #[arg(long, conflicts_with = "time")]
        clear_time: bool,
        #[arg(short, long)]
        location: Option<String>,
        /// New budget; category amounts are rescaled
        #[arg(short, long)]
        budget: Option<String>,
        #[arg(short, long)]
        guests: Option<u32>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, conflicts_with = "description")]
        clear_description: bool,
        #[arg(long, conflicts_with = "private")]
        public: bool,
        #[arg(long)]
        private: bool,
        #[arg(long)]
        max_guests: Option<u32>,
        #[arg(long, conflicts_with = "max_guests")]
        clear_max_guests: bool,
        #[arg(long)]
        rsvp_by: Option<String>,
        #[arg(long, conflicts_with = "rsvp_by")]
        clear_rsvp_by: bool,
    },
    /// Delete an event and everything attached to it
    Delete {
        /// Event title or ID
        event: String,
    },
}

/// Handle an event command
pub fn handle_event_command(
    storage: &Storage,
    settings: &Settings,
    cmd: EventCommands,
) -> EventraResult<()> {
    let service = EventService::new(storage);

    match cmd {
        EventCommands::Create {
            title,
            date,
            location,
            category,
            budget,
            guests,
            time,
            description,
            public,
            max_guests,
            rsvp_by,
        } => {
            let category: EventCategory = parse_value(&category)?;
            let mut draft = EventDraft::new(
                title,
                category,
                parse_date(&date)?,
                location,
                parse_money(&budget)?,
                guests,
            );
            draft.start_time = time.as_deref().map(parse_time).transpose()?;
            draft.description = description;
            draft.is_public = public;
            draft.max_guests = max_guests;
            draft.rsvp_deadline = rsvp_by.as_deref().map(parse_date).transpose()?;

            let (event, categories) = service.create(draft, settings.owner_id)?;

            println!("Created event: {}", event.title);
            println!("  Date:     {}", event.date.format(&settings.date_format));
            println!("  Budget:   {}", settings.format_money(event.budget));
            println!("  ID:       {}", event.id);
            println!();
            println!("Budget categories ({}):", event.category.label());
            for category in &categories {
                println!(
                    "  {:<22} {:>3}%  {}",
                    category.name,
                    category.percentage,
                    settings.format_money(category.amount)
                );
            }
        }

        EventCommands::List => {
            let events = service.list_for_owner(settings.owner_id)?;
            print!("{}", format_event_list(&events, &settings.date_format));
        }

        EventCommands::Show { event } => {
            let mut workspace = EventWorkspace::new(storage, settings);
            let found = workspace.open_by_ref(&event)?;

            print!(
                "{}",
                format_event_details(&found, &settings.date_format, settings.event_duration_hours)
            );
            println!();
            if let Some(progress) = workspace.budget_progress() {
                print!("{}", progress.format_terminal());
            }
            println!();
            print!(
                "{}",
                format_expense_list(
                    workspace.expenses.items(),
                    workspace.budget_categories.items()
                )
            );
            println!();
            print!("{}", workspace.rsvp_summary().format_terminal());
            print!("{}", format_invitation_list(workspace.invitations.items()));
            println!();
            print!("{}", format_reminder_list(workspace.reminders.items()));
        }

        EventCommands::Edit {
            event,
            title,
            category,
            date,
            time,
            clear_time,
            location,
            budget,
            guests,
            description,
            clear_description,
            public,
            private,
            max_guests,
            clear_max_guests,
            rsvp_by,
            clear_rsvp_by,
        } => {
            let found = service.require(&event)?;

            let changes = EventUpdate {
                title,
                category: category.as_deref().map(parse_value).transpose()?,
                date: date.as_deref().map(parse_date).transpose()?,
                start_time: if clear_time {
                    Some(None)
                } else {
                    time.as_deref().map(parse_time).transpose()?.map(Some)
                },
                location,
                budget: budget.as_deref().map(parse_money).transpose()?,
                guest_count: guests,
                description: if clear_description {
                    Some(None)
                } else {
                    description.map(Some)
                },
                is_public: match (public, private) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
                max_guests: if clear_max_guests {
                    Some(None)
                } else {
                    max_guests.map(Some)
                },
                rsvp_deadline: if clear_rsvp_by {
                    Some(None)
                } else {
                    rsvp_by.as_deref().map(parse_date).transpose()?.map(Some)
                },
            };

            let updated = service.update(found.id, changes)?;
            println!("Updated event: {}", updated.title);
            if updated.budget != found.budget {
                println!(
                    "  Budget: {} -> {} (category amounts rescaled)",
                    settings.format_money(found.budget),
                    settings.format_money(updated.budget)
                );
            }
        }

        EventCommands::Delete { event } => {
            let found = service.require(&event)?;
            let (deleted, removed) = service.delete(found.id)?;

            println!("Deleted event: {}", deleted.title);
            println!(
                "  Removed {} budget categories, {} expenses, {} invitations, {} reminders, {} calendar links",
                removed.budget_categories,
                removed.expenses,
                removed.invitations,
                removed.reminders,
                removed.calendar_integrations
            );
        }
    }

    Ok(())
}
