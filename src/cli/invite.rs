//! Invitation and RSVP CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_invitation_list;
use crate::error::EventraResult;
use crate::models::RsvpStatus;
use crate::reports::RsvpSummary;
use crate::services::{EventService, InvitationService, InvitationUpdate, RsvpResponse};
use crate::storage::Storage;

use super::{parse_value, today};

/// Invitation subcommands
#[derive(Subcommand)]
pub enum InviteCommands {
    /// Invite someone to an event
    Send {
        /// Event title or ID
        event: String,
        /// Invitee email address
        email: String,
        /// Invitee name
        #[arg(short, long)]
        name: Option<String>,
        /// Number of people covered by the invitation
        #[arg(short, long, default_value = "1")]
        guests: u32,
    },
    /// List an event's invitations
    List {
        /// Event title or ID
        event: String,
        /// Only show invitations with this status
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Record an RSVP
    Respond {
        /// Invitation ID or invitee email
        invitation: String,
        /// accepted, declined, maybe or pending
        status: String,
        /// Event title or ID, to disambiguate an email invited to several events
        #[arg(short, long)]
        event: Option<String>,
        /// Updated number of people attending
        #[arg(short, long)]
        guests: Option<u32>,
        #[arg(long)]
        dietary: Option<String>,
        #[arg(long)]
        requests: Option<String>,
    },
    /// Edit an invitation
    Edit {
        /// Invitation ID or invitee email
        invitation: String,
        #[arg(short, long)]
        event: Option<String>,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        guests: Option<u32>,
        #[arg(long)]
        dietary: Option<String>,
        #[arg(long)]
        requests: Option<String>,
    },
    /// Withdraw an invitation
    Delete {
        /// Invitation ID or invitee email
        invitation: String,
        #[arg(short, long)]
        event: Option<String>,
    },
    /// Count invitations by RSVP status
    Summary {
        /// Event title or ID
        event: String,
    },
}

/// Handle an invitation command
pub fn handle_invite_command(
    storage: &Storage,
    settings: &Settings,
    cmd: InviteCommands,
) -> EventraResult<()> {
    let events = EventService::new(storage);
    let service = InvitationService::new(storage);

    // Optional event scope for email lookups
    let scope = |event: Option<String>| -> EventraResult<_> {
        Ok(match event {
            Some(reference) => Some(events.require(&reference)?.id),
            None => None,
        })
    };

    match cmd {
        InviteCommands::Send {
            event,
            email,
            name,
            guests,
        } => {
            let event = events.require(&event)?;
            let invitation = service.send(event.id, &email, name, guests, settings.owner_id)?;

            println!("Invited {} to {}", invitation.display_name(), event.title);
            println!("  Guests: {}", invitation.guest_count);
            println!("  ID:     {}", invitation.id);
            if let Some(remaining) = service.remaining_seats(&event)? {
                println!("  Seats left under the guest cap: {}", remaining);
            }
        }

        InviteCommands::List { event, status } => {
            let event = events.require(&event)?;
            let mut invitations = service.list_for_event(event.id)?;
            if let Some(status) = status {
                let status: RsvpStatus = parse_value(&status)?;
                invitations.retain(|i| i.status == status);
            }
            print!("{}", format_invitation_list(&invitations));
        }

        InviteCommands::Respond {
            invitation,
            status,
            event,
            guests,
            dietary,
            requests,
        } => {
            let found = service.require(&invitation, scope(event)?)?;
            let response = RsvpResponse {
                status: parse_value(&status)?,
                guest_count: guests,
                dietary_restrictions: dietary,
                special_requests: requests,
            };

            let updated = service.respond(found.id, response, today())?;
            println!(
                "{} responded: {} ({} guests)",
                updated.display_name(),
                updated.status,
                updated.guest_count
            );
        }

        InviteCommands::Edit {
            invitation,
            event,
            name,
            guests,
            dietary,
            requests,
        } => {
            let found = service.require(&invitation, scope(event)?)?;
            let changes = InvitationUpdate {
                invitee_name: name.map(Some),
                guest_count: guests,
                dietary_restrictions: dietary.map(Some),
                special_requests: requests.map(Some),
            };

            let updated = service.update(found.id, changes)?;
            println!("Updated invitation: {}", updated);
        }

        InviteCommands::Delete { invitation, event } => {
            let found = service.require(&invitation, scope(event)?)?;
            let deleted = service.delete(found.id)?;
            println!("Withdrew invitation for {}", deleted.invitee_email);
        }

        InviteCommands::Summary { event } => {
            let event = events.require(&event)?;
            let summary = RsvpSummary::from_invitations(&service.list_for_event(event.id)?);
            println!("RSVPs for {}", event.title);
            print!("{}", summary.format_terminal());
            if let Some(remaining) = service.remaining_seats(&event)? {
                println!("Seats left under the guest cap: {}", remaining);
            }
        }
    }

    Ok(())
}
