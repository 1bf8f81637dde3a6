//! Invitation model
//!
//! A tracked invite to an event. The status moves between pending, accepted,
//! declined and maybe as the invitee responds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{EventId, InvitationId, UserId};

/// RSVP status of an invitation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
    Maybe,
}

impl RsvpStatus {
    pub fn all() -> &'static [Self] {
        &[Self::Pending, Self::Accepted, Self::Declined, Self::Maybe]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Maybe => "maybe",
        }
    }
}

impl fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RsvpStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "accepted" | "accept" | "yes" => Ok(Self::Accepted),
            "declined" | "decline" | "no" => Ok(Self::Declined),
            "maybe" | "tentative" => Ok(Self::Maybe),
            other => Err(format!(
                "Unknown RSVP status '{}'. Expected pending, accepted, declined or maybe",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invitation {
    pub id: InvitationId,

    pub event_id: EventId,

    pub invitee_email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invitee_name: Option<String>,

    /// User who sent the invitation
    pub invited_by: UserId,

    #[serde(default)]
    pub status: RsvpStatus,

    /// Number of people covered by this invitation (invitee included)
    pub guest_count: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_restrictions: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,

    pub invited_at: DateTime<Utc>,

    /// When the invitee last changed their status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responded_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

impl Invitation {
    pub fn new(
        event_id: EventId,
        invitee_email: impl Into<String>,
        invited_by: UserId,
        guest_count: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: InvitationId::new(),
            event_id,
            invitee_email: invitee_email.into().trim().to_lowercase(),
            invitee_name: None,
            invited_by,
            status: RsvpStatus::Pending,
            guest_count,
            dietary_restrictions: None,
            special_requests: None,
            invited_at: now,
            responded_at: None,
            created_at: now,
        }
    }

    /// Record an RSVP response
    pub fn respond(&mut self, status: RsvpStatus) {
        self.status = status;
        self.responded_at = Some(Utc::now());
    }

    /// Name if known, otherwise the email address
    pub fn display_name(&self) -> &str {
        self.invitee_name.as_deref().unwrap_or(&self.invitee_email)
    }

    /// Whether this invitation still holds seats against a guest cap
    pub fn holds_seats(&self) -> bool {
        matches!(self.status, RsvpStatus::Pending | RsvpStatus::Accepted | RsvpStatus::Maybe)
    }

    pub fn validate(&self) -> Result<(), InvitationValidationError> {
        if !is_plausible_email(&self.invitee_email) {
            return Err(InvitationValidationError::InvalidEmail(
                self.invitee_email.clone(),
            ));
        }

        if self.guest_count == 0 {
            return Err(InvitationValidationError::ZeroGuests);
        }

        Ok(())
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && domain.contains('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

impl fmt::Display for Invitation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvitationValidationError {
    InvalidEmail(String),
    ZeroGuests,
}

impl fmt::Display for InvitationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail(email) => write!(f, "Invalid email address: '{}'", email),
            Self::ZeroGuests => write!(f, "Guest count must be at least 1"),
        }
    }
}

impl std::error::Error for InvitationValidationError {}
