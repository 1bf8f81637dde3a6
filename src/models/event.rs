//! Event model
//!
//! An event is the root record every other entity hangs off: budget
//! categories, expenses, invitations, reminders and calendar integrations all
//! carry its id.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{EventId, UserId};
use super::money::Money;

/// Years an event date may fall in
pub const EVENT_YEARS: std::ops::RangeInclusive<i32> = 1900..=9999;

/// Kind of event; selects the budget allocation template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Wedding,
    Party,
    Trip,
    Conference,
    Birthday,
    Corporate,
    /// Anything else, including category names written by newer versions
    #[default]
    #[serde(other)]
    Other,
}

impl EventCategory {
    pub fn all() -> &'static [Self] {
        &[
            Self::Wedding,
            Self::Party,
            Self::Trip,
            Self::Conference,
            Self::Birthday,
            Self::Corporate,
            Self::Other,
        ]
    }

    /// Storage name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wedding => "wedding",
            Self::Party => "party",
            Self::Trip => "trip",
            Self::Conference => "conference",
            Self::Birthday => "birthday",
            Self::Corporate => "corporate",
            Self::Other => "other",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Wedding => "Wedding",
            Self::Party => "Party",
            Self::Trip => "Trip",
            Self::Conference => "Conference",
            Self::Birthday => "Birthday",
            Self::Corporate => "Corporate Event",
            Self::Other => "Other",
        }
    }

    /// Map any name to a category; unrecognised names become `Other`
    pub fn from_name_lenient(name: &str) -> Self {
        name.parse().unwrap_or(Self::Other)
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for EventCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "wedding" => Ok(Self::Wedding),
            "party" => Ok(Self::Party),
            "trip" | "travel" => Ok(Self::Trip),
            "conference" => Ok(Self::Conference),
            "birthday" => Ok(Self::Birthday),
            "corporate" | "corporate event" => Ok(Self::Corporate),
            "other" => Ok(Self::Other),
            other => Err(format!(
                "Unknown event category '{}'. Expected one of: wedding, party, trip, conference, birthday, corporate, other",
                other
            )),
        }
    }
}

/// The fields a user fills in when creating an event
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub title: String,
    pub category: EventCategory,
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub location: String,
    pub budget: Money,
    pub guest_count: u32,
    pub description: Option<String>,
    pub is_public: bool,
    pub max_guests: Option<u32>,
    pub rsvp_deadline: Option<NaiveDate>,
}

impl EventDraft {
    /// A draft with the required fields and every optional field unset
    pub fn new(
        title: impl Into<String>,
        category: EventCategory,
        date: NaiveDate,
        location: impl Into<String>,
        budget: Money,
        guest_count: u32,
    ) -> Self {
        Self {
            title: title.into(),
            category,
            date,
            start_time: None,
            location: location.into(),
            budget,
            guest_count,
            description: None,
            is_public: false,
            max_guests: None,
            rsvp_deadline: None,
        }
    }
}

/// A planned occasion owned by one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,

    pub title: String,

    pub category: EventCategory,

    /// Calendar date of the event
    pub date: NaiveDate,

    /// Start time; midnight when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,

    pub location: String,

    /// Total budget for the event
    pub budget: Money,

    /// Expected number of guests
    pub guest_count: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether the event is publicly visible
    #[serde(default)]
    pub is_public: bool,

    /// Cap on invited guests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_guests: Option<u32>,

    /// Last day RSVPs are accepted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsvp_deadline: Option<NaiveDate>,

    /// Creating user
    pub owner_id: UserId,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Create an event from a draft
    pub fn from_draft(draft: EventDraft, owner_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: EventId::new(),
            title: draft.title.trim().to_string(),
            category: draft.category,
            date: draft.date,
            start_time: draft.start_time,
            location: draft.location.trim().to_string(),
            budget: draft.budget,
            guest_count: draft.guest_count,
            description: draft
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            is_public: draft.is_public,
            max_guests: draft.max_guests,
            rsvp_deadline: draft.rsvp_deadline,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Start of the event as a naive datetime (interpreted as UTC on export)
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time.unwrap_or(NaiveTime::MIN))
    }

    /// End of the event given a duration in hours; `None` past the calendar range
    pub fn ends_at(&self, duration_hours: u32) -> Option<NaiveDateTime> {
        self.starts_at()
            .checked_add_signed(Duration::hours(i64::from(duration_hours)))
    }

    /// Whether the event is today or later
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.date >= today
    }

    /// Days from `today` until the event (negative once it has passed)
    pub fn days_until(&self, today: NaiveDate) -> i64 {
        (self.date - today).num_days()
    }

    /// Whether RSVPs are still accepted on `today`
    pub fn rsvp_open(&self, today: NaiveDate) -> bool {
        match self.rsvp_deadline {
            Some(deadline) => today <= deadline,
            None => today <= self.date,
        }
    }

    /// Validate the event
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if self.title.trim().is_empty() {
            return Err(EventValidationError::EmptyTitle);
        }

        if self.title.len() > 120 {
            return Err(EventValidationError::TitleTooLong(self.title.len()));
        }

        if self.location.trim().is_empty() {
            return Err(EventValidationError::EmptyLocation);
        }

        if !EVENT_YEARS.contains(&self.date.year()) {
            return Err(EventValidationError::DateOutOfRange(self.date));
        }

        if self.budget.is_negative() {
            return Err(EventValidationError::NegativeBudget);
        }

        if self.max_guests == Some(0) {
            return Err(EventValidationError::ZeroGuestCap);
        }

        if let Some(deadline) = self.rsvp_deadline {
            if deadline > self.date {
                return Err(EventValidationError::DeadlineAfterEvent);
            }
        }

        Ok(())
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Validation errors for events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValidationError {
    EmptyTitle,
    TitleTooLong(usize),
    EmptyLocation,
    DateOutOfRange(NaiveDate),
    NegativeBudget,
    ZeroGuestCap,
    DeadlineAfterEvent,
}

impl fmt::Display for EventValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Event title cannot be empty"),
            Self::TitleTooLong(len) => {
                write!(f, "Event title too long ({} chars, max 120)", len)
            }
            Self::EmptyLocation => write!(f, "Event location cannot be empty"),
            Self::DateOutOfRange(date) => write!(
                f,
                "Event date {} is outside the years {} to {}",
                date,
                EVENT_YEARS.start(),
                EVENT_YEARS.end()
            ),
            Self::NegativeBudget => write!(f, "Event budget cannot be negative"),
            Self::ZeroGuestCap => write!(f, "Guest cap must be at least 1"),
            Self::DeadlineAfterEvent => {
                write!(f, "RSVP deadline cannot be after the event date")
            }
        }
    }
}

impl std::error::Error for EventValidationError {}
