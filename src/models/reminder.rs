//! Reminder model
//!
//! A notification tied to an event and a lead time ("1 day", "2 hours").
//! The scheduled instant is derived from the event start and the lead time.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{EventId, ReminderId, UserId};

/// Delivery channel for a reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReminderChannel {
    #[default]
    Email,
    Sms,
    Push,
}

impl ReminderChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Sms => "sms",
            Self::Push => "push",
        }
    }
}

impl fmt::Display for ReminderChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReminderChannel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "email" => Ok(Self::Email),
            "sms" | "text" => Ok(Self::Sms),
            "push" => Ok(Self::Push),
            other => Err(format!(
                "Unknown reminder channel '{}'. Expected email, sms or push",
                other
            )),
        }
    }
}

/// Unit of a lead time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeadUnit {
    Minutes,
    Hours,
    Days,
    Weeks,
}

impl LeadUnit {
    fn singular(&self) -> &'static str {
        match self {
            Self::Minutes => "minute",
            Self::Hours => "hour",
            Self::Days => "day",
            Self::Weeks => "week",
        }
    }

    fn minutes(&self) -> u64 {
        match self {
            Self::Minutes => 1,
            Self::Hours => 60,
            Self::Days => 24 * 60,
            Self::Weeks => 7 * 24 * 60,
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "m" | "min" | "mins" | "minute" | "minutes" => Some(Self::Minutes),
            "h" | "hr" | "hrs" | "hour" | "hours" => Some(Self::Hours),
            "d" | "day" | "days" => Some(Self::Days),
            "w" | "wk" | "wks" | "week" | "weeks" => Some(Self::Weeks),
            _ => None,
        }
    }
}

/// Longest lead time accepted when parsing: 52 weeks
pub const MAX_LEAD_MINUTES: u64 = 52 * 7 * 24 * 60;

/// How long before the event a reminder fires
///
/// Stored as its text form ("3 days") so records stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LeadTime {
    amount: u32,
    unit: LeadUnit,
}

impl LeadTime {
    pub const fn new(amount: u32, unit: LeadUnit) -> Self {
        Self { amount, unit }
    }

    pub const fn minutes(amount: u32) -> Self {
        Self::new(amount, LeadUnit::Minutes)
    }

    pub const fn hours(amount: u32) -> Self {
        Self::new(amount, LeadUnit::Hours)
    }

    pub const fn days(amount: u32) -> Self {
        Self::new(amount, LeadUnit::Days)
    }

    pub const fn weeks(amount: u32) -> Self {
        Self::new(amount, LeadUnit::Weeks)
    }

    /// The lead times offered by default, longest first
    pub fn presets() -> [Self; 6] {
        [
            Self::weeks(1),
            Self::days(3),
            Self::days(1),
            Self::hours(6),
            Self::hours(2),
            Self::minutes(30),
        ]
    }

    pub fn to_duration(&self) -> Duration {
        let amount = i64::from(self.amount);
        match self.unit {
            LeadUnit::Minutes => Duration::minutes(amount),
            LeadUnit::Hours => Duration::hours(amount),
            LeadUnit::Days => Duration::days(amount),
            LeadUnit::Weeks => Duration::weeks(amount),
        }
    }
}

impl fmt::Display for LeadTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = if self.amount == 1 { "" } else { "s" };
        write!(f, "{} {}{}", self.amount, self.unit.singular(), plural)
    }
}

impl FromStr for LeadTime {
    type Err = String;

    /// Parses "1 day", "2 hours", "30 minutes", and compact forms like "2h"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split_at = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| format!("Lead time '{}' is missing a unit", s))?;
        let (number, unit) = s.split_at(split_at);

        let amount: u32 = number
            .parse()
            .map_err(|_| format!("Lead time '{}' must start with a number", s))?;
        if amount == 0 {
            return Err("Lead time must be greater than zero".to_string());
        }

        let unit = LeadUnit::parse(unit)
            .ok_or_else(|| format!("Unknown lead time unit in '{}'", s))?;

        if u64::from(amount) * unit.minutes() > MAX_LEAD_MINUTES {
            return Err(format!("Lead time '{}' is longer than 52 weeks", s));
        }

        Ok(Self { amount, unit })
    }
}

impl TryFrom<String> for LeadTime {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LeadTime> for String {
    fn from(value: LeadTime) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub id: ReminderId,

    pub event_id: EventId,

    /// User the reminder is for
    pub owner_id: UserId,

    pub channel: ReminderChannel,

    /// How long before the event start the reminder fires
    pub lead_time: LeadTime,

    /// Custom message; a default text is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default)]
    pub is_sent: bool,

    /// When the reminder should fire
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

impl Reminder {
    pub fn new(
        event_id: EventId,
        owner_id: UserId,
        channel: ReminderChannel,
        lead_time: LeadTime,
        event_start: NaiveDateTime,
    ) -> Self {
        let mut reminder = Self {
            id: ReminderId::new(),
            event_id,
            owner_id,
            channel,
            lead_time,
            message: None,
            is_sent: false,
            scheduled_for: None,
            sent_at: None,
            created_at: Utc::now(),
        };
        reminder.reschedule(event_start);
        reminder
    }

    /// Recompute the fire time from the event start
    ///
    /// Left unscheduled when the fire time falls outside the calendar range.
    pub fn reschedule(&mut self, event_start: NaiveDateTime) {
        self.scheduled_for = event_start
            .checked_sub_signed(self.lead_time.to_duration())
            .map(|fire_at| fire_at.and_utc());
    }

    pub fn mark_sent(&mut self) {
        self.is_sent = true;
        self.sent_at = Some(Utc::now());
    }

    /// Unsent and scheduled at or before `now`
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        !self.is_sent && self.scheduled_for.is_some_and(|at| at <= now)
    }
}

impl fmt::Display for Reminder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} before", self.channel, self.lead_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event_start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 6, 20)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_lead_time_parse_and_display() {
        assert_eq!("1 day".parse::<LeadTime>(), Ok(LeadTime::days(1)));
        assert_eq!("2 hours".parse::<LeadTime>(), Ok(LeadTime::hours(2)));
        assert_eq!("30 minutes".parse::<LeadTime>(), Ok(LeadTime::minutes(30)));
        assert_eq!("2h".parse::<LeadTime>(), Ok(LeadTime::hours(2)));
        assert_eq!("1 Week".parse::<LeadTime>(), Ok(LeadTime::weeks(1)));

        assert_eq!(LeadTime::days(1).to_string(), "1 day");
        assert_eq!(LeadTime::days(3).to_string(), "3 days");
    }

    #[test]
    fn test_lead_time_parse_errors() {
        assert!("".parse::<LeadTime>().is_err());
        assert!("day".parse::<LeadTime>().is_err());
        assert!("5".parse::<LeadTime>().is_err());
        assert!("0 days".parse::<LeadTime>().is_err());
        assert!("3 fortnights".parse::<LeadTime>().is_err());
        assert!("100000000 days".parse::<LeadTime>().is_err());
        assert!("53 weeks".parse::<LeadTime>().is_err());
        assert_eq!("52 weeks".parse::<LeadTime>(), Ok(LeadTime::weeks(52)));
        assert_eq!("364 days".parse::<LeadTime>(), Ok(LeadTime::days(364)));
    }

    #[test]
    fn test_lead_time_serializes_as_text() {
        let json = serde_json::to_string(&LeadTime::hours(6)).unwrap();
        assert_eq!(json, "\"6 hours\"");
        let back: LeadTime = serde_json::from_str("\"3 days\"").unwrap();
        assert_eq!(back, LeadTime::days(3));
        assert!(serde_json::from_str::<LeadTime>("\"soon\"").is_err());
    }

    #[test]
    fn test_schedule_from_event_start() {
        let reminder = Reminder::new(
            EventId::new(),
            UserId::new(),
            ReminderChannel::Email,
            LeadTime::days(1),
            event_start(),
        );
        let expected = NaiveDate::from_ymd_opt(2026, 6, 19)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap()
            .and_utc();
        assert_eq!(reminder.scheduled_for, Some(expected));
    }

    #[test]
    fn test_out_of_range_fire_time_is_unscheduled() {
        let reminder = Reminder::new(
            EventId::new(),
            UserId::new(),
            ReminderChannel::Email,
            LeadTime::days(100_000_000),
            event_start(),
        );
        assert_eq!(reminder.scheduled_for, None);
        assert!(!reminder.is_due(Utc::now()));
    }

    #[test]
    fn test_due_and_mark_sent() {
        let mut reminder = Reminder::new(
            EventId::new(),
            UserId::new(),
            ReminderChannel::Push,
            LeadTime::hours(2),
            event_start(),
        );
        let before = event_start().and_utc() - Duration::hours(3);
        let after = event_start().and_utc() - Duration::hours(1);

        assert!(!reminder.is_due(before));
        assert!(reminder.is_due(after));

        reminder.mark_sent();
        assert!(reminder.is_sent);
        assert!(reminder.sent_at.is_some());
        assert!(!reminder.is_due(after));
    }
}
