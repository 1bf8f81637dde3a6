//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod budget;
pub mod calendar;
pub mod event;
pub mod expense;
pub mod export;
pub mod invite;
pub mod reminder;

use std::str::FromStr;

use chrono::{Local, NaiveDate, NaiveTime};

use crate::error::{EventraError, EventraResult};
use crate::models::Money;

pub use budget::{handle_budget_command, BudgetCommands};
pub use calendar::{handle_calendar_command, CalendarCommands};
pub use event::{handle_event_command, EventCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, ExportCommands};
pub use invite::{handle_invite_command, InviteCommands};
pub use reminder::{handle_reminder_command, ReminderCommands};

/// Parse an amount like "1250", "1,250.00" or "$19.99"
pub(crate) fn parse_money(input: &str) -> EventraResult<Money> {
    Money::parse(input).map_err(|e| {
        EventraError::Validation(format!(
            "Invalid amount: '{}'. Use a format like '1250' or '19.99'. Error: {}",
            input, e
        ))
    })
}

/// Parse a YYYY-MM-DD date
pub(crate) fn parse_date(input: &str) -> EventraResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        EventraError::Validation(format!("Invalid date: '{}'. Use YYYY-MM-DD", input))
    })
}

/// Parse a 24-hour HH:MM time
pub(crate) fn parse_time(input: &str) -> EventraResult<NaiveTime> {
    NaiveTime::parse_from_str(input.trim(), "%H:%M")
        .map_err(|_| EventraError::Validation(format!("Invalid time: '{}'. Use HH:MM", input)))
}

/// Parse any value whose `FromStr` error is a user-facing message
pub(crate) fn parse_value<T>(input: &str) -> EventraResult<T>
where
    T: FromStr<Err = String>,
{
    input.parse().map_err(EventraError::Validation)
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventCategory, LeadTime};

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("1,250.50").unwrap(), Money::from_cents(125050));
        assert!(parse_money("lots").unwrap_err().is_validation());
    }

    #[test]
    fn test_parse_date_and_time() {
        assert_eq!(
            parse_date("2026-12-31").unwrap(),
            NaiveDate::from_ymd_opt(2026, 12, 31).unwrap()
        );
        assert!(parse_date("31/12/2026").is_err());
        assert_eq!(parse_time("18:30").unwrap(), NaiveTime::from_hms_opt(18, 30, 0).unwrap());
        assert!(parse_time("6pm").is_err());
    }

    #[test]
    fn test_parse_value() {
        let category: EventCategory = parse_value("wedding").unwrap();
        assert_eq!(category, EventCategory::Wedding);
        let lead: LeadTime = parse_value("3 days").unwrap();
        assert_eq!(lead, LeadTime::days(3));
        assert!(parse_value::<LeadTime>("soon").is_err());
    }
}
