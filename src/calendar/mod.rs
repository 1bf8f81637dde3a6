//! Calendar hand-off for events
//!
//! Google and Outlook get a web link that opens a pre-filled event form;
//! Apple Calendar and other iCal clients get an .ics file.

pub mod ics;
pub mod links;

pub use ics::{generate_ics, ics_file_name};
pub use links::{google_link, outlook_link};

use crate::error::EventraResult;
use crate::models::{CalendarProvider, Event};

/// What a provider needs to receive an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarExport {
    Link(String),
    IcsFile { file_name: String, content: String },
}

/// Produce the link or file for `provider`
pub fn export_event(
    event: &Event,
    provider: CalendarProvider,
    duration_hours: u32,
) -> EventraResult<CalendarExport> {
    match provider {
        CalendarProvider::Google => Ok(CalendarExport::Link(
            google_link(event, duration_hours)?.into(),
        )),
        CalendarProvider::Outlook => Ok(CalendarExport::Link(
            outlook_link(event, duration_hours)?.into(),
        )),
        CalendarProvider::Apple | CalendarProvider::Ical => Ok(CalendarExport::IcsFile {
            file_name: ics_file_name(event),
            content: generate_ics(event, duration_hours)?,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventCategory, EventDraft, Money, UserId};
    use chrono::NaiveDate;

    fn event() -> Event {
        let draft = EventDraft::new(
            "Book Club",
            EventCategory::Other,
            NaiveDate::from_ymd_opt(2026, 5, 7).unwrap(),
            "Library",
            Money::zero(),
            8,
        );
        Event::from_draft(draft, UserId::new())
    }

    #[test]
    fn test_provider_dispatch() {
        let e = event();
        assert!(matches!(
            export_event(&e, CalendarProvider::Google, 2).unwrap(),
            CalendarExport::Link(url) if url.starts_with("https://calendar.google.com/")
        ));
        assert!(matches!(
            export_event(&e, CalendarProvider::Outlook, 2).unwrap(),
            CalendarExport::Link(url) if url.starts_with("https://outlook.live.com/")
        ));
        match export_event(&e, CalendarProvider::Apple, 2).unwrap() {
            CalendarExport::IcsFile { file_name, content } => {
                assert_eq!(file_name, "book-club.ics");
                assert!(content.contains("SUMMARY:Book Club"));
            }
            other => panic!("expected ics file, got {:?}", other),
        }
    }

    #[test]
    fn test_end_past_calendar_range_is_an_error() {
        let mut e = event();
        e.date = NaiveDate::MAX;
        let providers = [
            CalendarProvider::Google,
            CalendarProvider::Outlook,
            CalendarProvider::Apple,
            CalendarProvider::Ical,
        ];
        for provider in providers {
            assert!(matches!(
                export_event(&e, provider, 48),
                Err(crate::error::EventraError::Validation(_))
            ));
        }
    }
}
