//! iCalendar (.ics) generation

use icalendar::{Calendar, Component, EventLike};

use crate::error::EventraResult;
use crate::models::Event;

use super::links::event_end;

/// Render a single-event calendar file
pub fn generate_ics(event: &Event, duration_hours: u32) -> EventraResult<String> {
    let mut cal = Calendar::new();

    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&format!("{}@eventra.com", event.id.as_uuid()));
    ics_event.summary(&event.title);
    ics_event.starts(event.starts_at().and_utc());
    ics_event.ends(event_end(event, duration_hours)?);

    if let Some(ref desc) = event.description {
        ics_event.description(desc);
    }
    ics_event.location(&event.location);
    ics_event.add_property("STATUS", "CONFIRMED");

    cal.push(ics_event.done());
    Ok(cal.done().to_string())
}

/// File name for an event's .ics file, derived from its title
pub fn ics_file_name(event: &Event) -> String {
    let slug = slugify(&event.title);
    if slug.is_empty() {
        format!("event-{}.ics", event.date.format("%Y-%m-%d"))
    } else {
        format!("{}.ics", slug)
    }
}

/// Lowercase, alphanumeric runs joined by single dashes
fn slugify(s: &str) -> String {
    s.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .take(60)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventCategory, EventDraft, Money, UserId};
    use chrono::{NaiveDate, NaiveTime};

    fn workshop() -> Event {
        let mut draft = EventDraft::new(
            "Rust Workshop: Day 1!",
            EventCategory::Conference,
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            "Room 4",
            Money::from_units(500),
            30,
        );
        draft.start_time = NaiveTime::from_hms_opt(9, 0, 0);
        Event::from_draft(draft, UserId::new())
    }

    #[test]
    fn test_ics_content() {
        let event = workshop();
        let ics = generate_ics(&event, 2).unwrap();

        assert!(ics.contains("BEGIN:VCALENDAR"));
        assert!(ics.contains("BEGIN:VEVENT"));
        assert!(ics.contains(&format!("UID:{}@eventra.com", event.id.as_uuid())));
        assert!(ics.contains("DTSTART:20260302T090000Z"));
        assert!(ics.contains("DTEND:20260302T110000Z"));
        assert!(ics.contains("LOCATION:Room 4"));
        assert!(ics.contains("STATUS:CONFIRMED"));
        assert!(!ics.contains("DESCRIPTION"));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(ics_file_name(&workshop()), "rust-workshop-day-1.ics");

        let mut untitled = workshop();
        untitled.title = "!!!".into();
        assert_eq!(ics_file_name(&untitled), "event-2026-03-02.ics");
    }
}
