//! Web links that open a pre-filled "new event" form in a hosted calendar

use chrono::{DateTime, Utc};
use url::Url;

use crate::error::{EventraError, EventraResult};
use crate::models::Event;

const GOOGLE_TEMPLATE: &str = "https://calendar.google.com/calendar/render";
const OUTLOOK_COMPOSE: &str = "https://outlook.live.com/calendar/0/deeplink/compose";

/// Compact UTC form used by Google and iCalendar: `20260620T180000Z`
pub fn compact_utc(instant: DateTime<Utc>) -> String {
    instant.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Extended ISO 8601 form used by Outlook: `2026-06-20T18:00:00Z`
pub fn iso_utc(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Event end in UTC, or a validation error when it overflows the calendar
pub(crate) fn event_end(event: &Event, duration_hours: u32) -> EventraResult<DateTime<Utc>> {
    event
        .ends_at(duration_hours)
        .map(|end| end.and_utc())
        .ok_or_else(|| {
            EventraError::Validation(format!(
                "'{}' ends outside the supported date range",
                event.title
            ))
        })
}

fn build(base: &str, params: &[(&str, String)]) -> EventraResult<Url> {
    Url::parse_with_params(base, params)
        .map_err(|e| EventraError::Calendar(format!("Failed to build calendar link: {}", e)))
}

/// Google Calendar event template link
pub fn google_link(event: &Event, duration_hours: u32) -> EventraResult<Url> {
    let start = event.starts_at().and_utc();
    let end = event_end(event, duration_hours)?;

    build(
        GOOGLE_TEMPLATE,
        &[
            ("action", "TEMPLATE".to_string()),
            ("text", event.title.clone()),
            ("dates", format!("{}/{}", compact_utc(start), compact_utc(end))),
            ("details", event.description.clone().unwrap_or_default()),
            ("location", event.location.clone()),
        ],
    )
}

/// Outlook.com compose deep link
pub fn outlook_link(event: &Event, duration_hours: u32) -> EventraResult<Url> {
    let start = event.starts_at().and_utc();
    let end = event_end(event, duration_hours)?;

    build(
        OUTLOOK_COMPOSE,
        &[
            ("subject", event.title.clone()),
            ("startdt", iso_utc(start)),
            ("enddt", iso_utc(end)),
            ("body", event.description.clone().unwrap_or_default()),
            ("location", event.location.clone()),
        ],
    )
}
