//! Event display formatting
//!
//! Formats events for terminal output in list and detail views.

use crate::models::Event;
use crate::services::AllocationLine;

use super::truncate;

/// Format a list of events as a table
pub fn format_event_list(events: &[Event], date_format: &str) -> String {
    if events.is_empty() {
        return "No events found.\n\nCreate one with 'eventra event create'.".to_string();
    }

    let title_width = events
        .iter()
        .map(|e| e.title.chars().count().min(32))
        .max()
        .unwrap_or(5)
        .max(5);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<title_width$}  {:<12}  {:<10}  {:>12}  {:>6}\n",
        "ID",
        "Title",
        "Date",
        "Category",
        "Budget",
        "Guests",
        title_width = title_width,
    ));
    output.push_str(&format!(
        "{:-<12}  {:-<title_width$}  {:-<12}  {:-<10}  {:->12}  {:->6}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        title_width = title_width,
    ));

    for event in events {
        output.push_str(&format!(
            "{:<12}  {:<title_width$}  {:<12}  {:<10}  {:>12}  {:>6}\n",
            event.id.to_string(),
            truncate(&event.title, 32),
            event.date.format(date_format).to_string(),
            event.category.as_str(),
            event.budget.to_string(),
            event.guest_count,
            title_width = title_width,
        ));
    }

    output
}

/// Format a single event's details
pub fn format_event_details(event: &Event, date_format: &str, duration_hours: u32) -> String {
    let mut output = String::new();

    output.push_str(&format!("Event: {}\n", event.title));
    output.push_str(&format!("  ID:             {}\n", event.id));
    output.push_str(&format!("  Category:       {}\n", event.category.label()));
    output.push_str(&format!("  Date:           {}\n", event.date.format(date_format)));
    match event.start_time {
        Some(start) => output.push_str(&format!(
            "  Time:           {} - {}\n",
            start.format("%H:%M"),
            event
                .ends_at(duration_hours)
                .map_or_else(|| "--:--".to_string(), |end| end.format("%H:%M").to_string())
        )),
        None => output.push_str("  Time:           (all day)\n"),
    }
    output.push_str(&format!("  Location:       {}\n", event.location));
    output.push_str(&format!("  Budget:         {}\n", event.budget));
    output.push_str(&format!("  Guests:         {}\n", event.guest_count));
    if let Some(cap) = event.max_guests {
        output.push_str(&format!("  Guest cap:      {}\n", cap));
    }
    if let Some(deadline) = event.rsvp_deadline {
        output.push_str(&format!("  RSVP by:        {}\n", deadline.format(date_format)));
    }
    output.push_str(&format!(
        "  Visibility:     {}\n",
        if event.is_public { "Public" } else { "Private" }
    ));
    if let Some(description) = &event.description {
        output.push_str(&format!("\n  {}\n", description));
    }

    output
}

/// Format a suggested allocation before anything is saved
pub fn format_allocation(lines: &[AllocationLine]) -> String {
    let mut output = String::new();
    output.push_str(&format!("{:<22} {:>4} {:>12}\n", "Category", "%", "Amount"));
    output.push_str(&"-".repeat(40));
    output.push('\n');
    for line in lines {
        output.push_str(&format!(
            "{:<22} {:>3}% {:>12}\n",
            line.name, line.percentage, line.amount
        ));
    }
    output
}
