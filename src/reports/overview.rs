//! Event Overview Report
//!
//! Splits events into upcoming and past relative to a given day, with the
//! headline spending and RSVP figures for each.

use chrono::NaiveDate;

use crate::error::EventraResult;
use crate::models::{Event, Money};
use crate::storage::Storage;

use super::rsvp::RsvpSummary;

#[derive(Debug, Clone)]
pub struct EventOverviewRow {
    pub event: Event,
    pub days_until: i64,
    pub total_spent: Money,
    pub percent_spent: i64,
    pub rsvp: RsvpSummary,
}

impl EventOverviewRow {
    pub fn is_over_budget(&self) -> bool {
        self.total_spent > self.event.budget
    }
}

#[derive(Debug, Clone)]
pub struct EventOverviewReport {
    pub today: NaiveDate,
    /// Events on or after `today`, soonest first
    pub upcoming: Vec<EventOverviewRow>,
    /// Events before `today`, most recent first
    pub past: Vec<EventOverviewRow>,
}

impl EventOverviewReport {
    pub fn generate(storage: &Storage, today: NaiveDate) -> EventraResult<Self> {
        let mut rows = Vec::new();
        for event in storage.events.get_all()? {
            let total_spent: Money = storage
                .expenses
                .get_by_event(event.id)?
                .iter()
                .map(|e| e.amount)
                .sum();
            let invitations = storage.invitations.get_by_event(event.id)?;

            rows.push(EventOverviewRow {
                days_until: event.days_until(today),
                percent_spent: total_spent.percent_of(event.budget),
                rsvp: RsvpSummary::from_invitations(&invitations),
                total_spent,
                event,
            });
        }
        Ok(Self::from_rows(rows, today))
    }

    pub fn from_rows(rows: Vec<EventOverviewRow>, today: NaiveDate) -> Self {
        let (mut upcoming, mut past): (Vec<_>, Vec<_>) =
            rows.into_iter().partition(|r| r.event.is_upcoming(today));

        upcoming.sort_by(|a, b| a.event.starts_at().cmp(&b.event.starts_at()));
        past.sort_by(|a, b| b.event.starts_at().cmp(&a.event.starts_at()));

        Self {
            today,
            upcoming,
            past,
        }
    }

    pub fn total_budget(&self) -> Money {
        self.upcoming
            .iter()
            .chain(self.past.iter())
            .map(|r| r.event.budget)
            .sum()
    }

    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Events as of {}\n", self.today));
        output.push_str(&"=".repeat(72));
        output.push('\n');

        output.push_str(&format!("\nUPCOMING ({})\n", self.upcoming.len()));
        if self.upcoming.is_empty() {
            output.push_str("  No upcoming events\n");
        }
        for row in &self.upcoming {
            let when = match row.days_until {
                0 => "today".to_string(),
                1 => "tomorrow".to_string(),
                n => format!("in {} days", n),
            };
            output.push_str(&format_row(row, &when));
        }

        output.push_str(&format!("\nPAST ({})\n", self.past.len()));
        if self.past.is_empty() {
            output.push_str("  No past events\n");
        }
        for row in &self.past {
            output.push_str(&format_row(row, &format!("{} days ago", -row.days_until)));
        }

        output
    }
}

fn format_row(row: &EventOverviewRow, when: &str) -> String {
    let flag = if row.is_over_budget() { "  OVER BUDGET" } else { "" };
    format!(
        "  {}  {:<30} {:<14} spent {:>3}% of {}  RSVP {}/{}{}\n",
        row.event.date,
        row.event.title,
        when,
        row.percent_spent,
        row.event.budget,
        row.rsvp.accepted,
        row.rsvp.total,
        flag
    )
}
