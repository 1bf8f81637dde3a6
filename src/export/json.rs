//! JSON Export functionality
//!
//! Exports every table to one schema-versioned document.

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EventraError, EventraResult};
use crate::models::{BudgetCategory, CalendarIntegration, Event, Expense, Invitation, Reminder};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full database export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub events: Vec<Event>,
    pub budget_categories: Vec<BudgetCategory>,
    pub expenses: Vec<Expense>,
    pub invitations: Vec<Invitation>,
    pub reminders: Vec<Reminder>,
    pub calendar_integrations: Vec<CalendarIntegration>,

    pub metadata: ExportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub event_count: usize,
    pub expense_count: usize,
    pub invitation_count: usize,
    pub reminder_count: usize,

    /// Date of the earliest event
    pub first_event: Option<NaiveDate>,

    /// Date of the latest event
    pub last_event: Option<NaiveDate>,
}

impl FullExport {
    /// Create a new full export from storage
    pub fn from_storage(storage: &Storage) -> EventraResult<Self> {
        let events = storage.events.get_all()?;
        let budget_categories = storage.budget_categories.get_all()?;
        let expenses = storage.expenses.get_all()?;
        let invitations = storage.invitations.get_all()?;
        let reminders = storage.reminders.get_all()?;
        let calendar_integrations = storage.calendar_integrations.get_all()?;

        let metadata = ExportMetadata {
            event_count: events.len(),
            expense_count: expenses.len(),
            invitation_count: invitations.len(),
            reminder_count: reminders.len(),
            first_event: events.iter().map(|e| e.date).min(),
            last_event: events.iter().map(|e| e.date).max(),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            events,
            budget_categories,
            expenses,
            invitations,
            reminders,
            calendar_integrations,
            metadata,
        })
    }

    /// Check the schema version and that every record points at a known event
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let event_ids: HashSet<_> = self.events.iter().map(|e| e.id).collect();
        let category_ids: HashSet<_> = self.budget_categories.iter().map(|c| c.id).collect();

        let orphan = self
            .budget_categories
            .iter()
            .map(|c| ("Budget category", c.id.to_string(), c.event_id))
            .chain(self.expenses.iter().map(|e| ("Expense", e.id.to_string(), e.event_id)))
            .chain(
                self.invitations
                    .iter()
                    .map(|i| ("Invitation", i.id.to_string(), i.event_id)),
            )
            .chain(self.reminders.iter().map(|r| ("Reminder", r.id.to_string(), r.event_id)))
            .chain(
                self.calendar_integrations
                    .iter()
                    .map(|c| ("Calendar integration", c.id.to_string(), c.event_id)),
            )
            .find(|(_, _, event_id)| !event_ids.contains(event_id));
        if let Some((label, id, event_id)) = orphan {
            return Err(format!("{} {} references unknown event {}", label, id, event_id));
        }

        for expense in &self.expenses {
            if let Some(category_id) = expense.category_id {
                if !category_ids.contains(&category_id) {
                    return Err(format!(
                        "Expense {} references unknown budget category {}",
                        expense.id, category_id
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Export the full database to JSON
pub fn export_full_json<W: Write + ?Sized>(
    storage: &Storage,
    writer: &mut W,
    pretty: bool,
) -> EventraResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| EventraError::Export(e.to_string()))?;

    Ok(())
}
