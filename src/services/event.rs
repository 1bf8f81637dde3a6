//! Event service
//!
//! Creates events together with their budget categories, resolves events
//! from user input, applies edits and cascades deletes to every record that
//! belongs to an event.

use chrono::{NaiveDate, NaiveTime, Utc};

use crate::audit::EntityType;
use crate::error::{EventraError, EventraResult};
use crate::models::{
    BudgetCategory, Event, EventCategory, EventDraft, EventId, Money, UserId,
};
use crate::storage::Storage;

use super::allocation::suggest_allocation;

/// Service for event management
pub struct EventService<'a> {
    storage: &'a Storage,
}

/// Field changes for an event; `None` leaves a field as it is
///
/// Optional fields take a nested `Option` so they can be cleared.
#[derive(Debug, Clone, Default)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub category: Option<EventCategory>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<Option<NaiveTime>>,
    pub location: Option<String>,
    pub budget: Option<Money>,
    pub guest_count: Option<u32>,
    pub description: Option<Option<String>>,
    pub is_public: Option<bool>,
    pub max_guests: Option<Option<u32>>,
    pub rsvp_deadline: Option<Option<NaiveDate>>,
}

/// Counts of records removed along with an event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeSummary {
    pub budget_categories: usize,
    pub expenses: usize,
    pub invitations: usize,
    pub reminders: usize,
    pub calendar_integrations: usize,
}

impl<'a> EventService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create an event and its budget categories
    ///
    /// The categories come from the allocation template for the event's
    /// category and are created exactly once, here.
    pub fn create(
        &self,
        draft: EventDraft,
        owner_id: UserId,
    ) -> EventraResult<(Event, Vec<BudgetCategory>)> {
        let event = Event::from_draft(draft, owner_id);
        event
            .validate()
            .map_err(|e| EventraError::Validation(e.to_string()))?;

        let categories: Vec<BudgetCategory> = suggest_allocation(event.category, event.budget)
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                BudgetCategory::new(event.id, line.name, line.percentage, line.amount, i as i32)
            })
            .collect();

        self.storage.events.upsert(event.clone())?;
        for category in &categories {
            self.storage.budget_categories.upsert(category.clone())?;
        }
        self.storage.events.save()?;
        self.storage.budget_categories.save()?;

        self.storage.log_create(
            EntityType::Event,
            event.id.to_string(),
            Some(event.title.clone()),
            &event,
        )?;
        for category in &categories {
            self.storage.log_create(
                EntityType::BudgetCategory,
                category.id.to_string(),
                Some(format!("{} / {}", event.title, category.name)),
                category,
            )?;
        }

        tracing::info!(
            event = %event.id,
            category = event.category.as_str(),
            budget_categories = categories.len(),
            "event created"
        );
        Ok((event, categories))
    }

    pub fn get(&self, id: EventId) -> EventraResult<Option<Event>> {
        self.storage.events.get(id)
    }

    /// Find an event by id reference or by title (case-insensitive)
    pub fn find(&self, identifier: &str) -> EventraResult<Option<Event>> {
        if let Some(event) = self.storage.events.find_by_ref(identifier, None)? {
            return Ok(Some(event));
        }

        let wanted = identifier.trim().to_lowercase();
        let mut by_title = self
            .storage
            .events
            .filter(|e| e.title.to_lowercase() == wanted)?;

        match by_title.len() {
            0 | 1 => Ok(by_title.pop()),
            n => Err(EventraError::Validation(format!(
                "{} events are titled '{}'; use the event id instead",
                n,
                identifier.trim()
            ))),
        }
    }

    /// Like [`find`](Self::find) but missing events are an error
    pub fn require(&self, identifier: &str) -> EventraResult<Event> {
        self.find(identifier)?
            .ok_or_else(|| EventraError::event_not_found(identifier))
    }

    /// All events, earliest first
    pub fn list(&self) -> EventraResult<Vec<Event>> {
        self.storage.events.get_all()
    }

    /// Events owned by `owner_id`, earliest first
    pub fn list_for_owner(&self, owner_id: UserId) -> EventraResult<Vec<Event>> {
        self.storage.events.filter(|e| e.owner_id == owner_id)
    }

    /// Apply field changes to an event
    ///
    /// A budget change rescales the event's budget category amounts; a date
    /// or start time change reschedules its unsent reminders.
    pub fn update(&self, id: EventId, changes: EventUpdate) -> EventraResult<Event> {
        let mut event = self
            .storage
            .events
            .get(id)?
            .ok_or_else(|| EventraError::event_not_found(id.to_string()))?;
        let before = event.clone();

        if let Some(title) = changes.title {
            event.title = title.trim().to_string();
        }
        if let Some(category) = changes.category {
            event.category = category;
        }
        if let Some(date) = changes.date {
            event.date = date;
        }
        if let Some(start_time) = changes.start_time {
            event.start_time = start_time;
        }
        if let Some(location) = changes.location {
            event.location = location.trim().to_string();
        }
        if let Some(budget) = changes.budget {
            event.budget = budget;
        }
        if let Some(guest_count) = changes.guest_count {
            event.guest_count = guest_count;
        }
        if let Some(description) = changes.description {
            event.description = description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty());
        }
        if let Some(is_public) = changes.is_public {
            event.is_public = is_public;
        }
        if let Some(max_guests) = changes.max_guests {
            event.max_guests = max_guests;
        }
        if let Some(rsvp_deadline) = changes.rsvp_deadline {
            event.rsvp_deadline = rsvp_deadline;
        }

        event
            .validate()
            .map_err(|e| EventraError::Validation(e.to_string()))?;
        event.updated_at = Utc::now();

        self.storage.events.upsert(event.clone())?;
        self.storage.events.save()?;
        self.storage.log_update(
            EntityType::Event,
            event.id.to_string(),
            Some(event.title.clone()),
            &before,
            &event,
            None,
        )?;

        if before.budget != event.budget {
            self.rescale_budget_categories(&event)?;
        }
        if before.starts_at() != event.starts_at() {
            self.reschedule_reminders(&event)?;
        }

        Ok(event)
    }

    fn rescale_budget_categories(&self, event: &Event) -> EventraResult<()> {
        let categories = self.storage.budget_categories.get_by_event(event.id)?;
        for mut category in categories {
            let before = category.clone();
            category.set_percentage(category.percentage, event.budget);
            self.storage.budget_categories.upsert(category.clone())?;
            self.storage.log_update(
                EntityType::BudgetCategory,
                category.id.to_string(),
                Some(format!("{} / {}", event.title, category.name)),
                &before,
                &category,
                None,
            )?;
        }
        self.storage.budget_categories.save()?;
        tracing::debug!(event = %event.id, budget = %event.budget, "budget categories rescaled");
        Ok(())
    }

    fn reschedule_reminders(&self, event: &Event) -> EventraResult<()> {
        let pending = self
            .storage
            .reminders
            .filter(|r| r.event_id == event.id && !r.is_sent)?;
        for mut reminder in pending {
            let before = reminder.clone();
            reminder.reschedule(event.starts_at());
            self.storage.reminders.upsert(reminder.clone())?;
            self.storage.log_update(
                EntityType::Reminder,
                reminder.id.to_string(),
                Some(event.title.clone()),
                &before,
                &reminder,
                None,
            )?;
        }
        self.storage.reminders.save()?;
        Ok(())
    }

    /// Delete an event and everything that belongs to it
    pub fn delete(&self, id: EventId) -> EventraResult<(Event, CascadeSummary)> {
        let event = self
            .storage
            .events
            .delete(id)?
            .ok_or_else(|| EventraError::event_not_found(id.to_string()))?;

        let categories = self.storage.budget_categories.delete_by_event(id)?;
        let expenses = self.storage.expenses.delete_by_event(id)?;
        let invitations = self.storage.invitations.delete_by_event(id)?;
        let reminders = self.storage.reminders.delete_by_event(id)?;
        let integrations = self.storage.calendar_integrations.delete_by_event(id)?;
        self.storage.save_all()?;

        for category in &categories {
            self.storage.log_delete(
                EntityType::BudgetCategory,
                category.id.to_string(),
                Some(category.name.clone()),
                category,
            )?;
        }
        for expense in &expenses {
            self.storage.log_delete(
                EntityType::Expense,
                expense.id.to_string(),
                Some(expense.description.clone()),
                expense,
            )?;
        }
        for invitation in &invitations {
            self.storage.log_delete(
                EntityType::Invitation,
                invitation.id.to_string(),
                Some(invitation.invitee_email.clone()),
                invitation,
            )?;
        }
        for reminder in &reminders {
            self.storage.log_delete(
                EntityType::Reminder,
                reminder.id.to_string(),
                None,
                reminder,
            )?;
        }
        for integration in &integrations {
            self.storage.log_delete(
                EntityType::CalendarIntegration,
                integration.id.to_string(),
                Some(integration.provider.label().to_string()),
                integration,
            )?;
        }
        self.storage.log_delete(
            EntityType::Event,
            event.id.to_string(),
            Some(event.title.clone()),
            &event,
        )?;

        let summary = CascadeSummary {
            budget_categories: categories.len(),
            expenses: expenses.len(),
            invitations: invitations.len(),
            reminders: reminders.len(),
            calendar_integrations: integrations.len(),
        };
        tracing::info!(event = %event.id, ?summary, "event deleted");
        Ok((event, summary))
    }
}
