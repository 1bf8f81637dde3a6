//! Per-event working set
//!
//! `EventWorkspace` keeps one [`Store`] per entity kind. Opening an event
//! fetches its records by parent id; every mutation goes through the matching
//! service and is mirrored into the store on success.

use chrono::NaiveDate;

use crate::config::settings::Settings;
use crate::error::{EventraError, EventraResult};
use crate::models::{
    BudgetCategory, BudgetCategoryId, CalendarIntegration, CalendarIntegrationId,
    CalendarProvider, Event, EventDraft, EventId, Expense, ExpenseId, Invitation, InvitationId,
    LeadTime, Reminder, ReminderChannel, ReminderId, SyncStatus,
};
use crate::reports::{BudgetProgressReport, RsvpSummary};
use crate::services::{
    BudgetService, CalendarService, EventService, EventUpdate, ExpenseService, ExpenseUpdate,
    InvitationService, InvitationUpdate, NewExpense, ReminderService, ReminderUpdate,
    RsvpResponse,
};
use crate::storage::Storage;

use super::store::Store;

pub struct EventWorkspace<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
    selected: Option<EventId>,
    pub events: Store<Event>,
    pub budget_categories: Store<BudgetCategory>,
    pub expenses: Store<Expense>,
    pub invitations: Store<Invitation>,
    pub reminders: Store<Reminder>,
    pub calendar_integrations: Store<CalendarIntegration>,
}

fn no_event_selected() -> EventraError {
    EventraError::Validation("No event is open".to_string())
}

impl<'a> EventWorkspace<'a> {
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self {
            storage,
            settings,
            selected: None,
            events: Store::new(),
            budget_categories: Store::new(),
            expenses: Store::new(),
            invitations: Store::new(),
            reminders: Store::new(),
            calendar_integrations: Store::new(),
        }
    }

    /// The open event, if any
    pub fn selected_event(&self) -> Option<&Event> {
        self.selected.and_then(|id| self.events.get(id))
    }

    /// First error message across all stores
    pub fn error(&self) -> Option<&str> {
        self.events
            .error()
            .or_else(|| self.budget_categories.error())
            .or_else(|| self.expenses.error())
            .or_else(|| self.invitations.error())
            .or_else(|| self.reminders.error())
            .or_else(|| self.calendar_integrations.error())
    }

    // Events

    /// Load the owner's events
    pub fn fetch_events(&mut self) -> bool {
        let storage = self.storage;
        let owner = self.settings.owner_id;
        self.events
            .fetch(|| EventService::new(storage).list_for_owner(owner))
    }

    /// Make `event_id` the open event and fetch everything that belongs to it
    pub fn open_event(&mut self, event_id: EventId) -> bool {
        let storage = self.storage;
        let Some(event) = self.events.run(|| {
            storage
                .events
                .get(event_id)?
                .ok_or_else(|| EventraError::event_not_found(event_id.to_string()))
        }) else {
            return false;
        };
        self.events.put(event);
        self.selected = Some(event_id);
        self.refresh_children()
    }

    /// Re-fetch every child store of the open event
    pub fn refresh_children(&mut self) -> bool {
        let Some(event_id) = self.selected else {
            return false;
        };
        let storage = self.storage;

        // Every fetch runs even if an earlier one fails
        let results = [
            self.budget_categories
                .fetch(|| BudgetService::new(storage).list_for_event(event_id)),
            self.expenses
                .fetch(|| ExpenseService::new(storage).list_for_event(event_id)),
            self.invitations
                .fetch(|| InvitationService::new(storage).list_for_event(event_id)),
            self.reminders
                .fetch(|| ReminderService::new(storage).list_for_event(event_id)),
            self.calendar_integrations
                .fetch(|| CalendarService::new(storage).list_for_event(event_id)),
        ];
        results.iter().all(|ok| *ok)
    }

    /// Create an event and open it
    pub fn create_event(&mut self, draft: EventDraft) -> Option<Event> {
        let storage = self.storage;
        let owner = self.settings.owner_id;
        let (event, categories) = self
            .events
            .run(|| EventService::new(storage).create(draft, owner))?;

        self.events.put(event.clone());
        self.selected = Some(event.id);
        self.budget_categories.replace(categories);
        self.expenses.clear();
        self.invitations.clear();
        self.reminders.clear();
        self.calendar_integrations.clear();
        Some(event)
    }

    pub fn update_event(&mut self, id: EventId, changes: EventUpdate) -> Option<Event> {
        let storage = self.storage;
        let touches_children = changes.budget.is_some()
            || changes.date.is_some()
            || changes.start_time.is_some();

        let event = self
            .events
            .run(|| EventService::new(storage).update(id, changes))?;
        self.events.put(event.clone());

        // Category amounts and reminder times follow the event
        if touches_children && self.selected == Some(id) {
            self.budget_categories
                .fetch(|| BudgetService::new(storage).list_for_event(id));
            self.reminders
                .fetch(|| ReminderService::new(storage).list_for_event(id));
        }
        Some(event)
    }

    pub fn delete_event(&mut self, id: EventId) -> bool {
        let storage = self.storage;
        if self
            .events
            .run(|| EventService::new(storage).delete(id))
            .is_none()
        {
            return false;
        }

        self.events.remove(id);
        if self.selected == Some(id) {
            self.selected = None;
            self.budget_categories.clear();
            self.expenses.clear();
            self.invitations.clear();
            self.reminders.clear();
            self.calendar_integrations.clear();
        }
        true
    }

    // Budget categories

    pub fn update_budget_category(
        &mut self,
        id: BudgetCategoryId,
        name: Option<&str>,
        percentage: Option<u8>,
    ) -> Option<BudgetCategory> {
        let storage = self.storage;
        let category = self
            .budget_categories
            .run(|| BudgetService::new(storage).update(id, name, percentage))?;
        self.budget_categories.put(category.clone());
        Some(category)
    }

    pub fn delete_budget_category(&mut self, id: BudgetCategoryId) -> bool {
        let storage = self.storage;
        let Some(category) = self
            .budget_categories
            .run(|| BudgetService::new(storage).delete(id))
        else {
            return false;
        };
        self.budget_categories.remove(id);

        // Expenses of the deleted category are now uncategorized
        let event_id = category.event_id;
        self.expenses
            .fetch(|| ExpenseService::new(storage).list_for_event(event_id))
    }

    // Expenses

    pub fn add_expense(&mut self, input: NewExpense) -> Option<Expense> {
        let storage = self.storage;
        let selected = self.selected;
        let expense = self.expenses.run(|| {
            let event_id = selected.ok_or_else(no_event_selected)?;
            ExpenseService::new(storage).add(event_id, input)
        })?;
        self.expenses.put(expense.clone());
        Some(expense)
    }

    pub fn update_expense(&mut self, id: ExpenseId, changes: ExpenseUpdate) -> Option<Expense> {
        let storage = self.storage;
        let expense = self
            .expenses
            .run(|| ExpenseService::new(storage).update(id, changes))?;
        self.expenses.put(expense.clone());
        Some(expense)
    }

    pub fn delete_expense(&mut self, id: ExpenseId) -> bool {
        let storage = self.storage;
        let deleted = self
            .expenses
            .run(|| ExpenseService::new(storage).delete(id))
            .is_some();
        if deleted {
            self.expenses.remove(id);
        }
        deleted
    }

    // Invitations

    pub fn send_invitation(
        &mut self,
        email: &str,
        name: Option<String>,
        guest_count: u32,
    ) -> Option<Invitation> {
        let storage = self.storage;
        let selected = self.selected;
        let owner = self.settings.owner_id;
        let invitation = self.invitations.run(|| {
            let event_id = selected.ok_or_else(no_event_selected)?;
            InvitationService::new(storage).send(event_id, email, name, guest_count, owner)
        })?;
        self.invitations.put(invitation.clone());
        Some(invitation)
    }

    pub fn respond_invitation(
        &mut self,
        id: InvitationId,
        response: RsvpResponse,
        today: NaiveDate,
    ) -> Option<Invitation> {
        let storage = self.storage;
        let invitation = self
            .invitations
            .run(|| InvitationService::new(storage).respond(id, response, today))?;
        self.invitations.put(invitation.clone());
        Some(invitation)
    }

    pub fn update_invitation(
        &mut self,
        id: InvitationId,
        changes: InvitationUpdate,
    ) -> Option<Invitation> {
        let storage = self.storage;
        let invitation = self
            .invitations
            .run(|| InvitationService::new(storage).update(id, changes))?;
        self.invitations.put(invitation.clone());
        Some(invitation)
    }

    pub fn delete_invitation(&mut self, id: InvitationId) -> bool {
        let storage = self.storage;
        let deleted = self
            .invitations
            .run(|| InvitationService::new(storage).delete(id))
            .is_some();
        if deleted {
            self.invitations.remove(id);
        }
        deleted
    }

    // Reminders

    pub fn add_reminder(
        &mut self,
        channel: ReminderChannel,
        lead_time: Option<LeadTime>,
        message: Option<String>,
    ) -> Option<Reminder> {
        let storage = self.storage;
        let selected = self.selected;
        let owner = self.settings.owner_id;
        let lead_time = lead_time.unwrap_or(self.settings.default_reminder_lead);
        let reminder = self.reminders.run(|| {
            let event_id = selected.ok_or_else(no_event_selected)?;
            ReminderService::new(storage).add(event_id, owner, channel, lead_time, message)
        })?;
        self.reminders.put(reminder.clone());
        Some(reminder)
    }

    pub fn update_reminder(&mut self, id: ReminderId, changes: ReminderUpdate) -> Option<Reminder> {
        let storage = self.storage;
        let reminder = self
            .reminders
            .run(|| ReminderService::new(storage).update(id, changes))?;
        self.reminders.put(reminder.clone());
        Some(reminder)
    }

    pub fn mark_reminder_sent(&mut self, id: ReminderId) -> Option<Reminder> {
        let storage = self.storage;
        let reminder = self
            .reminders
            .run(|| ReminderService::new(storage).mark_sent(id))?;
        self.reminders.put(reminder.clone());
        Some(reminder)
    }

    pub fn delete_reminder(&mut self, id: ReminderId) -> bool {
        let storage = self.storage;
        let deleted = self
            .reminders
            .run(|| ReminderService::new(storage).delete(id))
            .is_some();
        if deleted {
            self.reminders.remove(id);
        }
        deleted
    }

    // Calendar integrations

    pub fn add_calendar(&mut self, provider: CalendarProvider) -> Option<CalendarIntegration> {
        let storage = self.storage;
        let selected = self.selected;
        let owner = self.settings.owner_id;
        let integration = self.calendar_integrations.run(|| {
            let event_id = selected.ok_or_else(no_event_selected)?;
            CalendarService::new(storage).add(event_id, owner, provider)
        })?;
        self.calendar_integrations.put(integration.clone());
        Some(integration)
    }

    pub fn set_calendar_status(
        &mut self,
        id: CalendarIntegrationId,
        status: SyncStatus,
        error: Option<String>,
    ) -> Option<CalendarIntegration> {
        let storage = self.storage;
        let integration = self
            .calendar_integrations
            .run(|| CalendarService::new(storage).set_status(id, status, error, None))?;
        self.calendar_integrations.put(integration.clone());
        Some(integration)
    }

    pub fn remove_calendar(&mut self, id: CalendarIntegrationId) -> bool {
        let storage = self.storage;
        let removed = self
            .calendar_integrations
            .run(|| CalendarService::new(storage).remove(id))
            .is_some();
        if removed {
            self.calendar_integrations.remove(id);
        }
        removed
    }

    // Derived figures from what is loaded

    pub fn budget_progress(&self) -> Option<BudgetProgressReport> {
        let event = self.selected_event()?;
        Some(BudgetProgressReport::from_records(
            event.clone(),
            self.budget_categories.items(),
            self.expenses.items(),
        ))
    }

    pub fn rsvp_summary(&self) -> RsvpSummary {
        RsvpSummary::from_invitations(self.invitations.items())
    }

    /// Open the event named by `identifier` (id reference or title)
    pub fn open_by_ref(&mut self, identifier: &str) -> EventraResult<Event> {
        let event = EventService::new(self.storage).require(identifier)?;
        if !self.open_event(event.id) {
            let message = self.error().unwrap_or("Failed to load event").to_string();
            return Err(EventraError::Storage(message));
        }
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::EventraPaths;
    use crate::models::{EventCategory, Money, RsvpStatus};
    use tempfile::TempDir;

    fn setup() -> (TempDir, Storage, Settings) {
        let temp_dir = TempDir::new().unwrap();
        let paths = EventraPaths::with_base_dir(temp_dir.path().to_path_buf());
        let settings = crate::storage::initialize_storage(&paths).unwrap();
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage, settings)
    }

    fn draft(budget: i64) -> EventDraft {
        let mut draft = EventDraft::new(
            "Garden Party",
            EventCategory::Party,
            NaiveDate::from_ymd_opt(2030, 6, 20).unwrap(),
            "Back yard",
            Money::from_units(budget),
            30,
        );
        draft.max_guests = Some(4);
        draft
    }

    #[test]
    fn test_create_event_populates_categories() {
        let (_tmp, storage, settings) = setup();
        let mut ws = EventWorkspace::new(&storage, &settings);

        let event = ws.create_event(draft(2000)).unwrap();
        assert_eq!(ws.selected_event().map(|e| e.id), Some(event.id));
        assert_eq!(ws.budget_categories.len(), 6);
        assert!(ws.error().is_none());

        let mut fresh = EventWorkspace::new(&storage, &settings);
        assert!(fresh.fetch_events());
        assert_eq!(fresh.events.len(), 1);
        assert!(fresh.open_event(event.id));
        assert_eq!(fresh.budget_categories.len(), 6);
    }

    #[test]
    fn test_expense_flow_and_progress() {
        let (_tmp, storage, settings) = setup();
        let mut ws = EventWorkspace::new(&storage, &settings);
        ws.create_event(draft(1000)).unwrap();
        let venue = ws.budget_categories.items()[0].id;

        let expense = ws
            .add_expense(NewExpense {
                description: "Tent".into(),
                amount: Money::from_units(400),
                date: NaiveDate::from_ymd_opt(2030, 5, 1).unwrap(),
                category_id: Some(venue),
                receipt_url: None,
            })
            .unwrap();
        assert_eq!(ws.expenses.len(), 1);

        let progress = ws.budget_progress().unwrap();
        assert_eq!(progress.total_spent, Money::from_units(400));
        assert!(progress.categories[0].is_overspent());

        assert!(ws.delete_budget_category(venue));
        assert_eq!(ws.expenses.items()[0].category_id, None);

        assert!(ws.delete_expense(expense.id));
        assert!(ws.expenses.is_empty());
    }

    #[test]
    fn test_failures_are_stored_not_returned() {
        let (_tmp, storage, settings) = setup();
        let mut ws = EventWorkspace::new(&storage, &settings);

        let none = ws.add_expense(NewExpense {
            description: "Cake".into(),
            amount: Money::from_units(50),
            date: NaiveDate::from_ymd_opt(2030, 5, 1).unwrap(),
            category_id: None,
            receipt_url: None,
        });
        assert!(none.is_none());
        assert_eq!(ws.expenses.error(), Some("Validation error: No event is open"));

        ws.create_event(draft(500)).unwrap();
        ws.send_invitation("a@example.com", None, 3).unwrap();
        assert!(ws.send_invitation("b@example.com", None, 2).is_none());
        assert!(ws
            .invitations
            .error()
            .is_some_and(|e| e.contains("Guest limit")));
        assert_eq!(ws.invitations.len(), 1);
    }

    #[test]
    fn test_rsvp_and_delete_event() {
        let (_tmp, storage, settings) = setup();
        let mut ws = EventWorkspace::new(&storage, &settings);
        let event = ws.create_event(draft(500)).unwrap();

        let invitation = ws.send_invitation("guest@example.com", None, 2).unwrap();
        let today = NaiveDate::from_ymd_opt(2030, 6, 1).unwrap();
        ws.respond_invitation(invitation.id, RsvpResponse::status(RsvpStatus::Accepted), today)
            .unwrap();
        assert_eq!(ws.rsvp_summary().expected_attendees, 2);

        ws.add_reminder(ReminderChannel::Email, None, None).unwrap();
        assert_eq!(ws.reminders.items()[0].lead_time, settings.default_reminder_lead);

        assert!(ws.delete_event(event.id));
        assert!(ws.selected_event().is_none());
        assert!(ws.invitations.is_empty());
        assert!(ws.reminders.is_empty());
        assert_eq!(storage.invitations.count().unwrap(), 0);
    }
}
