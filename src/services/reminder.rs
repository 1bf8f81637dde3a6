//! Reminder service

use chrono::{DateTime, Utc};

use crate::audit::EntityType;
use crate::error::{EventraError, EventraResult};
use crate::models::{Event, EventId, LeadTime, Reminder, ReminderChannel, ReminderId, UserId};
use crate::storage::Storage;

pub struct ReminderService<'a> {
    storage: &'a Storage,
}

/// Field changes for a reminder; `message: Some(None)` clears the message
#[derive(Debug, Clone, Default)]
pub struct ReminderUpdate {
    pub channel: Option<ReminderChannel>,
    pub lead_time: Option<LeadTime>,
    pub message: Option<Option<String>>,
}

impl<'a> ReminderService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Schedule a reminder `lead_time` before the event starts
    pub fn add(
        &self,
        event_id: EventId,
        owner_id: UserId,
        channel: ReminderChannel,
        lead_time: LeadTime,
        message: Option<String>,
    ) -> EventraResult<Reminder> {
        let event = self.event(event_id)?;

        let exists = self
            .list_for_event(event.id)?
            .iter()
            .any(|r| r.channel == channel && r.lead_time == lead_time);
        if exists {
            return Err(EventraError::Duplicate {
                entity_type: "Reminder",
                identifier: format!("{} {} before '{}'", channel, lead_time, event.title),
            });
        }

        let mut reminder = Reminder::new(event.id, owner_id, channel, lead_time, event.starts_at());
        ensure_scheduled(&reminder, &event)?;
        reminder.message = message.map(|m| m.trim().to_string()).filter(|m| !m.is_empty());

        self.storage.reminders.upsert(reminder.clone())?;
        self.storage.reminders.save()?;
        self.storage.log_create(
            EntityType::Reminder,
            reminder.id.to_string(),
            Some(event.title.clone()),
            &reminder,
        )?;

        tracing::debug!(reminder = %reminder.id, scheduled_for = ?reminder.scheduled_for, "reminder scheduled");
        Ok(reminder)
    }

    pub fn get(&self, id: ReminderId) -> EventraResult<Option<Reminder>> {
        self.storage.reminders.get(id)
    }

    pub fn require(&self, reference: &str) -> EventraResult<Reminder> {
        self.storage
            .reminders
            .find_by_ref(reference, None)?
            .ok_or_else(|| EventraError::reminder_not_found(reference))
    }

    /// Reminders of one event, soonest first
    pub fn list_for_event(&self, event_id: EventId) -> EventraResult<Vec<Reminder>> {
        self.storage.reminders.get_by_event(event_id)
    }

    /// Unsent reminders whose time has come, soonest first
    pub fn due(&self, now: DateTime<Utc>) -> EventraResult<Vec<Reminder>> {
        self.storage.reminders.filter(|r| r.is_due(now))
    }

    pub fn update(&self, id: ReminderId, changes: ReminderUpdate) -> EventraResult<Reminder> {
        let mut reminder = self
            .storage
            .reminders
            .get(id)?
            .ok_or_else(|| EventraError::reminder_not_found(id.to_string()))?;
        if reminder.is_sent {
            return Err(EventraError::Validation(format!(
                "Reminder {} was already sent and can no longer be changed",
                reminder.id
            )));
        }
        let event = self.event(reminder.event_id)?;
        let before = reminder.clone();

        if let Some(channel) = changes.channel {
            reminder.channel = channel;
        }
        if let Some(lead_time) = changes.lead_time {
            reminder.lead_time = lead_time;
            reminder.reschedule(event.starts_at());
            ensure_scheduled(&reminder, &event)?;
        }
        if let Some(message) = changes.message {
            reminder.message = message.map(|m| m.trim().to_string()).filter(|m| !m.is_empty());
        }

        self.save_update(&event, &before, &reminder)?;
        Ok(reminder)
    }

    /// Flag a reminder as delivered
    pub fn mark_sent(&self, id: ReminderId) -> EventraResult<Reminder> {
        let mut reminder = self
            .storage
            .reminders
            .get(id)?
            .ok_or_else(|| EventraError::reminder_not_found(id.to_string()))?;
        if reminder.is_sent {
            return Ok(reminder);
        }
        let event = self.event(reminder.event_id)?;
        let before = reminder.clone();

        reminder.mark_sent();
        self.save_update(&event, &before, &reminder)?;
        tracing::info!(reminder = %reminder.id, channel = %reminder.channel, "reminder marked sent");
        Ok(reminder)
    }

    pub fn delete(&self, id: ReminderId) -> EventraResult<Reminder> {
        let reminder = self
            .storage
            .reminders
            .delete(id)?
            .ok_or_else(|| EventraError::reminder_not_found(id.to_string()))?;
        self.storage.reminders.save()?;

        self.storage.log_delete(
            EntityType::Reminder,
            reminder.id.to_string(),
            None,
            &reminder,
        )?;

        Ok(reminder)
    }

    fn save_update(&self, event: &Event, before: &Reminder, after: &Reminder) -> EventraResult<()> {
        self.storage.reminders.upsert(after.clone())?;
        self.storage.reminders.save()?;
        self.storage.log_update(
            EntityType::Reminder,
            after.id.to_string(),
            Some(event.title.clone()),
            before,
            after,
            None,
        )
    }

    fn event(&self, id: EventId) -> EventraResult<Event> {
        self.storage
            .events
            .get(id)?
            .ok_or_else(|| EventraError::event_not_found(id.to_string()))
    }
}

fn ensure_scheduled(reminder: &Reminder, event: &Event) -> EventraResult<()> {
    if reminder.scheduled_for.is_none() {
        return Err(EventraError::Validation(format!(
            "A reminder {} before '{}' falls outside the supported date range",
            reminder.lead_time, event.title
        )));
    }
    Ok(())
}
