//! Calendar integration service
//!
//! Tracks which external calendars an event was handed to and produces the
//! link or .ics content for each provider.

use crate::audit::EntityType;
use crate::calendar::{export_event, CalendarExport};
use crate::error::{EventraError, EventraResult};
use crate::models::{
    CalendarIntegration, CalendarIntegrationId, CalendarProvider, Event, EventId, SyncStatus,
    UserId,
};
use crate::storage::Storage;

pub struct CalendarService<'a> {
    storage: &'a Storage,
}

impl<'a> CalendarService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Register a provider for an event; starts out pending
    ///
    /// A provider previously marked removed is reactivated in place.
    pub fn add(
        &self,
        event_id: EventId,
        owner_id: UserId,
        provider: CalendarProvider,
    ) -> EventraResult<CalendarIntegration> {
        let event = self.event(event_id)?;
        match self.find_for_provider(event.id, provider)? {
            Some(existing) if existing.sync_status == SyncStatus::Removed => {
                return self.reactivate(&event, existing);
            }
            Some(_) => {
                return Err(EventraError::Duplicate {
                    entity_type: "Calendar integration",
                    identifier: format!("{} for '{}'", provider.label(), event.title),
                });
            }
            None => {}
        }

        let integration = CalendarIntegration::new(event.id, owner_id, provider);
        self.storage.calendar_integrations.upsert(integration.clone())?;
        self.storage.calendar_integrations.save()?;
        self.storage.log_create(
            EntityType::CalendarIntegration,
            integration.id.to_string(),
            Some(format!("{} / {}", event.title, provider.label())),
            &integration,
        )?;

        Ok(integration)
    }

    /// Produce the link or file for `provider`, registering the provider for
    /// the event if it is not already
    pub fn link(
        &self,
        event_id: EventId,
        owner_id: UserId,
        provider: CalendarProvider,
        duration_hours: u32,
    ) -> EventraResult<(CalendarExport, CalendarIntegration)> {
        let event = self.event(event_id)?;
        let export = export_event(&event, provider, duration_hours)?;

        let integration = match self.find_for_provider(event.id, provider)? {
            Some(existing) if existing.sync_status != SyncStatus::Removed => existing,
            _ => self.add(event.id, owner_id, provider)?,
        };

        tracing::debug!(event = %event.id, provider = provider.as_str(), "calendar export generated");
        Ok((export, integration))
    }

    pub fn get(&self, id: CalendarIntegrationId) -> EventraResult<Option<CalendarIntegration>> {
        self.storage.calendar_integrations.get(id)
    }

    pub fn require(&self, reference: &str) -> EventraResult<CalendarIntegration> {
        self.storage
            .calendar_integrations
            .find_by_ref(reference, None)?
            .ok_or_else(|| EventraError::integration_not_found(reference))
    }

    pub fn list_for_event(&self, event_id: EventId) -> EventraResult<Vec<CalendarIntegration>> {
        self.storage.calendar_integrations.get_by_event(event_id)
    }

    pub fn find_for_provider(
        &self,
        event_id: EventId,
        provider: CalendarProvider,
    ) -> EventraResult<Option<CalendarIntegration>> {
        Ok(self
            .list_for_event(event_id)?
            .into_iter()
            .find(|i| i.provider == provider))
    }

    /// Record the outcome of a sync
    pub fn set_status(
        &self,
        id: CalendarIntegrationId,
        status: SyncStatus,
        error: Option<String>,
        external_event_id: Option<String>,
    ) -> EventraResult<CalendarIntegration> {
        let mut integration = self
            .storage
            .calendar_integrations
            .get(id)?
            .ok_or_else(|| EventraError::integration_not_found(id.to_string()))?;
        let before = integration.clone();

        integration.record_status(status, error);
        if external_event_id.is_some() {
            integration.external_event_id = external_event_id;
        }

        self.storage.calendar_integrations.upsert(integration.clone())?;
        self.storage.calendar_integrations.save()?;
        self.storage.log_update(
            EntityType::CalendarIntegration,
            integration.id.to_string(),
            Some(integration.provider.label().to_string()),
            &before,
            &integration,
            None,
        )?;

        if status == SyncStatus::Failed {
            tracing::warn!(
                integration = %integration.id,
                error = integration.sync_error.as_deref().unwrap_or_default(),
                "calendar sync failed"
            );
        }
        Ok(integration)
    }

    pub fn remove(&self, id: CalendarIntegrationId) -> EventraResult<CalendarIntegration> {
        let integration = self
            .storage
            .calendar_integrations
            .delete(id)?
            .ok_or_else(|| EventraError::integration_not_found(id.to_string()))?;
        self.storage.calendar_integrations.save()?;

        self.storage.log_delete(
            EntityType::CalendarIntegration,
            integration.id.to_string(),
            Some(integration.provider.label().to_string()),
            &integration,
        )?;

        Ok(integration)
    }

    /// Put a removed integration back to pending, dropping its old sync state
    fn reactivate(
        &self,
        event: &Event,
        mut integration: CalendarIntegration,
    ) -> EventraResult<CalendarIntegration> {
        let before = integration.clone();
        integration.record_status(SyncStatus::Pending, None);
        integration.external_event_id = None;
        integration.sync_error = None;

        self.storage.calendar_integrations.upsert(integration.clone())?;
        self.storage.calendar_integrations.save()?;
        self.storage.log_update(
            EntityType::CalendarIntegration,
            integration.id.to_string(),
            Some(format!("{} / {}", event.title, integration.provider.label())),
            &before,
            &integration,
            None,
        )?;

        tracing::info!(integration = %integration.id, "calendar integration reactivated");
        Ok(integration)
    }

    fn event(&self, id: EventId) -> EventraResult<Event> {
        self.storage
            .events
            .get(id)?
            .ok_or_else(|| EventraError::event_not_found(id.to_string()))
    }
}
