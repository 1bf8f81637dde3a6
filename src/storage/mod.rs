//! Storage layer for Eventra
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation. Each entity kind has its own table file under `data/`; every
//! write made through a service is also recorded in the audit log.

pub mod file_io;
pub mod init;
pub mod repository;

pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use repository::{Record, Repository};

use serde::Serialize;

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::EventraPaths;
use crate::error::EventraResult;
use crate::models::{BudgetCategory, CalendarIntegration, Event, Expense, Invitation, Reminder};

/// Main storage coordinator that provides access to all tables
pub struct Storage {
    paths: EventraPaths,
    audit: AuditLogger,
    pub events: Repository<Event>,
    pub budget_categories: Repository<BudgetCategory>,
    pub expenses: Repository<Expense>,
    pub invitations: Repository<Invitation>,
    pub reminders: Repository<Reminder>,
    pub calendar_integrations: Repository<CalendarIntegration>,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: EventraPaths) -> EventraResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            events: Repository::new(paths.events_file()),
            budget_categories: Repository::new(paths.budget_categories_file()),
            expenses: Repository::new(paths.expenses_file()),
            invitations: Repository::new(paths.invitations_file()),
            reminders: Repository::new(paths.reminders_file()),
            calendar_integrations: Repository::new(paths.calendar_integrations_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &EventraPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all tables from disk
    pub fn load_all(&mut self) -> EventraResult<()> {
        self.events.load()?;
        self.budget_categories.load()?;
        self.expenses.load()?;
        self.invitations.load()?;
        self.reminders.load()?;
        self.calendar_integrations.load()?;
        Ok(())
    }

    /// Save all tables to disk
    pub fn save_all(&self) -> EventraResult<()> {
        self.events.save()?;
        self.budget_categories.save()?;
        self.expenses.save()?;
        self.invitations.save()?;
        self.reminders.save()?;
        self.calendar_integrations.save()?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// Record a create in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> EventraResult<()> {
        let entry = AuditEntry::create(entity_type, entity_id, entity_name, entity);
        self.audit.log(&entry)
    }

    /// Record an update in the audit log
    ///
    /// When no summary is given, one is derived from the JSON difference.
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> EventraResult<()> {
        let mut entry =
            AuditEntry::update(entity_type, entity_id, entity_name, before, after, diff_summary);
        if entry.diff_summary.is_none() {
            if let (Some(b), Some(a)) = (&entry.before, &entry.after) {
                entry.diff_summary = generate_diff(b, a);
            }
        }
        self.audit.log(&entry)
    }

    /// Record a delete in the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> EventraResult<()> {
        let entry = AuditEntry::delete(entity_type, entity_id, entity_name, entity);
        self.audit.log(&entry)
    }
}
