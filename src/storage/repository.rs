//! Generic table repository for JSON storage
//!
//! Every entity lives in its own `data/<table>.json` file and is held in
//! memory as an id-keyed map behind a `RwLock`. Records that belong to an
//! event expose its id so that per-event queries and cascading deletes are
//! table operations.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{EventraError, EventraResult};
use crate::models::{
    BudgetCategory, CalendarIntegration, Event, EventId, Expense, Invitation, Reminder,
};

use super::file_io::{read_json, write_json_atomic};

/// A storable entity
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Id: Copy + Eq + Hash + Display;

    /// Label used in "not found" and ambiguity messages
    const LABEL: &'static str;

    fn id(&self) -> Self::Id;

    /// The event this record belongs to (an event belongs to itself)
    fn event_id(&self) -> EventId;

    /// Whether `reference` (full id, short id or hex prefix) names this record
    fn matches_ref(&self, reference: &str) -> bool;

    /// Listing order
    fn order(&self, other: &Self) -> Ordering;
}

impl Record for Event {
    type Id = crate::models::EventId;
    const LABEL: &'static str = "Event";

    fn id(&self) -> Self::Id {
        self.id
    }

    fn event_id(&self) -> EventId {
        self.id
    }

    fn matches_ref(&self, reference: &str) -> bool {
        self.id.matches_ref(reference)
    }

    fn order(&self, other: &Self) -> Ordering {
        (self.date, self.start_time, &self.title).cmp(&(other.date, other.start_time, &other.title))
    }
}

impl Record for BudgetCategory {
    type Id = crate::models::BudgetCategoryId;
    const LABEL: &'static str = "Budget category";

    fn id(&self) -> Self::Id {
        self.id
    }

    fn event_id(&self) -> EventId {
        self.event_id
    }

    fn matches_ref(&self, reference: &str) -> bool {
        self.id.matches_ref(reference)
    }

    fn order(&self, other: &Self) -> Ordering {
        (self.sort_order, &self.name).cmp(&(other.sort_order, &other.name))
    }
}

impl Record for Expense {
    type Id = crate::models::ExpenseId;
    const LABEL: &'static str = "Expense";

    fn id(&self) -> Self::Id {
        self.id
    }

    fn event_id(&self) -> EventId {
        self.event_id
    }

    fn matches_ref(&self, reference: &str) -> bool {
        self.id.matches_ref(reference)
    }

    fn order(&self, other: &Self) -> Ordering {
        (self.date, self.created_at).cmp(&(other.date, other.created_at))
    }
}

impl Record for Invitation {
    type Id = crate::models::InvitationId;
    const LABEL: &'static str = "Invitation";

    fn id(&self) -> Self::Id {
        self.id
    }

    fn event_id(&self) -> EventId {
        self.event_id
    }

    fn matches_ref(&self, reference: &str) -> bool {
        self.id.matches_ref(reference) || self.invitee_email.eq_ignore_ascii_case(reference.trim())
    }

    fn order(&self, other: &Self) -> Ordering {
        (self.invited_at, &self.invitee_email).cmp(&(other.invited_at, &other.invitee_email))
    }
}

impl Record for Reminder {
    type Id = crate::models::ReminderId;
    const LABEL: &'static str = "Reminder";

    fn id(&self) -> Self::Id {
        self.id
    }

    fn event_id(&self) -> EventId {
        self.event_id
    }

    fn matches_ref(&self, reference: &str) -> bool {
        self.id.matches_ref(reference)
    }

    fn order(&self, other: &Self) -> Ordering {
        (self.scheduled_for, self.created_at).cmp(&(other.scheduled_for, other.created_at))
    }
}

impl Record for CalendarIntegration {
    type Id = crate::models::CalendarIntegrationId;
    const LABEL: &'static str = "Calendar integration";

    fn id(&self) -> Self::Id {
        self.id
    }

    fn event_id(&self) -> EventId {
        self.event_id
    }

    fn matches_ref(&self, reference: &str) -> bool {
        self.id.matches_ref(reference)
    }

    fn order(&self, other: &Self) -> Ordering {
        self.created_at.cmp(&other.created_at)
    }
}

/// On-disk shape of a table
#[derive(Debug, Serialize, Deserialize)]
struct TableData<T> {
    #[serde(default = "Vec::new")]
    records: Vec<T>,
}

impl<T> Default for TableData<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

fn lock_error(e: impl Display) -> EventraError {
    EventraError::Storage(format!("Failed to acquire lock: {}", e))
}

/// In-memory table backed by one JSON file
pub struct Repository<T: Record> {
    path: PathBuf,
    data: RwLock<HashMap<T::Id, T>>,
}

impl<T: Record> Repository<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load the table from disk, replacing what is in memory
    pub fn load(&self) -> EventraResult<()> {
        let file_data: TableData<T> = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        data.clear();
        for record in file_data.records {
            data.insert(record.id(), record);
        }

        tracing::trace!(table = T::LABEL, count = data.len(), "table loaded");
        Ok(())
    }

    /// Write the table to disk
    pub fn save(&self) -> EventraResult<()> {
        let records = self.get_all()?;
        write_json_atomic(&self.path, &TableData { records })
    }

    pub fn get(&self, id: T::Id) -> EventraResult<Option<T>> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// All records in listing order
    pub fn get_all(&self) -> EventraResult<Vec<T>> {
        self.filter(|_| true)
    }

    /// Records belonging to one event, in listing order
    pub fn get_by_event(&self, event_id: EventId) -> EventraResult<Vec<T>> {
        self.filter(|r| r.event_id() == event_id)
    }

    /// Records matching a predicate, in listing order
    pub fn filter<F>(&self, predicate: F) -> EventraResult<Vec<T>>
    where
        F: Fn(&T) -> bool,
    {
        let data = self.data.read().map_err(lock_error)?;
        let mut list: Vec<T> = data.values().filter(|r| predicate(r)).cloned().collect();
        list.sort_by(|a, b| a.order(b));
        Ok(list)
    }

    /// Resolve a user-supplied reference among `candidates`
    ///
    /// Fails when more than one record matches.
    pub fn find_by_ref(&self, reference: &str, event_id: Option<EventId>) -> EventraResult<Option<T>> {
        let mut matches = self.filter(|r| {
            event_id.map_or(true, |id| r.event_id() == id) && r.matches_ref(reference)
        })?;

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            n => Err(EventraError::Validation(format!(
                "{} reference '{}' is ambiguous ({} matches); use more of the id",
                T::LABEL,
                reference,
                n
            ))),
        }
    }

    /// Insert or replace a record
    pub fn upsert(&self, record: T) -> EventraResult<()> {
        let mut data = self.data.write().map_err(lock_error)?;
        data.insert(record.id(), record);
        Ok(())
    }

    /// Remove a record, returning it if it existed
    pub fn delete(&self, id: T::Id) -> EventraResult<Option<T>> {
        let mut data = self.data.write().map_err(lock_error)?;
        Ok(data.remove(&id))
    }

    /// Remove every record belonging to an event, returning them
    pub fn delete_by_event(&self, event_id: EventId) -> EventraResult<Vec<T>> {
        let mut data = self.data.write().map_err(lock_error)?;
        let ids: Vec<T::Id> = data
            .values()
            .filter(|r| r.event_id() == event_id)
            .map(Record::id)
            .collect();

        let mut removed: Vec<T> = ids.iter().filter_map(|id| data.remove(id)).collect();
        removed.sort_by(|a, b| a.order(b));
        Ok(removed)
    }

    pub fn exists(&self, id: T::Id) -> EventraResult<bool> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.contains_key(&id))
    }

    pub fn count(&self) -> EventraResult<usize> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventCategory, EventDraft, Money, UserId};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn event(title: &str, day: u32) -> Event {
        let draft = EventDraft::new(
            title,
            EventCategory::Party,
            NaiveDate::from_ymd_opt(2026, 8, day).unwrap(),
            "Rooftop",
            Money::from_units(1000),
            20,
        );
        Event::from_draft(draft, UserId::new())
    }

    fn create_test_repo<T: Record>() -> (TempDir, Repository<T>) {
        let temp_dir = TempDir::new().unwrap();
        let repo = Repository::new(temp_dir.path().join("table.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp, repo) = create_test_repo::<Event>();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_get_and_order() {
        let (_temp, repo) = create_test_repo::<Event>();
        let late = event("Late", 20);
        let early = event("Early", 2);
        repo.upsert(late.clone()).unwrap();
        repo.upsert(early.clone()).unwrap();

        assert_eq!(repo.get(late.id).unwrap().unwrap().title, "Late");
        let titles: Vec<_> = repo.get_all().unwrap().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["Early", "Late"]);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp, repo) = create_test_repo::<Event>();
        let e = event("Launch", 5);
        repo.upsert(e.clone()).unwrap();
        repo.save().unwrap();

        let reloaded: Repository<Event> = Repository::new(temp.path().join("table.json"));
        reloaded.load().unwrap();
        assert_eq!(reloaded.count().unwrap(), 1);
        assert_eq!(reloaded.get(e.id).unwrap().unwrap().location, "Rooftop");
    }

    #[test]
    fn test_by_event_and_cascade() {
        let (_temp, repo) = create_test_repo::<Expense>();
        let first = EventId::new();
        let second = EventId::new();
        let day = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();

        repo.upsert(Expense::new(first, "Cake", Money::from_units(40), day)).unwrap();
        repo.upsert(Expense::new(first, "Balloons", Money::from_units(15), day)).unwrap();
        repo.upsert(Expense::new(second, "Tickets", Money::from_units(90), day)).unwrap();

        assert_eq!(repo.get_by_event(first).unwrap().len(), 2);

        let removed = repo.delete_by_event(first).unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(repo.count().unwrap(), 1);
        assert!(repo.get_by_event(first).unwrap().is_empty());
    }

    #[test]
    fn test_delete() {
        let (_temp, repo) = create_test_repo::<Event>();
        let e = event("Gone", 1);
        repo.upsert(e.clone()).unwrap();

        assert!(repo.delete(e.id).unwrap().is_some());
        assert!(repo.delete(e.id).unwrap().is_none());
        assert!(!repo.exists(e.id).unwrap());
    }

    #[test]
    fn test_find_by_ref() {
        let (_temp, repo) = create_test_repo::<Event>();
        let e = event("Picnic", 3);
        repo.upsert(e.clone()).unwrap();

        let short = e.id.to_string();
        assert_eq!(repo.find_by_ref(&short, None).unwrap().unwrap().id, e.id);
        assert_eq!(
            repo.find_by_ref(&e.id.as_uuid().to_string(), None).unwrap().unwrap().id,
            e.id
        );
        assert!(repo.find_by_ref("evt-zzzzzzzz", None).unwrap().is_none());
        assert!(repo.find_by_ref(&short, Some(EventId::new())).unwrap().is_none());
    }

    #[test]
    fn test_invitation_matches_email() {
        let (_temp, repo) = create_test_repo::<Invitation>();
        let event_id = EventId::new();
        let inv = Invitation::new(event_id, "sam@example.com", UserId::new(), 1);
        repo.upsert(inv.clone()).unwrap();

        let found = repo.find_by_ref("SAM@example.com", Some(event_id)).unwrap();
        assert_eq!(found.unwrap().id, inv.id);
    }
}
