//! In-memory record collection with loading and error state

use crate::error::EventraResult;
use crate::storage::Record;

/// Records of one kind held for a screen or command
///
/// Every operation goes through [`Store::run`]: the loading flag is raised
/// for its duration and a failure leaves its message in `error` instead of
/// propagating.
#[derive(Debug, Clone)]
pub struct Store<T: Record> {
    items: Vec<T>,
    loading: bool,
    error: Option<String>,
}

impl<T: Record> Default for Store<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

impl<T: Record> Store<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message of the last failed operation
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Run one operation against the backing store
    pub fn run<R>(&mut self, op: impl FnOnce() -> EventraResult<R>) -> Option<R> {
        self.loading = true;
        self.error = None;
        let result = op();
        self.loading = false;

        match result {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(store = T::LABEL, error = %e, "store operation failed");
                self.error = Some(e.to_string());
                None
            }
        }
    }

    /// Run a fetch and replace the collection with its result
    pub fn fetch(&mut self, op: impl FnOnce() -> EventraResult<Vec<T>>) -> bool {
        match self.run(op) {
            Some(items) => {
                self.replace(items);
                true
            }
            None => false,
        }
    }

    pub fn replace(&mut self, mut items: Vec<T>) {
        items.sort_by(|a, b| a.order(b));
        self.items = items;
    }

    /// Insert or replace a record, keeping listing order
    pub fn put(&mut self, item: T) {
        let id = item.id();
        match self.items.iter_mut().find(|existing| existing.id() == id) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
        self.items.sort_by(|a, b| a.order(b));
    }

    pub fn remove(&mut self, id: T::Id) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EventraError;
    use crate::models::{EventId, Expense, Money};
    use chrono::NaiveDate;

    fn expense(day: u32) -> Expense {
        Expense::new(
            EventId::new(),
            format!("day {}", day),
            Money::from_units(10),
            NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
        )
    }

    #[test]
    fn test_fetch_replaces_and_sorts() {
        let mut store = Store::new();
        assert!(store.fetch(|| Ok(vec![expense(9), expense(2)])));

        assert_eq!(store.len(), 2);
        assert_eq!(store.items()[0].description, "day 2");
        assert!(!store.is_loading());
        assert!(store.error().is_none());
    }

    #[test]
    fn test_failure_keeps_items_and_stores_message() {
        let mut store = Store::new();
        store.put(expense(1));

        let result: Option<()> =
            store.run(|| Err(EventraError::Validation("Amount must be positive".into())));

        assert!(result.is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(store.error(), Some("Validation error: Amount must be positive"));
        assert!(!store.is_loading());
    }

    #[test]
    fn test_success_clears_previous_error() {
        let mut store: Store<Expense> = Store::new();
        store.run::<()>(|| Err(EventraError::Storage("disk full".into())));
        assert!(store.error().is_some());

        store.run(|| Ok(()));
        assert!(store.error().is_none());
    }

    #[test]
    fn test_put_replaces_existing_and_remove() {
        let mut store = Store::new();
        let mut item = expense(4);
        store.put(item.clone());

        item.description = "renamed".into();
        store.put(item.clone());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(item.id).map(|e| e.description.as_str()), Some("renamed"));

        assert!(store.remove(item.id).is_some());
        assert!(store.is_empty());
        assert!(store.remove(item.id).is_none());
    }
}
