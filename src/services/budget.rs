//! Budget category service
//!
//! Budget categories are created with their event; afterwards they can be
//! renamed, re-weighted or removed.

use chrono::Utc;

use crate::audit::EntityType;
use crate::error::{EventraError, EventraResult};
use crate::models::{BudgetCategory, BudgetCategoryId, EventId};
use crate::storage::Storage;

pub struct BudgetService<'a> {
    storage: &'a Storage,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Categories of one event, in template order
    pub fn list_for_event(&self, event_id: EventId) -> EventraResult<Vec<BudgetCategory>> {
        self.storage.budget_categories.get_by_event(event_id)
    }

    pub fn get(&self, id: BudgetCategoryId) -> EventraResult<Option<BudgetCategory>> {
        self.storage.budget_categories.get(id)
    }

    /// Find a category of `event_id` by id reference or name (case-insensitive)
    pub fn find(&self, event_id: EventId, identifier: &str) -> EventraResult<Option<BudgetCategory>> {
        if let Some(category) = self
            .storage
            .budget_categories
            .find_by_ref(identifier, Some(event_id))?
        {
            return Ok(Some(category));
        }

        let wanted = identifier.trim().to_lowercase();
        Ok(self
            .list_for_event(event_id)?
            .into_iter()
            .find(|c| c.name.to_lowercase() == wanted))
    }

    pub fn require(&self, event_id: EventId, identifier: &str) -> EventraResult<BudgetCategory> {
        self.find(event_id, identifier)?
            .ok_or_else(|| EventraError::budget_category_not_found(identifier))
    }

    /// Sum of the percentages assigned across an event's categories
    pub fn allocated_percentage(&self, event_id: EventId) -> EventraResult<u32> {
        Ok(self
            .list_for_event(event_id)?
            .iter()
            .map(|c| u32::from(c.percentage))
            .sum())
    }

    /// Rename a category and/or change its share of the event budget
    pub fn update(
        &self,
        id: BudgetCategoryId,
        name: Option<&str>,
        percentage: Option<u8>,
    ) -> EventraResult<BudgetCategory> {
        let mut category = self
            .storage
            .budget_categories
            .get(id)?
            .ok_or_else(|| EventraError::budget_category_not_found(id.to_string()))?;
        let event = self
            .storage
            .events
            .get(category.event_id)?
            .ok_or_else(|| EventraError::event_not_found(category.event_id.to_string()))?;
        let before = category.clone();

        if let Some(name) = name {
            let name = name.trim();
            let taken = self
                .list_for_event(event.id)?
                .iter()
                .any(|c| c.id != id && c.name.eq_ignore_ascii_case(name));
            if taken {
                return Err(EventraError::Duplicate {
                    entity_type: "Budget category",
                    identifier: name.to_string(),
                });
            }
            category.name = name.to_string();
        }

        if let Some(percentage) = percentage {
            category.set_percentage(percentage, event.budget);
        }

        category
            .validate()
            .map_err(|e| EventraError::Validation(e.to_string()))?;
        category.updated_at = Utc::now();

        self.storage.budget_categories.upsert(category.clone())?;
        self.storage.budget_categories.save()?;
        self.storage.log_update(
            EntityType::BudgetCategory,
            category.id.to_string(),
            Some(format!("{} / {}", event.title, category.name)),
            &before,
            &category,
            None,
        )?;

        let total = self.allocated_percentage(event.id)?;
        if total != 100 {
            tracing::warn!(event = %event.id, total, "budget categories no longer sum to 100%");
        }

        Ok(category)
    }

    /// Delete a category; its expenses stay and become uncategorized
    pub fn delete(&self, id: BudgetCategoryId) -> EventraResult<BudgetCategory> {
        let category = self
            .storage
            .budget_categories
            .delete(id)?
            .ok_or_else(|| EventraError::budget_category_not_found(id.to_string()))?;

        let linked = self
            .storage
            .expenses
            .filter(|e| e.category_id == Some(id))?;
        for mut expense in linked {
            let before = expense.clone();
            expense.category_id = None;
            expense.updated_at = Utc::now();
            self.storage.expenses.upsert(expense.clone())?;
            self.storage.log_update(
                EntityType::Expense,
                expense.id.to_string(),
                Some(expense.description.clone()),
                &before,
                &expense,
                Some(format!("category: {} -> (none)", category.name)),
            )?;
        }

        self.storage.budget_categories.save()?;
        self.storage.expenses.save()?;
        self.storage.log_delete(
            EntityType::BudgetCategory,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;

        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::EventraPaths;
    use crate::models::{Event, EventCategory, EventDraft, Expense, Money, UserId};
    use crate::services::EventService;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = EventraPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn party(storage: &Storage) -> Event {
        let draft = EventDraft::new(
            "Launch Party",
            EventCategory::Party,
            NaiveDate::from_ymd_opt(2026, 11, 14).unwrap(),
            "Warehouse 9",
            Money::from_units(2000),
            60,
        );
        EventService::new(storage).create(draft, UserId::new()).unwrap().0
    }

    #[test]
    fn test_find_by_name() {
        let (_temp, storage) = setup();
        let event = party(&storage);
        let service = BudgetService::new(&storage);

        let food = service.find(event.id, "food & drinks").unwrap().unwrap();
        assert_eq!(food.percentage, 35);
        assert_eq!(food.amount, Money::from_units(700));
        assert!(service.require(event.id, "Catering").unwrap_err().is_not_found());
    }

    #[test]
    fn test_update_percentage_recomputes_amount() {
        let (_temp, storage) = setup();
        let event = party(&storage);
        let service = BudgetService::new(&storage);
        let venue = service.require(event.id, "Venue").unwrap();

        let updated = service.update(venue.id, Some("Hall"), Some(20)).unwrap();
        assert_eq!(updated.name, "Hall");
        assert_eq!(updated.amount, Money::from_units(400));
        assert_eq!(service.allocated_percentage(event.id).unwrap(), 95);
    }

    #[test]
    fn test_update_rejects_bad_values() {
        let (_temp, storage) = setup();
        let event = party(&storage);
        let service = BudgetService::new(&storage);
        let venue = service.require(event.id, "Venue").unwrap();

        assert!(service.update(venue.id, None, Some(101)).unwrap_err().is_validation());
        assert!(matches!(
            service.update(venue.id, Some("decoration"), None),
            Err(EventraError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_delete_uncategorizes_expenses() {
        let (_temp, storage) = setup();
        let event = party(&storage);
        let service = BudgetService::new(&storage);
        let venue = service.require(event.id, "Venue").unwrap();

        let expense = Expense::new(event.id, "Hall deposit", Money::from_units(300), event.date)
            .with_category(venue.id);
        storage.expenses.upsert(expense.clone()).unwrap();

        service.delete(venue.id).unwrap();
        assert!(service.get(venue.id).unwrap().is_none());
        let kept = storage.expenses.get(expense.id).unwrap().unwrap();
        assert!(kept.category_id.is_none());
    }
}
