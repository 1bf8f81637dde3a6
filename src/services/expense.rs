//! Expense service
//!
//! Records costs against an event. Spending past the budget is allowed; the
//! caller gets the event's budget position back so it can warn.

use chrono::{NaiveDate, Utc};
use url::Url;

use crate::audit::EntityType;
use crate::error::{EventraError, EventraResult};
use crate::models::{BudgetCategoryId, Event, EventId, Expense, ExpenseId, Money};
use crate::storage::Storage;

pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

/// Input for a new expense
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub description: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub category_id: Option<BudgetCategoryId>,
    pub receipt_url: Option<String>,
}

/// Field changes for an expense; nested options allow clearing
#[derive(Debug, Clone, Default)]
pub struct ExpenseUpdate {
    pub description: Option<String>,
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
    pub category_id: Option<Option<BudgetCategoryId>>,
    pub receipt_url: Option<Option<String>>,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record an expense for an event
    pub fn add(&self, event_id: EventId, input: NewExpense) -> EventraResult<Expense> {
        let event = self.event(event_id)?;

        let mut expense = Expense::new(event.id, input.description.trim(), input.amount, input.date);
        expense.category_id = self.checked_category(&event, input.category_id)?;
        expense.receipt_url = checked_receipt_url(input.receipt_url)?;
        expense
            .validate()
            .map_err(|e| EventraError::Validation(e.to_string()))?;

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;
        self.storage.log_create(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &expense,
        )?;

        let spent = self.total_spent(event.id)?;
        if spent > event.budget {
            tracing::warn!(event = %event.id, %spent, budget = %event.budget, "event is over budget");
        }
        tracing::debug!(expense = %expense.id, amount = %expense.amount, "expense recorded");

        Ok(expense)
    }

    pub fn get(&self, id: ExpenseId) -> EventraResult<Option<Expense>> {
        self.storage.expenses.get(id)
    }

    pub fn find(&self, reference: &str) -> EventraResult<Option<Expense>> {
        self.storage.expenses.find_by_ref(reference, None)
    }

    pub fn require(&self, reference: &str) -> EventraResult<Expense> {
        self.find(reference)?
            .ok_or_else(|| EventraError::expense_not_found(reference))
    }

    /// Expenses of one event, oldest first
    pub fn list_for_event(&self, event_id: EventId) -> EventraResult<Vec<Expense>> {
        self.storage.expenses.get_by_event(event_id)
    }

    /// Expenses charged to one budget category
    pub fn list_for_category(&self, category_id: BudgetCategoryId) -> EventraResult<Vec<Expense>> {
        self.storage
            .expenses
            .filter(|e| e.category_id == Some(category_id))
    }

    pub fn total_spent(&self, event_id: EventId) -> EventraResult<Money> {
        Ok(self.list_for_event(event_id)?.iter().map(|e| e.amount).sum())
    }

    pub fn update(&self, id: ExpenseId, changes: ExpenseUpdate) -> EventraResult<Expense> {
        let mut expense = self
            .storage
            .expenses
            .get(id)?
            .ok_or_else(|| EventraError::expense_not_found(id.to_string()))?;
        let event = self.event(expense.event_id)?;
        let before = expense.clone();

        if let Some(description) = changes.description {
            expense.description = description.trim().to_string();
        }
        if let Some(amount) = changes.amount {
            expense.amount = amount;
        }
        if let Some(date) = changes.date {
            expense.date = date;
        }
        if let Some(category_id) = changes.category_id {
            expense.category_id = self.checked_category(&event, category_id)?;
        }
        if let Some(receipt_url) = changes.receipt_url {
            expense.receipt_url = checked_receipt_url(receipt_url)?;
        }

        expense
            .validate()
            .map_err(|e| EventraError::Validation(e.to_string()))?;
        expense.updated_at = Utc::now();

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;
        self.storage.log_update(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &before,
            &expense,
            None,
        )?;

        Ok(expense)
    }

    pub fn delete(&self, id: ExpenseId) -> EventraResult<Expense> {
        let expense = self
            .storage
            .expenses
            .delete(id)?
            .ok_or_else(|| EventraError::expense_not_found(id.to_string()))?;
        self.storage.expenses.save()?;

        self.storage.log_delete(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &expense,
        )?;

        Ok(expense)
    }

    fn event(&self, id: EventId) -> EventraResult<Event> {
        self.storage
            .events
            .get(id)?
            .ok_or_else(|| EventraError::event_not_found(id.to_string()))
    }

    /// The category must exist and belong to the same event
    fn checked_category(
        &self,
        event: &Event,
        category_id: Option<BudgetCategoryId>,
    ) -> EventraResult<Option<BudgetCategoryId>> {
        let Some(id) = category_id else {
            return Ok(None);
        };
        match self.storage.budget_categories.get(id)? {
            Some(category) if category.event_id == event.id => Ok(Some(id)),
            Some(category) => Err(EventraError::Validation(format!(
                "Budget category '{}' belongs to a different event",
                category.name
            ))),
            None => Err(EventraError::budget_category_not_found(id.to_string())),
        }
    }
}

fn checked_receipt_url(url: Option<String>) -> EventraResult<Option<String>> {
    match url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
        Some(raw) => {
            let parsed = Url::parse(&raw)
                .map_err(|e| EventraError::Validation(format!("Invalid receipt URL '{}': {}", raw, e)))?;
            Ok(Some(parsed.to_string()))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::EventraPaths;
    use crate::models::{EventCategory, EventDraft, UserId};
    use crate::services::{BudgetService, EventService};
    use tempfile::TempDir;

    fn setup() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = EventraPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn trip(storage: &Storage, title: &str) -> Event {
        let draft = EventDraft::new(
            title,
            EventCategory::Trip,
            NaiveDate::from_ymd_opt(2026, 9, 12).unwrap(),
            "Lisbon",
            Money::from_units(1000),
            2,
        );
        EventService::new(storage).create(draft, UserId::new()).unwrap().0
    }

    fn input(description: &str, units: i64) -> NewExpense {
        NewExpense {
            description: description.into(),
            amount: Money::from_units(units),
            date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            category_id: None,
            receipt_url: None,
        }
    }

    #[test]
    fn test_add_and_total() {
        let (_temp, storage) = setup();
        let event = trip(&storage, "Lisbon");
        let service = ExpenseService::new(&storage);

        service.add(event.id, input("Flights", 400)).unwrap();
        service.add(event.id, input("Hotel", 350)).unwrap();

        assert_eq!(service.list_for_event(event.id).unwrap().len(), 2);
        assert_eq!(service.total_spent(event.id).unwrap(), Money::from_units(750));
    }

    #[test]
    fn test_overspend_is_allowed() {
        let (_temp, storage) = setup();
        let event = trip(&storage, "Lisbon");
        let service = ExpenseService::new(&storage);

        service.add(event.id, input("Everything", 1500)).unwrap();
        assert_eq!(service.total_spent(event.id).unwrap(), Money::from_units(1500));
    }

    #[test]
    fn test_rejects_invalid_input() {
        let (_temp, storage) = setup();
        let event = trip(&storage, "Lisbon");
        let service = ExpenseService::new(&storage);

        assert!(service.add(event.id, input("Free", 0)).unwrap_err().is_validation());
        assert!(service.add(event.id, input("  ", 10)).unwrap_err().is_validation());

        let mut bad_url = input("Taxi", 20);
        bad_url.receipt_url = Some("not a url".into());
        assert!(service.add(event.id, bad_url).unwrap_err().is_validation());

        assert!(service
            .add(crate::models::EventId::new(), input("Orphan", 5))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_category_must_belong_to_event() {
        let (_temp, storage) = setup();
        let first = trip(&storage, "Lisbon");
        let second = trip(&storage, "Porto");
        let other_food = BudgetService::new(&storage).require(second.id, "Food").unwrap();
        let service = ExpenseService::new(&storage);

        let mut tagged = input("Dinner", 60);
        tagged.category_id = Some(other_food.id);
        assert!(service.add(first.id, tagged).unwrap_err().is_validation());

        let own_food = BudgetService::new(&storage).require(first.id, "Food").unwrap();
        let mut tagged = input("Dinner", 60);
        tagged.category_id = Some(own_food.id);
        let expense = service.add(first.id, tagged).unwrap();
        assert_eq!(service.list_for_category(own_food.id).unwrap()[0].id, expense.id);
    }

    #[test]
    fn test_update_and_delete() {
        let (_temp, storage) = setup();
        let event = trip(&storage, "Lisbon");
        let service = ExpenseService::new(&storage);
        let expense = service.add(event.id, input("Flights", 400)).unwrap();

        let updated = service
            .update(
                expense.id,
                ExpenseUpdate {
                    amount: Some(Money::from_units(420)),
                    receipt_url: Some(Some("https://receipts.example.com/r/1".into())),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.amount, Money::from_units(420));
        assert!(updated.receipt_url.is_some());

        service.delete(expense.id).unwrap();
        assert!(service.get(expense.id).unwrap().is_none());
        assert!(service.delete(expense.id).unwrap_err().is_not_found());
    }
}
