//! Budget Progress Report
//!
//! Compares an event's spending with its budget, overall and per budget
//! category. Overall figures are measured against the event budget, not
//! the sum of the category amounts.

use crate::error::{EventraError, EventraResult};
use crate::models::{BudgetCategory, BudgetCategoryId, Event, Expense, Money};
use crate::storage::Storage;

/// Spending against one budget category
#[derive(Debug, Clone)]
pub struct CategoryProgressRow {
    pub category_id: BudgetCategoryId,
    pub name: String,
    pub percentage: u8,
    pub allocated: Money,
    pub spent: Money,
}

impl CategoryProgressRow {
    /// Allocated minus spent; negative when overspent
    pub fn remaining(&self) -> Money {
        self.allocated - self.spent
    }

    pub fn is_overspent(&self) -> bool {
        self.spent > self.allocated
    }

    pub fn percent_spent(&self) -> i64 {
        self.spent.percent_of(self.allocated)
    }
}

#[derive(Debug, Clone)]
pub struct BudgetProgressReport {
    pub event: Event,
    pub categories: Vec<CategoryProgressRow>,
    /// Sum of the category amounts
    pub total_allocated: Money,
    /// Sum of all the event's expenses
    pub total_spent: Money,
    /// Spending not charged to any category
    pub uncategorized_spent: Money,
    pub expense_count: usize,
}

impl BudgetProgressReport {
    /// Generate the report for one event
    pub fn generate(storage: &Storage, event: &Event) -> EventraResult<Self> {
        let categories = storage.budget_categories.get_by_event(event.id)?;
        let expenses = storage.expenses.get_by_event(event.id)?;
        Ok(Self::from_records(event.clone(), &categories, &expenses))
    }

    /// Generate the report for an event given by id
    pub fn generate_for_id(storage: &Storage, event_id: crate::models::EventId) -> EventraResult<Self> {
        let event = storage
            .events
            .get(event_id)?
            .ok_or_else(|| EventraError::event_not_found(event_id.to_string()))?;
        Self::generate(storage, &event)
    }

    /// Build the report from already loaded records
    pub fn from_records(event: Event, categories: &[BudgetCategory], expenses: &[Expense]) -> Self {
        let rows: Vec<CategoryProgressRow> = categories
            .iter()
            .map(|category| CategoryProgressRow {
                category_id: category.id,
                name: category.name.clone(),
                percentage: category.percentage,
                allocated: category.amount,
                spent: expenses
                    .iter()
                    .filter(|e| e.category_id == Some(category.id))
                    .map(|e| e.amount)
                    .sum(),
            })
            .collect();

        let known: Vec<BudgetCategoryId> = rows.iter().map(|r| r.category_id).collect();
        let uncategorized_spent = expenses
            .iter()
            .filter(|e| e.category_id.map_or(true, |id| !known.contains(&id)))
            .map(|e| e.amount)
            .sum();

        Self {
            total_allocated: rows.iter().map(|r| r.allocated).sum(),
            total_spent: expenses.iter().map(|e| e.amount).sum(),
            uncategorized_spent,
            expense_count: expenses.len(),
            categories: rows,
            event,
        }
    }

    pub fn budget(&self) -> Money {
        self.event.budget
    }

    /// Budget minus spent; negative when over budget
    pub fn remaining(&self) -> Money {
        self.event.budget - self.total_spent
    }

    /// Remaining as shown to the user, never below zero
    pub fn display_remaining(&self) -> Money {
        self.remaining().clamp_zero()
    }

    pub fn is_over_budget(&self) -> bool {
        self.total_spent > self.event.budget
    }

    /// How far spending exceeds the budget, zero when within it
    pub fn over_by(&self) -> Money {
        (self.total_spent - self.event.budget).clamp_zero()
    }

    /// Spent as a whole percentage of the budget; 0 for a zero budget
    pub fn percent_spent(&self) -> i64 {
        self.total_spent.percent_of(self.event.budget)
    }

    pub fn overspent_categories(&self) -> impl Iterator<Item = &CategoryProgressRow> {
        self.categories.iter().filter(|c| c.is_overspent())
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Budget Progress - {}\n", self.event.title));
        output.push_str(&"=".repeat(72));
        output.push('\n');
        output.push_str(&format!(
            "Budget: {}   Spent: {} ({}%)   Remaining: {}\n",
            self.budget(),
            self.total_spent,
            self.percent_spent(),
            self.display_remaining()
        ));
        if self.is_over_budget() {
            output.push_str(&format!("Over budget by {}\n", self.over_by()));
        }
        output.push('\n');

        output.push_str(&format!(
            "{:<24} {:>5} {:>12} {:>12} {:>12}\n",
            "Category", "%", "Allocated", "Spent", "Remaining"
        ));
        output.push_str(&"-".repeat(72));
        output.push('\n');

        for row in &self.categories {
            let marker = if row.is_overspent() { " *" } else { "" };
            output.push_str(&format!(
                "{:<24} {:>4}% {:>12} {:>12} {:>12}{}\n",
                row.name,
                row.percentage,
                row.allocated,
                row.spent,
                row.remaining(),
                marker
            ));
        }

        if self.uncategorized_spent.is_positive() {
            output.push_str(&format!(
                "{:<24} {:>5} {:>12} {:>12}\n",
                "(uncategorized)", "", "", self.uncategorized_spent
            ));
        }

        output.push_str(&"-".repeat(72));
        output.push('\n');
        output.push_str(&format!(
            "{:<24} {:>5} {:>12} {:>12}\n",
            "TOTAL", "", self.total_allocated, self.total_spent
        ));

        if self.overspent_categories().next().is_some() {
            output.push_str("\n* Category is overspent\n");
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventCategory, EventDraft, UserId};
    use crate::services::suggest_allocation;
    use chrono::NaiveDate;

    fn event(budget: Money) -> Event {
        let draft = EventDraft::new(
            "Beach Wedding",
            EventCategory::Wedding,
            NaiveDate::from_ymd_opt(2026, 7, 11).unwrap(),
            "Sandy Cove",
            budget,
            50,
        );
        Event::from_draft(draft, UserId::new())
    }

    fn categories(event: &Event) -> Vec<BudgetCategory> {
        suggest_allocation(event.category, event.budget)
            .into_iter()
            .enumerate()
            .map(|(i, l)| BudgetCategory::new(event.id, l.name, l.percentage, l.amount, i as i32))
            .collect()
    }

    fn expense(event: &Event, units: i64, category: Option<&BudgetCategory>) -> Expense {
        let e = Expense::new(event.id, "cost", Money::from_units(units), event.date);
        match category {
            Some(c) => e.with_category(c.id),
            None => e,
        }
    }

    #[test]
    fn test_totals_and_remaining() {
        let event = event(Money::from_units(5000));
        let cats = categories(&event);
        let expenses = vec![
            expense(&event, 1200, Some(&cats[0])),
            expense(&event, 300, None),
        ];

        let report = BudgetProgressReport::from_records(event, &cats, &expenses);
        assert_eq!(report.total_spent, Money::from_units(1500));
        assert_eq!(report.total_allocated, Money::from_units(5000));
        assert_eq!(report.remaining(), Money::from_units(3500));
        assert_eq!(report.percent_spent(), 30);
        assert_eq!(report.uncategorized_spent, Money::from_units(300));
        assert!(!report.is_over_budget());
        assert_eq!(report.categories[0].spent, Money::from_units(1200));
        assert!(!report.categories[0].is_overspent());
    }

    #[test]
    fn test_over_budget() {
        let event = event(Money::from_units(1000));
        let cats = categories(&event);
        let expenses = vec![expense(&event, 1250, Some(&cats[0]))];

        let report = BudgetProgressReport::from_records(event, &cats, &expenses);
        assert!(report.is_over_budget());
        assert_eq!(report.remaining(), Money::from_units(-250));
        assert_eq!(report.display_remaining(), Money::zero());
        assert_eq!(report.over_by(), Money::from_units(250));
        assert_eq!(report.percent_spent(), 125);
        assert_eq!(report.overspent_categories().count(), 1);

        let text = report.format_terminal();
        assert!(text.contains("Over budget by $250.00"));
        assert!(text.contains("* Category is overspent"));
    }

    #[test]
    fn test_exactly_on_budget_is_not_over() {
        let event = event(Money::from_units(1000));
        let expenses = vec![expense(&event, 1000, None)];
        let report = BudgetProgressReport::from_records(event, &[], &expenses);
        assert!(!report.is_over_budget());
        assert_eq!(report.remaining(), Money::zero());
    }

    #[test]
    fn test_zero_budget() {
        let event = event(Money::zero());
        let expenses = vec![expense(&event, 40, None)];
        let report = BudgetProgressReport::from_records(event, &[], &expenses);
        assert_eq!(report.percent_spent(), 0);
        assert!(report.is_over_budget());
    }

    #[test]
    fn test_no_expenses() {
        let event = event(Money::from_units(800));
        let cats = categories(&event);
        let report = BudgetProgressReport::from_records(event, &cats, &[]);
        assert_eq!(report.total_spent, Money::zero());
        assert_eq!(report.display_remaining(), Money::from_units(800));
        assert_eq!(report.expense_count, 0);
    }
}
