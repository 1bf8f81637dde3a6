//! Expense model
//!
//! An actual recorded cost against an event, optionally tagged with one of the
//! event's budget categories. Expenses are never checked against category
//! amounts; overspending is only reported.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetCategoryId, EventId, ExpenseId};
use super::money::Money;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,

    pub event_id: EventId,

    /// Budget category this cost is charged to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<BudgetCategoryId>,

    pub description: String,

    pub amount: Money,

    /// Date the cost was incurred
    pub date: NaiveDate,

    /// Link to a receipt image or document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_url: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        event_id: EventId,
        description: impl Into<String>,
        amount: Money,
        date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ExpenseId::new(),
            event_id,
            category_id: None,
            description: description.into(),
            amount,
            date,
            receipt_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_category(mut self, category_id: BudgetCategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if self.description.trim().is_empty() {
            return Err(ExpenseValidationError::EmptyDescription);
        }

        if !self.amount.is_positive() {
            return Err(ExpenseValidationError::NonPositiveAmount);
        }

        Ok(())
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.date, self.description, self.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    EmptyDescription,
    NonPositiveAmount,
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "Expense description cannot be empty"),
            Self::NonPositiveAmount => write!(f, "Expense amount must be greater than zero"),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        let date = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        let mut expense = Expense::new(EventId::new(), "Deposit", Money::from_units(500), date);
        assert!(expense.validate().is_ok());

        expense.amount = Money::zero();
        assert_eq!(
            expense.validate(),
            Err(ExpenseValidationError::NonPositiveAmount)
        );

        expense.amount = Money::from_units(1);
        expense.description = " ".into();
        assert_eq!(
            expense.validate(),
            Err(ExpenseValidationError::EmptyDescription)
        );
    }

    #[test]
    fn test_with_category() {
        let date = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        let category_id = BudgetCategoryId::new();
        let expense =
            Expense::new(EventId::new(), "Flowers", Money::from_units(80), date).with_category(category_id);
        assert_eq!(expense.category_id, Some(category_id));
    }
}
