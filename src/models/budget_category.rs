//! Budget category model
//!
//! A named slice of an event's budget. The slices for an event are produced
//! once, when the event is created, from its allocation template.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetCategoryId, EventId};
use super::money::Money;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub id: BudgetCategoryId,

    /// The event this slice belongs to
    pub event_id: EventId,

    pub name: String,

    /// Share of the event budget, 0-100
    pub percentage: u8,

    /// Absolute amount (percentage / 100 x event budget)
    pub amount: Money,

    /// Position within the event's template
    #[serde(default)]
    pub sort_order: i32,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl BudgetCategory {
    pub fn new(
        event_id: EventId,
        name: impl Into<String>,
        percentage: u8,
        amount: Money,
        sort_order: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetCategoryId::new(),
            event_id,
            name: name.into(),
            percentage,
            amount,
            sort_order,
            created_at: now,
            updated_at: now,
        }
    }

    /// Change the share and recompute the amount against `event_budget`
    pub fn set_percentage(&mut self, percentage: u8, event_budget: Money) {
        self.percentage = percentage;
        self.amount = event_budget.percentage(percentage);
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), BudgetCategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(BudgetCategoryValidationError::EmptyName);
        }

        if self.name.len() > 50 {
            return Err(BudgetCategoryValidationError::NameTooLong(self.name.len()));
        }

        if self.percentage > 100 {
            return Err(BudgetCategoryValidationError::PercentageOutOfRange(
                self.percentage,
            ));
        }

        if self.amount.is_negative() {
            return Err(BudgetCategoryValidationError::NegativeAmount);
        }

        Ok(())
    }
}

impl fmt::Display for BudgetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}%)", self.name, self.percentage)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetCategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    PercentageOutOfRange(u8),
    NegativeAmount,
}

impl fmt::Display for BudgetCategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Budget category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Budget category name too long ({} chars, max 50)", len)
            }
            Self::PercentageOutOfRange(p) => {
                write!(f, "Percentage must be between 0 and 100 (got {})", p)
            }
            Self::NegativeAmount => write!(f, "Budget category amount cannot be negative"),
        }
    }
}

impl std::error::Error for BudgetCategoryValidationError {}
