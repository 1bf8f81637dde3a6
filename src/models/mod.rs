//! Core data models for Eventra
//!
//! Events and the records that hang off them: budget categories, expenses,
//! invitations, reminders and calendar integrations.

pub mod budget_category;
pub mod calendar;
pub mod event;
pub mod expense;
pub mod ids;
pub mod invitation;
pub mod money;
pub mod reminder;

pub use budget_category::BudgetCategory;
pub use calendar::{CalendarIntegration, CalendarProvider, SyncStatus};
pub use event::{Event, EventCategory, EventDraft};
pub use expense::Expense;
pub use ids::{
    BudgetCategoryId, CalendarIntegrationId, EventId, ExpenseId, InvitationId, ReminderId, UserId,
};
pub use invitation::{Invitation, RsvpStatus};
pub use money::Money;
pub use reminder::{LeadTime, LeadUnit, Reminder, ReminderChannel};
