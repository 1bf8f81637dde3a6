//! Service layer for Eventra
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, cross-entity rules and audit logging.

pub mod allocation;
pub mod budget;
pub mod calendar;
pub mod event;
pub mod expense;
pub mod invitation;
pub mod reminder;

pub use allocation::{suggest_allocation, suggest_allocation_for_name, AllocationLine};
pub use budget::BudgetService;
pub use calendar::CalendarService;
pub use event::{CascadeSummary, EventService, EventUpdate};
pub use expense::{ExpenseService, ExpenseUpdate, NewExpense};
pub use invitation::{InvitationService, InvitationUpdate, RsvpResponse};
pub use reminder::{ReminderService, ReminderUpdate};
