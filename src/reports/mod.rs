//! Reports module for Eventra
//!
//! Derived figures for display: budget progress per event, RSVP summaries
//! and the upcoming/past event overview.

pub mod budget_progress;
pub mod overview;
pub mod rsvp;

pub use budget_progress::{BudgetProgressReport, CategoryProgressRow};
pub use overview::{EventOverviewReport, EventOverviewRow};
pub use rsvp::RsvpSummary;
