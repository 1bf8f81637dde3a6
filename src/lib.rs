//! Eventra - terminal-based event planner
//!
//! This library provides the core functionality for the Eventra CLI: events
//! with budgets split into categories by event type, expenses, invitations
//! and RSVPs, reminders and calendar export.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (events, budget categories, expenses, etc.)
//! - `storage`: JSON file storage layer
//! - `audit`: Audit logging system
//! - `services`: Business logic layer, including the budget allocation templates
//! - `calendar`: Calendar links and iCalendar files
//! - `reports`: Budget progress, RSVP and event overview figures
//! - `state`: In-memory record stores with loading and error state
//! - `display`: Terminal formatting
//! - `export`: JSON, YAML and CSV export
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use eventra::config::{paths::EventraPaths, settings::Settings};
//!
//! let paths = EventraPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod audit;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod state;
pub mod storage;

pub use error::{EventraError, EventraResult};
