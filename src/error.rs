//! Custom error types for Eventra
//!
//! Every failure is reduced to one `EventraError` whose `Display` output is the
//! message shown to the user verbatim.

use thiserror::Error;

/// The main error type for Eventra operations
#[derive(Error, Debug)]
pub enum EventraError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Guest cap would be exceeded by an invitation
    #[error("Guest limit reached for '{event}': {requested} requested, {remaining} remaining")]
    GuestLimit {
        event: String,
        requested: u32,
        remaining: u32,
    },

    /// Calendar link or file generation errors
    #[error("Calendar error: {0}")]
    Calendar(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl EventraError {
    /// Create a "not found" error for events
    pub fn event_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Event",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for budget categories
    pub fn budget_category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for expenses
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for invitations
    pub fn invitation_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Invitation",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for reminders
    pub fn reminder_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Reminder",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for calendar integrations
    pub fn integration_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Calendar integration",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for EventraError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for EventraError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for EventraError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for Eventra operations
pub type EventraResult<T> = Result<T, EventraError>;
