//! User settings for Eventra
//!
//! Holds the local owner identity, display preferences and the defaults used
//! when generating calendar entries and reminders.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::paths::EventraPaths;
use crate::error::EventraError;
use crate::models::{LeadTime, UserId};

/// User settings for Eventra
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Identity of the local owner; every event, invitation and reminder is
    /// stamped with it
    #[serde(default)]
    pub owner_id: UserId,

    /// Display name used as the organizer in calendar files
    #[serde(default)]
    pub owner_name: Option<String>,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Length of an event when exported to a calendar
    #[serde(default = "default_event_duration_hours")]
    pub event_duration_hours: u32,

    /// Lead time used when a reminder is added without one
    #[serde(default = "default_reminder_lead")]
    pub default_reminder_lead: LeadTime,

    /// Whether `eventra init` has been run
    #[serde(default)]
    pub setup_completed: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_event_duration_hours() -> u32 {
    2
}

fn default_reminder_lead() -> LeadTime {
    LeadTime::days(1)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            owner_id: UserId::new(),
            owner_name: None,
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            event_duration_hours: default_event_duration_hours(),
            default_reminder_lead: default_reminder_lead(),
            setup_completed: false,
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &EventraPaths) -> Result<Self, EventraError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                EventraError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let mut settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                EventraError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            if !is_valid_date_format(&settings.date_format) {
                tracing::warn!(
                    date_format = %settings.date_format,
                    "unusable date format in settings, falling back to the default"
                );
                settings.date_format = default_date_format();
            }

            Ok(settings)
        } else {
            // Not persisted until the caller saves
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &EventraPaths) -> Result<(), EventraError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            EventraError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            EventraError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }

    /// Format an amount with the configured currency symbol
    pub fn format_money(&self, amount: crate::models::Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }
}

/// Whether `format` is a strftime pattern that can render a calendar date
pub fn is_valid_date_format(format: &str) -> bool {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return false;
    }
    // Time-of-day specifiers parse but fail when rendering a date
    let mut rendered = String::new();
    write!(rendered, "{}", NaiveDate::default().format(format)).is_ok()
}
