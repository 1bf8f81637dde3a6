//! Calendar integration model
//!
//! Records that an event was pushed to (or exported for) an external calendar
//! and tracks the sync state of that copy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{CalendarIntegrationId, EventId, UserId};

/// External calendar provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarProvider {
    Google,
    Outlook,
    Apple,
    Ical,
}

impl CalendarProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Outlook => "outlook",
            Self::Apple => "apple",
            Self::Ical => "ical",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Google => "Google Calendar",
            Self::Outlook => "Outlook Calendar",
            Self::Apple => "Apple Calendar",
            Self::Ical => "iCal",
        }
    }

    /// Whether this provider is reached through a downloadable .ics file
    /// rather than a web link
    pub fn uses_ics_file(&self) -> bool {
        matches!(self, Self::Apple | Self::Ical)
    }
}

impl fmt::Display for CalendarProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for CalendarProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" | "gcal" => Ok(Self::Google),
            "outlook" => Ok(Self::Outlook),
            "apple" => Ok(Self::Apple),
            "ical" | "ics" => Ok(Self::Ical),
            other => Err(format!(
                "Unknown calendar provider '{}'. Expected google, outlook, apple or ical",
                other
            )),
        }
    }
}

/// Sync state of an event copy in an external calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    Pending,
    Synced,
    Failed,
    Removed,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Synced => "synced",
            Self::Failed => "failed",
            Self::Removed => "removed",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SyncStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "synced" => Ok(Self::Synced),
            "failed" => Ok(Self::Failed),
            "removed" => Ok(Self::Removed),
            other => Err(format!(
                "Unknown sync status '{}'. Expected pending, synced, failed or removed",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarIntegration {
    pub id: CalendarIntegrationId,

    pub event_id: EventId,

    pub owner_id: UserId,

    pub provider: CalendarProvider,

    /// Identifier of the copy in the external calendar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_event_id: Option<String>,

    #[serde(default)]
    pub sync_status: SyncStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_synced_at: Option<DateTime<Utc>>,

    /// Error text of the last failed sync
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_error: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl CalendarIntegration {
    /// New integrations start out pending
    pub fn new(event_id: EventId, owner_id: UserId, provider: CalendarProvider) -> Self {
        Self {
            id: CalendarIntegrationId::new(),
            event_id,
            owner_id,
            provider,
            external_event_id: None,
            sync_status: SyncStatus::Pending,
            last_synced_at: None,
            sync_error: None,
            created_at: Utc::now(),
        }
    }

    /// Apply a sync outcome
    ///
    /// `synced` stamps the sync time and clears any error; `failed` keeps the
    /// error text; other states leave both untouched.
    pub fn record_status(&mut self, status: SyncStatus, error: Option<String>) {
        self.sync_status = status;
        match status {
            SyncStatus::Synced => {
                self.last_synced_at = Some(Utc::now());
                self.sync_error = None;
            }
            SyncStatus::Failed => {
                self.sync_error = error.or_else(|| Some("Sync failed".to_string()));
            }
            SyncStatus::Pending | SyncStatus::Removed => {}
        }
    }
}

impl fmt::Display for CalendarIntegration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.provider, self.sync_status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_pending() {
        let integration =
            CalendarIntegration::new(EventId::new(), UserId::new(), CalendarProvider::Google);
        assert_eq!(integration.sync_status, SyncStatus::Pending);
        assert!(integration.last_synced_at.is_none());
    }

    #[test]
    fn test_record_status() {
        let mut integration =
            CalendarIntegration::new(EventId::new(), UserId::new(), CalendarProvider::Outlook);

        integration.record_status(SyncStatus::Failed, Some("token expired".into()));
        assert_eq!(integration.sync_status, SyncStatus::Failed);
        assert_eq!(integration.sync_error.as_deref(), Some("token expired"));
        assert!(integration.last_synced_at.is_none());

        integration.record_status(SyncStatus::Synced, None);
        assert!(integration.sync_error.is_none());
        assert!(integration.last_synced_at.is_some());
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!("ics".parse::<CalendarProvider>(), Ok(CalendarProvider::Ical));
        assert!(CalendarProvider::Apple.uses_ics_file());
        assert!(!CalendarProvider::Google.uses_ics_file());
        assert!("yahoo".parse::<CalendarProvider>().is_err());
    }
}
