//! Path management for Eventra
//!
//! ## Path Resolution Order
//!
//! 1. `EVENTRA_DATA_DIR` environment variable (if set)
//! 2. The platform configuration directory joined with `eventra`
//!    (`~/.config/eventra` on Linux, `%APPDATA%\eventra` on Windows)

use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::EventraError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "EVENTRA_DATA_DIR";

/// Manages all paths used by Eventra
#[derive(Debug, Clone)]
pub struct EventraPaths {
    base_dir: PathBuf,
}

impl EventraPaths {
    /// Resolve the base directory from the environment or the platform default
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, EventraError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create EventraPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (one JSON file per table)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the default export directory
    pub fn export_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    pub fn events_file(&self) -> PathBuf {
        self.data_dir().join("events.json")
    }

    pub fn budget_categories_file(&self) -> PathBuf {
        self.data_dir().join("budget_categories.json")
    }

    pub fn expenses_file(&self) -> PathBuf {
        self.data_dir().join("expenses.json")
    }

    pub fn invitations_file(&self) -> PathBuf {
        self.data_dir().join("invitations.json")
    }

    pub fn reminders_file(&self) -> PathBuf {
        self.data_dir().join("reminders.json")
    }

    pub fn calendar_integrations_file(&self) -> PathBuf {
        self.data_dir().join("calendar_integrations.json")
    }

    /// Ensure the base, data and export directories exist
    pub fn ensure_directories(&self) -> Result<(), EventraError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| EventraError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| EventraError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.export_dir())
            .map_err(|e| EventraError::Io(format!("Failed to create export directory: {}", e)))?;

        Ok(())
    }

    /// Check if Eventra has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, EventraError> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| EventraError::Config("Could not determine home directory".into()))?;
    Ok(dirs.config_dir().join("eventra"))
}
