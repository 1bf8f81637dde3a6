//! Storage initialization
//!
//! First-run setup: directories, the settings file and empty tables.

use crate::config::paths::EventraPaths;
use crate::config::settings::Settings;
use crate::error::EventraResult;

use super::Storage;

/// Initialize storage for a fresh installation
///
/// Existing settings and tables are left untouched, so running this twice is
/// harmless. Returns the settings now on disk.
pub fn initialize_storage(paths: &EventraPaths) -> EventraResult<Settings> {
    paths.ensure_directories()?;

    let mut settings = Settings::load_or_create(paths)?;
    if !paths.is_initialized() || !settings.setup_completed {
        settings.setup_completed = true;
        settings.save(paths)?;
        tracing::info!(base = %paths.base_dir().display(), "initialized eventra data directory");
    }

    // Persist empty tables for any that are missing
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;
    storage.save_all()?;

    Ok(settings)
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &EventraPaths) -> bool {
    !paths.is_initialized() || !paths.events_file().exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = EventraPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(needs_initialization(&paths));

        let settings = initialize_storage(&paths).unwrap();

        assert!(settings.setup_completed);
        assert!(!needs_initialization(&paths));
        assert!(paths.settings_file().exists());
        assert!(paths.events_file().exists());
        assert!(paths.calendar_integrations_file().exists());
    }

    #[test]
    fn test_reinitialize_keeps_owner() {
        let temp_dir = TempDir::new().unwrap();
        let paths = EventraPaths::with_base_dir(temp_dir.path().to_path_buf());

        let first = initialize_storage(&paths).unwrap();
        let second = initialize_storage(&paths).unwrap();

        assert_eq!(first.owner_id, second.owner_id);
    }
}
