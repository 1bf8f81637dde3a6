//! YAML Export functionality
//!
//! Same document as the JSON export, in human-readable form.

use std::io::Write;

use crate::error::{EventraError, EventraResult};
use crate::export::json::FullExport;
use crate::storage::Storage;

/// Export the full database to YAML format
pub fn export_full_yaml<W: Write + ?Sized>(storage: &Storage, writer: &mut W) -> EventraResult<()> {
    let export = FullExport::from_storage(storage)?;
    let to_export_error = |e: std::io::Error| EventraError::Export(e.to_string());

    writeln!(writer, "# Eventra Full Export").map_err(to_export_error)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(to_export_error)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(to_export_error)?;
    writeln!(writer).map_err(to_export_error)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| EventraError::Export(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::EventraPaths;
    use crate::models::{EventCategory, EventDraft, Money, UserId};
    use crate::services::EventService;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_yaml_export() {
        let temp_dir = TempDir::new().unwrap();
        let paths = EventraPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        let draft = EventDraft::new(
            "Ski Week",
            EventCategory::Trip,
            NaiveDate::from_ymd_opt(2027, 1, 20).unwrap(),
            "Alps",
            Money::from_units(3000),
            4,
        );
        EventService::new(&storage).create(draft, UserId::new()).unwrap();

        let mut output = Vec::new();
        export_full_yaml(&storage, &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();

        assert!(text.starts_with("# Eventra Full Export"));
        assert!(text.contains("schema_version:"));
        assert!(text.contains("title: Ski Week"));

        let parsed: FullExport = serde_yaml::from_str(&text).unwrap();
        assert_eq!(parsed.budget_categories.len(), 5);
    }
}
