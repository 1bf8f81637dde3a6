//! Append-only audit log
//!
//! The log is line-delimited JSON: one `AuditEntry` per line, flushed as
//! soon as it is written.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{EventraError, EventraResult};

use super::entry::{AuditEntry, EntityType};

pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append an entry
    pub fn log(&self, entry: &AuditEntry) -> EventraResult<()> {
        let json = serde_json::to_string(entry)
            .map_err(|e| EventraError::Json(format!("Failed to serialize audit entry: {}", e)))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| EventraError::Io(format!("Failed to open audit log: {}", e)))?;

        writeln!(file, "{}", json)
            .and_then(|_| file.flush())
            .map_err(|e| EventraError::Io(format!("Failed to write audit entry: {}", e)))?;

        tracing::trace!(
            operation = %entry.operation,
            entity = %entry.entity_type,
            id = %entry.entity_id,
            "audit entry written"
        );
        Ok(())
    }

    /// All entries, oldest first
    pub fn read_all(&self) -> EventraResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| EventraError::Io(format!("Failed to open audit log: {}", e)))?;

        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                EventraError::Io(format!("Failed to read audit log line {}: {}", index + 1, e))
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let entry = serde_json::from_str(&line).map_err(|e| {
                EventraError::Json(format!(
                    "Failed to parse audit entry at line {}: {}",
                    index + 1,
                    e
                ))
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// The newest `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> EventraResult<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        let start = entries.len().saturating_sub(count);
        Ok(entries.split_off(start))
    }

    /// Entries of one kind, optionally narrowed to one entity id
    pub fn read_for(
        &self,
        entity_type: EntityType,
        entity_id: Option<&str>,
    ) -> EventraResult<Vec<AuditEntry>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|e| e.entity_type == entity_type)
            .filter(|e| entity_id.map_or(true, |id| e.entity_id == id))
            .collect())
    }

    pub fn entry_count(&self) -> EventraResult<usize> {
        Ok(self.read_all()?.len())
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::Operation;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_logger() -> (AuditLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        (logger, temp_dir)
    }

    fn expense_entry(i: usize) -> AuditEntry {
        AuditEntry::create(
            EntityType::Expense,
            format!("exp-{}", i),
            Some(format!("Expense {}", i)),
            &json!({"amount": i * 100}),
        )
    }

    #[test]
    fn test_empty_log() {
        let (logger, _temp) = create_test_logger();
        assert_eq!(logger.entry_count().unwrap(), 0);
        assert!(logger.read_recent(5).unwrap().is_empty());
    }

    #[test]
    fn test_log_and_read_recent() {
        let (logger, _temp) = create_test_logger();
        for i in 0..6 {
            logger.log(&expense_entry(i)).unwrap();
        }

        assert_eq!(logger.entry_count().unwrap(), 6);
        let recent = logger.read_recent(2).unwrap();
        let ids: Vec<_> = recent.iter().map(|e| e.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["exp-4", "exp-5"]);
    }

    #[test]
    fn test_read_for_entity() {
        let (logger, _temp) = create_test_logger();
        logger.log(&expense_entry(1)).unwrap();
        logger
            .log(&AuditEntry::delete(
                EntityType::Reminder,
                "rem-1",
                None,
                &json!({"channel": "email"}),
            ))
            .unwrap();

        let reminders = logger.read_for(EntityType::Reminder, None).unwrap();
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].operation, Operation::Delete);

        assert!(logger
            .read_for(EntityType::Expense, Some("exp-9"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_reopen_reads_existing_entries() {
        let (logger, temp) = create_test_logger();
        logger.log(&expense_entry(1)).unwrap();

        let reopened = AuditLogger::new(temp.path().join("audit.log"));
        assert_eq!(reopened.read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_corrupt_line_reports_position() {
        let (logger, _temp) = create_test_logger();
        logger.log(&expense_entry(1)).unwrap();
        std::fs::OpenOptions::new()
            .append(true)
            .open(logger.path())
            .unwrap()
            .write_all(b"{oops\n")
            .unwrap();

        let err = logger.read_all().unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
