//! Audit logging for Eventra
//!
//! Every create, update and delete made through a service is appended to
//! `audit.log` with before/after snapshots of the record.
//!
//! - `AuditEntry`: one logged operation
//! - `AuditLogger`: appends entries as JSON lines and reads them back
//! - `generate_diff`: short change summary for updates

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
