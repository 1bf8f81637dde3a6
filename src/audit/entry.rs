//! Audit entry data structures
//!
//! One entry per create, update or delete, carrying JSON snapshots of the
//! record on either side of the change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Entity was created
    Create,
    /// Entity was updated
    Update,
    /// Entity was deleted
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// Kinds of record that are audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Event,
    BudgetCategory,
    Expense,
    Invitation,
    Reminder,
    CalendarIntegration,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityType::Event => "Event",
            EntityType::BudgetCategory => "BudgetCategory",
            EntityType::Expense => "Expense",
            EntityType::Invitation => "Invitation",
            EntityType::Reminder => "Reminder",
            EntityType::CalendarIntegration => "CalendarIntegration",
        };
        f.write_str(name)
    }
}

/// A single audit log entry
///
/// Records a single operation on an entity with optional before/after values
/// for tracking changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    /// Type of operation performed
    pub operation: Operation,

    /// Type of entity affected
    pub entity_type: EntityType,

    /// ID of the affected entity
    pub entity_id: String,

    /// Human-readable label (event title, invitee email, expense description)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    /// JSON representation of the entity before the operation (for updates/deletes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    /// JSON representation of the entity after the operation (for creates/updates)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Human-readable diff summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    /// Create a new audit entry for a create operation
    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Create,
            entity_type,
            entity_id: entity_id.into(),
            entity_name,
            before: None,
            after: serde_json::to_value(entity).ok(),
            diff_summary: None,
        }
    }

    /// Create a new audit entry for an update operation
    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Update,
            entity_type,
            entity_id: entity_id.into(),
            entity_name,
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
            diff_summary,
        }
    }

    /// Create a new audit entry for a delete operation
    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Delete,
            entity_type,
            entity_id: entity_id.into(),
            entity_name,
            before: serde_json::to_value(entity).ok(),
            after: None,
            diff_summary: None,
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Create.to_string(), "CREATE");
        assert_eq!(Operation::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_entity_type_serialization() {
        assert_eq!(EntityType::CalendarIntegration.to_string(), "CalendarIntegration");
        let json = serde_json::to_string(&EntityType::BudgetCategory).unwrap();
        assert_eq!(json, "\"budget_category\"");
    }

    #[test]
    fn test_create_update_delete_snapshots() {
        let before = json!({"title": "Launch", "guest_count": 10});
        let after = json!({"title": "Launch", "guest_count": 25});

        let created = AuditEntry::create(EntityType::Event, "evt-1a2b3c4d", None, &after);
        assert!(created.before.is_none());
        assert!(created.after.is_some());

        let updated = AuditEntry::update(
            EntityType::Event,
            "evt-1a2b3c4d",
            Some("Launch".into()),
            &before,
            &after,
            Some("guest_count: 10 -> 25".into()),
        );
        assert_eq!(updated.operation, Operation::Update);
        assert!(updated.before.is_some() && updated.after.is_some());

        let deleted = AuditEntry::delete(EntityType::Event, "evt-1a2b3c4d", None, &before);
        assert!(deleted.before.is_some());
        assert!(deleted.after.is_none());
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::update(
            EntityType::Invitation,
            "inv-0f0f0f0f",
            Some("sam@example.com".into()),
            &json!({"status": "pending"}),
            &json!({"status": "accepted"}),
            Some("status: \"pending\" -> \"accepted\"".into()),
        );

        let formatted = entry.format_human_readable();
        assert!(formatted.contains("UPDATE Invitation inv-0f0f0f0f (sam@example.com)"));
        assert!(formatted.contains("Changes: status"));
    }
}
