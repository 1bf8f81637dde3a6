//! Change summaries for audit entries
//!
//! Compares the top-level fields of two JSON snapshots and describes what
//! changed, e.g. `status: "pending" -> "accepted", guest_count: 1 -> 2`.

use serde_json::Value;

/// Fields that change on every write and carry no information
const BOOKKEEPING_FIELDS: &[&str] = &["updated_at"];

const MAX_STRING_LEN: usize = 40;

/// Summarize the differences between two snapshots
///
/// Returns `None` when nothing meaningful changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let changes = match (before, after) {
        (Value::Object(before_obj), Value::Object(after_obj)) => {
            let mut changes = Vec::new();

            for (key, before_val) in before_obj {
                if BOOKKEEPING_FIELDS.contains(&key.as_str()) {
                    continue;
                }
                match after_obj.get(key) {
                    Some(after_val) if after_val != before_val => changes.push(format!(
                        "{}: {} -> {}",
                        key,
                        format_value(before_val),
                        format_value(after_val)
                    )),
                    Some(_) => {}
                    None => changes.push(format!("{}: {} -> (cleared)", key, format_value(before_val))),
                }
            }

            // Optional fields are skipped when empty, so a new key means it was set
            for (key, after_val) in after_obj {
                if !before_obj.contains_key(key) && !BOOKKEEPING_FIELDS.contains(&key.as_str()) {
                    changes.push(format!("{}: (unset) -> {}", key, format_value(after_val)));
                }
            }

            changes
        }
        _ if before != after => vec![format!(
            "{} -> {}",
            format_value(before),
            format_value(after)
        )],
        _ => Vec::new(),
    };

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.chars().count() > MAX_STRING_LEN => {
            let head: String = s.chars().take(MAX_STRING_LEN - 3).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}
