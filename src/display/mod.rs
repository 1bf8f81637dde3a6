//! Display formatting for terminal output
//!
//! Provides utilities for formatting data models for terminal display as
//! tables and detail views.

pub mod event;
pub mod records;

pub use event::{format_allocation, format_event_details, format_event_list};
pub use records::{
    format_expense_list, format_integration_list, format_invitation_list, format_reminder_list,
};

/// Shorten `s` to at most `max` characters, marking the cut with "..."
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a much longer title", 10), "a much ...");
        assert_eq!(truncate("café au lait", 7), "café...");
    }
}
