//! Display formatting for the records attached to an event

use crate::models::{BudgetCategory, CalendarIntegration, Expense, Invitation, Reminder};

use super::truncate;

/// Format expenses as a register, resolving category names from `categories`
pub fn format_expense_list(expenses: &[Expense], categories: &[BudgetCategory]) -> String {
    if expenses.is_empty() {
        return "No expenses recorded.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12} {:<10} {:<28} {:<18} {:>12}\n",
        "ID", "Date", "Description", "Category", "Amount"
    ));
    output.push_str(&"-".repeat(84));
    output.push('\n');

    for expense in expenses {
        let category = expense
            .category_id
            .and_then(|id| categories.iter().find(|c| c.id == id))
            .map(|c| c.name.as_str())
            .unwrap_or("(uncategorized)");
        let receipt = if expense.receipt_url.is_some() { " R" } else { "" };

        output.push_str(&format!(
            "{:<12} {:<10} {:<28} {:<18} {:>12}{}\n",
            expense.id.to_string(),
            expense.date.format("%Y-%m-%d").to_string(),
            truncate(&expense.description, 28),
            truncate(category, 18),
            expense.amount,
            receipt
        ));
    }

    let total: crate::models::Money = expenses.iter().map(|e| e.amount).sum();
    output.push_str(&"-".repeat(84));
    output.push('\n');
    output.push_str(&format!("{:<71} {:>12}\n", "TOTAL", total));

    output
}

/// Format invitations with their RSVP state
pub fn format_invitation_list(invitations: &[Invitation]) -> String {
    if invitations.is_empty() {
        return "No invitations sent.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12} {:<30} {:<10} {:>6}  {}\n",
        "ID", "Invitee", "Status", "Guests", "Notes"
    ));
    output.push_str(&"-".repeat(76));
    output.push('\n');

    for invitation in invitations {
        let invitee = match &invitation.invitee_name {
            Some(name) => format!("{} <{}>", name, invitation.invitee_email),
            None => invitation.invitee_email.clone(),
        };
        let notes: Vec<&str> = [
            invitation.dietary_restrictions.as_deref(),
            invitation.special_requests.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();

        output.push_str(&format!(
            "{:<12} {:<30} {:<10} {:>6}  {}\n",
            invitation.id.to_string(),
            truncate(&invitee, 30),
            invitation.status.as_str(),
            invitation.guest_count,
            notes.join("; ")
        ));
    }

    output
}

pub fn format_reminder_list(reminders: &[Reminder]) -> String {
    if reminders.is_empty() {
        return "No reminders set.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12} {:<6} {:<12} {:<17} {:<6} {}\n",
        "ID", "Via", "Before", "Fires at (UTC)", "Sent", "Message"
    ));
    output.push_str(&"-".repeat(76));
    output.push('\n');

    for reminder in reminders {
        let fires_at = reminder
            .scheduled_for
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        output.push_str(&format!(
            "{:<12} {:<6} {:<12} {:<17} {:<6} {}\n",
            reminder.id.to_string(),
            reminder.channel.as_str(),
            reminder.lead_time.to_string(),
            fires_at,
            if reminder.is_sent { "yes" } else { "no" },
            reminder.message.as_deref().unwrap_or("")
        ));
    }

    output
}

pub fn format_integration_list(integrations: &[CalendarIntegration]) -> String {
    if integrations.is_empty() {
        return "No calendars linked.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12} {:<18} {:<8} {:<17} {}\n",
        "ID", "Provider", "Status", "Last synced", "Error"
    ));
    output.push_str(&"-".repeat(70));
    output.push('\n');

    for integration in integrations {
        let synced = integration
            .last_synced_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());
        output.push_str(&format!(
            "{:<12} {:<18} {:<8} {:<17} {}\n",
            integration.id.to_string(),
            integration.provider.label(),
            integration.sync_status.as_str(),
            synced,
            integration.sync_error.as_deref().unwrap_or("")
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CalendarProvider, EventId, LeadTime, Money, ReminderChannel, RsvpStatus, SyncStatus,
        UserId,
    };
    use chrono::NaiveDate;

    #[test]
    fn test_expense_list_resolves_categories() {
        let event_id = EventId::new();
        let category = BudgetCategory::new(event_id, "Catering", 25, Money::from_units(250), 0);
        let date = NaiveDate::from_ymd_opt(2026, 4, 2).unwrap();
        let expenses = vec![
            Expense::new(event_id, "Canapes", Money::from_units(120), date).with_category(category.id),
            Expense::new(event_id, "Parking", Money::from_cents(850), date),
        ];

        let output = format_expense_list(&expenses, &[category]);
        assert!(output.contains("Catering"));
        assert!(output.contains("(uncategorized)"));
        assert!(output.contains("$128.50"));
    }

    #[test]
    fn test_invitation_list_shows_notes() {
        let mut invitation = Invitation::new(EventId::new(), "ana@example.com", UserId::new(), 2);
        invitation.invitee_name = Some("Ana".into());
        invitation.dietary_restrictions = Some("vegan".into());
        invitation.respond(RsvpStatus::Accepted);

        let output = format_invitation_list(&[invitation]);
        assert!(output.contains("Ana <ana@example.com>"));
        assert!(output.contains("accepted"));
        assert!(output.contains("vegan"));
    }

    #[test]
    fn test_reminders_and_integrations() {
        let event_id = EventId::new();
        let start = NaiveDate::from_ymd_opt(2026, 4, 2)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap();
        let reminder = Reminder::new(
            event_id,
            UserId::new(),
            ReminderChannel::Email,
            LeadTime::hours(2),
            start,
        );
        assert!(format_reminder_list(&[reminder]).contains("2026-04-02 16:00"));

        let mut integration =
            CalendarIntegration::new(event_id, UserId::new(), CalendarProvider::Google);
        integration.record_status(SyncStatus::Failed, Some("token expired".into()));
        let output = format_integration_list(&[integration]);
        assert!(output.contains("failed"));
        assert!(output.contains("token expired"));
        assert!(output.contains("never"));
    }

    #[test]
    fn test_empty_lists() {
        assert_eq!(format_expense_list(&[], &[]), "No expenses recorded.\n");
        assert_eq!(format_reminder_list(&[]), "No reminders set.\n");
    }
}
