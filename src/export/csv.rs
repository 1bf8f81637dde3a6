//! CSV Export functionality
//!
//! Writes one event's expenses in a spreadsheet-friendly layout.

use std::collections::HashMap;
use std::io::Write;

use crate::error::EventraResult;
use crate::models::EventId;
use crate::storage::Storage;

/// Export an event's expenses to CSV, oldest first
pub fn export_expenses_csv<W: Write>(
    storage: &Storage,
    event_id: EventId,
    writer: W,
) -> EventraResult<usize> {
    let category_names: HashMap<_, _> = storage
        .budget_categories
        .get_by_event(event_id)?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    let expenses = storage.expenses.get_by_event(event_id)?;

    let mut csv_writer = ::csv::Writer::from_writer(writer);
    csv_writer.write_record(["ID", "Date", "Description", "Category", "Amount", "Receipt URL"])?;

    for expense in &expenses {
        let category = expense
            .category_id
            .and_then(|id| category_names.get(&id))
            .map(String::as_str)
            .unwrap_or("");
        let amount = format!("{:.2}", expense.amount.cents() as f64 / 100.0);

        csv_writer.write_record([
            expense.id.as_uuid().to_string().as_str(),
            expense.date.to_string().as_str(),
            expense.description.as_str(),
            category,
            amount.as_str(),
            expense.receipt_url.as_deref().unwrap_or(""),
        ])?;
    }

    csv_writer.flush()?;
    Ok(expenses.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::EventraPaths;
    use crate::models::{EventCategory, EventDraft, Money, UserId};
    use crate::services::{EventService, ExpenseService, NewExpense};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_expenses_csv() {
        let temp_dir = TempDir::new().unwrap();
        let paths = EventraPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        let date = NaiveDate::from_ymd_opt(2026, 10, 3).unwrap();
        let draft = EventDraft::new(
            "Book Launch",
            EventCategory::Conference,
            date,
            "Library",
            Money::from_units(1000),
            60,
        );
        let (event, categories) = EventService::new(&storage).create(draft, UserId::new()).unwrap();
        let expenses = ExpenseService::new(&storage);
        expenses
            .add(
                event.id,
                NewExpense {
                    description: "Wine, cheese".into(),
                    amount: Money::from_cents(12550),
                    date,
                    category_id: Some(categories[0].id),
                    receipt_url: Some("https://receipts.example.com/42".into()),
                },
            )
            .unwrap();

        let mut output = Vec::new();
        let count = export_expenses_csv(&storage, event.id, &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();

        assert_eq!(count, 1);
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("ID,Date,Description,Category,Amount,Receipt URL")
        );
        let row = lines.next().unwrap();
        assert!(row.contains("\"Wine, cheese\""));
        assert!(row.contains("Main Expenses"));
        assert!(row.contains("125.50"));
        assert!(row.ends_with("https://receipts.example.com/42"));
    }
}
