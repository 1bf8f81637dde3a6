//! Expense CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_expense_list;
use crate::error::EventraResult;
use crate::services::{BudgetService, EventService, ExpenseService, ExpenseUpdate, NewExpense};
use crate::storage::Storage;

use super::{parse_date, parse_money, today};

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense for an event
    Add {
        /// Event title or ID
        event: String,
        /// What the money was spent on
        description: String,
        /// Amount (e.g., "250" or "249.99")
        amount: String,
        /// Budget category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Date of the expense (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
        /// Link to the receipt
        #[arg(short, long)]
        receipt: Option<String>,
    },
    /// List an event's expenses
    List {
        /// Event title or ID
        event: String,
        /// Only show expenses in this budget category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Edit an expense
    Edit {
        /// Expense ID
        expense: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        /// Budget category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Remove the budget category
        #[arg(long, conflicts_with = "category")]
        uncategorize: bool,
        #[arg(short, long)]
        receipt: Option<String>,
        #[arg(long, conflicts_with = "receipt")]
        clear_receipt: bool,
    },
    /// Delete an expense
    Delete {
        /// Expense ID
        expense: String,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> EventraResult<()> {
    let events = EventService::new(storage);
    let budget = BudgetService::new(storage);
    let service = ExpenseService::new(storage);

    match cmd {
        ExpenseCommands::Add {
            event,
            description,
            amount,
            category,
            date,
            receipt,
        } => {
            let event = events.require(&event)?;
            let category_id = match category {
                Some(name) => Some(budget.require(event.id, &name)?.id),
                None => None,
            };

            let expense = service.add(
                event.id,
                NewExpense {
                    description,
                    amount: parse_money(&amount)?,
                    date: date.as_deref().map(parse_date).transpose()?.unwrap_or_else(today),
                    category_id,
                    receipt_url: receipt,
                },
            )?;

            println!(
                "Recorded expense: {} ({})",
                expense.description,
                settings.format_money(expense.amount)
            );
            println!("  ID: {}", expense.id);

            let spent = service.total_spent(event.id)?;
            if spent > event.budget {
                println!(
                    "Warning: '{}' is over budget by {}",
                    event.title,
                    settings.format_money(spent - event.budget)
                );
            }
        }

        ExpenseCommands::List { event, category } => {
            let event = events.require(&event)?;
            let categories = budget.list_for_event(event.id)?;
            let expenses = match category {
                Some(name) => service.list_for_category(budget.require(event.id, &name)?.id)?,
                None => service.list_for_event(event.id)?,
            };
            print!("{}", format_expense_list(&expenses, &categories));
        }

        ExpenseCommands::Edit {
            expense,
            description,
            amount,
            date,
            category,
            uncategorize,
            receipt,
            clear_receipt,
        } => {
            let found = service.require(&expense)?;

            let category_id = if uncategorize {
                Some(None)
            } else {
                match category {
                    Some(name) => Some(Some(budget.require(found.event_id, &name)?.id)),
                    None => None,
                }
            };

            let changes = ExpenseUpdate {
                description,
                amount: amount.as_deref().map(parse_money).transpose()?,
                date: date.as_deref().map(parse_date).transpose()?,
                category_id,
                receipt_url: if clear_receipt { Some(None) } else { receipt.map(Some) },
            };

            let updated = service.update(found.id, changes)?;
            println!(
                "Updated expense: {} ({})",
                updated.description,
                settings.format_money(updated.amount)
            );
        }

        ExpenseCommands::Delete { expense } => {
            let found = service.require(&expense)?;
            let deleted = service.delete(found.id)?;
            println!(
                "Deleted expense: {} ({})",
                deleted.description,
                settings.format_money(deleted.amount)
            );
        }
    }

    Ok(())
}
