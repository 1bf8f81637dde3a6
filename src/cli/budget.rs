//! Budget CLI commands
//!
//! Budget categories are created with their event; these commands show
//! progress against them, preview templates and adjust individual shares.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_allocation;
use crate::error::EventraResult;
use crate::reports::BudgetProgressReport;
use crate::services::{suggest_allocation_for_name, BudgetService, EventService};
use crate::storage::Storage;

use super::parse_money;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Show spending against each budget category
    Show {
        /// Event title or ID
        event: String,
    },
    /// Preview the allocation template for a category without saving anything
    Suggest {
        /// Event category (unknown names use the general template)
        category: String,
        /// Total budget
        budget: String,
    },
    /// Rename a budget category or change its share
    Edit {
        /// Event title or ID
        event: String,
        /// Budget category name or ID
        category: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New share of the event budget, in percent
        #[arg(short, long)]
        percent: Option<u8>,
    },
    /// Delete a budget category; its expenses become uncategorized
    Delete {
        /// Event title or ID
        event: String,
        /// Budget category name or ID
        category: String,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> EventraResult<()> {
    let events = EventService::new(storage);
    let service = BudgetService::new(storage);

    match cmd {
        BudgetCommands::Show { event } => {
            let event = events.require(&event)?;
            let report = BudgetProgressReport::generate(storage, &event)?;
            print!("{}", report.format_terminal());

            let allocated = service.allocated_percentage(event.id)?;
            if allocated != 100 {
                println!();
                println!("Note: budget categories add up to {}% of the budget", allocated);
            }
        }

        BudgetCommands::Suggest { category, budget } => {
            let budget = parse_money(&budget)?;
            let lines = suggest_allocation_for_name(&category, budget);
            println!("Suggested allocation of {}:", settings.format_money(budget));
            print!("{}", format_allocation(&lines));
        }

        BudgetCommands::Edit {
            event,
            category,
            name,
            percent,
        } => {
            let event = events.require(&event)?;
            let found = service.require(event.id, &category)?;

            if name.is_none() && percent.is_none() {
                println!("No changes specified. Use --name or --percent.");
                return Ok(());
            }

            let updated = service.update(found.id, name.as_deref(), percent)?;
            println!(
                "Updated budget category: {} ({}%, {})",
                updated.name,
                updated.percentage,
                settings.format_money(updated.amount)
            );

            let allocated = service.allocated_percentage(event.id)?;
            if allocated != 100 {
                println!("Warning: budget categories now add up to {}%", allocated);
            }
        }

        BudgetCommands::Delete { event, category } => {
            let event = events.require(&event)?;
            let found = service.require(event.id, &category)?;
            let deleted = service.delete(found.id)?;
            println!("Deleted budget category: {}", deleted.name);
        }
    }

    Ok(())
}
