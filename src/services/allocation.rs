//! Budget allocation templates
//!
//! Splits an event budget into named categories using a fixed percentage
//! template per event kind. Kinds without a dedicated template (and category
//! names that are not recognised at all) use the general 70/20/10 split.

use serde::Serialize;

use crate::models::{EventCategory, Money};

/// One (name, percent) row of a template
pub type TemplateRow = (&'static str, u8);

const WEDDING: &[TemplateRow] = &[
    ("Venue", 30),
    ("Catering", 25),
    ("Photography", 12),
    ("Attire", 10),
    ("Decoration", 8),
    ("Entertainment", 8),
    ("Transportation", 3),
    ("Miscellaneous", 4),
];

const PARTY: &[TemplateRow] = &[
    ("Venue", 25),
    ("Food & Drinks", 35),
    ("Entertainment", 15),
    ("Decoration", 10),
    ("Invitations", 5),
    ("Miscellaneous", 10),
];

const TRIP: &[TemplateRow] = &[
    ("Accommodation", 35),
    ("Transportation", 25),
    ("Food", 20),
    ("Activities", 15),
    ("Miscellaneous", 5),
];

const GENERAL: &[TemplateRow] = &[
    ("Main Expenses", 70),
    ("Secondary Expenses", 20),
    ("Miscellaneous", 10),
];

/// A suggested budget line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationLine {
    pub name: &'static str,
    pub percentage: u8,
    pub amount: Money,
}

/// Template rows for an event kind, in display order
pub fn template_for(category: EventCategory) -> &'static [TemplateRow] {
    match category {
        EventCategory::Wedding => WEDDING,
        EventCategory::Party => PARTY,
        EventCategory::Trip => TRIP,
        EventCategory::Conference
        | EventCategory::Birthday
        | EventCategory::Corporate
        | EventCategory::Other => GENERAL,
    }
}

/// Template rows for a free-form category name; never fails
pub fn template_for_name(name: &str) -> &'static [TemplateRow] {
    template_for(EventCategory::from_name_lenient(name))
}

/// Split `budget` across the template for `category`
///
/// Each amount is the row's percentage of the budget, rounded to the cent.
/// A zero budget keeps the percentages and yields zero amounts.
///
/// # Examples
/// ```
/// use eventra::models::{EventCategory, Money};
/// use eventra::services::allocation::suggest_allocation;
///
/// let lines = suggest_allocation(EventCategory::Wedding, Money::from_units(5000));
/// assert_eq!(lines[0].name, "Venue");
/// assert_eq!(lines[0].amount, Money::from_units(1500));
/// ```
pub fn suggest_allocation(category: EventCategory, budget: Money) -> Vec<AllocationLine> {
    allocate(template_for(category), budget)
}

/// Same as [`suggest_allocation`] for a category given by name
pub fn suggest_allocation_for_name(name: &str, budget: Money) -> Vec<AllocationLine> {
    allocate(template_for_name(name), budget)
}

fn allocate(rows: &'static [TemplateRow], budget: Money) -> Vec<AllocationLine> {
    rows.iter()
        .map(|&(name, percentage)| AllocationLine {
            name,
            percentage,
            amount: budget.percentage(percentage),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount_of(lines: &[AllocationLine], name: &str) -> Money {
        lines.iter().find(|l| l.name == name).unwrap().amount
    }

    #[test]
    fn test_every_template_sums_to_100() {
        for category in EventCategory::all() {
            let total: u32 = template_for(*category).iter().map(|(_, p)| u32::from(*p)).sum();
            assert_eq!(total, 100, "{} template", category);
        }
    }

    #[test]
    fn test_wedding_5000() {
        let lines = suggest_allocation(EventCategory::Wedding, Money::from_units(5000));
        assert_eq!(lines.len(), 8);
        assert_eq!(amount_of(&lines, "Venue"), Money::from_units(1500));
        assert_eq!(amount_of(&lines, "Catering"), Money::from_units(1250));
        assert_eq!(amount_of(&lines, "Miscellaneous"), Money::from_units(200));

        let total: Money = lines.iter().map(|l| l.amount).sum();
        assert_eq!(total, Money::from_units(5000));
    }

    #[test]
    fn test_order_follows_template() {
        let names: Vec<_> = suggest_allocation(EventCategory::Trip, Money::from_units(100))
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(
            names,
            vec!["Accommodation", "Transportation", "Food", "Activities", "Miscellaneous"]
        );
    }

    #[test]
    fn test_unknown_name_uses_general_split() {
        let lines = suggest_allocation_for_name("hackathon", Money::from_units(1000));
        let pcts: Vec<_> = lines.iter().map(|l| l.percentage).collect();
        assert_eq!(pcts, vec![70, 20, 10]);
        assert_eq!(amount_of(&lines, "Main Expenses"), Money::from_units(700));

        assert_eq!(template_for_name("Birthday"), template_for(EventCategory::Other));
        assert_eq!(template_for_name("PARTY"), template_for(EventCategory::Party));
    }

    #[test]
    fn test_zero_budget_keeps_percentages() {
        let lines = suggest_allocation(EventCategory::Party, Money::zero());
        assert!(lines.iter().all(|l| l.amount.is_zero()));
        assert_eq!(lines[1].percentage, 35);
    }

    #[test]
    fn test_amounts_round_to_the_cent() {
        // 3% of 33.33 is 0.9999
        let lines = suggest_allocation(EventCategory::Wedding, Money::from_cents(3333));
        assert_eq!(amount_of(&lines, "Transportation"), Money::from_cents(100));
        for line in &lines {
            assert_eq!(line.amount, Money::from_cents(3333).percentage(line.percentage));
        }
    }
}
