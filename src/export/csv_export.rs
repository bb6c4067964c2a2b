use anyhow::{Context, Result};
use std::path::Path;

use crate::models::{round_cents, Expense};

const HEADER: [&str; 6] = ["Date", "Name", "Category", "Amount", "Notes", "Id"];

/// Write one row per expense, in the order given. Returns the row count.
pub(crate) fn export_to_csv(expenses: &[Expense], path: &Path) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    wtr.write_record(HEADER)
        .context("Failed to write CSV header")?;
    for expense in expenses {
        let amount = format!("{:.2}", round_cents(expense.amount));
        wtr.write_record([
            expense.date.as_str(),
            expense.name.as_str(),
            expense.category.as_str(),
            amount.as_str(),
            expense.notes.as_deref().unwrap_or(""),
            expense.id.as_str(),
        ])
        .with_context(|| format!("Failed to write expense {}", expense.id))?;
    }
    wtr.flush().context("Failed to flush CSV file")?;

    tracing::info!(rows = expenses.len(), path = %path.display(), "exported expenses");
    Ok(expenses.len())
}

/// `~/expensedash-export-<month|all>.csv`
pub(crate) fn default_export_path(month: Option<&str>) -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
    let suffix = month.unwrap_or("all");
    format!("{home}/expensedash-export-{suffix}.csv")
}

#[cfg(test)]
#[path = "csv_export_tests.rs"]
mod tests;
