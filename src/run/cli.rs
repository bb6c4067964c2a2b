use anyhow::{Context, Result};

use crate::aggregate::{
    compute_budget_insights, compute_summary, expenses_in_month, filter_and_sort_expenses,
    month_label, CategoryFilter, SortDirection, SortKey, SortState,
};
use crate::ledger::{coerce_limit, BudgetEditor, ExpenseDraft, Ledger};
use crate::models::{parse_date, ExpenseCategory};
use crate::ui::util::{format_amount, format_percent, progress_bar, truncate};

pub(crate) fn as_cli(args: &[String], ledger: &mut Ledger) -> Result<()> {
    for key in ledger.backups() {
        eprintln!("Warning: unreadable stored data kept under '{key}'");
    }
    let rest = &args[2..];
    match args[1].as_str() {
        "add" | "a" => cli_add(rest, ledger),
        "list" | "ls" => cli_list(rest, ledger),
        "delete" | "rm" => cli_delete(rest, ledger),
        "months" => cli_months(ledger),
        "summary" | "s" => cli_summary(rest, ledger),
        "budgets" => cli_budgets(rest, ledger),
        "budget" => cli_budget(rest, ledger),
        "unbudget" => cli_unbudget(rest, ledger),
        "export" => cli_export(rest, ledger),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("expensedash {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("ExpenseDash - local personal expense and budget tracker");
    println!();
    println!("Usage: expensedash [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  add <name> <amount>           Record an expense");
    println!("    --category <C>              Category (default: Other)");
    println!("    --date <YYYY-MM-DD>         Date (default: today)");
    println!("    --notes <text>              Free-form notes");
    println!("  list                          List expenses, newest first");
    println!("    --search <text>             Match name or notes");
    println!("    --category <C>              Only this category");
    println!("    --sort <date|amount|name>   Sort key");
    println!("    --asc, --desc               Sort direction (default: desc)");
    println!("    --month <YYYY-MM>           Only this month");
    println!("  delete <id>                   Delete an expense by id or id prefix");
    println!("  months                        Spending grouped by month");
    println!("  summary [YYYY-MM]             Totals and budget progress");
    println!("  budgets [YYYY-MM]             Budget usage per category");
    println!("  budget <category> <limit>     Set a monthly budget");
    println!("  unbudget <category>           Remove a budget");
    println!("  export [path]                 Export expenses to CSV");
    println!("    --month <YYYY-MM>           Month to export (default: all)");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
    println!();
    println!("Categories: {}", category_list());
}

// ── Argument helpers ─────────────────────────────────────────

/// Flags that take a value; everything else starting with `--` is a switch.
const VALUE_FLAGS: &[&str] = &["--category", "--date", "--notes", "--search", "--sort", "--month"];

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// Arguments that are neither flags nor flag values.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            iter.next();
        } else if !arg.starts_with("--") {
            out.push(arg.as_str());
        }
    }
    out
}

fn parse_category(name: &str) -> Result<ExpenseCategory> {
    ExpenseCategory::parse(name)
        .with_context(|| format!("Unknown category '{name}'. Choose from: {}", category_list()))
}

fn parse_month(month: &str) -> Result<String> {
    chrono::NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
        .map(|d| d.format("%Y-%m").to_string())
        .map_err(|_| anyhow::anyhow!("Invalid month '{month}'. Use YYYY-MM (e.g. 2024-01)"))
}

fn category_list() -> String {
    ExpenseCategory::all()
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build an expense draft from `add` arguments. A multi-word name is
/// everything before the last positional, which is the amount.
fn parse_add(args: &[String]) -> Result<ExpenseDraft> {
    let words = positionals(args);
    let Some((amount, name)) = words.split_last() else {
        anyhow::bail!("Usage: expensedash add <name> <amount> [--category C] [--date D] [--notes N]");
    };
    if name.is_empty() {
        anyhow::bail!("Usage: expensedash add <name> <amount> [--category C] [--date D] [--notes N]");
    }

    let mut draft = ExpenseDraft {
        name: name.join(" "),
        amount: (*amount).to_string(),
        ..ExpenseDraft::default()
    };
    if let Some(c) = flag_value(args, "--category") {
        draft.category = parse_category(c)?;
    }
    if let Some(d) = flag_value(args, "--date") {
        if parse_date(d).is_none() {
            anyhow::bail!("Invalid date '{d}'. Use YYYY-MM-DD");
        }
        draft.date = d.to_string();
    }
    if let Some(n) = flag_value(args, "--notes") {
        draft.notes = n.to_string();
    }
    Ok(draft)
}

fn parse_sort(args: &[String]) -> Result<SortState> {
    let mut sort = SortState::default();
    if let Some(k) = flag_value(args, "--sort") {
        sort.key = SortKey::parse(k)
            .with_context(|| format!("Unknown sort key '{k}'. Use date, amount or name"))?;
    }
    if has_flag(args, "--asc") {
        sort.direction = SortDirection::Asc;
    } else if has_flag(args, "--desc") {
        sort.direction = SortDirection::Desc;
    }
    Ok(sort)
}

// ── Commands ─────────────────────────────────────────────────

fn cli_add(args: &[String], ledger: &mut Ledger) -> Result<()> {
    let mut draft = parse_add(args)?;
    let expense = draft.submit()?;
    let id: String = expense.id.chars().take(8).collect();
    let msg = format!(
        "Added {} {} ({}) on {} [{id}]",
        expense.name,
        format_amount(expense.amount),
        expense.category,
        expense.date
    );
    ledger.add_expense(expense)?;
    println!("{msg}");
    Ok(())
}

fn cli_list(args: &[String], ledger: &Ledger) -> Result<()> {
    let month = flag_value(args, "--month").map(parse_month).transpose()?;
    let filter = match flag_value(args, "--category") {
        Some(c) => CategoryFilter::Only(parse_category(c)?),
        None => CategoryFilter::All,
    };
    let sort = parse_sort(args)?;
    let search = flag_value(args, "--search").unwrap_or("");

    let scoped = expenses_in_month(ledger.expenses(), month.as_deref());
    let rows = filter_and_sort_expenses(&scoped, search, filter, sort.key, sort.direction);
    if rows.is_empty() {
        println!("No expenses match your filters");
        return Ok(());
    }

    println!(
        "{:<10} {:<10} {:<28} {:<14} {:>12}",
        "ID", "Date", "Name", "Category", "Amount"
    );
    println!("{}", "─".repeat(78));
    for e in &rows {
        let id: String = e.id.chars().take(8).collect();
        println!(
            "{:<10} {:<10} {:<28} {:<14} {:>12}",
            id,
            truncate(&e.date, 10),
            truncate(&e.name, 28),
            e.category.as_str(),
            format_amount(e.amount)
        );
    }
    let total: rust_decimal::Decimal = rows.iter().map(|e| e.amount).sum();
    println!("{}", "─".repeat(78));
    println!("{} expenses, {} total", rows.len(), format_amount(total));
    Ok(())
}

fn cli_delete(args: &[String], ledger: &mut Ledger) -> Result<()> {
    let Some(key) = positionals(args).first().copied() else {
        anyhow::bail!("Usage: expensedash delete <id-or-prefix>");
    };
    let id = ledger
        .find_expense(key)
        .map(|e| e.id.clone())
        .with_context(|| format!("No single expense matches '{key}'"))?;
    if let Some(removed) = ledger.remove_expense(&id)? {
        println!(
            "Deleted {} {} ({})",
            removed.name,
            format_amount(removed.amount),
            removed.date
        );
    }
    Ok(())
}

fn cli_months(ledger: &Ledger) -> Result<()> {
    let groups = ledger.month_groups();
    if groups.is_empty() {
        println!("No expenses yet");
        return Ok(());
    }
    for group in &groups {
        println!(
            "{:<20} {:>4} expenses {:>14}",
            group.label(),
            group.items.len(),
            format_amount(group.total())
        );
    }
    Ok(())
}

fn cli_summary(args: &[String], ledger: &Ledger) -> Result<()> {
    let month = positionals(args).first().map(|m| parse_month(m)).transpose()?;
    let scoped;
    let summary = match month.as_deref() {
        None => ledger.summary(),
        Some(m) => {
            scoped = expenses_in_month(ledger.expenses(), Some(m));
            compute_summary(&scoped, ledger.budgets())
        }
    };
    let title = month
        .as_deref()
        .map(month_label)
        .unwrap_or_else(|| "All time".into());

    println!("ExpenseDash - {title}");
    println!("{}", "─".repeat(40));
    println!("  Total spent:  {}", format_amount(summary.total_spent));
    println!("  Expenses:     {}", summary.expense_count);
    match summary.largest_expense {
        Some(e) => println!("  Largest:      {} ({})", e.name, format_amount(e.amount)),
        None => println!("  Largest:      --"),
    }
    println!("  Planned:      {}", format_amount(summary.planned_total));
    println!("  Remaining:    {}", format_amount(summary.total_remaining));
    println!("  Utilization:  {}", format_percent(summary.overall_percent()));
    println!("  Budgets:      {}", summary.budget_count);
    Ok(())
}

fn cli_budgets(args: &[String], ledger: &Ledger) -> Result<()> {
    if ledger.budgets().is_empty() {
        println!("No budgets. Add one with: expensedash budget <category> <limit>");
        return Ok(());
    }
    let month = positionals(args).first().map(|m| parse_month(m)).transpose()?;
    let scoped = expenses_in_month(ledger.expenses(), month.as_deref());
    let insights = compute_budget_insights(ledger.budgets(), &scoped);
    for i in &insights {
        println!(
            "{:<14} {} {:>4}%  {} of {} ({} left)",
            i.category.as_str(),
            progress_bar(i.utilization, 20),
            i.percent(),
            format_amount(i.spent),
            format_amount(i.monthly_limit),
            format_amount(i.remaining)
        );
    }
    Ok(())
}

fn cli_budget(args: &[String], ledger: &mut Ledger) -> Result<()> {
    let words = positionals(args);
    let [category, limit] = words.as_slice() else {
        anyhow::bail!("Usage: expensedash budget <category> <limit>");
    };
    let category = parse_category(category)?;
    let mut editor = BudgetEditor::new(ledger.budgets());
    let limit = editor.upsert(category, coerce_limit(limit));
    ledger.save_budgets(editor.rules())?;
    println!("Budget for {category} set to {}", format_amount(limit));
    Ok(())
}

fn cli_unbudget(args: &[String], ledger: &mut Ledger) -> Result<()> {
    let Some(category) = positionals(args).first().copied() else {
        anyhow::bail!("Usage: expensedash unbudget <category>");
    };
    let category = parse_category(category)?;
    let mut editor = BudgetEditor::new(ledger.budgets());
    if !editor.remove(category) {
        println!("No budget for {category}");
        return Ok(());
    }
    ledger.save_budgets(editor.rules())?;
    println!("Removed budget for {category}");
    Ok(())
}

fn cli_export(args: &[String], ledger: &Ledger) -> Result<()> {
    let month = flag_value(args, "--month").map(parse_month).transpose()?;

    // Output path is the first positional argument
    let output_path = positionals(args)
        .first()
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| crate::export::default_export_path(month.as_deref()));

    let scoped = expenses_in_month(ledger.expenses(), month.as_deref());
    let count = crate::export::export_to_csv(&scoped, std::path::Path::new(&output_path))?;
    if count == 0 {
        println!("No expenses to export, wrote header only to {output_path}");
    } else {
        println!("Exported {count} expenses to {output_path}");
    }
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
