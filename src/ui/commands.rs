use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use super::app::{App, PendingAction, Screen};
use crate::aggregate::{CategoryFilter, SortDirection, SortKey};
use crate::ledger::{coerce_limit, ExpenseDraft, Ledger};
use crate::models::ExpenseCategory;
use crate::ui::util::format_amount;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Ledger) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit ExpenseDash", cmd_quit, r);
    register_command!("quit", "Quit ExpenseDash", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("e", "Go to Expenses", cmd_expenses, r);
    register_command!("expenses", "Go to Expenses", cmd_expenses, r);
    register_command!("add-expense", "Open the add expense form", cmd_add_expense, r);
    register_command!("b", "Go to Budgets", cmd_budgets, r);
    register_command!("budgets", "Go to Budgets", cmd_budgets, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "month",
        "Set month (e.g. :month 2024-01, no argument for all time)",
        cmd_month,
        r
    );
    register_command!("m", "Set month (e.g. :m 2024-01)", cmd_month, r);
    register_command!("next-month", "Go to next month", cmd_next_month, r);
    register_command!("prev-month", "Go to previous month", cmd_prev_month, r);
    register_command!(
        "search",
        "Search expenses by name or notes (e.g. :search coffee)",
        cmd_search,
        r
    );
    register_command!("s", "Search expenses (e.g. :s coffee)", cmd_search, r);
    register_command!(
        "filter",
        "Filter by category (e.g. :filter Dining, :filter all)",
        cmd_filter,
        r
    );
    register_command!(
        "sort",
        "Sort expenses (e.g. :sort amount asc)",
        cmd_sort,
        r
    );
    register_command!(
        "add",
        "Add expense (e.g. :add Coffee 4.50 Dining)",
        cmd_add,
        r
    );
    register_command!("delete", "Delete selected expense", cmd_delete, r);
    register_command!(
        "budget",
        "Set a budget limit in the draft (e.g. :budget Dining 200)",
        cmd_budget,
        r
    );
    register_command!(
        "save-budgets",
        "Save the budget draft",
        cmd_save_budgets,
        r
    );
    register_command!(
        "export",
        "Export expenses to CSV (e.g. :export ~/expenses.csv)",
        cmd_export,
        r
    );

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if cmd_name.is_empty() {
        return Ok(());
    }

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        tracing::debug!(command = cmd_name, "running command");
        (cmd.run)(args, app, ledger)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    if app.has_unsaved_budgets(ledger) {
        app.confirm(
            "Discard unsaved budget changes and quit?",
            PendingAction::QuitDiscardingBudgets,
        );
    } else {
        app.running = false;
    }
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, _ledger: &mut Ledger) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    Ok(())
}

fn cmd_expenses(_args: &str, app: &mut App, _ledger: &mut Ledger) -> anyhow::Result<()> {
    app.screen = Screen::Expenses;
    Ok(())
}

fn cmd_add_expense(_args: &str, app: &mut App, _ledger: &mut Ledger) -> anyhow::Result<()> {
    app.screen = Screen::AddExpense;
    app.form_field = 0;
    Ok(())
}

fn cmd_budgets(_args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    app.screen = Screen::Budgets;
    if !app.has_unsaved_budgets(ledger) {
        app.reset_budget_draft(ledger);
    }
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _ledger: &mut Ledger) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_month(args: &str, app: &mut App, _ledger: &mut Ledger) -> anyhow::Result<()> {
    if args.is_empty() {
        app.current_month = None;
        app.reset_expense_cursor();
        app.set_status("Showing all time");
        return Ok(());
    }

    // Accept formats like "2024-01", "2024-1", "01", "1"
    let month = if args.len() <= 2 {
        let year = app.current_month.as_ref().map_or_else(
            || chrono::Local::now().format("%Y").to_string(),
            |m| m.chars().take(4).collect(),
        );
        format!("{year}-{args:0>2}")
    } else {
        args.to_string()
    };

    match chrono::NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d") {
        Ok(date) => {
            let m = date.format("%Y-%m").to_string();
            app.set_status(format!("Switched to month: {m}"));
            app.current_month = Some(m);
            app.reset_expense_cursor();
        }
        Err(_) => app.set_status("Invalid month format. Use YYYY-MM (e.g. 2024-01)"),
    }

    Ok(())
}

fn cmd_next_month(_args: &str, app: &mut App, _ledger: &mut Ledger) -> anyhow::Result<()> {
    advance_month(app, 1);
    Ok(())
}

fn cmd_prev_month(_args: &str, app: &mut App, _ledger: &mut Ledger) -> anyhow::Result<()> {
    advance_month(app, -1);
    Ok(())
}

fn advance_month(app: &mut App, delta: i32) {
    let base = app.current_month.as_ref().map_or_else(
        || chrono::Local::now().format("%Y-%m").to_string(),
        |m| m.clone(),
    );
    let Ok(date) = chrono::NaiveDate::parse_from_str(&format!("{base}-01"), "%Y-%m-%d") else {
        return;
    };
    // From all time, H/L land on the current month first
    let new_date = if app.current_month.is_none() {
        Some(date)
    } else if delta > 0 {
        date.checked_add_months(chrono::Months::new(1))
    } else {
        date.checked_sub_months(chrono::Months::new(1))
    };

    if let Some(d) = new_date {
        let m = d.format("%Y-%m").to_string();
        app.set_status(format!("Month: {m}"));
        app.current_month = Some(m);
        app.reset_expense_cursor();
    }
}

fn cmd_search(args: &str, app: &mut App, _ledger: &mut Ledger) -> anyhow::Result<()> {
    app.search_input = args.to_string();
    app.screen = Screen::Expenses;
    app.reset_expense_cursor();

    if args.is_empty() {
        app.set_status("Search cleared");
    } else {
        app.set_status(format!("Searching: {args}"));
    }

    Ok(())
}

fn cmd_filter(args: &str, app: &mut App, _ledger: &mut Ledger) -> anyhow::Result<()> {
    let filter = if args.is_empty() || args.eq_ignore_ascii_case("all") {
        CategoryFilter::All
    } else if let Some(category) = ExpenseCategory::parse(args) {
        CategoryFilter::Only(category)
    } else {
        app.set_status(format!(
            "Unknown category '{args}'. Categories: {}",
            category_names()
        ));
        return Ok(());
    };

    app.category_filter = filter;
    app.screen = Screen::Expenses;
    app.reset_expense_cursor();
    app.set_status(format!("Filter: {filter}"));
    Ok(())
}

fn cmd_sort(args: &str, app: &mut App, _ledger: &mut Ledger) -> anyhow::Result<()> {
    let mut parts = args.split_whitespace();
    let Some(key) = parts.next().and_then(SortKey::parse) else {
        app.set_status("Usage: :sort <date|amount|name> [asc|desc]");
        return Ok(());
    };

    match parts.next().map(|d| d.to_lowercase()) {
        Some(d) if d == "asc" => {
            app.sort.key = key;
            app.sort.direction = SortDirection::Asc;
        }
        Some(d) if d == "desc" => {
            app.sort.key = key;
            app.sort.direction = SortDirection::Desc;
        }
        Some(other) => {
            app.set_status(format!("Unknown direction '{other}'. Use asc or desc"));
            return Ok(());
        }
        None => app.sort.toggle(key),
    }

    app.screen = Screen::Expenses;
    app.reset_expense_cursor();
    app.set_status(format!(
        "Sorted by {} {}",
        app.sort.key.as_str(),
        app.sort.direction.as_str()
    ));
    Ok(())
}

fn cmd_add(args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    let Some(mut draft) = parse_add_args(args) else {
        app.set_status("Usage: :add <name> <amount> [category]. Example: :add Coffee 4.50 Dining");
        return Ok(());
    };

    match draft.submit() {
        Ok(expense) => {
            let msg = format!(
                "Added: {} {} ({})",
                expense.name,
                format_amount(expense.amount),
                expense.category
            );
            ledger.add_expense(expense)?;
            app.set_status(msg);
        }
        Err(e) => app.set_status(e.to_string()),
    }
    Ok(())
}

/// `<name...> <amount> [category]`. The category is only taken from the
/// last token when at least three tokens are present.
fn parse_add_args(args: &str) -> Option<ExpenseDraft> {
    let tokens: Vec<&str> = args.split_whitespace().collect();
    if tokens.len() < 2 {
        return None;
    }

    let (category, rest) = match tokens.split_last() {
        Some((last, rest)) if rest.len() >= 2 => match ExpenseCategory::parse(last) {
            Some(category) => (category, rest),
            None => (ExpenseCategory::Other, &tokens[..]),
        },
        _ => (ExpenseCategory::Other, &tokens[..]),
    };

    let (amount, name) = rest.split_last()?;
    Some(ExpenseDraft {
        name: name.join(" "),
        amount: (*amount).to_string(),
        category,
        ..ExpenseDraft::default()
    })
}

fn cmd_delete(_args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    if app.screen != Screen::Expenses {
        app.set_status("Navigate to Expenses and select one first");
        return Ok(());
    }

    match app.selected_expense(ledger) {
        Some(expense) => {
            app.confirm(
                format!("Delete '{}'?", expense.name),
                PendingAction::DeleteExpense {
                    id: expense.id,
                    name: expense.name,
                },
            );
        }
        None => app.set_status("No expense selected"),
    }
    Ok(())
}

fn cmd_budget(args: &str, app: &mut App, _ledger: &mut Ledger) -> anyhow::Result<()> {
    // Last token is the limit, everything before is the category
    let parts: Vec<&str> = args.rsplitn(2, ' ').collect();
    if parts.len() < 2 {
        app.set_status("Usage: :budget <category> <limit>. Example: :budget Dining 200");
        return Ok(());
    }

    let Some(category) = ExpenseCategory::parse(parts[1]) else {
        app.set_status(format!(
            "Unknown category '{}'. Categories: {}",
            parts[1],
            category_names()
        ));
        return Ok(());
    };

    let limit = app.budget_editor.upsert(category, coerce_limit(parts[0]));
    app.screen = Screen::Budgets;
    if let Some(idx) = app
        .budget_editor
        .rules()
        .iter()
        .position(|r| r.category == category)
    {
        app.budget_index = idx;
    }
    app.set_status(format!(
        "Budget for {category} set to {} (unsaved, press w to save)",
        format_amount(limit)
    ));
    Ok(())
}

fn cmd_save_budgets(_args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    ledger.save_budgets(app.budget_editor.rules())?;
    app.reset_budget_draft(ledger);
    let count = ledger.budgets().len();
    app.set_status(format!(
        "Saved {count} budget{}",
        if count == 1 { "" } else { "s" }
    ));
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        crate::export::default_export_path(app.current_month.as_deref())
    } else {
        crate::run::shellexpand(args)
    };

    let scoped = app.scoped_expenses(ledger);
    let count = crate::export::export_to_csv(&scoped, Path::new(&path))?;
    if count == 0 {
        app.set_status(format!("No expenses to export (wrote header to {path})"));
    } else {
        app.set_status(format!("Exported {count} expenses to {path}"));
    }
    Ok(())
}

fn category_names() -> String {
    ExpenseCategory::all()
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
