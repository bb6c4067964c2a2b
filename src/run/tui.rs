use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::aggregate::{group_by_month, SortKey};
use crate::ledger::Ledger;
use crate::models::{parse_date, ExpenseCategory};
use crate::ui::app::{App, EditTarget, FormField, InputMode, PendingAction, Screen};
use crate::ui::commands;
use crate::ui::util::{format_amount, scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(ledger: &mut Ledger) -> Result<()> {
    let mut app = App::new(ledger);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    tracing::info!("tui started");
    let result = run_app(&mut terminal, &mut app, ledger);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    match &result {
        Ok(()) => tracing::info!("tui exited"),
        Err(e) => {
            tracing::error!(error = %e, "tui exited with error");
            eprintln!("Error: {e:?}");
        }
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    ledger: &mut Ledger,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            // tab + status + command bars, table borders and header
            let content_height = f.area().height.saturating_sub(6) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app, ledger);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            // A failed key action surfaces in the status bar; the session keeps running
            if let Err(e) = handle_key(key, app, ledger) {
                tracing::error!(error = %e, "key action failed");
                app.set_status(format!("Error: {e}"));
            }
        }
    }
    Ok(())
}

pub(crate) fn handle_key(key: KeyEvent, app: &mut App, ledger: &mut Ledger) -> Result<()> {
    if app.show_help {
        app.show_help = false;
        return Ok(());
    }
    match app.input_mode {
        InputMode::Normal => handle_normal_input(key, app, ledger)?,
        InputMode::Command => handle_command_input(key, app, ledger)?,
        InputMode::Search => handle_search_input(key, app)?,
        InputMode::Editing => handle_editing_input(key, app)?,
        InputMode::Confirm => handle_confirm_input(key, app, ledger)?,
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: KeyEvent, app: &mut App, ledger: &mut Ledger) -> Result<()> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('c') if ctrl => {
            commands::handle_command("quit", app, ledger)?
        }
        KeyCode::Char('d') if ctrl => {
            for _ in 0..app.visible_rows / 2 {
                handle_move_down(app, ledger);
            }
        }
        KeyCode::Char('u') if ctrl => {
            for _ in 0..app.visible_rows / 2 {
                handle_move_up(app);
            }
        }
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Search;
            app.screen = Screen::Expenses;
            app.search_input.clear();
            app.reset_expense_cursor();
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app, ledger),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('g') => handle_goto_top(app),
        KeyCode::Char('G') => handle_goto_bottom(app, ledger),
        KeyCode::Char(c @ '1'..='4') => {
            let idx = (c as usize) - ('1' as usize);
            if let Some(&screen) = Screen::all().get(idx) {
                switch_screen(app, ledger, screen);
            }
        }
        KeyCode::Tab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let next = (idx + 1) % screens.len();
            switch_screen(app, ledger, screens[next]);
        }
        KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let prev = if idx == 0 { screens.len() - 1 } else { idx - 1 };
            switch_screen(app, ledger, screens[prev]);
        }
        KeyCode::Enter => handle_enter(app, ledger),
        KeyCode::Esc => handle_escape(app),
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Char('H') => commands::handle_command("prev-month", app, ledger)?,
        KeyCode::Char('L') => commands::handle_command("next-month", app, ledger)?,

        // Expenses
        KeyCode::Char('f') if app.screen == Screen::Expenses => {
            app.cycle_category_filter(ledger);
            let filter = app.category_filter;
            app.set_status(format!("Filter: {filter}"));
        }
        KeyCode::Char('d') if app.screen == Screen::Expenses => toggle_sort(app, SortKey::Date),
        KeyCode::Char('a') if app.screen == Screen::Expenses => toggle_sort(app, SortKey::Amount),
        KeyCode::Char('n') if app.screen == Screen::Expenses => toggle_sort(app, SortKey::Name),
        KeyCode::Char('D') if app.screen == Screen::Expenses => {
            commands::handle_command("delete", app, ledger)?
        }

        // Add expense
        KeyCode::Char('+') | KeyCode::Char('=') if app.screen == Screen::AddExpense => {
            app.form.category = app.form.category.next();
        }
        KeyCode::Char('-') if app.screen == Screen::AddExpense => {
            app.form.category = app.form.category.prev();
        }
        KeyCode::Char('s') if app.screen == Screen::AddExpense => submit_form(app, ledger)?,

        // Budgets
        KeyCode::Char('a') if app.screen == Screen::Budgets => add_budget(app),
        KeyCode::Char('e') if app.screen == Screen::Budgets => edit_budget(app),
        KeyCode::Char('x') if app.screen == Screen::Budgets => remove_budget(app),
        KeyCode::Char('w') if app.screen == Screen::Budgets => {
            commands::handle_command("save-budgets", app, ledger)?
        }
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: KeyEvent, app: &mut App, ledger: &mut Ledger) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = std::mem::take(&mut app.command_input);
            app.input_mode = InputMode::Normal;
            commands::handle_command(&input, app, ledger)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            if let Some(pos) = trimmed.rfind(' ') {
                app.command_input.truncate(pos + 1);
            } else {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_search_input(key: KeyEvent, app: &mut App) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.search_input.clear();
            app.reset_expense_cursor();
        }
        KeyCode::Backspace => {
            app.search_input.pop();
            app.reset_expense_cursor();
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
            app.reset_expense_cursor();
        }
        _ => {}
    }
    Ok(())
}

fn handle_editing_input(key: KeyEvent, app: &mut App) -> Result<()> {
    match key.code {
        KeyCode::Enter => commit_edit(app),
        KeyCode::Esc => {
            app.edit_input.clear();
            app.edit_target = None;
            app.input_mode = InputMode::Normal;
            app.set_status("Edit cancelled");
        }
        KeyCode::Backspace => {
            app.edit_input.pop();
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.edit_input.clear();
        }
        KeyCode::Char(c) => {
            app.edit_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_confirm_input(key: KeyEvent, app: &mut App, ledger: &mut Ledger) -> Result<()> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            // Close the prompt before acting on it
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            match app.pending_action.take() {
                Some(PendingAction::DeleteExpense { id, name }) => {
                    let removed = ledger.remove_expense(&id)?;
                    let len = visible_len(app, ledger);
                    app.clamp_expense_cursor(len);
                    match removed {
                        Some(_) => app.set_status(format!("Deleted: {name}")),
                        None => app.set_status(format!("'{name}' was already removed")),
                    }
                }
                Some(PendingAction::QuitDiscardingBudgets) => app.running = false,
                None => {}
            }
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.pending_action = None;
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            app.set_status("Cancelled");
        }
        _ => {}
    }
    Ok(())
}

// ── Actions ──────────────────────────────────────────────────

fn toggle_sort(app: &mut App, key: SortKey) {
    app.sort.toggle(key);
    app.reset_expense_cursor();
    app.set_status(format!(
        "Sorted by {} {}",
        app.sort.key.as_str(),
        app.sort.direction.as_str()
    ));
}

fn submit_form(app: &mut App, ledger: &mut Ledger) -> Result<()> {
    // Work on a copy so a failed write keeps what the user typed
    let mut draft = app.form.clone();
    let expense = match draft.submit() {
        Ok(expense) => expense,
        Err(e) => {
            app.set_status(format!("Cannot save: {e}"));
            return Ok(());
        }
    };
    let msg = format!(
        "Added: {} {} ({})",
        expense.name,
        format_amount(expense.amount),
        expense.category
    );
    ledger.add_expense(expense)?;
    app.form = draft;
    app.form_field = 0;
    app.set_status(msg);
    Ok(())
}

fn commit_edit(app: &mut App) {
    let input = std::mem::take(&mut app.edit_input);
    app.input_mode = InputMode::Normal;
    match app.edit_target.take() {
        Some(EditTarget::Form(field)) => match field {
            FormField::Name => app.form.name = input,
            FormField::Amount => app.form.amount = input,
            FormField::Notes => app.form.notes = input,
            FormField::Date => {
                if parse_date(input.trim()).is_some() {
                    app.form.date = input.trim().to_string();
                } else {
                    app.set_status(format!("Invalid date '{input}'. Use YYYY-MM-DD"));
                }
            }
            FormField::Category => match ExpenseCategory::parse(&input) {
                Some(category) => app.form.category = category,
                None => app.set_status(format!("Unknown category '{input}'")),
            },
        },
        Some(EditTarget::BudgetLimit(category)) => {
            if let Some(limit) = app.budget_editor.update_limit(category, &input) {
                app.set_status(format!(
                    "{category} limit set to {} (unsaved)",
                    format_amount(limit)
                ));
            }
        }
        None => {}
    }
}

fn add_budget(app: &mut App) {
    if !app.budget_editor.can_add() {
        app.set_status("Every category already has a budget");
        return;
    }
    if let Some(category) = app.budget_editor.add_budget() {
        app.budget_index = app.budget_editor.len().saturating_sub(1);
        let page = app.visible_rows.max(1);
        app.budget_scroll = app.budget_index.saturating_sub(page.saturating_sub(1));
        app.set_status(format!("Added {category} budget, press e to set a limit"));
    }
}

fn edit_budget(app: &mut App) {
    match app.selected_budget_category() {
        Some(category) => app.begin_edit(EditTarget::BudgetLimit(category)),
        None => app.set_status("No budget selected. Press a to add one"),
    }
}

fn remove_budget(app: &mut App) {
    if let Some(category) = app.selected_budget_category() {
        app.budget_editor.remove(category);
        app.clamp_budget_cursor();
        app.set_status(format!("Removed {category} budget (unsaved)"));
    }
}

// ── Navigation helpers ───────────────────────────────────────

fn switch_screen(app: &mut App, ledger: &Ledger, screen: Screen) {
    app.screen = screen;
    if screen == Screen::Budgets && !app.has_unsaved_budgets(ledger) {
        app.reset_budget_draft(ledger);
    }
}

fn visible_len(app: &App, ledger: &Ledger) -> usize {
    let scoped = app.scoped_expenses(ledger);
    app.visible_expenses(&scoped).len()
}

fn history_len(app: &App, ledger: &Ledger) -> usize {
    let scoped = app.scoped_expenses(ledger);
    let groups = group_by_month(&scoped).len();
    // a header per group, blank lines between groups
    (scoped.len() + groups * 2).saturating_sub(1)
}

fn handle_enter(app: &mut App, ledger: &Ledger) {
    match app.screen {
        Screen::AddExpense => match app.selected_form_field() {
            FormField::Category => {
                app.form.category = app.form.category.next();
            }
            field => app.begin_edit(EditTarget::Form(field)),
        },
        Screen::Budgets => edit_budget(app),
        Screen::Expenses => {
            if let Some(expense) = app.selected_expense(ledger) {
                let id: String = expense.id.chars().take(8).collect();
                let notes = expense.notes.as_deref().unwrap_or("--");
                app.set_status(format!("{} | id {id} | notes: {notes}", expense.name));
            }
        }
        Screen::Dashboard => {}
    }
}

fn handle_escape(app: &mut App) {
    app.status_message.clear();
    if !app.search_input.is_empty() {
        app.search_input.clear();
        app.reset_expense_cursor();
    }
}

fn handle_move_down(app: &mut App, ledger: &Ledger) {
    let page = app.visible_rows.max(1);
    match app.screen {
        Screen::Dashboard => {
            if app.history_scroll + 1 < history_len(app, ledger) {
                app.history_scroll += 1;
            }
        }
        Screen::Expenses => {
            let len = visible_len(app, ledger);
            scroll_down(&mut app.expense_index, &mut app.expense_scroll, len, page);
        }
        Screen::AddExpense => {
            if app.form_field + 1 < FormField::all().len() {
                app.form_field += 1;
            }
        }
        Screen::Budgets => {
            let len = app.budget_editor.len();
            scroll_down(&mut app.budget_index, &mut app.budget_scroll, len, page);
        }
    }
}

fn handle_move_up(app: &mut App) {
    match app.screen {
        Screen::Dashboard => {
            app.history_scroll = app.history_scroll.saturating_sub(1);
        }
        Screen::Expenses => scroll_up(&mut app.expense_index, &mut app.expense_scroll),
        Screen::AddExpense => {
            app.form_field = app.form_field.saturating_sub(1);
        }
        Screen::Budgets => scroll_up(&mut app.budget_index, &mut app.budget_scroll),
    }
}

fn handle_goto_top(app: &mut App) {
    match app.screen {
        Screen::Dashboard => app.history_scroll = 0,
        Screen::Expenses => scroll_to_top(&mut app.expense_index, &mut app.expense_scroll),
        Screen::AddExpense => app.form_field = 0,
        Screen::Budgets => scroll_to_top(&mut app.budget_index, &mut app.budget_scroll),
    }
}

fn handle_goto_bottom(app: &mut App, ledger: &Ledger) {
    let page = app.visible_rows.max(1);
    match app.screen {
        Screen::Dashboard => {
            app.history_scroll = history_len(app, ledger).saturating_sub(page);
        }
        Screen::Expenses => {
            let len = visible_len(app, ledger);
            scroll_to_bottom(&mut app.expense_index, &mut app.expense_scroll, len, page);
        }
        Screen::AddExpense => app.form_field = FormField::all().len() - 1,
        Screen::Budgets => {
            let len = app.budget_editor.len();
            scroll_to_bottom(&mut app.budget_index, &mut app.budget_scroll, len, page);
        }
    }
}

#[cfg(test)]
#[path = "tui_tests.rs"]
mod tests;
