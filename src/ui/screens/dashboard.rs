use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::aggregate::{compute_summary, group_by_month, Summary};
use crate::ledger::Ledger;
use crate::models::Expense;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_percent, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, ledger: &Ledger) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Summary cards
            Constraint::Min(5),    // Monthly history
        ])
        .split(area);

    let scoped = app.scoped_expenses(ledger);
    let summary = compute_summary(&scoped, ledger.budgets());
    render_summary_cards(f, chunks[0], &summary);
    render_history(f, chunks[1], app, &scoped);
}

fn render_summary_cards(f: &mut Frame, area: Rect, summary: &Summary) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    render_card(
        f,
        cards[0],
        "Total spent",
        format_amount(summary.total_spent),
        theme::RED,
        format!(
            "{} expense{}",
            summary.expense_count,
            if summary.expense_count == 1 { "" } else { "s" }
        ),
    );

    let utilization_color = summary
        .overall_utilization()
        .map_or(theme::TEXT_DIM, theme::utilization_color);
    render_card(
        f,
        cards[1],
        "Budget utilization",
        format_percent(summary.overall_percent()),
        utilization_color,
        format!("of {} planned", format_amount(summary.planned_total)),
    );

    let (largest, largest_name) = match summary.largest_expense {
        Some(e) => (format_amount(e.amount), truncate(&e.name, 24)),
        None => ("--".into(), "--".into()),
    };
    render_card(f, cards[2], "Largest expense", largest, theme::YELLOW, largest_name);

    render_card(
        f,
        cards[3],
        "Budgets remaining",
        format_amount(summary.total_remaining),
        theme::GREEN,
        format!(
            "across {} categor{}",
            summary.budget_count,
            if summary.budget_count == 1 { "y" } else { "ies" }
        ),
    );
}

fn render_card(f: &mut Frame, area: Rect, title: &str, value: String, color: Color, subtitle: String) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style())
        .title(Span::styled(format!(" {title} "), theme::title_style()));

    let text = Paragraph::new(vec![
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(subtitle, theme::dim_style())),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

fn render_history(f: &mut Frame, area: Rect, app: &App, scoped: &[Expense]) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style())
        .title(Span::styled(
            format!(" Monthly history ({}) ", app.scope_label()),
            theme::title_style(),
        ));

    let groups = group_by_month(scoped);
    if groups.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Start adding expenses to see your spending history.",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let name_width = (area.width as usize).saturating_sub(48).max(10);
    let mut lines: Vec<Line> = Vec::new();
    for group in &groups {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {:<32}", group.label()),
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format_amount(group.total()),
                Style::default()
                    .fg(theme::TEXT)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        for expense in &group.items {
            lines.push(Line::from(vec![
                Span::styled(format!("   {:<12}", expense.date), theme::dim_style()),
                Span::styled(
                    format!("{:<width$} ", truncate(&expense.name, name_width), width = name_width),
                    theme::normal_style(),
                ),
                Span::styled(format!("{:<15}", expense.category.as_str()), theme::dim_style()),
                Span::styled(format!("{:>14}", format_amount(expense.amount)), theme::amount_style()),
            ]));
        }
    }

    let scroll = app.history_scroll.min(lines.len().saturating_sub(1));
    let history = Paragraph::new(lines)
        .scroll((scroll as u16, 0))
        .block(block);
    f.render_widget(history, area);
}
