use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::ledger::Ledger;
use crate::ui::app::{App, EditTarget, InputMode};
use crate::ui::theme;
use crate::ui::util::{format_amount, progress_bar};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, ledger: &Ledger) {
    let dirty = app.has_unsaved_budgets(ledger);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style())
        .title(Span::styled(
            format!(
                " Budgets | {}{} ",
                app.scope_label(),
                if dirty { " | unsaved, w to save" } else { "" }
            ),
            if dirty {
                Style::default()
                    .fg(theme::YELLOW)
                    .add_modifier(Modifier::BOLD)
            } else {
                theme::title_style()
            },
        ));

    if app.budget_editor.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Add a budget to begin tracking goals.",
                theme::dim_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press a to add one, or use :budget <category> <limit>",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let editing = match (app.input_mode, app.edit_target) {
        (InputMode::Editing, Some(EditTarget::BudgetLimit(c))) => Some(c),
        _ => None,
    };

    let scoped = app.scoped_expenses(ledger);
    let items: Vec<ListItem> = app
        .budget_editor
        .insights(&scoped)
        .iter()
        .enumerate()
        .skip(app.budget_scroll)
        .take(area.height.saturating_sub(2) as usize)
        .map(|(i, insight)| {
            let color = theme::utilization_color(insight.utilization);
            let style = if i == app.budget_index {
                theme::selected_style()
            } else if i % 2 == 0 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            let limit = if editing == Some(insight.category) {
                format!("{}▏", app.edit_input)
            } else {
                format_amount(insight.monthly_limit)
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!(" {:<15}", insight.category.as_str()), style),
                Span::styled(format!("{limit:>14} "), theme::normal_style()),
                Span::styled(
                    format!("spent {:>12} ", format_amount(insight.spent)),
                    theme::dim_style(),
                ),
                Span::styled(
                    format!("left {:>12} ", format_amount(insight.remaining)),
                    theme::dim_style(),
                ),
                Span::styled(progress_bar(insight.utilization, 20), Style::default().fg(color)),
                Span::styled(
                    format!(" {}%", insight.percent()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ]))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}
