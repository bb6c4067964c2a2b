use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::aggregate::{CategoryFilter, SortDirection, SortKey};
use crate::ledger::Ledger;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, ledger: &Ledger) {
    let scoped = app.scoped_expenses(ledger);
    let rows = app.visible_expenses(&scoped);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style())
        .title(Span::styled(title(app, rows.len()), theme::title_style()));

    if rows.is_empty() {
        let mut msg = vec![
            Line::from(""),
            Line::from(Span::styled(
                "No expenses match your filters yet.",
                theme::dim_style(),
            )),
        ];
        if !app.search_input.is_empty() || app.category_filter != CategoryFilter::All {
            msg.push(Line::from(""));
            msg.push(Line::from(Span::styled(
                "Press Esc to clear the search, f to change the category filter",
                theme::dim_style(),
            )));
        }
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let header_cells = [
        header_label(app, "Date", SortKey::Date),
        header_label(app, "Name", SortKey::Name),
        "Category".to_string(),
        header_label(app, "Amount", SortKey::Amount),
    ]
    .into_iter()
    .map(|h| Cell::from(h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let name_width = (area.width as usize).saturating_sub(50).max(12);
    let table_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .skip(app.expense_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, expense)| {
            let style = if i == app.expense_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            let name = match &expense.notes {
                Some(notes) => format!("{} ({notes})", expense.name),
                None => expense.name.clone(),
            };

            Row::new(vec![
                Cell::from(format!("  {}", expense.date)),
                Cell::from(truncate(&name, name_width)),
                Cell::from(expense.category.as_str()),
                Cell::from(Span::styled(
                    format_amount(expense.amount),
                    if i == app.expense_index {
                        style
                    } else {
                        theme::amount_style()
                    },
                )),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(14),
        Constraint::Min(20),
        Constraint::Length(15),
        Constraint::Length(14),
    ];

    let table = Table::new(table_rows, widths).header(header).block(block);
    f.render_widget(table, area);
}

fn title(app: &App, count: usize) -> String {
    let mut title = format!(" Expenses ({count}) | {} | {} ", app.scope_label(), app.category_filter);
    if !app.search_input.is_empty() {
        title.push_str(&format!("| search: '{}' ", app.search_input));
    }
    title
}

/// Column label with an arrow on the active sort key.
fn header_label(app: &App, label: &str, key: SortKey) -> String {
    if app.sort.key != key {
        return label.to_string();
    }
    let arrow = match app.sort.direction {
        SortDirection::Asc => "▲",
        SortDirection::Desc => "▼",
    };
    format!("{label} {arrow}")
}
