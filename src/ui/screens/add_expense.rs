use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::ui::app::{App, EditTarget, FormField, InputMode};
use crate::ui::theme;
use crate::ui::util::format_amount;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FormField::all().len() as u16 + 2),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    render_fields(f, chunks[0], app);
    render_validation(f, chunks[1], app);
}

fn render_fields(f: &mut Frame, area: Rect, app: &App) {
    let editing = match (app.input_mode, app.edit_target) {
        (InputMode::Editing, Some(EditTarget::Form(field))) => Some(field),
        _ => None,
    };

    let items: Vec<ListItem> = FormField::all()
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let value = if editing == Some(*field) {
                format!("{}▏", app.edit_input)
            } else {
                let v = app.form_value(*field);
                match field {
                    FormField::Category => format!("◀ {v} ▶"),
                    _ if v.is_empty() => "--".into(),
                    _ => v,
                }
            };
            let style = if i == app.form_field {
                theme::selected_style()
            } else {
                theme::normal_style()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {:<12}", field.label()), theme::dim_style()),
                Span::styled(value, style),
            ]))
        })
        .collect();

    let border = if app.form.is_valid() {
        Style::default().fg(theme::GREEN)
    } else {
        theme::border_style()
    };
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Span::styled(
                " Add expense | j/k field, Enter edit, +/- category, s save ",
                theme::title_style(),
            )),
    );
    f.render_widget(list, area);
}

fn render_validation(f: &mut Frame, area: Rect, app: &App) {
    let line = match app.form.validate() {
        Ok(()) => {
            let amount = app.form.amount().map(format_amount).unwrap_or_default();
            Line::from(Span::styled(
                format!(
                    " Ready: {} {} in {}. Press s to save",
                    app.form.name.trim(),
                    amount,
                    app.form.category
                ),
                Style::default().fg(theme::GREEN),
            ))
        }
        Err(e) => Line::from(Span::styled(
            format!(" {e}"),
            Style::default()
                .fg(theme::YELLOW)
                .add_modifier(Modifier::ITALIC),
        )),
    };

    let p = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style()),
    );
    f.render_widget(p, area);
}
