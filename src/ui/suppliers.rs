use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::AppState;
use crate::records::{Resource, Supplier};
use crate::ui::components;

pub fn render_suppliers_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let block = Block::default()
        .title("Suppliers")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    if app.suppliers.loading {
        let p = Paragraph::new("Loading suppliers...")
            .style(Style::default().fg(app.theme.muted))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let visible: Vec<&Supplier> = app.suppliers.filtered().collect();
    if visible.is_empty() {
        let p = Paragraph::new("No suppliers to display")
            .style(Style::default().fg(app.theme.muted))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    if app.selected_supplier >= visible.len() {
        app.selected_supplier = visible.len() - 1;
    }

    let start = (app.selected_supplier / app.rows_per_page) * app.rows_per_page;
    let end = (start + app.rows_per_page).min(visible.len());
    let slice = &visible[start..end];

    let rows = slice.iter().enumerate().map(|(i, s)| {
        let absolute_index = start + i;
        let style = if absolute_index == app.selected_supplier {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else if app.suppliers.editing_id == Some(s.id) {
            Style::default().fg(app.theme.title)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from((absolute_index + 1).to_string()),
            Cell::from(s.fields.name.clone()),
            Cell::from(dash_if_empty(&s.fields.phone)),
            Cell::from(dash_if_empty(&s.fields.city)),
            Cell::from(delegate_label(s)),
            Cell::from(if s.fields.commercial_register > 0 {
                s.fields.commercial_register.to_string()
            } else {
                "-".to_string()
            }),
            Cell::from(s.fields.kind_label()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(4),
        Constraint::Percentage(28),
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Length(18),
        Constraint::Length(10),
        Constraint::Length(14),
    ];
    let header =
        Row::new(vec!["#", "NAME", "PHONE", "CITY", "DELEGATE", "REGISTER", "TYPE"]).style(
            Style::default()
                .fg(app.theme.title)
                .add_modifier(Modifier::BOLD),
        );

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1);
    f.render_widget(table, area);
}

pub fn render_supplier_form(f: &mut Frame, area: Rect, app: &AppState) {
    let title = match app.suppliers.editing_id {
        Some(id) => format!("Edit supplier #{id}"),
        None => "New supplier".to_string(),
    };
    let fields = Supplier::form_fields();
    components::render_form_pane(
        f,
        area,
        app,
        &title,
        &fields,
        &app.suppliers.form,
        &app.suppliers.field_errors,
    );
}

fn delegate_label(s: &Supplier) -> String {
    if s.fields.delegate.is_empty() {
        return "-".to_string();
    }
    if s.fields.delegate_number > 0 {
        format!("{} ({})", s.fields.delegate, s.fields.delegate_number)
    } else {
        s.fields.delegate.clone()
    }
}

fn dash_if_empty(s: &str) -> String {
    if s.is_empty() {
        "-".to_string()
    } else {
        s.to_string()
    }
}
