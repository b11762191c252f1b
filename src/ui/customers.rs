use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::AppState;
use crate::records::{Customer, Resource};
use crate::ui::components;

pub fn render_customers_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let block = Block::default()
        .title("Customers")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    if app.customers.loading {
        let p = Paragraph::new("Loading customers...")
            .style(Style::default().fg(app.theme.muted))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let visible: Vec<&Customer> = app.customers.filtered().collect();
    if visible.is_empty() {
        let p = Paragraph::new("No customers to display")
            .style(Style::default().fg(app.theme.muted))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    if app.selected_customer >= visible.len() {
        app.selected_customer = visible.len() - 1;
    }

    let start = (app.selected_customer / app.rows_per_page) * app.rows_per_page;
    let end = (start + app.rows_per_page).min(visible.len());
    let slice = &visible[start..end];

    let rows = slice.iter().enumerate().map(|(i, c)| {
        let absolute_index = start + i;
        let style = if absolute_index == app.selected_customer {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else if app.customers.editing_id == Some(c.id) {
            Style::default().fg(app.theme.title)
        } else {
            Style::default().fg(app.theme.text)
        };
        let balance_color = if c.fields.balance_in_credit() {
            app.theme.ok
        } else {
            app.theme.err
        };
        Row::new(vec![
            Cell::from((absolute_index + 1).to_string()),
            Cell::from(c.fields.name.clone()),
            Cell::from(dash_if_empty(&c.fields.phone)),
            Cell::from(dash_if_empty(&c.fields.city)),
            Cell::from(components::money(c.fields.balance))
                .style(Style::default().fg(balance_color)),
            Cell::from(c.fields.kind_label()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(4),
        Constraint::Percentage(34),
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(10),
    ];
    let header = Row::new(vec!["#", "NAME", "PHONE", "CITY", "BALANCE", "TYPE"]).style(
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

pub fn render_customer_form(f: &mut Frame, area: Rect, app: &AppState) {
    let title = match app.customers.editing_id {
        Some(id) => format!("Edit customer #{id}"),
        None => "New customer".to_string(),
    };
    let fields = Customer::form_fields();
    components::render_form_pane(
        f,
        area,
        app,
        &title,
        &fields,
        &app.customers.form,
        &app.customers.field_errors,
    );
}

fn dash_if_empty(s: &str) -> String {
    if s.is_empty() {
        "-".to_string()
    } else {
        s.to_string()
    }
}
