use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::AppState;
use crate::records::{Product, Resource};
use crate::ui::components;

pub fn render_products_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    // Header totals cover the whole collection, not the filtered view.
    let total_value: f64 = app
        .products
        .collection
        .iter()
        .map(|p| p.fields.stock_value())
        .sum();
    let title = format!(
        "Products — {} items, stock value {}",
        app.products.collection.len(),
        components::money(total_value)
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    if app.products.loading {
        let p = Paragraph::new("Loading products...")
            .style(Style::default().fg(app.theme.muted))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let visible: Vec<&Product> = app.products.filtered().collect();
    if visible.is_empty() {
        let p = Paragraph::new("No products to display")
            .style(Style::default().fg(app.theme.muted))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    if app.selected_product >= visible.len() {
        app.selected_product = visible.len() - 1;
    }

    let start = (app.selected_product / app.rows_per_page) * app.rows_per_page;
    let end = (start + app.rows_per_page).min(visible.len());
    let slice = &visible[start..end];

    let rows = slice.iter().enumerate().map(|(i, p)| {
        let absolute_index = start + i;
        let style = if absolute_index == app.selected_product {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else if app.products.editing_id == Some(p.id) {
            Style::default().fg(app.theme.title)
        } else {
            Style::default().fg(app.theme.text)
        };
        let qty_color = if p.fields.units > 0 {
            app.theme.ok
        } else {
            app.theme.err
        };
        let profit = p.fields.profit();
        let profit_color = if profit >= 0.0 {
            app.theme.ok
        } else {
            app.theme.err
        };
        Row::new(vec![
            Cell::from((absolute_index + 1).to_string()),
            Cell::from(product_label(p)),
            Cell::from(p.fields.units.to_string()).style(Style::default().fg(qty_color)),
            Cell::from(components::money(p.fields.price1)),
            Cell::from(components::money(p.fields.purchase_price)),
            Cell::from(components::money(p.fields.stock_value())),
            Cell::from(components::money(profit)).style(Style::default().fg(profit_color)),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(4),
        Constraint::Percentage(30),
        Constraint::Length(6),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Length(10),
    ];
    let header = Row::new(vec!["#", "PRODUCT", "QTY", "SELL", "COST", "VALUE", "PROFIT"]).style(
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

pub fn render_product_form(f: &mut Frame, area: Rect, app: &AppState) {
    let title = match app.products.editing_id {
        Some(id) => format!("Edit product #{id}"),
        None => "New product".to_string(),
    };
    let fields = Product::form_fields();
    components::render_form_pane(
        f,
        area,
        app,
        &title,
        &fields,
        &app.products.form,
        &app.products.field_errors,
    );
}

/// Name plus the unit and product number, when present.
fn product_label(p: &Product) -> String {
    match (p.fields.unit.is_empty(), p.fields.number.is_empty()) {
        (false, false) => format!("{} ({} | {})", p.fields.name, p.fields.unit, p.fields.number),
        (false, true) => format!("{} ({})", p.fields.name, p.fields.unit),
        (true, false) => format!("{} ({})", p.fields.name, p.fields.number),
        (true, true) => p.fields.name.clone(),
    }
}
