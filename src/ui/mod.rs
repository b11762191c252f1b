pub mod components;
pub mod customers;
pub mod products;
pub mod suppliers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{ActiveTab, AppState, InputMode, ModalState};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(f.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)].as_ref())
        .split(root[1]);

    render_header(f, root[0], app);

    match app.active_tab {
        ActiveTab::Customers => {
            customers::render_customers_table(f, body[0], app);
            customers::render_customer_form(f, body[1], app);
        }
        ActiveTab::Products => {
            products::render_products_table(f, body[0], app);
            products::render_product_form(f, body[1], app);
        }
        ActiveTab::Suppliers => {
            suppliers::render_suppliers_table(f, body[0], app);
            suppliers::render_supplier_form(f, body[1], app);
        }
    }

    components::render_notice_line(f, root[2], app);
    components::render_status_bar(f, root[3], app);

    if app.modal.is_some() {
        render_modal(f, f.area(), app);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let tabs = match app.active_tab {
        ActiveTab::Customers => "[Customers]  Products  Suppliers",
        ActiveTab::Products => "Customers  [Products]  Suppliers",
        ActiveTab::Suppliers => "Customers  Products  [Suppliers]",
    };
    let term = app.active_search_term();
    let prompt = match app.input_mode {
        InputMode::Search => format!("  search: {}_", term),
        _ if !term.is_empty() => format!("  search: {}", term),
        _ => String::new(),
    };
    let p = Paragraph::new(format!(
        "{tabs}{prompt}  — Tab: switch; /: search; n: new; Enter: edit; Delete: remove; ?: help; q: quit"
    ))
    .block(
        Block::default()
            .title("shoprec-manager")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(
        Style::default()
            .fg(app.theme.header_fg)
            .bg(app.theme.header_bg),
    );
    f.render_widget(p, area);
}

fn render_modal(f: &mut Frame, area: Rect, app: &mut AppState) {
    if let Some(state) = app.modal.clone() {
        match state {
            ModalState::ConfirmDelete { .. } => {
                components::render_confirm_modal(f, area, app, &state);
            }
            ModalState::Help { scroll } => {
                components::render_help_modal(f, area, app, scroll);
            }
            ModalState::Info { .. } => {
                components::render_info_modal(f, area, app, &state);
            }
        }
    }
}
