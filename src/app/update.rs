use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::Duration;
use tracing::info;

use crate::app::keymap::KeyAction;
use crate::app::{ActiveTab, AppConfig, AppState, InputMode, ModalState};
use crate::manager::{NoticeKind, ResourceManager};
use crate::records::{Customer, FieldKind, Product, Resource, Supplier};
use crate::store::{HttpStore, RecordStore, Session};
use crate::ui;

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    config: &AppConfig,
) -> Result<()> {
    let session = Session::default();
    let store = HttpStore::new(&config.api_url, session.clone())
        .map_err(|e| anyhow::anyhow!("init http client: {}", e))?;
    let mut app = AppState::new(config, session);

    // Draw one loading frame before the blocking initial fetches.
    app.customers.loading = true;
    app.products.loading = true;
    app.suppliers.loading = true;
    terminal.draw(|f| ui::render(f, &mut app))?;
    app.customers.refresh(&store);
    app.products.refresh(&store);
    app.suppliers.refresh(&store);
    info!(api_url = %config.api_url, "initial collections loaded");

    loop {
        app.tick();
        if app.session.is_unauthorized() {
            // The TUI equivalent of the original's redirect-to-login: leave
            // the application, whatever view triggered the 401.
            return Err(anyhow::anyhow!(
                "the server rejected the session (401): sign in again and restart"
            ));
        }

        terminal.draw(|f| ui::render(f, &mut app))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && !handle_key(&mut app, &store, key)
        {
            break;
        }
    }

    Ok(())
}

/// Route one key press. Returns false when the application should exit.
pub fn handle_key<S: RecordStore>(app: &mut AppState, store: &S, key: KeyEvent) -> bool {
    match app.input_mode {
        InputMode::Normal => handle_normal_key(app, store, key),
        InputMode::Search => {
            handle_search_key(app, key);
            true
        }
        InputMode::Form => {
            handle_form_key(app, store, key);
            true
        }
        InputMode::Modal => {
            handle_modal_key(app, store, key.code);
            true
        }
    }
}

fn handle_normal_key<S: RecordStore>(app: &mut AppState, store: &S, key: KeyEvent) -> bool {
    let Some(action) = app.keymap.resolve(&key) else {
        return true;
    };
    match action {
        KeyAction::Quit => return false,
        KeyAction::StartSearch => {
            with_search_term(app, |term| term.clear());
            app.input_mode = InputMode::Search;
        }
        KeyAction::SwitchTab => {
            app.active_tab = app.active_tab.next();
        }
        KeyAction::NewRecord => {
            // A fresh draft: drop any in-progress edit first.
            match app.active_tab {
                ActiveTab::Customers => app.customers.cancel_edit(),
                ActiveTab::Products => app.products.cancel_edit(),
                ActiveTab::Suppliers => app.suppliers.cancel_edit(),
            }
            enter_form(app);
        }
        KeyAction::EditSelection => {
            let index = app.selected_index();
            let started = match app.active_tab {
                ActiveTab::Customers => begin_edit(&mut app.customers, index),
                ActiveTab::Products => begin_edit(&mut app.products, index),
                ActiveTab::Suppliers => begin_edit(&mut app.suppliers, index),
            };
            if started {
                enter_form(app);
            }
        }
        KeyAction::DeleteSelection => request_delete(app),
        KeyAction::RefreshList => match app.active_tab {
            ActiveTab::Customers => app.customers.refresh(store),
            ActiveTab::Products => app.products.refresh(store),
            ActiveTab::Suppliers => app.suppliers.refresh(store),
        },
        KeyAction::DismissNotice => app.dismiss_active_notice(),
        KeyAction::OpenHelp => {
            app.modal = Some(ModalState::Help { scroll: 0 });
            app.input_mode = InputMode::Modal;
        }
        KeyAction::MoveUp => move_selection(app, -1),
        KeyAction::MoveDown => move_selection(app, 1),
        KeyAction::PageUp | KeyAction::MoveLeftPage => {
            move_selection(app, -(app.rows_per_page.max(1) as isize))
        }
        KeyAction::PageDown | KeyAction::MoveRightPage => {
            move_selection(app, app.rows_per_page.max(1) as isize)
        }
        KeyAction::Ignore => {}
    }
    true
}

fn handle_search_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        // Enter keeps the term; the view stays filtered in Normal mode.
        KeyCode::Enter => app.input_mode = InputMode::Normal,
        KeyCode::Esc => {
            with_search_term(app, |term| term.clear());
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => with_search_term(app, |term| {
            term.pop();
        }),
        KeyCode::Char(c) => with_search_term(app, |term| term.push(c)),
        _ => {}
    }
}

fn handle_form_key<S: RecordStore>(app: &mut AppState, store: &S, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            match app.active_tab {
                ActiveTab::Customers => app.customers.cancel_edit(),
                ActiveTab::Products => app.products.cancel_edit(),
                ActiveTab::Suppliers => app.suppliers.cancel_edit(),
            }
            leave_form(app);
        }
        KeyCode::Up | KeyCode::BackTab => {
            commit_focused(app);
            let count = form_field_count(app);
            if count > 0 {
                app.form_focus = (app.form_focus + count - 1) % count;
                app.form_buffer = current_field_value(app, app.form_focus);
            }
        }
        KeyCode::Down | KeyCode::Tab => {
            commit_focused(app);
            let count = form_field_count(app);
            if count > 0 {
                app.form_focus = (app.form_focus + 1) % count;
                app.form_buffer = current_field_value(app, app.form_focus);
            }
        }
        KeyCode::Enter => {
            if commit_focused(app) {
                submit_active(app, store);
            }
        }
        KeyCode::Backspace => {
            app.form_buffer.pop();
            clear_focused_error(app);
        }
        KeyCode::Char(' ') if focused_field_kind(app) == Some(FieldKind::Flag) => {
            app.form_buffer = if app.form_buffer.trim() == "1" {
                "0".to_string()
            } else {
                "1".to_string()
            };
            clear_focused_error(app);
        }
        KeyCode::Char(c) => {
            app.form_buffer.push(c);
            clear_focused_error(app);
        }
        _ => {}
    }
}

fn handle_modal_key<S: RecordStore>(app: &mut AppState, store: &S, code: KeyCode) {
    match &mut app.modal {
        Some(ModalState::ConfirmDelete {
            selected, tab, id, ..
        }) => match code {
            KeyCode::Esc => close_modal(app),
            KeyCode::Left | KeyCode::Right => {
                *selected = if *selected == 0 { 1 } else { 0 };
            }
            KeyCode::Enter => {
                let confirmed = *selected == 0;
                let (tab, id) = (*tab, *id);
                close_modal(app);
                if confirmed {
                    match tab {
                        ActiveTab::Customers => app.customers.remove_confirmed(store, id),
                        ActiveTab::Products => app.products.remove_confirmed(store, id),
                        ActiveTab::Suppliers => app.suppliers.remove_confirmed(store, id),
                    }
                    clamp_selection(app);
                }
            }
            _ => {}
        },
        Some(ModalState::Help { scroll }) => match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => close_modal(app),
            KeyCode::Up | KeyCode::Char('k') => *scroll = scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => *scroll = scroll.saturating_add(1),
            _ => {}
        },
        Some(ModalState::Info { .. }) => match code {
            KeyCode::Esc | KeyCode::Enter => close_modal(app),
            _ => {}
        },
        None => {}
    }
}

fn close_modal(app: &mut AppState) {
    app.modal = None;
    app.input_mode = InputMode::Normal;
}

fn enter_form(app: &mut AppState) {
    app.form_focus = 0;
    app.form_buffer = current_field_value(app, 0);
    app.input_mode = InputMode::Form;
}

fn leave_form(app: &mut AppState) {
    app.form_focus = 0;
    app.form_buffer.clear();
    app.input_mode = InputMode::Normal;
}

/// Load the record at `index` of the filtered view into the form.
fn begin_edit<T: Resource>(mgr: &mut ResourceManager<T>, index: usize) -> bool {
    let record = mgr.filtered().nth(index).cloned();
    match record {
        Some(record) => {
            mgr.edit(&record);
            true
        }
        None => false,
    }
}

fn request_delete(app: &mut AppState) {
    let index = app.selected_index();
    let target = match app.active_tab {
        ActiveTab::Customers => app
            .customers
            .filtered()
            .nth(index)
            .map(|c| (c.id, c.fields.name.clone())),
        ActiveTab::Products => app
            .products
            .filtered()
            .nth(index)
            .map(|p| (p.id, p.fields.name.clone())),
        ActiveTab::Suppliers => app
            .suppliers
            .filtered()
            .nth(index)
            .map(|s| (s.id, s.fields.name.clone())),
    };
    if let Some((id, label)) = target {
        // Default to No; deleting takes a deliberate keypress.
        app.modal = Some(ModalState::ConfirmDelete {
            selected: 1,
            tab: app.active_tab,
            id,
            label,
        });
        app.input_mode = InputMode::Modal;
    }
}

fn move_selection(app: &mut AppState, delta: isize) {
    let len = app.filtered_len();
    if len == 0 {
        app.set_selected_index(0);
        return;
    }
    let current = app.selected_index().min(len - 1);
    let next = if delta < 0 {
        current.saturating_sub(delta.unsigned_abs())
    } else {
        (current + delta as usize).min(len - 1)
    };
    app.set_selected_index(next);
}

fn clamp_selection(app: &mut AppState) {
    let len = app.filtered_len();
    if app.selected_index() >= len {
        app.set_selected_index(len.saturating_sub(1));
    }
}

fn with_search_term(app: &mut AppState, f: impl FnOnce(&mut String)) {
    match app.active_tab {
        ActiveTab::Customers => f(&mut app.customers.search_term),
        ActiveTab::Products => f(&mut app.products.search_term),
        ActiveTab::Suppliers => f(&mut app.suppliers.search_term),
    }
    app.set_selected_index(0);
}

fn form_field_count(app: &AppState) -> usize {
    match app.active_tab {
        ActiveTab::Customers => Customer::form_fields().len(),
        ActiveTab::Products => Product::form_fields().len(),
        ActiveTab::Suppliers => Supplier::form_fields().len(),
    }
}

fn field_value<T: Resource>(mgr: &ResourceManager<T>, index: usize) -> String {
    T::form_fields()
        .get(index)
        .map(|field| (field.get)(&mgr.form))
        .unwrap_or_default()
}

fn current_field_value(app: &AppState, index: usize) -> String {
    match app.active_tab {
        ActiveTab::Customers => field_value(&app.customers, index),
        ActiveTab::Products => field_value(&app.products, index),
        ActiveTab::Suppliers => field_value(&app.suppliers, index),
    }
}

fn focused_field_kind(app: &AppState) -> Option<FieldKind> {
    fn kind_at<T: Resource>(index: usize) -> Option<FieldKind> {
        T::form_fields().get(index).map(|field| field.kind)
    }
    match app.active_tab {
        ActiveTab::Customers => kind_at::<Customer>(app.form_focus),
        ActiveTab::Products => kind_at::<Product>(app.form_focus),
        ActiveTab::Suppliers => kind_at::<Supplier>(app.form_focus),
    }
}

/// Commit the focused field's buffer into the draft. Returns false when the
/// entry does not parse; the error lands on the field and the prior value is
/// kept, blocking submission until corrected.
fn commit_focused(app: &mut AppState) -> bool {
    let focus = app.form_focus;
    let buffer = app.form_buffer.clone();
    match app.active_tab {
        ActiveTab::Customers => commit_field(&mut app.customers, focus, &buffer),
        ActiveTab::Products => commit_field(&mut app.products, focus, &buffer),
        ActiveTab::Suppliers => commit_field(&mut app.suppliers, focus, &buffer),
    }
}

fn commit_field<T: Resource>(mgr: &mut ResourceManager<T>, index: usize, buffer: &str) -> bool {
    let fields = T::form_fields();
    let Some(field) = fields.get(index) else {
        return true;
    };
    match (field.set)(&mut mgr.form, buffer) {
        Ok(()) => {
            mgr.clear_field_error(field.key);
            true
        }
        Err(message) => {
            mgr.set_field_error(field.key, message);
            false
        }
    }
}

/// Editing a field clears its stale validation message.
fn clear_focused_error(app: &mut AppState) {
    fn clear<T: Resource>(mgr: &mut ResourceManager<T>, index: usize) {
        if let Some(field) = T::form_fields().get(index) {
            mgr.clear_field_error(field.key);
        }
    }
    let focus = app.form_focus;
    match app.active_tab {
        ActiveTab::Customers => clear(&mut app.customers, focus),
        ActiveTab::Products => clear(&mut app.products, focus),
        ActiveTab::Suppliers => clear(&mut app.suppliers, focus),
    }
}

fn submit_manager<T: Resource, S: RecordStore>(mgr: &mut ResourceManager<T>, store: &S) -> bool {
    mgr.submit(store);
    mgr.field_errors.is_empty()
        && !matches!(&mgr.notice, Some(n) if n.kind == NoticeKind::Submit)
}

fn submit_active<S: RecordStore>(app: &mut AppState, store: &S) {
    let saved = match app.active_tab {
        ActiveTab::Customers => submit_manager(&mut app.customers, store),
        ActiveTab::Products => submit_manager(&mut app.products, store),
        ActiveTab::Suppliers => submit_manager(&mut app.suppliers, store),
    };
    if saved {
        leave_form(app);
    }
    // Otherwise stay in the form: field errors (or the submit notice) are
    // on screen and the draft is intact for correction and retry.
}
