//! Shared UI components (status bar, notice line, form pane, modals).
//!
//! Contains the building blocks reused by the three collection screens.
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::{AppState, InputMode, ModalState};
use crate::records::{FieldDef, FieldErrors};

/// Render the bottom status bar with mode and counts.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Form => "FORM",
        InputMode::Modal => "MODAL",
    };
    let editing = match app.active_editing_id() {
        Some(id) => format!("  editing:#{id}"),
        None => String::new(),
    };
    let msg = format!(
        "mode: {mode}  {}: showing {} of {}  rows/page:{}{}  up:{}s",
        app.active_tab.title().to_lowercase(),
        app.filtered_len(),
        app.collection_len(),
        app.rows_per_page,
        editing,
        app.started_at.elapsed().as_secs(),
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Render the active tab's notice banner, if any.
pub fn render_notice_line(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(notice) = app.active_notice() else {
        f.render_widget(Paragraph::new(""), area);
        return;
    };
    let color = if notice.is_error() {
        app.theme.err
    } else {
        app.theme.ok
    };
    let p = Paragraph::new(format!("{}  (x to dismiss)", notice.text))
        .style(Style::default().fg(color));
    f.render_widget(p, area);
}

/// Money formatting used by the value columns.
pub fn money(v: f64) -> String {
    format!("{:.2}", v)
}

/// Render the draft editor pane for the active resource.
///
/// The focused field shows the live entry buffer; validation and entry
/// errors appear inline under their field.
pub fn render_form_pane<D>(
    f: &mut Frame,
    area: Rect,
    app: &AppState,
    title: &str,
    fields: &[FieldDef<D>],
    draft: &D,
    errors: &FieldErrors,
) {
    let in_form = app.input_mode == InputMode::Form;
    let mut lines: Vec<Line> = Vec::new();
    for (i, field) in fields.iter().enumerate() {
        let focused = in_form && i == app.form_focus;
        let value = if focused {
            format!("{}_", app.form_buffer)
        } else {
            (field.get)(draft)
        };
        let marker = if focused { "▶ " } else { "  " };
        let label_style = if focused {
            Style::default()
                .fg(app.theme.highlight_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{}{:<22}", marker, field.label), label_style),
            Span::styled(value, Style::default().fg(app.theme.text)),
        ]));
        if let Some(message) = errors.get(field.key) {
            lines.push(Line::from(Span::styled(
                format!("      {}", message),
                Style::default().fg(app.theme.err),
            )));
        }
    }
    lines.push(Line::raw(""));
    let hint = if in_form {
        "Enter: save   Tab/↓ ↑: field   Space: toggle flag   Esc: cancel"
    } else {
        "n: new record   Enter: edit selection"
    };
    lines.push(Line::from(Span::styled(
        hint,
        Style::default().fg(app.theme.muted),
    )));

    // Keep the focused field in view on small terminals.
    let visible = area.height.saturating_sub(2);
    let scroll = if in_form {
        (app.form_focus as u16).saturating_sub(visible.saturating_sub(2) / 2)
    } else {
        0
    };

    let p = Paragraph::new(lines).scroll((scroll, 0)).block(
        Block::default()
            .title(title.to_string())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the delete confirmation dialog.
pub fn render_confirm_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::ConfirmDelete {
        selected,
        tab,
        id,
        label,
    } = state
    {
        let rect = centered_rect(54, 7, area);
        let kind = tab.title().trim_end_matches('s').to_lowercase();
        let yes = if *selected == 0 { "[Yes]" } else { " Yes " };
        let no = if *selected == 1 { "[No]" } else { " No  " };
        let body = format!(
            "Delete {kind} '{label}' (id {id})?\nThis cannot be undone.\n\n  {yes}    {no}"
        );
        let p = Paragraph::new(body).wrap(Wrap { trim: false }).block(
            Block::default()
                .title("Confirm delete")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}

/// Render a generic informational modal dialog.
pub fn render_info_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::Info { message } = state {
        let max_w = area.width.saturating_sub(6).max(30);
        let min_w = 40u16.min(max_w);
        let approx_lines = (message.len() as u16 / (min_w.saturating_sub(4).max(10))).max(1);
        let max_h = area.height.saturating_sub(6).max(5);
        let height = (approx_lines + 4).min(max_h).max(5);
        let rect = centered_rect(min_w, height, area);
        let p = Paragraph::new(message.clone())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("Info")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(app.theme.border)),
            );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}

/// Render the help modal with usage information and key tips.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 76u16.min(area.width.saturating_sub(4)).max(56);
    let height = 20u16.min(area.height.saturating_sub(4)).max(12);
    let rect = centered_rect(width, height, area);

    let key = |s: &str| Span::styled(s.to_string(), Style::default().add_modifier(Modifier::ITALIC));
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "Help",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::from(vec![Span::raw("Switch collection: "), key("Tab")]),
        Line::from(vec![
            Span::raw("Search: "),
            key("/"),
            Span::raw(" filters as you type; Enter keeps the filter, Esc clears it"),
        ]),
        Line::from(vec![Span::raw("Navigate: "), key("Arrow keys / h j k l / PageUp / PageDown")]),
        Line::from(vec![Span::raw("Reload from server: "), key("r")]),
        Line::from(vec![Span::raw("Dismiss notice: "), key("x")]),
        Line::raw(""),
        Line::from(Span::styled(
            "Records",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![Span::raw("New record: "), key("n")]),
        Line::from(vec![Span::raw("Edit selection: "), key("Enter"), Span::raw(" or "), key("e")]),
        Line::from(vec![Span::raw("Delete selection: "), key("Delete"), Span::raw(" (asks for confirmation)")]),
        Line::raw(""),
        Line::from(Span::styled(
            "Form",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![Span::raw("Next / previous field: "), key("Tab / Shift+Tab"), Span::raw(" (or "), key("↓ / ↑"), Span::raw(")")]),
        Line::from(vec![Span::raw("Toggle a type field: "), key("Space")]),
        Line::from(vec![Span::raw("Save: "), key("Enter"), Span::raw("   Cancel: "), key("Esc")]),
        Line::raw(""),
        Line::from(vec![Span::raw("Quit: "), key("q"), Span::raw("   Close help: "), key("Esc / Enter")]),
    ];

    // Custom bindings from keybinds.conf are listed after the basics.
    let mut bindings = app.keymap.all_bindings();
    bindings.sort_by_key(|(_, action)| crate::app::keymap::format_action(*action));
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Active bindings",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for ((mods, code), action) in bindings {
        lines.push(Line::from(vec![
            Span::raw(format!(
                "  {:<16}",
                crate::app::keymap::format_action(action)
            )),
            key(&crate::app::keymap::Keymap::format_key(mods, code)),
        ]));
    }

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
