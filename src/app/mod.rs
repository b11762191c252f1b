//! Application state types and entry glue.
//!
//! Defines enums and structs that model the TUI state, as well as helpers
//! to construct defaults and to run the application loop (re-exported as `run`).
//!
pub mod keymap;
pub mod update;

use ratatui::style::Color;
use std::time::Instant;

use crate::manager::{Notice, ResourceManager};
use crate::records::{Customer, Product, Supplier};
use crate::store::Session;

/// Top-level active tab: one per managed collection.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActiveTab {
    Customers,
    Products,
    Suppliers,
}

impl ActiveTab {
    pub fn next(self) -> Self {
        match self {
            ActiveTab::Customers => ActiveTab::Products,
            ActiveTab::Products => ActiveTab::Suppliers,
            ActiveTab::Suppliers => ActiveTab::Customers,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ActiveTab::Customers => "Customers",
            ActiveTab::Products => "Products",
            ActiveTab::Suppliers => "Suppliers",
        }
    }
}

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    /// Editing the draft in the form pane.
    Form,
    Modal,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    /// Positive accents: credit balances, in-stock badges, success notices.
    pub ok: Color,
    /// Negative accents: debit balances, out-of-stock badges, error notices.
    pub err: Color,
}

impl Theme {
    /// Plain dark fallback theme.
    #[allow(dead_code)]
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            ok: Color::Green,
            err: Color::Red,
        }
    }

    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            ok: Color::Rgb(0xa6, 0xe3, 0xa1),           // green
            err: Color::Rgb(0xf3, 0x8b, 0xa8),          // red
        }
    }

    /// Load theme from a simple key=value file. Unknown or missing keys fall
    /// back to `mocha`.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            if key.is_empty() || val.is_empty() {
                continue;
            }
            if let Some(color) = Self::parse_color(val) {
                match key {
                    "text" => theme.text = color,
                    "muted" => theme.muted = color,
                    "title" => theme.title = color,
                    "border" => theme.border = color,
                    "header_bg" => theme.header_bg = color,
                    "header_fg" => theme.header_fg = color,
                    "status_bg" => theme.status_bg = color,
                    "status_fg" => theme.status_fg = color,
                    "highlight_fg" => theme.highlight_fg = color,
                    "highlight_bg" => theme.highlight_bg = color,
                    "ok" => theme.ok = color,
                    "err" => theme.err = color,
                    _ => {}
                }
            }
        }

        Some(theme)
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB"), a basic color name,
    /// or "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "reset" => return Some(Color::Reset),
            "black" => return Some(Color::Black),
            "red" => return Some(Color::Red),
            "green" => return Some(Color::Green),
            "yellow" => return Some(Color::Yellow),
            "blue" => return Some(Color::Blue),
            "magenta" => return Some(Color::Magenta),
            "cyan" => return Some(Color::Cyan),
            "gray" => return Some(Color::Gray),
            "darkgray" => return Some(Color::DarkGray),
            "white" => return Some(Color::White),
            _ => {}
        }
        let hex = lower.strip_prefix('#').unwrap_or(lower.as_str());
        if hex.len() == 6
            && let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            )
        {
            return Some(Color::Rgb(r, g, b));
        }
        None
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;

        fn color_to_str(c: Color) -> String {
            match c {
                Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
                Color::Reset => "reset".to_string(),
                other => format!("{:?}", other).to_ascii_lowercase(),
            }
        }

        let mut buf = String::new();
        buf.push_str("# shoprec-manager theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, a basic color name, or 'reset'\n\n");

        let mut kv = |k: &str, v: Color| {
            let _ = writeln!(&mut buf, "{} = {}", k, color_to_str(v));
        };
        kv("text", self.text);
        kv("muted", self.muted);
        kv("title", self.title);
        kv("border", self.border);
        kv("header_bg", self.header_bg);
        kv("header_fg", self.header_fg);
        kv("status_bg", self.status_bg);
        kv("status_fg", self.status_fg);
        kv("highlight_fg", self.highlight_fg);
        kv("highlight_bg", self.highlight_bg);
        kv("ok", self.ok);
        kv("err", self.err);

        std::fs::write(path, buf)
    }

    /// Ensure a config file exists; if missing, write one with the default
    /// theme and return it. If present, load from it; on parse errors,
    /// return `mocha`.
    pub fn load_or_init(path: &str) -> Self {
        let p = std::path::Path::new(path);
        if p.exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        if let Some(existing) = config_file_read_path("theme.conf") {
            return Self::from_file(&existing).unwrap_or_else(Self::mocha);
        }
        let theme = Self::mocha();
        let _ = theme.write_file(path);
        theme
    }
}

/// Resolve `name` inside the user's config directory, if such a file exists.
pub fn config_file_read_path(name: &str) -> Option<String> {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .filter(|s| !s.is_empty())
        .or_else(|| std::env::var("HOME").ok().map(|h| format!("{h}/.config")))?;
    let candidate = format!("{base}/shoprec-manager/{name}");
    std::path::Path::new(&candidate)
        .exists()
        .then_some(candidate)
}

/// Modal dialog states.
#[derive(Clone, Debug)]
pub enum ModalState {
    /// Destructive-action guard: the delete request is only issued from the
    /// Yes branch of this dialog.
    ConfirmDelete {
        selected: usize,
        tab: ActiveTab,
        id: i64,
        label: String,
    },
    Help {
        scroll: u16,
    },
    Info {
        message: String,
    },
}

/// Runtime configuration resolved from CLI flags and the environment.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_url: String,
    pub theme_path: String,
    pub keymap_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000/api".to_string(),
            theme_path: "theme.conf".to_string(),
            keymap_path: "keybinds.conf".to_string(),
        }
    }
}

pub struct AppState {
    pub started_at: Instant,
    pub customers: ResourceManager<Customer>,
    pub products: ResourceManager<Product>,
    pub suppliers: ResourceManager<Supplier>,
    pub active_tab: ActiveTab,
    pub selected_customer: usize,
    pub selected_product: usize,
    pub selected_supplier: usize,
    pub rows_per_page: usize,
    pub input_mode: InputMode,
    /// Index into the active resource's form fields while in Form mode.
    pub form_focus: usize,
    /// Text being typed into the focused form field; committed on focus
    /// move or submit.
    pub form_buffer: String,
    pub theme: Theme,
    pub keymap: keymap::Keymap,
    pub modal: Option<ModalState>,
    pub session: Session,
}

impl AppState {
    /// Create a fresh `AppState`; collections start empty and are filled by
    /// the initial refresh in the event loop.
    pub fn new(config: &AppConfig, session: Session) -> Self {
        Self {
            started_at: Instant::now(),
            customers: ResourceManager::new(),
            products: ResourceManager::new(),
            suppliers: ResourceManager::new(),
            active_tab: ActiveTab::Customers,
            selected_customer: 0,
            selected_product: 0,
            selected_supplier: 0,
            rows_per_page: 10,
            input_mode: InputMode::Normal,
            form_focus: 0,
            form_buffer: String::new(),
            theme: Theme::load_or_init(&config.theme_path),
            keymap: keymap::Keymap::load_or_init(&config.keymap_path),
            modal: None,
            session,
        }
    }

    /// Expire transient notices on all three managers.
    pub fn tick(&mut self) {
        self.customers.tick();
        self.products.tick();
        self.suppliers.tick();
    }

    pub fn selected_index(&self) -> usize {
        match self.active_tab {
            ActiveTab::Customers => self.selected_customer,
            ActiveTab::Products => self.selected_product,
            ActiveTab::Suppliers => self.selected_supplier,
        }
    }

    pub fn set_selected_index(&mut self, index: usize) {
        match self.active_tab {
            ActiveTab::Customers => self.selected_customer = index,
            ActiveTab::Products => self.selected_product = index,
            ActiveTab::Suppliers => self.selected_supplier = index,
        }
    }

    /// Number of records in the active tab's filtered view.
    pub fn filtered_len(&self) -> usize {
        match self.active_tab {
            ActiveTab::Customers => self.customers.filtered().count(),
            ActiveTab::Products => self.products.filtered().count(),
            ActiveTab::Suppliers => self.suppliers.filtered().count(),
        }
    }

    pub fn collection_len(&self) -> usize {
        match self.active_tab {
            ActiveTab::Customers => self.customers.collection.len(),
            ActiveTab::Products => self.products.collection.len(),
            ActiveTab::Suppliers => self.suppliers.collection.len(),
        }
    }

    pub fn active_search_term(&self) -> &str {
        match self.active_tab {
            ActiveTab::Customers => &self.customers.search_term,
            ActiveTab::Products => &self.products.search_term,
            ActiveTab::Suppliers => &self.suppliers.search_term,
        }
    }

    pub fn active_loading(&self) -> bool {
        match self.active_tab {
            ActiveTab::Customers => self.customers.loading,
            ActiveTab::Products => self.products.loading,
            ActiveTab::Suppliers => self.suppliers.loading,
        }
    }

    pub fn active_editing_id(&self) -> Option<i64> {
        match self.active_tab {
            ActiveTab::Customers => self.customers.editing_id,
            ActiveTab::Products => self.products.editing_id,
            ActiveTab::Suppliers => self.suppliers.editing_id,
        }
    }

    pub fn active_notice(&self) -> Option<&Notice> {
        match self.active_tab {
            ActiveTab::Customers => self.customers.notice.as_ref(),
            ActiveTab::Products => self.products.notice.as_ref(),
            ActiveTab::Suppliers => self.suppliers.notice.as_ref(),
        }
    }

    pub fn dismiss_active_notice(&mut self) {
        match self.active_tab {
            ActiveTab::Customers => self.customers.dismiss_notice(),
            ActiveTab::Products => self.products.dismiss_notice(),
            ActiveTab::Suppliers => self.suppliers.dismiss_notice(),
        }
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
