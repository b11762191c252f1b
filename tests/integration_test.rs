// Integration tests for shoprec-manager

use std::cell::{Cell, RefCell};
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::{Value, json};

use shoprec_manager::app::keymap::Keymap;
use shoprec_manager::app::update::handle_key;
use shoprec_manager::app::{ActiveTab, AppState, InputMode, ModalState, Theme};
use shoprec_manager::manager::ResourceManager;
use shoprec_manager::records::{CustomerDraft, Product, Resource};
use shoprec_manager::store::{RecordStore, Session, StoreError, normalize_list};

/// In-memory stand-in for the remote store, with call counters.
#[derive(Default)]
struct MemStore {
    rows: RefCell<Vec<Value>>,
    next_id: Cell<i64>,
    creates: Cell<usize>,
    deletes: Cell<usize>,
}

impl MemStore {
    fn with_rows(rows: Vec<Value>) -> Self {
        let store = Self::default();
        store.next_id.set(rows.len() as i64 + 1);
        *store.rows.borrow_mut() = rows;
        store
    }
}

impl RecordStore for MemStore {
    fn list<T: Resource>(&self) -> Result<Vec<T>, StoreError> {
        normalize_list(Value::Array(self.rows.borrow().clone()))
    }

    fn create<T: Resource>(&self, draft: &T::Draft) -> Result<(), StoreError> {
        self.creates.set(self.creates.get() + 1);
        let mut row = serde_json::to_value(draft).unwrap();
        row[T::ID_FIELD] = json!(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.rows.borrow_mut().push(row);
        Ok(())
    }

    fn replace<T: Resource>(&self, id: i64, draft: &T::Draft) -> Result<(), StoreError> {
        let mut rows = self.rows.borrow_mut();
        let slot = rows
            .iter_mut()
            .find(|r| r[T::ID_FIELD] == json!(id))
            .expect("record to replace");
        let mut row = serde_json::to_value(draft).unwrap();
        row[T::ID_FIELD] = json!(id);
        *slot = row;
        Ok(())
    }

    fn delete<T: Resource>(&self, id: i64) -> Result<(), StoreError> {
        self.deletes.set(self.deletes.get() + 1);
        self.rows.borrow_mut().retain(|r| r[T::ID_FIELD] != json!(id));
        Ok(())
    }
}

fn test_app() -> AppState {
    AppState {
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
        theme: Theme::mocha(),
        keymap: Keymap::new_defaults(),
        modal: None,
        session: Session::default(),
    }
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn customer_row(id: i64, name: &str) -> Value {
    json!({"customerID": id, "customerName": name})
}

// 1) Theme config roundtrip and init
#[test]
fn theme_roundtrip_and_init() {
    use std::{
        fs,
        path::PathBuf,
        time::{SystemTime, UNIX_EPOCH},
    };

    // Unique temp path
    let mut path = std::env::temp_dir();
    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    path.push(format!("srm_theme_{}_{}.conf", std::process::id(), nonce));
    let path_str = path.to_string_lossy().to_string();

    // Roundtrip write/read
    let t = Theme::mocha();
    t.write_file(&path_str).expect("write theme");
    let t2 = Theme::from_file(&path_str).expect("read theme");
    assert_eq!(format!("{:?}", t.text), format!("{:?}", t2.text));
    assert_eq!(format!("{:?}", t.title), format!("{:?}", t2.title));
    assert_eq!(format!("{:?}", t.ok), format!("{:?}", t2.ok));
    assert_eq!(format!("{:?}", t.err), format!("{:?}", t2.err));

    // load_or_init creates the file if missing
    let mut p2 = PathBuf::from(&path_str);
    p2.set_file_name(format!(
        "{}_init.conf",
        p2.file_stem().unwrap().to_string_lossy()
    ));
    let p2_str = p2.to_string_lossy().to_string();
    let _ = fs::remove_file(&p2_str);
    let _created = Theme::load_or_init(&p2_str);
    assert!(PathBuf::from(&p2_str).exists());

    // Cleanup best-effort
    let _ = fs::remove_file(&path_str);
    let _ = fs::remove_file(&p2_str);
}

// 2) Keymap roundtrip with a user override
#[test]
fn keymap_roundtrip_and_override() {
    use std::{
        fs,
        time::{SystemTime, UNIX_EPOCH},
    };

    let mut path = std::env::temp_dir();
    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    path.push(format!("srm_keys_{}_{}.conf", std::process::id(), nonce));
    let path_str = path.to_string_lossy().to_string();

    let km = Keymap::new_defaults();
    km.write_file(&path_str).expect("write keymap");
    let reloaded = Keymap::from_file(&path_str).expect("read keymap");
    assert_eq!(
        reloaded.resolve(&key(KeyCode::Char('q'))),
        Some(shoprec_manager::app::keymap::KeyAction::Quit)
    );

    // Append an override and reload: Quit moves to Q.
    let mut contents = fs::read_to_string(&path_str).unwrap();
    contents.push_str("\nQuit = Q\n");
    fs::write(&path_str, contents).unwrap();
    let overridden = Keymap::from_file(&path_str).expect("read keymap");
    assert_eq!(
        overridden.resolve(&key(KeyCode::Char('Q'))),
        Some(shoprec_manager::app::keymap::KeyAction::Quit)
    );

    let _ = fs::remove_file(&path_str);
}

// 3) Deleting requires explicit confirmation
#[test]
fn delete_without_confirmation_issues_no_call() {
    let store = MemStore::with_rows(vec![customer_row(1, "Acme")]);
    let mut app = test_app();
    app.customers.refresh(&store);
    assert_eq!(app.customers.collection.len(), 1);

    // Asking to delete only opens the dialog.
    handle_key(&mut app, &store, key(KeyCode::Delete));
    assert!(matches!(app.modal, Some(ModalState::ConfirmDelete { .. })));
    assert_eq!(store.deletes.get(), 0);
    assert_eq!(app.customers.collection.len(), 1);

    // Escaping the dialog deletes nothing.
    handle_key(&mut app, &store, key(KeyCode::Esc));
    assert!(app.modal.is_none());
    assert_eq!(store.deletes.get(), 0);
    assert_eq!(app.customers.collection.len(), 1);

    // Enter on the default answer (No) deletes nothing either.
    handle_key(&mut app, &store, key(KeyCode::Delete));
    handle_key(&mut app, &store, key(KeyCode::Enter));
    assert_eq!(store.deletes.get(), 0);
    assert_eq!(app.customers.collection.len(), 1);
}

#[test]
fn delete_after_confirmation_removes_and_reloads() {
    let store = MemStore::with_rows(vec![customer_row(1, "Acme"), customer_row(2, "Bolt")]);
    let mut app = test_app();
    app.customers.refresh(&store);

    handle_key(&mut app, &store, key(KeyCode::Delete));
    handle_key(&mut app, &store, key(KeyCode::Left)); // toggle to Yes
    handle_key(&mut app, &store, key(KeyCode::Enter));

    assert_eq!(store.deletes.get(), 1);
    assert_eq!(app.customers.collection.len(), 1);
    assert_eq!(app.customers.collection[0].id, 2);
    assert!(app.customers.notice.is_some());
}

// 4) Creating a record through the form keys
#[test]
fn create_record_through_the_form() {
    let store = MemStore::default();
    let mut app = test_app();

    handle_key(&mut app, &store, key(KeyCode::Char('n')));
    assert_eq!(app.input_mode, InputMode::Form);
    for c in "Acme".chars() {
        handle_key(&mut app, &store, key(KeyCode::Char(c)));
    }
    handle_key(&mut app, &store, key(KeyCode::Enter));

    assert_eq!(store.creates.get(), 1);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.customers.collection.len(), 1);
    assert_eq!(app.customers.collection[0].fields.name, "Acme");
    // The form is back to schema defaults with no editing id.
    assert_eq!(app.customers.form, CustomerDraft::default());
    assert!(app.customers.editing_id.is_none());
}

#[test]
fn invalid_form_blocks_submission_and_stays_open() {
    let store = MemStore::default();
    let mut app = test_app();

    handle_key(&mut app, &store, key(KeyCode::Char('n')));
    handle_key(&mut app, &store, key(KeyCode::Enter)); // blank name

    assert_eq!(store.creates.get(), 0, "fail-fast: nothing was sent");
    assert_eq!(app.input_mode, InputMode::Form);
    assert!(app.customers.field_errors.contains_key("customerName"));
}

#[test]
fn unparseable_numeric_entry_blocks_submission() {
    let store = MemStore::default();
    let mut app = test_app();

    handle_key(&mut app, &store, key(KeyCode::Char('n')));
    for c in "Acme".chars() {
        handle_key(&mut app, &store, key(KeyCode::Char(c)));
    }
    // Moving focus commits the name.
    handle_key(&mut app, &store, key(KeyCode::Down));
    // Jump to the tax number field and type something non-numeric.
    let tax = shoprec_manager::records::Customer::form_fields()
        .iter()
        .position(|f| f.key == "tax_number")
        .unwrap();
    app.form_focus = tax;
    app.form_buffer = "12x".to_string();
    handle_key(&mut app, &store, key(KeyCode::Enter));

    assert_eq!(store.creates.get(), 0);
    assert_eq!(app.input_mode, InputMode::Form);
    assert!(app.customers.field_errors.contains_key("tax_number"));

    // Editing the field clears the error; a valid entry goes through.
    handle_key(&mut app, &store, key(KeyCode::Backspace));
    assert!(!app.customers.field_errors.contains_key("tax_number"));
    handle_key(&mut app, &store, key(KeyCode::Enter));
    assert_eq!(store.creates.get(), 1);
    assert_eq!(app.customers.collection[0].fields.tax_number, 12);
}

// 5) Editing a product updates it wholesale under the same id
#[test]
fn edit_product_price_survives_refresh() {
    let store = MemStore::with_rows(vec![json!({
        "productID": 1, "productName": "A", "price1": 10.0, "numberOfUnits": 2
    })]);
    let mut app = test_app();
    app.active_tab = ActiveTab::Products;
    app.products.refresh(&store);

    // Enter edit mode on the selected row.
    handle_key(&mut app, &store, key(KeyCode::Enter));
    assert_eq!(app.input_mode, InputMode::Form);
    assert_eq!(app.products.editing_id, Some(1));

    // Walk down to the sell price field; each step commits the previous one.
    let price = Product::form_fields()
        .iter()
        .position(|f| f.key == "price1")
        .unwrap();
    for _ in 0..price {
        handle_key(&mut app, &store, key(KeyCode::Down));
    }
    app.form_buffer = "20".to_string();
    handle_key(&mut app, &store, key(KeyCode::Enter));

    assert_eq!(app.products.editing_id, None);
    assert_eq!(app.products.collection.len(), 1);
    assert_eq!(app.products.collection[0].id, 1);
    assert_eq!(app.products.collection[0].fields.price1, 20.0);
    // Fields not touched in the form kept their values.
    assert_eq!(app.products.collection[0].fields.units, 2);
}

// 6) Live search narrows the active tab and Esc restores it
#[test]
fn live_search_filters_and_esc_restores() {
    let store = MemStore::with_rows(vec![
        customer_row(1, "Widget Works"),
        customer_row(2, "Acme"),
    ]);
    let mut app = test_app();
    app.customers.refresh(&store);

    handle_key(&mut app, &store, key(KeyCode::Char('/')));
    assert_eq!(app.input_mode, InputMode::Search);
    for c in "wid".chars() {
        handle_key(&mut app, &store, key(KeyCode::Char(c)));
    }
    assert_eq!(app.filtered_len(), 1);

    // Enter keeps the filter applied in normal mode.
    handle_key(&mut app, &store, key(KeyCode::Enter));
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.filtered_len(), 1);

    // A second search cancelled with Esc clears the term entirely.
    handle_key(&mut app, &store, key(KeyCode::Char('/')));
    handle_key(&mut app, &store, key(KeyCode::Esc));
    assert_eq!(app.filtered_len(), 2);
}

// 7) Rendering smoke tests across tabs, form and modals
#[test]
fn ui_render_smoke() {
    use ratatui::{Terminal, backend::TestBackend};
    use shoprec_manager::ui::render;

    let store = MemStore::with_rows(vec![customer_row(1, "Acme")]);
    let backend = TestBackend::new(100, 30);
    let mut terminal = Terminal::new(backend).expect("create terminal");
    let mut app = test_app();
    app.customers.refresh(&store);

    for tab in [
        ActiveTab::Customers,
        ActiveTab::Products,
        ActiveTab::Suppliers,
    ] {
        app.active_tab = tab;
        terminal.draw(|f| render(f, &mut app)).expect("render tab");
    }

    // Form mode with a field error on screen.
    app.active_tab = ActiveTab::Customers;
    handle_key(&mut app, &store, key(KeyCode::Char('n')));
    handle_key(&mut app, &store, key(KeyCode::Enter));
    terminal.draw(|f| render(f, &mut app)).expect("render form");

    // Confirmation dialog.
    handle_key(&mut app, &store, key(KeyCode::Esc));
    handle_key(&mut app, &store, key(KeyCode::Delete));
    terminal.draw(|f| render(f, &mut app)).expect("render modal");

    // Help.
    handle_key(&mut app, &store, key(KeyCode::Esc));
    handle_key(&mut app, &store, key(KeyCode::Char('?')));
    terminal.draw(|f| render(f, &mut app)).expect("render help");
}

#[test]
fn ui_render_with_empty_data() {
    use ratatui::{Terminal, backend::TestBackend};
    use shoprec_manager::ui::render;

    let backend = TestBackend::new(80, 24);
    let mut terminal = Terminal::new(backend).expect("create terminal");
    let mut app = test_app();
    terminal
        .draw(|f| render(f, &mut app))
        .expect("render frame with empty data");
}
