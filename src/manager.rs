//! Generic CRUD lifecycle manager; the application owns one instance per
//! resource kind.
//!
//! The manager is the single source of truth for its collection. Every
//! mutation is pessimistic: after a successful create, replace or delete the
//! collection is reloaded from the store rather than patched in place, so
//! the UI reflects server state even when the server transforms the payload.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::records::{FieldErrors, Resource};
use crate::search;
use crate::store::RecordStore;

/// How long a transient success notice stays on screen.
pub const SUCCESS_NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    /// List load failed; the prior collection is retained.
    Fetch,
    /// Create/replace failed; the form is retained for retry.
    Submit,
    /// Delete failed; the collection is unchanged.
    Delete,
}

/// A dismissible inline banner. Success notices self-expire; error notices
/// stay until dismissed or replaced.
#[derive(Clone, Debug)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    pub expires_at: Option<Instant>,
}

impl Notice {
    fn success(text: String) -> Self {
        Self {
            kind: NoticeKind::Success,
            text,
            expires_at: Some(Instant::now() + SUCCESS_NOTICE_TTL),
        }
    }

    fn error(kind: NoticeKind, text: String) -> Self {
        Self {
            kind,
            text,
            expires_at: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind != NoticeKind::Success
    }
}

pub struct ResourceManager<T: Resource> {
    /// Last successfully fetched list; never partially replaced.
    pub collection: Vec<T>,
    /// True only while a list fetch is in flight.
    pub loading: bool,
    pub search_term: String,
    /// Current draft, always schema-complete.
    pub form: T::Draft,
    /// At most one record is being edited at a time.
    pub editing_id: Option<i64>,
    pub field_errors: FieldErrors,
    pub notice: Option<Notice>,
}

impl<T: Resource> ResourceManager<T> {
    pub fn new() -> Self {
        Self {
            collection: Vec::new(),
            loading: false,
            search_term: String::new(),
            form: T::Draft::default(),
            editing_id: None,
            field_errors: FieldErrors::new(),
            notice: None,
        }
    }

    /// Reload the collection from the store. On failure the prior collection
    /// stays visible (stale-but-available) and a fetch notice is raised.
    pub fn refresh<S: RecordStore>(&mut self, store: &S) {
        self.loading = true;
        match store.list::<T>() {
            Ok(rows) => {
                debug!(kind = T::LABEL, count = rows.len(), "collection loaded");
                self.collection = rows;
                if matches!(&self.notice, Some(n) if n.kind == NoticeKind::Fetch) {
                    self.notice = None;
                }
            }
            Err(err) => {
                warn!(kind = T::LABEL, error = %err, "collection load failed");
                self.notice = Some(Notice::error(
                    NoticeKind::Fetch,
                    format!("Failed to load {}s: {}", T::LABEL, err),
                ));
            }
        }
        self.loading = false;
    }

    /// Validate, then create or replace depending on `editing_id`.
    ///
    /// Validation failure sets the field errors and makes no network call.
    /// Success resets the form, leaves edit mode and reloads the collection;
    /// failure keeps the user's input so the submission can be corrected and
    /// retried.
    pub fn submit<S: RecordStore>(&mut self, store: &S) {
        let errors = T::validate(&self.form);
        if !errors.is_empty() {
            self.field_errors = errors;
            return;
        }

        let result = match self.editing_id {
            Some(id) => store.replace::<T>(id, &self.form),
            None => store.create::<T>(&self.form),
        };
        match result {
            Ok(()) => {
                let verb = if self.editing_id.is_some() {
                    "updated"
                } else {
                    "added"
                };
                info!(kind = T::LABEL, verb, "record saved");
                self.form = T::Draft::default();
                self.editing_id = None;
                self.field_errors.clear();
                self.notice = Some(Notice::success(format!(
                    "{} {}",
                    capitalize(T::LABEL),
                    verb
                )));
                // A failed reload will replace the success banner with the
                // fetch error, which is the more urgent of the two.
                self.refresh(store);
            }
            Err(err) => {
                warn!(kind = T::LABEL, error = %err, "save failed");
                self.notice = Some(Notice::error(
                    NoticeKind::Submit,
                    format!("Failed to save {}: {}", T::LABEL, err),
                ));
            }
        }
    }

    /// Begin editing `record` locally. No fetch, no server-side lock;
    /// concurrent edits resolve last-write-wins at the server.
    pub fn edit(&mut self, record: &T) {
        self.form = record.draft();
        self.editing_id = Some(record.id());
        self.field_errors.clear();
    }

    /// Leave edit mode and discard unsaved input.
    pub fn cancel_edit(&mut self) {
        self.form = T::Draft::default();
        self.editing_id = None;
        self.field_errors.clear();
    }

    /// Delete `id`. Callers must have confirmed the action interactively;
    /// the only path here is the confirmation dialog's Yes branch.
    pub fn remove_confirmed<S: RecordStore>(&mut self, store: &S, id: i64) {
        match store.delete::<T>(id) {
            Ok(()) => {
                info!(kind = T::LABEL, id, "record deleted");
                self.notice = Some(Notice::success(format!(
                    "{} deleted",
                    capitalize(T::LABEL)
                )));
                self.refresh(store);
            }
            Err(err) => {
                warn!(kind = T::LABEL, id, error = %err, "delete failed");
                self.notice = Some(Notice::error(
                    NoticeKind::Delete,
                    format!("Failed to delete {}: {}", T::LABEL, err),
                ));
            }
        }
    }

    /// Lazy view over the collection for the current search term; pure
    /// projection, recomputed by the caller on every render.
    pub fn filtered(&self) -> impl Iterator<Item = &T> {
        search::filtered(&self.collection, &self.search_term)
    }

    /// Expire the transient success notice.
    pub fn tick(&mut self) {
        if let Some(notice) = &self.notice
            && let Some(at) = notice.expires_at
            && Instant::now() >= at
        {
            self.notice = None;
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Record an entry-boundary error (e.g. a numeric field that failed to
    /// parse). Cleared when the field is edited again.
    pub fn set_field_error(&mut self, key: &'static str, message: String) {
        self.field_errors.insert(key, message);
    }

    pub fn clear_field_error(&mut self, key: &str) {
        self.field_errors.remove(key);
    }
}

impl<T: Resource> Default for ResourceManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Customer, CustomerDraft, Product, ProductDraft, Resource};
    use crate::store::{StoreError, normalize_list};
    use serde_json::{Value, json};
    use std::cell::{Cell, RefCell};

    /// In-memory stand-in for the remote store, with switchable failure
    /// modes and call counters.
    #[derive(Default)]
    struct MemStore {
        rows: RefCell<Vec<Value>>,
        next_id: Cell<i64>,
        fail_reads: Cell<bool>,
        fail_writes: Cell<bool>,
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

        fn failure() -> StoreError {
            StoreError {
                status: Some(500),
                message: Some("boom".to_string()),
                detail: "server returned status 500".to_string(),
            }
        }
    }

    impl RecordStore for MemStore {
        fn list<T: Resource>(&self) -> Result<Vec<T>, StoreError> {
            if self.fail_reads.get() {
                return Err(Self::failure());
            }
            normalize_list(Value::Array(self.rows.borrow().clone()))
        }

        fn create<T: Resource>(&self, draft: &T::Draft) -> Result<(), StoreError> {
            self.creates.set(self.creates.get() + 1);
            if self.fail_writes.get() {
                return Err(Self::failure());
            }
            let mut row = serde_json::to_value(draft).unwrap();
            row[T::ID_FIELD] = json!(self.next_id.get());
            self.next_id.set(self.next_id.get() + 1);
            self.rows.borrow_mut().push(row);
            Ok(())
        }

        fn replace<T: Resource>(&self, id: i64, draft: &T::Draft) -> Result<(), StoreError> {
            if self.fail_writes.get() {
                return Err(Self::failure());
            }
            let mut rows = self.rows.borrow_mut();
            match rows.iter_mut().find(|r| r[T::ID_FIELD] == json!(id)) {
                Some(slot) => {
                    let mut row = serde_json::to_value(draft).unwrap();
                    row[T::ID_FIELD] = json!(id);
                    *slot = row;
                    Ok(())
                }
                None => Err(StoreError {
                    status: Some(404),
                    message: None,
                    detail: "server returned status 404".to_string(),
                }),
            }
        }

        fn delete<T: Resource>(&self, id: i64) -> Result<(), StoreError> {
            self.deletes.set(self.deletes.get() + 1);
            if self.fail_writes.get() {
                return Err(Self::failure());
            }
            self.rows.borrow_mut().retain(|r| r[T::ID_FIELD] != json!(id));
            Ok(())
        }
    }

    fn customer_row(id: i64, name: &str) -> Value {
        json!({"customerID": id, "customerName": name})
    }

    #[test]
    fn refresh_replaces_collection() {
        let store = MemStore::with_rows(vec![customer_row(1, "A"), customer_row(2, "B")]);
        let mut mgr: ResourceManager<Customer> = ResourceManager::new();
        mgr.refresh(&store);
        assert_eq!(mgr.collection.len(), 2);
        assert!(!mgr.loading);
        assert!(mgr.notice.is_none());
    }

    #[test]
    fn failed_refresh_keeps_prior_collection() {
        let store = MemStore::with_rows(vec![customer_row(1, "A")]);
        let mut mgr: ResourceManager<Customer> = ResourceManager::new();
        mgr.refresh(&store);
        assert_eq!(mgr.collection.len(), 1);

        store.fail_reads.set(true);
        mgr.refresh(&store);
        assert_eq!(mgr.collection.len(), 1, "stale-but-available");
        let notice = mgr.notice.as_ref().expect("fetch notice");
        assert_eq!(notice.kind, NoticeKind::Fetch);
        assert!(!mgr.loading);
    }

    #[test]
    fn invalid_draft_submits_nothing() {
        let store = MemStore::default();
        let mut mgr: ResourceManager<Customer> = ResourceManager::new();
        mgr.form = CustomerDraft::default(); // blank name
        mgr.submit(&store);
        assert_eq!(store.creates.get(), 0, "fail-fast: no network effect");
        assert!(mgr.field_errors.contains_key("customerName"));
        assert!(mgr.notice.is_none());
    }

    #[test]
    fn successful_create_resets_form_and_reloads() {
        let store = MemStore::default();
        let mut mgr: ResourceManager<Customer> = ResourceManager::new();
        mgr.form.name = "Acme".to_string();
        mgr.submit(&store);

        assert_eq!(mgr.form, CustomerDraft::default());
        assert_eq!(mgr.editing_id, None);
        assert!(mgr.field_errors.is_empty());
        assert_eq!(mgr.collection.len(), 1);
        let notice = mgr.notice.as_ref().expect("success notice");
        assert_eq!(notice.kind, NoticeKind::Success);
        assert!(notice.expires_at.is_some());
    }

    #[test]
    fn failed_submit_preserves_the_form_for_retry() {
        let store = MemStore::default();
        store.fail_writes.set(true);
        let mut mgr: ResourceManager<Customer> = ResourceManager::new();
        mgr.form.name = "Acme".to_string();
        mgr.submit(&store);

        assert_eq!(mgr.form.name, "Acme");
        let notice = mgr.notice.as_ref().expect("submit notice");
        assert_eq!(notice.kind, NoticeKind::Submit);
        assert!(notice.text.contains("boom"), "carries the server message");
    }

    #[test]
    fn edit_then_cancel_restores_defaults() {
        let store = MemStore::with_rows(vec![customer_row(1, "A")]);
        let mut mgr: ResourceManager<Customer> = ResourceManager::new();
        mgr.refresh(&store);

        let record = mgr.collection[0].clone();
        mgr.edit(&record);
        assert_eq!(mgr.editing_id, Some(1));
        assert_eq!(mgr.form.name, "A");

        mgr.cancel_edit();
        assert_eq!(mgr.form, CustomerDraft::default());
        assert_eq!(mgr.editing_id, None);
    }

    #[test]
    fn edit_submit_replaces_wholesale_and_survives_refresh() {
        let store = MemStore::with_rows(vec![json!({
            "productID": 1, "productName": "A", "price1": 10.0, "numberOfUnits": 2
        })]);
        let mut mgr: ResourceManager<Product> = ResourceManager::new();
        mgr.refresh(&store);

        let record = mgr.collection[0].clone();
        mgr.edit(&record);
        mgr.form.price1 = 20.0;
        mgr.submit(&store);

        assert_eq!(mgr.editing_id, None);
        assert_eq!(mgr.form, ProductDraft::default());
        // The manager reloaded; the fresh collection carries the new price
        // under the same id.
        assert_eq!(mgr.collection.len(), 1);
        assert_eq!(mgr.collection[0].id, 1);
        assert_eq!(mgr.collection[0].fields.price1, 20.0);
    }

    #[test]
    fn confirmed_delete_reloads_and_notifies() {
        let store = MemStore::with_rows(vec![customer_row(1, "A"), customer_row(2, "B")]);
        let mut mgr: ResourceManager<Customer> = ResourceManager::new();
        mgr.refresh(&store);

        mgr.remove_confirmed(&store, 1);
        assert_eq!(store.deletes.get(), 1);
        assert_eq!(mgr.collection.len(), 1);
        assert_eq!(mgr.collection[0].id, 2);
        assert_eq!(mgr.notice.as_ref().unwrap().kind, NoticeKind::Success);
    }

    #[test]
    fn failed_delete_keeps_the_collection() {
        let store = MemStore::with_rows(vec![customer_row(1, "A")]);
        let mut mgr: ResourceManager<Customer> = ResourceManager::new();
        mgr.refresh(&store);

        store.fail_writes.set(true);
        mgr.remove_confirmed(&store, 1);
        assert_eq!(mgr.collection.len(), 1, "no optimistic removal");
        assert_eq!(mgr.notice.as_ref().unwrap().kind, NoticeKind::Delete);
    }

    #[test]
    fn success_notice_expires_after_ttl() {
        let store = MemStore::default();
        let mut mgr: ResourceManager<Customer> = ResourceManager::new();
        mgr.form.name = "Acme".to_string();
        mgr.submit(&store);
        assert!(mgr.notice.is_some());

        mgr.tick();
        assert!(mgr.notice.is_some(), "fresh notice survives a tick");

        if let Some(notice) = &mut mgr.notice {
            notice.expires_at = Some(Instant::now() - Duration::from_millis(1));
        }
        mgr.tick();
        assert!(mgr.notice.is_none());
    }

    #[test]
    fn error_notices_do_not_expire() {
        let store = MemStore::default();
        store.fail_reads.set(true);
        let mut mgr: ResourceManager<Customer> = ResourceManager::new();
        mgr.refresh(&store);
        mgr.tick();
        assert!(mgr.notice.is_some());
        mgr.dismiss_notice();
        assert!(mgr.notice.is_none());
    }
}
