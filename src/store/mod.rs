//! Remote record store: the HTTP boundary behind the resource managers.
//!
//! [`RecordStore`] is the collaborator seam each manager talks through;
//! [`HttpStore`] is the production implementation over the business API.
//! Tests substitute an in-memory implementation of the same trait.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;
use crate::records::Resource;

/// Failure of a store operation.
///
/// Carries the server's human-readable `message` when its error body had
/// one; display falls back to a generic description otherwise.
#[derive(Clone, Debug)]
pub struct StoreError {
    /// HTTP status, when the server answered at all.
    pub status: Option<u16>,
    /// Server-provided message extracted from the error body, if any.
    pub message: Option<String>,
    /// Transport or decode detail.
    pub detail: String,
}

impl StoreError {
    fn transport(err: reqwest::Error) -> Self {
        Self {
            status: err.status().map(|s| s.as_u16()),
            message: None,
            detail: err.to_string(),
        }
    }

    fn decode(err: serde_json::Error) -> Self {
        Self {
            status: None,
            message: None,
            detail: format!("malformed response body: {}", err),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(message) = &self.message {
            return write!(f, "{}", message);
        }
        if let Some(status) = self.status {
            return write!(f, "server returned status {}", status);
        }
        write!(f, "{}", self.detail)
    }
}

impl std::error::Error for StoreError {}

/// Process-wide request-layer state shared by all managers.
///
/// Any response signalling 401 marks the session; the event loop checks the
/// flag every tick and leaves the application, independent of which manager
/// triggered the request.
#[derive(Clone, Debug, Default)]
pub struct Session {
    unauthorized: Arc<AtomicBool>,
}

impl Session {
    pub fn mark_unauthorized(&self) {
        self.unauthorized.store(true, Ordering::Relaxed);
    }

    pub fn is_unauthorized(&self) -> bool {
        self.unauthorized.load(Ordering::Relaxed)
    }
}

/// The four operations every resource collection supports remotely.
pub trait RecordStore {
    fn list<T: Resource>(&self) -> std::result::Result<Vec<T>, StoreError>;
    fn create<T: Resource>(&self, draft: &T::Draft) -> std::result::Result<(), StoreError>;
    fn replace<T: Resource>(&self, id: i64, draft: &T::Draft)
    -> std::result::Result<(), StoreError>;
    fn delete<T: Resource>(&self, id: i64) -> std::result::Result<(), StoreError>;
}

/// Blocking HTTP implementation of [`RecordStore`] against the business API.
pub struct HttpStore {
    http: Client,
    base_url: String,
    session: Session,
}

impl HttpStore {
    pub fn new(base_url: &str, session: Session) -> Result<Self> {
        if base_url.trim().is_empty() {
            return Err(crate::error::simple_error("api base address must not be empty"));
        }
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .default_headers(headers)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    fn collection_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn record_url(&self, path: &str, id: i64) -> String {
        format!("{}{}/{}", self.base_url, path, id)
    }

    /// Map a finished response to success or a [`StoreError`], marking the
    /// session whenever the server signals unauthorized.
    fn check(&self, resp: Response) -> std::result::Result<Response, StoreError> {
        let status = resp.status();
        if status.as_u16() == 401 {
            self.session.mark_unauthorized();
        }
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string));
        Err(StoreError {
            status: Some(status.as_u16()),
            message,
            detail: format!("server returned status {}", status),
        })
    }
}

impl RecordStore for HttpStore {
    fn list<T: Resource>(&self) -> std::result::Result<Vec<T>, StoreError> {
        debug!(path = T::BASE_PATH, "loading collection");
        let resp = self
            .http
            .get(self.collection_url(T::BASE_PATH))
            .send()
            .map_err(StoreError::transport)?;
        let resp = self.check(resp)?;
        let body: Value = resp.json().map_err(StoreError::transport)?;
        normalize_list(body).inspect_err(|e| warn!(path = T::BASE_PATH, error = %e, "list failed"))
    }

    fn create<T: Resource>(&self, draft: &T::Draft) -> std::result::Result<(), StoreError> {
        debug!(path = T::BASE_PATH, "creating record");
        let resp = self
            .http
            .post(self.collection_url(T::BASE_PATH))
            .json(draft)
            .send()
            .map_err(StoreError::transport)?;
        self.check(resp).map(|_| ())
    }

    fn replace<T: Resource>(
        &self,
        id: i64,
        draft: &T::Draft,
    ) -> std::result::Result<(), StoreError> {
        debug!(path = T::BASE_PATH, id, "replacing record");
        let resp = self
            .http
            .put(self.record_url(T::BASE_PATH, id))
            .json(draft)
            .send()
            .map_err(StoreError::transport)?;
        self.check(resp).map(|_| ())
    }

    fn delete<T: Resource>(&self, id: i64) -> std::result::Result<(), StoreError> {
        debug!(path = T::BASE_PATH, id, "deleting record");
        let resp = self
            .http
            .delete(self.record_url(T::BASE_PATH, id))
            .send()
            .map_err(StoreError::transport)?;
        self.check(resp).map(|_| ())
    }
}

/// Normalize a list body: the API answers either with a bare array or with
/// an envelope object carrying the array under `data`. Anything else is
/// treated as an empty collection.
pub fn normalize_list<T: DeserializeOwned>(body: Value) -> std::result::Result<Vec<T>, StoreError> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(StoreError::decode))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Customer;
    use serde_json::json;

    #[test]
    fn normalize_accepts_bare_array() {
        let body = json!([{"customerID": 1, "customerName": "A"}]);
        let rows: Vec<Customer> = normalize_list(body).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].fields.name, "A");
    }

    #[test]
    fn normalize_accepts_data_envelope() {
        let body = json!({"data": [{"customerID": 2, "customerName": "B"}], "total": 1});
        let rows: Vec<Customer> = normalize_list(body).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 2);
    }

    #[test]
    fn normalize_defaults_everything_else_to_empty() {
        for body in [json!({"data": "nope"}), json!({"rows": []}), json!("x"), json!(5)] {
            let rows: Vec<Customer> = normalize_list(body).unwrap();
            assert!(rows.is_empty());
        }
    }

    #[test]
    fn normalize_surfaces_element_decode_errors() {
        let body = json!([{"customerID": "not-a-number"}]);
        let result: std::result::Result<Vec<Customer>, StoreError> = normalize_list(body);
        assert!(result.is_err());
    }

    #[test]
    fn session_flag_is_shared_between_clones() {
        let session = Session::default();
        let other = session.clone();
        assert!(!other.is_unauthorized());
        session.mark_unauthorized();
        assert!(other.is_unauthorized());
    }

    #[test]
    fn store_error_display_prefers_server_message() {
        let err = StoreError {
            status: Some(422),
            message: Some("name already taken".to_string()),
            detail: "server returned status 422".to_string(),
        };
        assert_eq!(err.to_string(), "name already taken");

        let err = StoreError {
            status: Some(500),
            message: None,
            detail: "server returned status 500".to_string(),
        };
        assert_eq!(err.to_string(), "server returned status 500");
    }
}
