//! Record schemas for the three managed collections.
//!
//! Each resource kind (customer, product, supplier) provides:
//! - a wire-faithful record type (server-assigned id + flat scalar fields)
//! - a `Draft` type holding the editable fields with schema defaults
//! - validation rules, search fields, and the ordered form field list
//!
//! The [`Resource`] trait is the seam the generic manager and store are
//! written against.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

pub mod customer;
pub mod product;
pub mod supplier;

pub use customer::{Customer, CustomerDraft};
pub use product::{Product, ProductDraft};
pub use supplier::{Supplier, SupplierDraft};

/// Field-level validation messages, keyed by wire field name.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Input class of a form field, driving entry parsing and rendering.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Whole number; blank commits as zero.
    Integer,
    /// Fractional number; blank commits as zero.
    Decimal,
    /// 0/1 toggle (record `type` fields).
    Flag,
}

/// One editable field of a draft: label, entry class and typed accessors.
///
/// `key` doubles as the validation-error key so inline messages attach to
/// the right field.
pub struct FieldDef<D> {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub get: fn(&D) -> String,
    pub set: fn(&mut D, &str) -> std::result::Result<(), String>,
}

/// Schema of one managed resource kind.
pub trait Resource: Clone + DeserializeOwned {
    /// Editable fields with schema defaults applied.
    type Draft: Clone + Default + Serialize + PartialEq;

    /// Collection path on the remote API, e.g. `/Customers`.
    const BASE_PATH: &'static str;
    /// Wire name of the server-assigned identifier field.
    const ID_FIELD: &'static str;
    /// Lowercase singular label used in notices.
    const LABEL: &'static str;

    fn id(&self) -> i64;

    /// Copy of the record's editable fields, defaults applied for anything
    /// the server omitted.
    fn draft(&self) -> Self::Draft;

    /// Case-insensitive substring match over this kind's search fields.
    /// `needle` is already lowercased.
    fn matches(&self, needle: &str) -> bool;

    /// Pure rule check; an empty map means the draft is submittable.
    fn validate(draft: &Self::Draft) -> FieldErrors;

    /// Ordered form fields for the editor pane.
    fn form_fields() -> Vec<FieldDef<Self::Draft>>;
}

pub(crate) fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Loose phone check: digits, '+', '-' and spaces only, at least 10 chars.
pub(crate) fn is_loose_phone(s: &str) -> bool {
    s.chars().count() >= 10
        && s.chars()
            .all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c == ' ')
}

/// Parse an integer entry; blank commits as zero.
pub(crate) fn parse_int(s: &str) -> std::result::Result<i64, String> {
    let t = s.trim();
    if t.is_empty() {
        return Ok(0);
    }
    t.parse::<i64>()
        .map_err(|_| "Must be a whole number".to_string())
}

/// Parse a decimal entry; blank commits as zero.
pub(crate) fn parse_decimal(s: &str) -> std::result::Result<f64, String> {
    let t = s.trim();
    if t.is_empty() {
        return Ok(0.0);
    }
    t.parse::<f64>().map_err(|_| "Must be a number".to_string())
}

/// Parse a 0/1 flag entry; anything non-zero commits as 1.
pub(crate) fn parse_flag(s: &str) -> std::result::Result<i64, String> {
    Ok(if parse_int(s)? != 0 { 1 } else { 0 })
}
