//! Supplier records: schema, validation and form layout.

use serde::{Deserialize, Serialize};

use super::{
    FieldDef, FieldErrors, FieldKind, Resource, contains_ci, parse_flag, parse_int,
};

/// Editable supplier fields. Shares the customer's address block and adds a
/// delegate contact number; wire names follow the remote API exactly.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplierDraft {
    #[serde(rename = "supplierName", default)]
    pub name: String,
    #[serde(rename = "phoneNumber", default)]
    pub phone: String,
    #[serde(rename = "districtName", default)]
    pub district: String,
    #[serde(rename = "streetName", default)]
    pub street: String,
    #[serde(rename = "buildingNumber", default)]
    pub building: String,
    #[serde(rename = "additionalNumber", default)]
    pub additional_number: String,
    #[serde(default)]
    pub city: String,
    #[serde(rename = "postalCode", default)]
    pub postal_code: String,
    #[serde(default)]
    pub notes: String,
    #[serde(rename = "tax_number", default)]
    pub tax_number: i64,
    #[serde(rename = "account_Number", default)]
    pub account_number: i64,
    #[serde(rename = "delegateName", default)]
    pub delegate: String,
    #[serde(rename = "delegate_number", default)]
    pub delegate_number: i64,
    // "maneger" is the server's spelling; do not correct it on the wire.
    #[serde(rename = "manegerName", default)]
    pub manager: String,
    #[serde(rename = "commercial_register", default)]
    pub commercial_register: i64,
    /// 0 = local, 1 = international.
    #[serde(rename = "type", default)]
    pub kind: i64,
}

impl SupplierDraft {
    pub fn kind_label(&self) -> &'static str {
        if self.kind == 1 { "international" } else { "local" }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Supplier {
    #[serde(rename = "supplierID")]
    pub id: i64,
    #[serde(flatten)]
    pub fields: SupplierDraft,
}

impl Resource for Supplier {
    type Draft = SupplierDraft;

    // Singular on the server, unlike the other two collections.
    const BASE_PATH: &'static str = "/Supplier";
    const ID_FIELD: &'static str = "supplierID";
    const LABEL: &'static str = "supplier";

    fn id(&self) -> i64 {
        self.id
    }

    fn draft(&self) -> SupplierDraft {
        self.fields.clone()
    }

    fn matches(&self, needle: &str) -> bool {
        contains_ci(&self.fields.name, needle)
            || contains_ci(&self.fields.phone, needle)
            || contains_ci(&self.fields.city, needle)
    }

    fn validate(draft: &SupplierDraft) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if draft.name.trim().is_empty() {
            errors.insert("supplierName", "Supplier name is required".to_string());
        }
        errors
    }

    fn form_fields() -> Vec<FieldDef<SupplierDraft>> {
        vec![
            FieldDef {
                key: "supplierName",
                label: "Name",
                kind: FieldKind::Text,
                get: |d| d.name.clone(),
                set: |d, s| {
                    d.name = s.to_string();
                    Ok(())
                },
            },
            FieldDef {
                key: "phoneNumber",
                label: "Phone",
                kind: FieldKind::Text,
                get: |d| d.phone.clone(),
                set: |d, s| {
                    d.phone = s.to_string();
                    Ok(())
                },
            },
            FieldDef {
                key: "city",
                label: "City",
                kind: FieldKind::Text,
                get: |d| d.city.clone(),
                set: |d, s| {
                    d.city = s.to_string();
                    Ok(())
                },
            },
            FieldDef {
                key: "delegateName",
                label: "Delegate",
                kind: FieldKind::Text,
                get: |d| d.delegate.clone(),
                set: |d, s| {
                    d.delegate = s.to_string();
                    Ok(())
                },
            },
            FieldDef {
                key: "delegate_number",
                label: "Delegate no.",
                kind: FieldKind::Integer,
                get: |d| d.delegate_number.to_string(),
                set: |d, s| {
                    d.delegate_number = parse_int(s)?;
                    Ok(())
                },
            },
            FieldDef {
                key: "manegerName",
                label: "Manager",
                kind: FieldKind::Text,
                get: |d| d.manager.clone(),
                set: |d, s| {
                    d.manager = s.to_string();
                    Ok(())
                },
            },
            FieldDef {
                key: "commercial_register",
                label: "Commercial register",
                kind: FieldKind::Integer,
                get: |d| d.commercial_register.to_string(),
                set: |d, s| {
                    d.commercial_register = parse_int(s)?;
                    Ok(())
                },
            },
            FieldDef {
                key: "tax_number",
                label: "Tax number",
                kind: FieldKind::Integer,
                get: |d| d.tax_number.to_string(),
                set: |d, s| {
                    d.tax_number = parse_int(s)?;
                    Ok(())
                },
            },
            FieldDef {
                key: "account_Number",
                label: "Account number",
                kind: FieldKind::Integer,
                get: |d| d.account_number.to_string(),
                set: |d, s| {
                    d.account_number = parse_int(s)?;
                    Ok(())
                },
            },
            FieldDef {
                key: "districtName",
                label: "District",
                kind: FieldKind::Text,
                get: |d| d.district.clone(),
                set: |d, s| {
                    d.district = s.to_string();
                    Ok(())
                },
            },
            FieldDef {
                key: "streetName",
                label: "Street",
                kind: FieldKind::Text,
                get: |d| d.street.clone(),
                set: |d, s| {
                    d.street = s.to_string();
                    Ok(())
                },
            },
            FieldDef {
                key: "buildingNumber",
                label: "Building no.",
                kind: FieldKind::Text,
                get: |d| d.building.clone(),
                set: |d, s| {
                    d.building = s.to_string();
                    Ok(())
                },
            },
            FieldDef {
                key: "additionalNumber",
                label: "Additional no.",
                kind: FieldKind::Text,
                get: |d| d.additional_number.clone(),
                set: |d, s| {
                    d.additional_number = s.to_string();
                    Ok(())
                },
            },
            FieldDef {
                key: "postalCode",
                label: "Postal code",
                kind: FieldKind::Text,
                get: |d| d.postal_code.clone(),
                set: |d, s| {
                    d.postal_code = s.to_string();
                    Ok(())
                },
            },
            FieldDef {
                key: "notes",
                label: "Notes",
                kind: FieldKind::Text,
                get: |d| d.notes.clone(),
                set: |d, s| {
                    d.notes = s.to_string();
                    Ok(())
                },
            },
            FieldDef {
                key: "type",
                label: "Type (local/international)",
                kind: FieldKind::Flag,
                get: |d| d.kind.to_string(),
                set: |d, s| {
                    d.kind = parse_flag(s)?;
                    Ok(())
                },
            },
        ]
    }
}
