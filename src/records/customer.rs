//! Customer records: schema, validation and form layout.

use serde::{Deserialize, Serialize};

use super::{
    FieldDef, FieldErrors, FieldKind, Resource, contains_ci, is_loose_phone, parse_decimal,
    parse_flag, parse_int,
};

/// Editable customer fields. Wire names follow the remote API exactly,
/// including its mixed casing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerDraft {
    #[serde(rename = "customerName", default)]
    pub name: String,
    /// 0 = individual, 1 = company.
    #[serde(rename = "type", default)]
    pub kind: i64,
    #[serde(rename = "phoneNumber", default)]
    pub phone: String,
    #[serde(rename = "remainingBalance", default)]
    pub balance: f64,
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
    // "maneger" is the server's spelling; do not correct it on the wire.
    #[serde(rename = "manegerName", default)]
    pub manager: String,
    #[serde(rename = "commercial_register", default)]
    pub commercial_register: i64,
}

impl CustomerDraft {
    /// Badge polarity for the balance column; never stored.
    pub fn balance_in_credit(&self) -> bool {
        self.balance >= 0.0
    }

    pub fn kind_label(&self) -> &'static str {
        if self.kind == 1 { "company" } else { "individual" }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Customer {
    #[serde(rename = "customerID")]
    pub id: i64,
    #[serde(flatten)]
    pub fields: CustomerDraft,
}

impl Resource for Customer {
    type Draft = CustomerDraft;

    const BASE_PATH: &'static str = "/Customers";
    const ID_FIELD: &'static str = "customerID";
    const LABEL: &'static str = "customer";

    fn id(&self) -> i64 {
        self.id
    }

    fn draft(&self) -> CustomerDraft {
        self.fields.clone()
    }

    fn matches(&self, needle: &str) -> bool {
        contains_ci(&self.fields.name, needle)
            || contains_ci(&self.fields.phone, needle)
            || contains_ci(&self.fields.city, needle)
    }

    fn validate(draft: &CustomerDraft) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if draft.name.trim().is_empty() {
            errors.insert("customerName", "Customer name is required".to_string());
        }
        if !draft.phone.is_empty() && !is_loose_phone(&draft.phone) {
            errors.insert("phoneNumber", "Invalid phone number".to_string());
        }
        errors
    }

    fn form_fields() -> Vec<FieldDef<CustomerDraft>> {
        vec![
            FieldDef {
                key: "customerName",
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
                key: "remainingBalance",
                label: "Balance",
                kind: FieldKind::Decimal,
                get: |d| d.balance.to_string(),
                set: |d, s| {
                    d.balance = parse_decimal(s)?;
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
                label: "Type (individual/company)",
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

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> CustomerDraft {
        CustomerDraft {
            name: "Acme Trading".to_string(),
            phone: "0501234567".to_string(),
            city: "Riyadh".to_string(),
            ..CustomerDraft::default()
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert!(Customer::validate(&valid_draft()).is_empty());
    }

    #[test]
    fn blank_name_always_fails() {
        let mut draft = valid_draft();
        draft.name = "   ".to_string();
        let errors = Customer::validate(&draft);
        assert!(errors.contains_key("customerName"));
    }

    #[test]
    fn bad_phone_fails_but_empty_phone_is_fine() {
        let mut draft = valid_draft();
        draft.phone = "123".to_string();
        assert!(Customer::validate(&draft).contains_key("phoneNumber"));

        draft.phone = String::new();
        assert!(Customer::validate(&draft).is_empty());
    }

    #[test]
    fn decode_applies_defaults_for_missing_fields() {
        let record: Customer =
            serde_json::from_value(serde_json::json!({"customerID": 7, "customerName": "A"}))
                .unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.fields.name, "A");
        assert_eq!(record.fields.phone, "");
        assert_eq!(record.fields.balance, 0.0);
        assert_eq!(record.fields.tax_number, 0);
    }

    #[test]
    fn balance_polarity() {
        let mut draft = valid_draft();
        draft.balance = 12.5;
        assert!(draft.balance_in_credit());
        draft.balance = -0.01;
        assert!(!draft.balance_in_credit());
    }

    #[test]
    fn payload_uses_wire_names() {
        let v = serde_json::to_value(valid_draft()).unwrap();
        assert!(v.get("customerName").is_some());
        assert!(v.get("manegerName").is_some());
        assert!(v.get("account_Number").is_some());
        assert!(v.get("name").is_none());
    }
}
