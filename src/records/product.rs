//! Product records: schema, validation, form layout and stock arithmetic.

use serde::{Deserialize, Serialize};

use super::{
    FieldDef, FieldErrors, FieldKind, Resource, contains_ci, parse_decimal, parse_int,
};

/// Editable product fields. `price1` is the retail sell price, `price2` a
/// secondary price tier kept for the server's sake.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    #[serde(rename = "productName", default)]
    pub name: String,
    #[serde(rename = "numberOfUnits", default)]
    pub units: i64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub price1: f64,
    #[serde(default)]
    pub price2: f64,
    #[serde(rename = "wholeSalePrice", default)]
    pub wholesale_price: f64,
    #[serde(rename = "purchaseprice", default)]
    pub purchase_price: f64,
    #[serde(rename = "productNumber", default)]
    pub number: String,
    #[serde(default)]
    pub unit: String,
}

impl ProductDraft {
    /// Inventory value of the row: sell price times units on hand.
    pub fn stock_value(&self) -> f64 {
        self.price1 * self.units as f64
    }

    /// Margin per unit: sell price minus purchase price.
    pub fn profit(&self) -> f64 {
        self.price1 - self.purchase_price
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Product {
    #[serde(rename = "productID")]
    pub id: i64,
    #[serde(flatten)]
    pub fields: ProductDraft,
}

impl Resource for Product {
    type Draft = ProductDraft;

    const BASE_PATH: &'static str = "/Products";
    const ID_FIELD: &'static str = "productID";
    const LABEL: &'static str = "product";

    fn id(&self) -> i64 {
        self.id
    }

    fn draft(&self) -> ProductDraft {
        self.fields.clone()
    }

    fn matches(&self, needle: &str) -> bool {
        contains_ci(&self.fields.name, needle)
            || contains_ci(&self.fields.number, needle)
            || contains_ci(&self.fields.unit, needle)
    }

    fn validate(draft: &ProductDraft) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if draft.name.trim().is_empty() {
            errors.insert("productName", "Product name is required".to_string());
        }
        if draft.price1 < 0.0 {
            errors.insert("price1", "Sell price must not be negative".to_string());
        }
        if draft.purchase_price < 0.0 {
            errors.insert(
                "purchaseprice",
                "Purchase price must not be negative".to_string(),
            );
        }
        errors
    }

    fn form_fields() -> Vec<FieldDef<ProductDraft>> {
        vec![
            FieldDef {
                key: "productName",
                label: "Name",
                kind: FieldKind::Text,
                get: |d| d.name.clone(),
                set: |d, s| {
                    d.name = s.to_string();
                    Ok(())
                },
            },
            FieldDef {
                key: "productNumber",
                label: "Product no.",
                kind: FieldKind::Text,
                get: |d| d.number.clone(),
                set: |d, s| {
                    d.number = s.to_string();
                    Ok(())
                },
            },
            FieldDef {
                key: "unit",
                label: "Unit (kg, piece, ...)",
                kind: FieldKind::Text,
                get: |d| d.unit.clone(),
                set: |d, s| {
                    d.unit = s.to_string();
                    Ok(())
                },
            },
            FieldDef {
                key: "numberOfUnits",
                label: "Quantity",
                kind: FieldKind::Integer,
                get: |d| d.units.to_string(),
                set: |d, s| {
                    d.units = parse_int(s)?;
                    Ok(())
                },
            },
            FieldDef {
                key: "price1",
                label: "Sell price",
                kind: FieldKind::Decimal,
                get: |d| d.price1.to_string(),
                set: |d, s| {
                    d.price1 = parse_decimal(s)?;
                    Ok(())
                },
            },
            FieldDef {
                key: "price2",
                label: "Second price",
                kind: FieldKind::Decimal,
                get: |d| d.price2.to_string(),
                set: |d, s| {
                    d.price2 = parse_decimal(s)?;
                    Ok(())
                },
            },
            FieldDef {
                key: "wholeSalePrice",
                label: "Wholesale price",
                kind: FieldKind::Decimal,
                get: |d| d.wholesale_price.to_string(),
                set: |d, s| {
                    d.wholesale_price = parse_decimal(s)?;
                    Ok(())
                },
            },
            FieldDef {
                key: "purchaseprice",
                label: "Purchase price",
                kind: FieldKind::Decimal,
                get: |d| d.purchase_price.to_string(),
                set: |d, s| {
                    d.purchase_price = parse_decimal(s)?;
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
        ]
    }
}
