//! Payload validation for create and update.
//!
//! # Design Decisions
//! - Payloads are checked from raw `serde_json::Value` so a wrong-typed field
//!   is a validation failure, not a deserialization error
//! - `inStock` must be a JSON boolean; strings like `"true"` are rejected
//! - Rejection is aggregate: clients get one message, logs get the field list

use serde_json::{Map, Value};
use thiserror::Error;

use crate::catalog::product::{NewProduct, Price, ProductPatch};

/// A payload failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Body was valid JSON but not an object. Clients see the same
    /// message as for bad fields.
    #[error("Missing or invalid fields")]
    NotAnObject,

    /// One or more fields are absent, falsy, or wrong-typed.
    #[error("Missing or invalid fields")]
    InvalidFields(Vec<&'static str>),
}

impl ValidationError {
    /// Offending field names, for logging.
    pub fn fields(&self) -> &[&'static str] {
        match self {
            Self::NotAnObject => &[],
            Self::InvalidFields(fields) => fields,
        }
    }
}

/// Validate a create payload. Every field is required.
pub fn validate_create(payload: &Value) -> Result<NewProduct, ValidationError> {
    let fields = payload.as_object().ok_or(ValidationError::NotAnObject)?;
    let mut invalid = Vec::new();

    let name = required(fields, "name", &mut invalid, text);
    let description = required(fields, "description", &mut invalid, text);
    let price = required(fields, "price", &mut invalid, price);
    let category = required(fields, "category", &mut invalid, text);
    let in_stock = required(fields, "inStock", &mut invalid, Value::as_bool);

    match (name, description, price, category, in_stock) {
        (Some(name), Some(description), Some(price), Some(category), Some(in_stock)) => {
            Ok(NewProduct {
                name,
                description,
                price,
                category,
                in_stock,
            })
        }
        _ => Err(ValidationError::InvalidFields(invalid)),
    }
}

/// Validate an update payload.
///
/// Present fields follow the create rules; `id` and unknown keys are dropped.
pub fn validate_patch(payload: &Value) -> Result<ProductPatch, ValidationError> {
    let fields = payload.as_object().ok_or(ValidationError::NotAnObject)?;
    let mut invalid = Vec::new();

    let patch = ProductPatch {
        name: optional(fields, "name", &mut invalid, text),
        description: optional(fields, "description", &mut invalid, text),
        price: optional(fields, "price", &mut invalid, price),
        category: optional(fields, "category", &mut invalid, text),
        in_stock: optional(fields, "inStock", &mut invalid, Value::as_bool),
    };

    if invalid.is_empty() {
        Ok(patch)
    } else {
        Err(ValidationError::InvalidFields(invalid))
    }
}

fn required<T>(
    fields: &Map<String, Value>,
    key: &'static str,
    invalid: &mut Vec<&'static str>,
    check: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    let value = fields.get(key).and_then(check);
    if value.is_none() {
        invalid.push(key);
    }
    value
}

fn optional<T>(
    fields: &Map<String, Value>,
    key: &'static str,
    invalid: &mut Vec<&'static str>,
    check: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    let raw = fields.get(key)?;
    let value = check(raw);
    if value.is_none() {
        invalid.push(key);
    }
    value
}

fn text(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn price(value: &Value) -> Option<Price> {
    match value {
        Value::Number(n) => Price::new(n.clone()),
        _ => None,
    }
}
