//! Required-field checks for request bodies.
//!
//! Each endpoint declares a `RequiredFields` schema. A field counts as missing
//! when it is absent or JSON `null`; every missing field is reported at once.

use serde_json::{Map, Value};

use crate::error::{ApiError, Violation};

pub const RULE_REQUIRED: &str = "required";

#[derive(Debug, Clone, Copy)]
pub struct RequiredFields(&'static [&'static str]);

pub const EMPLOYEE_CREATE: RequiredFields = RequiredFields(&["name"]);
pub const ACTIVITY_CREATE: RequiredFields = RequiredFields(&["employee_id", "title"]);
pub const PRODUCT_WRITE: RequiredFields =
    RequiredFields(&["name", "description", "thumbnail", "price", "stock"]);

impl RequiredFields {
    pub const fn new(fields: &'static [&'static str]) -> Self {
        Self(fields)
    }

    /// Fields missing from `body`, in declaration order. Dotted names walk
    /// nested objects (`"address.city"`).
    pub fn missing(&self, body: &Map<String, Value>) -> Vec<&'static str> {
        self.0
            .iter()
            .copied()
            .filter(|field| lookup(body, field).map_or(true, Value::is_null))
            .collect()
    }

    pub fn check(&self, body: &Map<String, Value>) -> Result<(), ApiError> {
        let missing = self.missing(body);
        if missing.is_empty() {
            return Ok(());
        }

        let violations = missing
            .iter()
            .map(|field| Violation {
                field: field.to_string(),
                rule: RULE_REQUIRED,
            })
            .collect();
        Err(ApiError::validation(required_message(&missing), violations))
    }
}

fn lookup<'a>(body: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = body.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// `["name", "employee_id"]` → `"Name, Employee_id is Required"`
pub fn required_message(missing: &[&str]) -> String {
    let names: Vec<String> = missing.iter().map(|field| title_case(field)).collect();
    format!("{} is Required", names.join(", "))
}

fn title_case(field: &str) -> String {
    let last = field.rsplit('.').next().unwrap_or(field);
    let mut chars = last.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn complete_body_passes() {
        let b = body(json!({
            "name": "Lamp", "description": "d", "thumbnail": "t", "price": 0, "stock": 3
        }));
        assert!(PRODUCT_WRITE.check(&b).is_ok());
    }

    #[test]
    fn reports_every_missing_field_in_order() {
        let b = body(json!({ "name": "Lamp", "price": null }));
        assert_eq!(PRODUCT_WRITE.missing(&b), vec!["description", "thumbnail", "price", "stock"]);

        match PRODUCT_WRITE.check(&b) {
            Err(ApiError::Validation { message, violations }) => {
                assert_eq!(message, "Description, Thumbnail, Price, Stock is Required");
                assert_eq!(violations.len(), 4);
                assert_eq!(violations[0].field, "description");
                assert_eq!(violations[0].rule, RULE_REQUIRED);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn falsy_values_are_present() {
        let b = body(json!({ "employee_id": "x", "title": "" }));
        assert!(ACTIVITY_CREATE.check(&b).is_ok());
    }

    #[test]
    fn dotted_fields_use_last_segment() {
        let schema = RequiredFields::new(&["address.city"]);
        let b = body(json!({ "address": { "street": "Main" } }));
        assert_eq!(schema.missing(&b), vec!["address.city"]);
        assert_eq!(required_message(&["address.city"]), "City is Required");
    }
}
