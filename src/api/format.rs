//! Product wire format.
//!
//! Products are stored as a fixed row plus a key/value table. Clients see a
//! single flat object: the base columns with every metadata pair laid over
//! them, so a metadata key that shadows a base column wins.

use serde_json::{json, Map, Value};

use crate::database::products::{ProductBase, ProductRecord};

/// Body keys stored as product columns; every other key is metadata.
pub const BASE_FIELDS: [&str; 3] = ["name", "description", "thumbnail"];

/// Collapse whitespace runs to single underscores and trim the ends:
/// `"  custom   color "` becomes `"custom_color"`.
pub fn normalize_meta_key(key: &str) -> String {
    key.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Metadata is stored as text. Strings are kept verbatim, everything else is
/// stored as its JSON text (`12` → `"12"`, `true` → `"true"`).
pub fn meta_value_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Split a request body into base columns and normalized metadata pairs.
///
/// Missing base fields come back empty; callers validate before splitting.
pub fn split_product_body(body: &Map<String, Value>) -> (ProductBase, Vec<(String, String)>) {
    let base_field = |name: &str| body.get(name).map(meta_value_string).unwrap_or_default();

    let base = ProductBase {
        name: base_field("name"),
        description: base_field("description"),
        thumbnail: base_field("thumbnail"),
    };

    let meta = body
        .iter()
        .filter(|(key, _)| !BASE_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (normalize_meta_key(key), meta_value_string(value)))
        .filter(|(key, _)| !key.is_empty())
        .collect();

    (base, meta)
}

/// Flatten a product and its metadata into the client projection
pub fn fold_product(record: &ProductRecord) -> Value {
    let product = &record.product;
    let mut obj = Map::new();
    obj.insert("id".into(), json!(product.id));
    obj.insert("name".into(), json!(product.name));
    obj.insert("description".into(), json!(product.description));
    obj.insert("thumbnail".into(), json!(product.thumbnail));
    obj.insert("created_by".into(), json!(product.created_by));
    obj.insert("created_at".into(), json!(product.created_at));

    for meta in &record.meta {
        obj.insert(meta.meta_key.clone(), Value::String(meta.meta_value.clone()));
    }

    Value::Object(obj)
}

pub fn fold_products(records: &[ProductRecord]) -> Vec<Value> {
    records.iter().map(fold_product).collect()
}
