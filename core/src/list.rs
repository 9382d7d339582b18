//! Decoding of collection responses that come back in one of two shapes.
//!
//! Depending on `include_pagination` the same listing is either a bare JSON
//! array or an object that names the items field and carries `nextCursor`:
//!
//! ```text
//! [{"id": "1"}]
//! {"tools": [{"id": "1"}], "nextCursor": "abc"}
//! ```
//!
//! The array form is always tried first. Running the object attempt first
//! would let a well-formed array fall through to a misleading type error.

use serde::de::{DeserializeOwned, Error as _};
use serde_json::{Map, Value};

pub const NEXT_CURSOR_FIELD: &str = "nextCursor";

/// Items of one page plus the continuation cursor, if the body carried one.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

/// Decode `data` as `[T]`, or failing that as `{ <field>: [T], "nextCursor": ... }`.
///
/// A missing `field` is an error rather than an empty page. A `nextCursor`
/// that is not a string is ignored.
pub fn decode_list<T: DeserializeOwned>(
    data: &str,
    field: &str,
) -> Result<ListPage<T>, serde_json::Error> {
    if let Ok(items) = serde_json::from_str::<Vec<T>>(data) {
        return Ok(ListPage {
            items,
            next_cursor: None,
        });
    }

    let mut object: Map<String, Value> = serde_json::from_str(data)?;
    let raw = object
        .remove(field)
        .ok_or_else(|| serde_json::Error::custom(format_args!("missing field `{field}`")))?;
    let items = serde_json::from_value(raw)?;
    let next_cursor = match object.get(NEXT_CURSOR_FIELD) {
        Some(Value::String(cursor)) if !cursor.is_empty() => Some(cursor.clone()),
        _ => None,
    };

    Ok(ListPage { items, next_cursor })
}

/// Decode a single item that is either bare or wrapped as `{ <field>: {...} }`.
///
/// Toggle endpoints are inconsistent about this; callers see the item either way.
pub fn decode_item<T: DeserializeOwned>(data: &str, field: &str) -> Result<T, serde_json::Error> {
    let mut value: Value = serde_json::from_str(data)?;
    if let Some(inner) = value.as_object_mut().and_then(|object| object.remove(field)) {
        if inner.is_object() {
            return serde_json::from_value(inner);
        }
    }
    serde_json::from_value(value)
}
