//! Query sections for pin field filters.
//!
//! The query object sent to the data service carries two structured sections
//! next to its flat model fields:
//!
//! ```text
//! {
//!   "name": "pump",                                  model field
//!   "pin_fields": [{"name": "status", "value": "open"}],
//!   "pin_type": {"_id": "pt1", "values": [{"_id": "f1", "min": 3}]}
//! }
//! ```
//!
//! [`PinFieldClause`] and [`PinTypeClause`] are the typed forms of those
//! sections.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key of the cross-category section.
pub const PIN_FIELDS_KEY: &str = "pin_fields";
/// Key of the category-scoped section (and of the category model field).
pub const PIN_TYPE_KEY: &str = "pin_type";
/// Identifier key used by pin types, pin fields and scoped values.
pub const ID_KEY: &str = "_id";
/// Key a scalar scoped value is stored under when merged into its entry.
pub const VALUE_KEY: &str = "value";

/// A cross-category filter: pin field name and value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinFieldClause {
    /// The pin field name, shared across pin types.
    pub name: String,
    /// The filter value.
    pub value: Value,
}

impl PinFieldClause {
    /// Creates a new clause.
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        PinFieldClause {
            name: name.into(),
            value,
        }
    }
}

/// The category-scoped section: the selected pin type and per-field values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinTypeClause {
    /// The pin type id, `null` when none was given.
    #[serde(rename = "_id", default)]
    pub id: Value,
    /// One entry per pin field, `{"_id": field_id, ...value}`.
    #[serde(default)]
    pub values: Vec<Map<String, Value>>,
}

/// Merges a scoped filter value into a `pin_type.values` entry.
///
/// Object values spread their keys next to `_id`. Anything else is stored
/// under [`VALUE_KEY`] so it survives the round trip.
pub fn scoped_entry(field_id: &str, value: &Value) -> Map<String, Value> {
    let mut entry = Map::new();
    entry.insert(ID_KEY.to_string(), Value::String(field_id.to_string()));
    match value {
        Value::Object(fields) => {
            for (key, field_value) in fields {
                if key != ID_KEY {
                    entry.insert(key.clone(), field_value.clone());
                }
            }
        }
        other => {
            entry.insert(VALUE_KEY.to_string(), other.clone());
        }
    }
    entry
}

/// Splits a `pin_type.values` entry into its field id and filter value.
///
/// The inverse of [`scoped_entry`]: an entry whose only remaining key is
/// [`VALUE_KEY`] yields the bare scalar. Returns `None` when the entry has no
/// usable `_id`.
pub fn split_scoped_entry(mut entry: Map<String, Value>) -> Option<(String, Value)> {
    let id = entry.shift_remove(ID_KEY)?;
    let id = crate::value::id_string(&id)?;
    let value = if entry.len() == 1 && entry.contains_key(VALUE_KEY) {
        entry.shift_remove(VALUE_KEY).unwrap_or(Value::Null)
    } else {
        Value::Object(entry)
    };
    Some((id, value))
}
