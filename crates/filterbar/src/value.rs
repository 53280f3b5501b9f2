//! Input types and enum option values.
//!
//! Filter values themselves are plain [`serde_json::Value`]s, the same
//! representation the query object uses. This module holds the small typed
//! pieces around them: the kind of input a filter renders, the options an
//! enum input offers, and the conversion used for chip text.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The kind of input control a filter configuration renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    /// Free text input.
    #[default]
    Text,
    /// Numeric input.
    Numeric,
    /// Selection from a list of [`EnumOption`]s.
    Enum,
}

impl InputType {
    /// Returns `true` for enum inputs.
    pub fn is_enum(self) -> bool {
        matches!(self, InputType::Enum)
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputType::Text => write!(f, "text"),
            InputType::Numeric => write!(f, "numeric"),
            InputType::Enum => write!(f, "enum"),
        }
    }
}

/// Input configuration exposed to the presentation layer.
///
/// Enum options are not stored here; they are produced on demand by
/// [`FilterConfiguration::enum_values`](crate::FilterConfiguration::enum_values)
/// because they can depend on the current filter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfiguration {
    /// The input type.
    #[serde(rename = "type")]
    pub input_type: InputType,
}

impl InputConfiguration {
    /// Creates an input configuration for the given type.
    pub fn new(input_type: InputType) -> Self {
        InputConfiguration { input_type }
    }

    /// Returns `true` if this is an enum input.
    pub fn is_enum(&self) -> bool {
        self.input_type.is_enum()
    }
}

/// One selectable option of an enum input.
///
/// `option_value` is handed back to
/// [`FilterBarManager::apply_filter`](crate::FilterBarManager::apply_filter)
/// when the user picks the option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumOption {
    /// Text shown in the option list.
    #[serde(alias = "option_text")]
    pub option_text: String,
    /// Value applied when this option is selected.
    #[serde(alias = "option_value")]
    pub option_value: Value,
}

impl EnumOption {
    /// Creates a new option.
    pub fn new(option_text: impl Into<String>, option_value: impl Into<Value>) -> Self {
        EnumOption {
            option_text: option_text.into(),
            option_value: option_value.into(),
        }
    }

    /// Creates an option whose text doubles as its value.
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        EnumOption {
            option_value: Value::String(text.clone()),
            option_text: text,
        }
    }
}

/// Renders a filter value as chip text.
///
/// Strings render as-is, `null` renders empty, and everything else renders
/// as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Renders a JSON identifier as a string key.
///
/// Ids arrive either as strings or as numbers depending on the data service.
/// Returns `None` for values that cannot act as an id.
pub fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
