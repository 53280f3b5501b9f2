//! Filters on a single top-level model field.
//!
//! [`SimpleModelFieldFilter`] handles filters like `task.subject` or
//! `asset.name`: one value stored under one key at the top level of the
//! query.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::hooks::EnumHooks;
use crate::state::FilterState;
use crate::traits::{ChipText, FilterConfiguration};
use crate::value::{display_value, EnumOption, InputConfiguration, InputType};

/// Construction parameters for a [`SimpleModelFieldFilter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleFieldOptions {
    /// Option text for this filter in the filter picker.
    pub display_name: String,
    /// The model field to filter on.
    pub query_field: String,
    /// Left text of the chip.
    pub chip_name: String,
    /// The input control to render.
    #[serde(default)]
    pub input_type: InputType,
}

impl SimpleFieldOptions {
    /// Creates options for a field.
    pub fn new(
        display_name: impl Into<String>,
        query_field: impl Into<String>,
        chip_name: impl Into<String>,
        input_type: InputType,
    ) -> Self {
        SimpleFieldOptions {
            display_name: display_name.into(),
            query_field: query_field.into(),
            chip_name: chip_name.into(),
            input_type,
        }
    }
}

/// A filter stored directly under a model field of the query.
///
/// For enum inputs the applied value goes through three optional hooks:
///
/// ```text
/// enum value ──enum_value_to_filter_value──▶ stored filter value
/// stored filter value ──filter_value_to_enum_value──▶ enum value
/// enum value ──enum_value_to_chip_text──▶ chip text
/// ```
///
/// Each hook is identity when not supplied. Non-enum inputs store the raw
/// value.
///
/// # Example
///
/// ```
/// use filterbar::{FilterBarManager, InputType, SimpleFieldOptions, SimpleModelFieldFilter};
/// use serde_json::json;
///
/// let status = SimpleModelFieldFilter::new(SimpleFieldOptions::new(
///     "Status", "status", "Status", InputType::Enum,
/// ))
/// .with_enum_value_to_filter_value(|v| v["code"].clone())
/// .with_enum_value_to_chip_text(|v| v["label"].as_str().unwrap_or_default().to_string());
///
/// let mut manager = FilterBarManager::new();
/// let id = manager.add_filter_configuration(status);
/// manager.apply_filter(id, json!({"code": 2, "label": "Open"})).unwrap();
///
/// assert_eq!(manager.get_query(None), json!({"status": 2}));
/// assert_eq!(manager.chips()[0].right, "Open");
/// ```
#[derive(Debug, Clone)]
pub struct SimpleModelFieldFilter {
    options: SimpleFieldOptions,
    hooks: EnumHooks,
}

impl SimpleModelFieldFilter {
    /// Creates a filter from its options.
    pub fn new(options: SimpleFieldOptions) -> Self {
        SimpleModelFieldFilter {
            options,
            hooks: EnumHooks::default(),
        }
    }

    /// Creates a text filter whose display and chip name are the same.
    pub fn text(name: impl Into<String>, query_field: impl Into<String>) -> Self {
        let name = name.into();
        SimpleModelFieldFilter::new(SimpleFieldOptions::new(
            name.clone(),
            query_field,
            name,
            InputType::Text,
        ))
    }

    /// Supplies the enum option provider.
    pub fn with_enum_values<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> Vec<EnumOption> + Send + Sync + 'static,
    {
        self.hooks.values = Some(Arc::new(provider));
        self
    }

    /// Supplies a fixed list of enum options.
    pub fn with_enum_options(mut self, options: Vec<EnumOption>) -> Self {
        self.hooks.set_static_options(options);
        self
    }

    /// Converts selected enum values into stored filter values.
    pub fn with_enum_value_to_filter_value<F>(mut self, convert: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.hooks.to_filter_value = Some(Arc::new(convert));
        self
    }

    /// Converts stored filter values back into enum values.
    pub fn with_filter_value_to_enum_value<F>(mut self, convert: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.hooks.to_enum_value = Some(Arc::new(convert));
        self
    }

    /// Converts enum values into chip text.
    pub fn with_enum_value_to_chip_text<F>(mut self, convert: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.hooks.to_chip_text = Some(Arc::new(convert));
        self
    }

    /// The model field this filter writes.
    pub fn query_field(&self) -> &str {
        &self.options.query_field
    }

    /// The construction options.
    pub fn options(&self) -> &SimpleFieldOptions {
        &self.options
    }

    /// Returns `true` if this filter uses an enum input.
    pub fn is_enum(&self) -> bool {
        self.options.input_type.is_enum()
    }

    /// Converts an enum value into its stored form (identity for non-enum).
    pub fn to_filter_value(&self, value: &Value) -> Value {
        if self.is_enum() {
            self.hooks.filter_value(value)
        } else {
            value.clone()
        }
    }
}

impl FilterConfiguration for SimpleModelFieldFilter {
    fn display_name(&self) -> &str {
        &self.options.display_name
    }

    fn chip_name(&self) -> &str {
        &self.options.chip_name
    }

    fn input_configuration(&self) -> InputConfiguration {
        InputConfiguration::new(self.options.input_type)
    }

    fn get_chip(&self, value: &Value) -> ChipText {
        let right = if self.is_enum() {
            self.hooks.chip_text(value)
        } else {
            display_value(value)
        };
        ChipText::new(self.options.chip_name.clone(), right)
    }

    fn on_apply(&mut self, state: &mut FilterState, value: &Value) -> Result<()> {
        let filter_value = self.to_filter_value(value);
        state.add_model_field_filter(&self.options.query_field, filter_value);
        Ok(())
    }

    fn on_remove(&mut self, state: &mut FilterState) {
        state.remove_model_field_filter(&self.options.query_field);
    }

    fn get_input_value(&self, state: &FilterState) -> Option<Value> {
        let filter_value = state.model_field_filter(&self.options.query_field)?;
        if self.is_enum() {
            Some(self.hooks.enum_value(filter_value))
        } else {
            Some(filter_value.clone())
        }
    }

    fn enum_values(&self, _state: &FilterState) -> Result<Vec<EnumOption>> {
        match &self.hooks.values {
            Some(provider) => Ok(provider()),
            None => Err(crate::FilterBarError::EnumValuesNotImplemented {
                filter: self.options.display_name.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FilterBarError;
    use serde_json::json;

    fn priority_filter() -> SimpleModelFieldFilter {
        SimpleModelFieldFilter::new(SimpleFieldOptions::new(
            "Priority",
            "priority",
            "Prio",
            InputType::Enum,
        ))
        .with_enum_value_to_filter_value(|v| v["level"].clone())
        .with_filter_value_to_enum_value(|v| json!({"level": v, "label": format!("P{v}")}))
        .with_enum_value_to_chip_text(|v| v["label"].as_str().unwrap_or_default().to_string())
    }

    #[test]
    fn text_apply_and_remove() {
        let mut filter = SimpleModelFieldFilter::text("Name", "name");
        let mut state = FilterState::new();

        filter.on_apply(&mut state, &json!("pump")).unwrap();
        assert_eq!(state.model_field_filter("name"), Some(&json!("pump")));
        assert_eq!(filter.get_input_value(&state), Some(json!("pump")));

        filter.on_remove(&mut state);
        assert!(state.is_empty());
        assert_eq!(filter.get_input_value(&state), None);
    }

    #[test]
    fn apply_is_idempotent() {
        let mut filter = SimpleModelFieldFilter::text("Name", "name");
        let mut state = FilterState::new();
        filter.on_apply(&mut state, &json!("pump")).unwrap();
        let once = state.clone();
        filter.on_apply(&mut state, &json!("pump")).unwrap();
        assert_eq!(state, once);
    }

    #[test]
    fn remove_without_value_is_noop() {
        let mut filter = SimpleModelFieldFilter::text("Name", "name");
        let mut state = FilterState::new();
        state.add_model_field_filter("other", json!(1));
        filter.on_remove(&mut state);
        assert_eq!(state.model_field_filter("other"), Some(&json!(1)));
    }

    #[test]
    fn text_chip_uses_raw_value() {
        let filter = SimpleModelFieldFilter::text("Name", "name");
        assert_eq!(filter.get_chip(&json!("pump")), ChipText::new("Name", "pump"));
    }

    #[test]
    fn numeric_chip_renders_number() {
        let filter = SimpleModelFieldFilter::new(SimpleFieldOptions::new(
            "Floor",
            "floor",
            "Floor",
            InputType::Numeric,
        ));
        assert_eq!(filter.get_chip(&json!(3)), ChipText::new("Floor", "3"));
    }

    #[test]
    fn enum_conversions() {
        let mut filter = priority_filter();
        let mut state = FilterState::new();

        filter
            .on_apply(&mut state, &json!({"level": 2, "label": "P2"}))
            .unwrap();
        assert_eq!(state.model_field_filter("priority"), Some(&json!(2)));
        assert_eq!(
            filter.get_input_value(&state),
            Some(json!({"level": 2, "label": "P2"}))
        );
        assert_eq!(
            filter.get_chip(&json!({"level": 2, "label": "P2"})),
            ChipText::new("Prio", "P2")
        );
    }

    #[test]
    fn non_enum_ignores_enum_hooks() {
        let mut filter = SimpleModelFieldFilter::text("Name", "name")
            .with_enum_value_to_filter_value(|_| json!("converted"));
        let mut state = FilterState::new();
        filter.on_apply(&mut state, &json!("raw")).unwrap();
        assert_eq!(state.model_field_filter("name"), Some(&json!("raw")));
    }

    #[test]
    fn enum_values_without_provider_fails() {
        let filter = priority_filter();
        let err = filter.enum_values(&FilterState::new()).unwrap_err();
        assert!(matches!(err, FilterBarError::EnumValuesNotImplemented { .. }));
        assert!(err.to_string().contains("Priority"));
    }

    #[test]
    fn enum_values_from_provider() {
        let filter = priority_filter().with_enum_values(|| {
            vec![
                EnumOption::new("P1", json!({"level": 1, "label": "P1"})),
                EnumOption::new("P2", json!({"level": 2, "label": "P2"})),
            ]
        });
        let options = filter.enum_values(&FilterState::new()).unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options[1].option_text, "P2");
    }

    #[test]
    fn options_deserialize_with_default_input_type() {
        let options: SimpleFieldOptions = serde_json::from_value(json!({
            "display_name": "Name",
            "query_field": "name",
            "chip_name": "Name"
        }))
        .unwrap();
        assert_eq!(options.input_type, InputType::Text);
    }
}
