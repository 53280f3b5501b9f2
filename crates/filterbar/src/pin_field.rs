//! Filters on a pin field across all categories.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FilterBarError, Result};
use crate::hooks::EnumHooks;
use crate::state::FilterState;
use crate::traits::{ChipText, FilterConfiguration};
use crate::value::{display_value, EnumOption, InputConfiguration, InputType};

/// Construction parameters for a [`PinFieldFilter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinFieldOptions {
    /// Option text for this filter in the filter picker.
    pub display_name: String,
    /// Left text of the chip.
    pub chip_name: String,
    /// Pin field name, matched in every pin type.
    pub pin_field_name: String,
    /// The input control to render.
    #[serde(default)]
    pub input_type: InputType,
}

/// A filter written to the query's `pin_fields` section.
///
/// Unlike [`PinTypeSpecificFilter`](crate::PinTypeSpecificFilter) it needs
/// no category: the data service matches the field by name in every pin
/// type.
#[derive(Debug, Clone)]
pub struct PinFieldFilter {
    options: PinFieldOptions,
    hooks: EnumHooks,
}

impl PinFieldFilter {
    /// Creates a filter from its options.
    pub fn new(options: PinFieldOptions) -> Self {
        PinFieldFilter {
            options,
            hooks: EnumHooks::default(),
        }
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

    /// The pin field name this filter writes.
    pub fn pin_field_name(&self) -> &str {
        &self.options.pin_field_name
    }

    fn is_enum(&self) -> bool {
        self.options.input_type.is_enum()
    }
}

impl FilterConfiguration for PinFieldFilter {
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
        let filter_value = if self.is_enum() {
            self.hooks.filter_value(value)
        } else {
            value.clone()
        };
        state.add_pin_field_filter(&self.options.pin_field_name, filter_value);
        Ok(())
    }

    fn on_remove(&mut self, state: &mut FilterState) {
        state.remove_pin_field_filter(&self.options.pin_field_name);
    }

    fn get_input_value(&self, state: &FilterState) -> Option<Value> {
        let filter_value = state.pin_field_filter(&self.options.pin_field_name)?;
        if self.is_enum() {
            Some(self.hooks.enum_value(filter_value))
        } else {
            Some(filter_value.clone())
        }
    }

    fn enum_values(&self, _state: &FilterState) -> Result<Vec<EnumOption>> {
        match &self.hooks.values {
            Some(provider) => Ok(provider()),
            None => Err(FilterBarError::EnumValuesNotImplemented {
                filter: self.options.display_name.clone(),
            }),
        }
    }
}
