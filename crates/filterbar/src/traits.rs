//! The filter configuration contract.
//!
//! This module provides the [`FilterConfiguration`] trait which every filter
//! kind implements. It is all a presentation component needs to render a
//! filter input and format its chip; the values themselves live in a
//! [`FilterState`] owned by the [`FilterBarManager`](crate::FilterBarManager)
//! and are passed in explicitly.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::category::CategoryFilter;
use crate::error::Result;
use crate::state::FilterState;
use crate::value::{EnumOption, InputConfiguration};

/// Identity of a configuration registered with a manager.
///
/// Returned by
/// [`FilterBarManager::add_filter_configuration`](crate::FilterBarManager::add_filter_configuration).
/// Chips refer back to their configuration through this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FilterId(pub(crate) usize);

impl FilterId {
    /// Registration index of this configuration.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The two text halves of a chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipText {
    /// Left text, usually the filter's chip name.
    pub left: String,
    /// Right text, the applied value.
    pub right: String,
}

impl ChipText {
    /// Creates chip text.
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        ChipText {
            left: left.into(),
            right: right.into(),
        }
    }
}

/// Converts one value representation into another (enum value to filter
/// value, and back).
pub type ConvertFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Converts an enum value into chip text.
pub type ChipTextFn = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Produces the options of an enum input.
pub type EnumValuesFn = Arc<dyn Fn() -> Vec<EnumOption> + Send + Sync>;

/// A filter kind that can be shown in a filter bar.
///
/// # Implementation Guidelines
///
/// - [`get_chip`](Self::get_chip) is pure formatting and must not touch
///   state.
/// - [`on_apply`](Self::on_apply) writes this filter's entry into the state.
///   Applying the same value twice leaves the state unchanged.
/// - [`on_remove`](Self::on_remove) deletes this filter's entry and is a
///   no-op when nothing is applied.
/// - [`get_input_value`](Self::get_input_value) rebuilds the value the input
///   control should show. `None` means no filter of this kind is applied;
///   falsy JSON values such as `false`, `0` or `""` are `Some`.
///
/// # Example
///
/// ```
/// use filterbar::{ChipText, FilterConfiguration, FilterState, InputConfiguration, InputType, Result};
/// use serde_json::Value;
///
/// struct Archived;
///
/// impl FilterConfiguration for Archived {
///     fn display_name(&self) -> &str { "Archived" }
///     fn chip_name(&self) -> &str { "Archived" }
///     fn input_configuration(&self) -> InputConfiguration {
///         InputConfiguration::new(InputType::Text)
///     }
///     fn get_chip(&self, value: &Value) -> ChipText {
///         ChipText::new("Archived", value.to_string())
///     }
///     fn on_apply(&mut self, state: &mut FilterState, value: &Value) -> Result<()> {
///         state.add_model_field_filter("archived", value.clone());
///         Ok(())
///     }
///     fn on_remove(&mut self, state: &mut FilterState) {
///         state.remove_model_field_filter("archived");
///     }
///     fn get_input_value(&self, state: &FilterState) -> Option<Value> {
///         state.model_field_filter("archived").cloned()
///     }
/// }
/// ```
pub trait FilterConfiguration: Send + Sync {
    /// Option text for this configuration in the filter picker.
    fn display_name(&self) -> &str;

    /// Left text of this configuration's chip.
    fn chip_name(&self) -> &str;

    /// The input control to render.
    fn input_configuration(&self) -> InputConfiguration;

    /// Formats the chip for a value.
    fn get_chip(&self, value: &Value) -> ChipText;

    /// Writes a value into the state.
    fn on_apply(&mut self, state: &mut FilterState, value: &Value) -> Result<()>;

    /// Deletes this filter's value from the state.
    fn on_remove(&mut self, state: &mut FilterState);

    /// Rebuilds an input value from the state, `None` when not applied.
    fn get_input_value(&self, state: &FilterState) -> Option<Value>;

    /// Options for an enum input.
    ///
    /// The default fails with
    /// [`EnumValuesNotImplemented`](crate::FilterBarError::EnumValuesNotImplemented).
    fn enum_values(&self, _state: &FilterState) -> Result<Vec<EnumOption>> {
        Err(crate::FilterBarError::EnumValuesNotImplemented {
            filter: self.display_name().to_string(),
        })
    }

    /// Configurations to clear when this one is removed or changes value.
    fn dependents(&self) -> &[FilterId] {
        &[]
    }

    /// Downcast to a category filter.
    fn as_category(&self) -> Option<&CategoryFilter> {
        None
    }

    /// Mutable downcast to a category filter.
    fn as_category_mut(&mut self) -> Option<&mut CategoryFilter> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::InputType;
    use crate::FilterBarError;
    use serde_json::json;

    struct Flag;

    impl FilterConfiguration for Flag {
        fn display_name(&self) -> &str {
            "Flag"
        }

        fn chip_name(&self) -> &str {
            "Flag"
        }

        fn input_configuration(&self) -> InputConfiguration {
            InputConfiguration::new(InputType::Text)
        }

        fn get_chip(&self, value: &Value) -> ChipText {
            ChipText::new("Flag", value.to_string())
        }

        fn on_apply(&mut self, state: &mut FilterState, value: &Value) -> Result<()> {
            state.add_model_field_filter("flag", value.clone());
            Ok(())
        }

        fn on_remove(&mut self, state: &mut FilterState) {
            state.remove_model_field_filter("flag");
        }

        fn get_input_value(&self, state: &FilterState) -> Option<Value> {
            state.model_field_filter("flag").cloned()
        }
    }

    #[test]
    fn default_enum_values_not_implemented() {
        let err = Flag.enum_values(&FilterState::new()).unwrap_err();
        assert!(matches!(err, FilterBarError::EnumValuesNotImplemented { ref filter } if filter == "Flag"));
    }

    #[test]
    fn defaults_have_no_dependents_and_no_category() {
        let mut flag = Flag;
        assert!(flag.dependents().is_empty());
        assert!(flag.as_category().is_none());
        assert!(flag.as_category_mut().is_none());
    }

    #[test]
    fn falsy_input_value_is_some() {
        let mut flag = Flag;
        let mut state = FilterState::new();
        assert_eq!(flag.get_input_value(&state), None);

        flag.on_apply(&mut state, &json!(false)).unwrap();
        assert_eq!(flag.get_input_value(&state), Some(json!(false)));

        flag.on_remove(&mut state);
        flag.on_remove(&mut state);
        assert_eq!(flag.get_input_value(&state), None);
    }

    #[test]
    fn filter_id_display() {
        assert_eq!(FilterId(3).to_string(), "#3");
        assert_eq!(FilterId(3).index(), 3);
    }
}
