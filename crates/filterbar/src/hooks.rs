//! Enum conversion hooks shared by the field filters.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::traits::{ChipTextFn, ConvertFn, EnumValuesFn};
use crate::value::{display_value, EnumOption};

/// Optional enum conversions. Each missing hook behaves as identity.
#[derive(Clone, Default)]
pub(crate) struct EnumHooks {
    pub(crate) to_filter_value: Option<ConvertFn>,
    pub(crate) to_enum_value: Option<ConvertFn>,
    pub(crate) to_chip_text: Option<ChipTextFn>,
    pub(crate) values: Option<EnumValuesFn>,
}

impl EnumHooks {
    pub(crate) fn filter_value(&self, enum_value: &Value) -> Value {
        match &self.to_filter_value {
            Some(convert) => convert(enum_value),
            None => enum_value.clone(),
        }
    }

    pub(crate) fn enum_value(&self, filter_value: &Value) -> Value {
        match &self.to_enum_value {
            Some(convert) => convert(filter_value),
            None => filter_value.clone(),
        }
    }

    pub(crate) fn chip_text(&self, enum_value: &Value) -> String {
        match &self.to_chip_text {
            Some(convert) => convert(enum_value),
            None => display_value(enum_value),
        }
    }

    pub(crate) fn set_static_options(&mut self, options: Vec<EnumOption>) {
        self.values = Some(Arc::new(move || options.clone()));
    }
}

impl fmt::Debug for EnumHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumHooks")
            .field("to_filter_value", &self.to_filter_value.is_some())
            .field("to_enum_value", &self.to_enum_value.is_some())
            .field("to_chip_text", &self.to_chip_text.is_some())
            .field("values", &self.values.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_hooks_are_identity() {
        let hooks = EnumHooks::default();
        assert_eq!(hooks.filter_value(&json!({"_id": 1})), json!({"_id": 1}));
        assert_eq!(hooks.enum_value(&json!(1)), json!(1));
        assert_eq!(hooks.chip_text(&json!("Open")), "Open");
        assert!(hooks.values.is_none());
    }

    #[test]
    fn static_options_are_replayed() {
        let mut hooks = EnumHooks::default();
        hooks.set_static_options(vec![EnumOption::text("a"), EnumOption::text("b")]);
        let values = hooks.values.as_ref().unwrap();
        assert_eq!(values().len(), 2);
        assert_eq!(values(), values());
    }
}
