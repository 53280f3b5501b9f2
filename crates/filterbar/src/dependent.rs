//! Filters on pin fields scoped to the selected category.
//!
//! A [`PinTypeSpecificFilter`] targets a pin field by its logical name, for
//! example `status`. Every pin type defines its own `status` field with its
//! own id, so which field the filter writes depends on the selected
//! category:
//!
//! ```text
//! category selected    → the one `status` field of that pin type
//! no category selected → every `status` field across the building
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::{PinCatalog, PinField};
use crate::category::CategoryHandle;
use crate::error::{FilterBarError, Result};
use crate::hooks::EnumHooks;
use crate::state::FilterState;
use crate::traits::{ChipText, FilterConfiguration};
use crate::value::{display_value, EnumOption, InputConfiguration, InputType};

/// Produces enum options for the resolved pin field(s).
pub type PinFieldEnumFn =
    Arc<dyn Fn(&FilterState, &PinFieldSelection) -> Vec<EnumOption> + Send + Sync>;

/// Construction parameters for a [`PinTypeSpecificFilter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinTypeSpecificOptions {
    /// Option text for this filter in the filter picker.
    pub display_name: String,
    /// Left text of the chip.
    pub chip_name: String,
    /// Logical field name within a pin type.
    pub pin_field_name: String,
    /// The input control to render.
    #[serde(default)]
    pub input_type: InputType,
    /// Building to search when no category is selected. Defaults to the
    /// category filter's building.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,
}

impl PinTypeSpecificOptions {
    /// Creates options for a pin field.
    pub fn new(
        display_name: impl Into<String>,
        chip_name: impl Into<String>,
        pin_field_name: impl Into<String>,
        input_type: InputType,
    ) -> Self {
        PinTypeSpecificOptions {
            display_name: display_name.into(),
            chip_name: chip_name.into(),
            pin_field_name: pin_field_name.into(),
            input_type,
            building: None,
        }
    }
}

/// The pin field(s) a dependent filter resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinFieldSelection {
    /// The field of the selected category.
    Single(PinField),
    /// All same-named fields of the building; no category is selected.
    Many(Vec<PinField>),
}

impl PinFieldSelection {
    /// The resolved fields as a slice.
    pub fn fields(&self) -> &[PinField] {
        match self {
            PinFieldSelection::Single(field) => std::slice::from_ref(field),
            PinFieldSelection::Many(fields) => fields,
        }
    }
}

/// A filter on a pin field of the selected category.
pub struct PinTypeSpecificFilter {
    category: CategoryHandle,
    options: PinTypeSpecificOptions,
    catalog: Arc<dyn PinCatalog>,
    hooks: EnumHooks,
    delegate: Option<PinFieldEnumFn>,
    applied_field: Option<String>,
}

impl PinTypeSpecificFilter {
    /// Creates a dependent filter bound to a registered category filter.
    pub fn new(
        category: CategoryHandle,
        options: PinTypeSpecificOptions,
        catalog: Arc<dyn PinCatalog>,
    ) -> Self {
        PinTypeSpecificFilter {
            category,
            options,
            catalog,
            hooks: EnumHooks::default(),
            delegate: None,
            applied_field: None,
        }
    }

    /// Supplies the enum option delegate.
    ///
    /// Without one, the union of the resolved fields' `options` is offered.
    pub fn with_enum_values<F>(mut self, delegate: F) -> Self
    where
        F: Fn(&FilterState, &PinFieldSelection) -> Vec<EnumOption> + Send + Sync + 'static,
    {
        self.delegate = Some(Arc::new(delegate));
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

    /// The category this filter depends on.
    pub fn category(&self) -> &CategoryHandle {
        &self.category
    }

    /// The logical pin field name.
    pub fn pin_field_name(&self) -> &str {
        &self.options.pin_field_name
    }

    /// The building searched when no category is selected.
    pub fn building(&self) -> &str {
        self.options
            .building
            .as_deref()
            .unwrap_or_else(|| self.category.building())
    }

    fn is_enum(&self) -> bool {
        self.options.input_type.is_enum()
    }

    /// Resolves the pin field(s) this filter targets in the current state.
    pub fn resolve_pin_fields(&self, state: &FilterState) -> Result<PinFieldSelection> {
        let name = &self.options.pin_field_name;
        match self.category.current_pin_type_id(state) {
            Some(pin_type_id) => self
                .catalog
                .pin_fields_for_pin_type(&pin_type_id)
                .into_iter()
                .find(|field| &field.name == name)
                .map(PinFieldSelection::Single)
                .ok_or_else(|| {
                    FilterBarError::unresolved(
                        name.clone(),
                        format!("pin type '{pin_type_id}' has no such field"),
                    )
                }),
            None => {
                let pin_types = self.catalog.pin_types_for_building(self.building());
                let fields = self
                    .catalog
                    .pin_fields_for_pin_types(&pin_types)
                    .into_iter()
                    .filter(|field| &field.name == name)
                    .collect();
                Ok(PinFieldSelection::Many(fields))
            }
        }
    }

    fn target_field_id(&self, state: &FilterState) -> Result<String> {
        let name = &self.options.pin_field_name;
        match self.resolve_pin_fields(state)? {
            PinFieldSelection::Single(field) => Ok(field.id),
            PinFieldSelection::Many(fields) => {
                if let Some(field) = fields
                    .iter()
                    .find(|field| state.pin_type_specific_filter(&field.id).is_some())
                {
                    return Ok(field.id.clone());
                }
                match fields.as_slice() {
                    [only] => Ok(only.id.clone()),
                    [] => Err(FilterBarError::unresolved(
                        name.clone(),
                        format!("no pin type in building '{}' defines it", self.building()),
                    )),
                    _ => Err(FilterBarError::unresolved(
                        name.clone(),
                        "several pin types define it; select a category first",
                    )),
                }
            }
        }
    }
}

impl fmt::Debug for PinTypeSpecificFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinTypeSpecificFilter")
            .field("category", &self.category)
            .field("options", &self.options)
            .field("hooks", &self.hooks)
            .field("delegate", &self.delegate.is_some())
            .field("applied_field", &self.applied_field)
            .finish()
    }
}

impl FilterConfiguration for PinTypeSpecificFilter {
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
        let field_id = self.target_field_id(state)?;
        let filter_value = if self.is_enum() {
            self.hooks.filter_value(value)
        } else {
            value.clone()
        };
        if let Some(previous) = self.applied_field.take() {
            if previous != field_id {
                state.remove_pin_type_specific_filter(&previous);
            }
        }
        state.add_pin_type_specific_filter(&field_id, filter_value);
        self.applied_field = Some(field_id);
        Ok(())
    }

    fn on_remove(&mut self, state: &mut FilterState) {
        if let Some(field_id) = self.applied_field.take() {
            state.remove_pin_type_specific_filter(&field_id);
        }
    }

    fn get_input_value(&self, state: &FilterState) -> Option<Value> {
        let selection = self.resolve_pin_fields(state).ok()?;
        let filter_value = selection
            .fields()
            .iter()
            .find_map(|field| state.pin_type_specific_filter(&field.id))?;
        if self.is_enum() {
            Some(self.hooks.enum_value(filter_value))
        } else {
            Some(filter_value.clone())
        }
    }

    fn enum_values(&self, state: &FilterState) -> Result<Vec<EnumOption>> {
        let selection = self.resolve_pin_fields(state)?;
        if let Some(delegate) = &self.delegate {
            return Ok(delegate(state, &selection));
        }
        let mut options: Vec<EnumOption> = Vec::new();
        for text in selection.fields().iter().flat_map(|field| &field.options) {
            if !options.iter().any(|option| &option.option_text == text) {
                options.push(EnumOption::text(text.clone()));
            }
        }
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PinType, StaticCatalog};
    use crate::traits::FilterId;
    use serde_json::json;

    fn catalog() -> Arc<dyn PinCatalog> {
        Arc::new(
            StaticCatalog::new()
                .with_pin_type(PinType::new("pump", "Pump").in_building("hq"))
                .with_pin_type(PinType::new("valve", "Valve").in_building("hq"))
                .with_pin_type(PinType::new("crane", "Crane").in_building("yard"))
                .with_pin_field(PinField::new("pump.status", "status", "pump").with_options(["on", "off"]))
                .with_pin_field(PinField::new("valve.status", "status", "valve").with_options(["open", "off"]))
                .with_pin_field(PinField::new("valve.size", "size", "valve"))
                .with_pin_field(PinField::new("crane.status", "status", "crane")),
        )
    }

    fn filter(field: &str, input_type: InputType) -> PinTypeSpecificFilter {
        PinTypeSpecificFilter::new(
            CategoryHandle::new(FilterId(0), "hq"),
            PinTypeSpecificOptions::new("Status", "Status", field, input_type),
            catalog(),
        )
    }

    fn with_category(id: &str) -> FilterState {
        let mut state = FilterState::new();
        state.add_model_field_filter("pin_type", json!(id));
        state
    }

    #[test]
    fn resolves_single_field_with_category() {
        let selection = filter("status", InputType::Text)
            .resolve_pin_fields(&with_category("valve"))
            .unwrap();
        assert!(matches!(selection, PinFieldSelection::Single(ref f) if f.id == "valve.status"));
    }

    #[test]
    fn broadens_to_building_without_category() {
        let selection = filter("status", InputType::Text)
            .resolve_pin_fields(&FilterState::new())
            .unwrap();
        let ids: Vec<&str> = selection.fields().iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["pump.status", "valve.status"]);
    }

    #[test]
    fn explicit_building_overrides_category_building() {
        let mut options = PinTypeSpecificOptions::new("Status", "Status", "status", InputType::Text);
        options.building = Some("yard".to_string());
        let filter = PinTypeSpecificFilter::new(CategoryHandle::new(FilterId(0), "hq"), options, catalog());
        let selection = filter.resolve_pin_fields(&FilterState::new()).unwrap();
        assert_eq!(selection.fields()[0].id, "crane.status");
    }

    #[test]
    fn unknown_field_in_category_is_unresolved() {
        let err = filter("size", InputType::Text)
            .resolve_pin_fields(&with_category("pump"))
            .unwrap_err();
        assert!(matches!(err, FilterBarError::UnresolvedPinField { .. }));
    }

    #[test]
    fn apply_stores_under_field_id() {
        let mut filter = filter("status", InputType::Text);
        let mut state = with_category("pump");
        filter.on_apply(&mut state, &json!("on")).unwrap();
        assert_eq!(state.pin_type_specific_filter("pump.status"), Some(&json!("on")));
        assert_eq!(filter.get_input_value(&state), Some(json!("on")));
    }

    #[test]
    fn apply_without_category_needs_unique_field() {
        let mut ambiguous = filter("status", InputType::Text);
        let mut state = FilterState::new();
        let err = ambiguous.on_apply(&mut state, &json!("on")).unwrap_err();
        assert!(err.to_string().contains("select a category"));

        let mut unique = filter("size", InputType::Numeric);
        unique.on_apply(&mut state, &json!(4)).unwrap();
        assert_eq!(state.pin_type_specific_filter("valve.size"), Some(&json!(4)));
    }

    #[test]
    fn apply_without_category_reuses_existing_field() {
        let mut filter = filter("status", InputType::Text);
        let mut state = FilterState::new();
        state.add_pin_type_specific_filter("valve.status", json!("open"));
        filter.on_apply(&mut state, &json!("off")).unwrap();
        assert_eq!(state.pin_type_specific_filter("valve.status"), Some(&json!("off")));
        assert_eq!(state.pin_type_specific_filters().len(), 1);
    }

    #[test]
    fn remove_deletes_applied_entry_only() {
        let mut filter = filter("status", InputType::Text);
        let mut state = with_category("pump");
        state.add_pin_type_specific_filter("other", json!(1));
        filter.on_apply(&mut state, &json!("on")).unwrap();

        filter.on_remove(&mut state);
        assert_eq!(state.pin_type_specific_filter("pump.status"), None);
        assert_eq!(state.pin_type_specific_filter("other"), Some(&json!(1)));

        filter.on_remove(&mut state);
        assert_eq!(state.pin_type_specific_filters().len(), 1);
    }

    #[test]
    fn reapply_under_new_field_drops_old_entry() {
        let mut filter = filter("status", InputType::Text);
        let mut state = with_category("pump");
        filter.on_apply(&mut state, &json!("on")).unwrap();
        state.add_model_field_filter("pin_type", json!("valve"));
        filter.on_apply(&mut state, &json!("open")).unwrap();

        assert_eq!(state.pin_type_specific_filter("pump.status"), None);
        assert_eq!(state.pin_type_specific_filter("valve.status"), Some(&json!("open")));
    }

    #[test]
    fn enum_conversion_on_apply() {
        let mut filter = filter("status", InputType::Enum)
            .with_enum_value_to_filter_value(|v| json!({"eq": v["code"]}))
            .with_enum_value_to_chip_text(|v| v["label"].as_str().unwrap_or_default().to_string());
        let mut state = with_category("pump");
        let picked = json!({"code": 1, "label": "On"});

        filter.on_apply(&mut state, &picked).unwrap();
        assert_eq!(state.pin_type_specific_filter("pump.status"), Some(&json!({"eq": 1})));
        assert_eq!(filter.get_chip(&picked), ChipText::new("Status", "On"));
    }

    #[test]
    fn default_enum_values_union_field_options() {
        let filter = filter("status", InputType::Enum);
        let options = filter.enum_values(&FilterState::new()).unwrap();
        let texts: Vec<&str> = options.iter().map(|o| o.option_text.as_str()).collect();
        assert_eq!(texts, vec!["on", "off", "open"]);

        let scoped = filter.enum_values(&with_category("valve")).unwrap();
        assert_eq!(scoped.len(), 2);
    }

    #[test]
    fn delegate_receives_selection() {
        let filter = filter("status", InputType::Enum).with_enum_values(|_, selection| {
            selection
                .fields()
                .iter()
                .map(|f| EnumOption::text(f.id.clone()))
                .collect()
        });
        let options = filter.enum_values(&with_category("pump")).unwrap();
        assert_eq!(options, vec![EnumOption::text("pump.status")]);
    }
}
