//! The category (pin type) filter.
//!
//! A [`CategoryFilter`] is an enum filter fixed to the `pin_type` model
//! field. Its enum values are pin type objects, the stored filter value is
//! the pin type id, and the chip shows the pin type name. Dependent filters
//! register with it so that removing or changing the category clears them.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::catalog::PinCatalog;
use crate::clause::{ID_KEY, PIN_TYPE_KEY};
use crate::error::Result;
use crate::simple::{SimpleFieldOptions, SimpleModelFieldFilter};
use crate::state::FilterState;
use crate::traits::{ChipText, FilterConfiguration, FilterId};
use crate::value::{display_value, id_string, EnumOption, InputConfiguration, InputType};

/// Display and chip name of the category filter.
pub const CATEGORY_LABEL: &str = "Category";

/// Filter on the pin type of a building.
pub struct CategoryFilter {
    base: SimpleModelFieldFilter,
    building: String,
    dependents: Vec<FilterId>,
    current_pin_type: Option<Value>,
}

impl CategoryFilter {
    /// Creates a category filter offering the pin types of `building`.
    pub fn new(building: impl Into<String>, catalog: Arc<dyn PinCatalog>) -> Self {
        let building = building.into();
        let lookup = Arc::clone(&catalog);
        let listing = Arc::clone(&catalog);
        let listed_building = building.clone();

        let base = SimpleModelFieldFilter::new(SimpleFieldOptions::new(
            CATEGORY_LABEL,
            PIN_TYPE_KEY,
            CATEGORY_LABEL,
            InputType::Enum,
        ))
        .with_enum_value_to_filter_value(pin_type_id)
        .with_enum_value_to_chip_text(pin_type_name)
        .with_filter_value_to_enum_value(move |filter_value| {
            id_string(filter_value)
                .and_then(|id| lookup.pin_type(&id))
                .and_then(|pin_type| serde_json::to_value(pin_type).ok())
                .unwrap_or_else(|| filter_value.clone())
        })
        .with_enum_values(move || {
            listing
                .pin_types_for_building(&listed_building)
                .into_iter()
                .filter_map(|pin_type| {
                    let text = pin_type.name.clone();
                    serde_json::to_value(pin_type)
                        .ok()
                        .map(|value| EnumOption::new(text, value))
                })
                .collect()
        });

        CategoryFilter {
            base,
            building,
            dependents: Vec::new(),
            current_pin_type: None,
        }
    }

    /// Registers the configurations cleared when this category changes.
    pub fn set_dependent_configurations(&mut self, dependents: Vec<FilterId>) {
        self.dependents = dependents;
    }

    /// Reads the applied pin type id without materializing the pin type.
    pub fn get_current_pin_type_id(&self, state: &FilterState) -> Option<String> {
        current_pin_type_id(state)
    }

    /// The pin type recorded by the last apply, if still applied.
    pub fn current_pin_type(&self) -> Option<&Value> {
        self.current_pin_type.as_ref()
    }

    /// The building whose pin types are offered.
    pub fn building(&self) -> &str {
        &self.building
    }
}

impl fmt::Debug for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategoryFilter")
            .field("building", &self.building)
            .field("dependents", &self.dependents)
            .field("current_pin_type", &self.current_pin_type)
            .finish()
    }
}

impl FilterConfiguration for CategoryFilter {
    fn display_name(&self) -> &str {
        self.base.display_name()
    }

    fn chip_name(&self) -> &str {
        self.base.chip_name()
    }

    fn input_configuration(&self) -> InputConfiguration {
        self.base.input_configuration()
    }

    fn get_chip(&self, value: &Value) -> ChipText {
        self.base.get_chip(value)
    }

    fn on_apply(&mut self, state: &mut FilterState, value: &Value) -> Result<()> {
        self.base.on_apply(state, value)?;
        self.current_pin_type = Some(value.clone());
        Ok(())
    }

    fn on_remove(&mut self, state: &mut FilterState) {
        self.base.on_remove(state);
        self.current_pin_type = None;
    }

    fn get_input_value(&self, state: &FilterState) -> Option<Value> {
        self.base.get_input_value(state)
    }

    fn enum_values(&self, state: &FilterState) -> Result<Vec<EnumOption>> {
        self.base.enum_values(state)
    }

    fn dependents(&self) -> &[FilterId] {
        &self.dependents
    }

    fn as_category(&self) -> Option<&CategoryFilter> {
        Some(self)
    }

    fn as_category_mut(&mut self) -> Option<&mut CategoryFilter> {
        Some(self)
    }
}

/// A reference to a registered [`CategoryFilter`].
///
/// Obtained from [`FilterBarManager::category`](crate::FilterBarManager::category)
/// and required to construct a
/// [`PinTypeSpecificFilter`](crate::PinTypeSpecificFilter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryHandle {
    id: FilterId,
    building: String,
}

impl CategoryHandle {
    pub(crate) fn new(id: FilterId, building: impl Into<String>) -> Self {
        CategoryHandle {
            id,
            building: building.into(),
        }
    }

    /// The category filter's id.
    pub fn id(&self) -> FilterId {
        self.id
    }

    /// The building of the category filter.
    pub fn building(&self) -> &str {
        &self.building
    }

    /// Reads the applied pin type id from the state.
    pub fn current_pin_type_id(&self, state: &FilterState) -> Option<String> {
        current_pin_type_id(state)
    }
}

fn current_pin_type_id(state: &FilterState) -> Option<String> {
    state.model_field_filter(PIN_TYPE_KEY).and_then(id_string)
}

fn pin_type_id(pin_type: &Value) -> Value {
    match pin_type.get(ID_KEY) {
        Some(id) => id.clone(),
        None => pin_type.clone(),
    }
}

fn pin_type_name(pin_type: &Value) -> String {
    match pin_type.get("name").and_then(Value::as_str) {
        Some(name) => name.to_string(),
        None => display_value(pin_type),
    }
}
