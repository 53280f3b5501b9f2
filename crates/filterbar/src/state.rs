//! Applied filter values.
//!
//! [`FilterState`] is the state handle that configurations read and write.
//! It holds three independent partitions, each keeping insertion order:
//!
//! - **model fields**: top-level query fields (`?key=value`)
//! - **pin type specific**: values keyed by pin field id, only meaningful
//!   for the selected category
//! - **pin fields**: values keyed by pin field name, across categories

use serde_json::{Map, Value};

/// The three value partitions of a filter bar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    model_field_filters: Map<String, Value>,
    pin_type_specific_filters: Map<String, Value>,
    pin_field_filters: Map<String, Value>,
}

impl FilterState {
    /// Creates an empty state.
    pub fn new() -> Self {
        FilterState::default()
    }

    // ========================================================================
    // Model field filters
    // ========================================================================

    /// Sets a model field filter, overwriting any previous value.
    pub fn add_model_field_filter(&mut self, field: &str, value: Value) {
        self.model_field_filters.insert(field.to_string(), value);
    }

    /// Removes a model field filter. Removing an absent field is a no-op.
    pub fn remove_model_field_filter(&mut self, field: &str) -> Option<Value> {
        self.model_field_filters.shift_remove(field)
    }

    /// Returns the value of a model field filter.
    pub fn model_field_filter(&self, field: &str) -> Option<&Value> {
        self.model_field_filters.get(field)
    }

    /// Returns all model field filters.
    pub fn model_field_filters(&self) -> &Map<String, Value> {
        &self.model_field_filters
    }

    // ========================================================================
    // Pin type specific filters
    // ========================================================================

    /// Sets a filter on a pin field of the selected category, by field id.
    pub fn add_pin_type_specific_filter(&mut self, pin_field_id: &str, value: Value) {
        self.pin_type_specific_filters
            .insert(pin_field_id.to_string(), value);
    }

    /// Removes a category-scoped filter by pin field id.
    pub fn remove_pin_type_specific_filter(&mut self, pin_field_id: &str) -> Option<Value> {
        self.pin_type_specific_filters.shift_remove(pin_field_id)
    }

    /// Returns the category-scoped filter for a pin field id.
    pub fn pin_type_specific_filter(&self, pin_field_id: &str) -> Option<&Value> {
        self.pin_type_specific_filters.get(pin_field_id)
    }

    /// Returns all category-scoped filters.
    pub fn pin_type_specific_filters(&self) -> &Map<String, Value> {
        &self.pin_type_specific_filters
    }

    // ========================================================================
    // Pin field filters
    // ========================================================================

    /// Sets a cross-category filter by pin field name.
    pub fn add_pin_field_filter(&mut self, pin_field_name: &str, value: Value) {
        self.pin_field_filters
            .insert(pin_field_name.to_string(), value);
    }

    /// Removes a cross-category filter.
    pub fn remove_pin_field_filter(&mut self, pin_field_name: &str) -> Option<Value> {
        self.pin_field_filters.shift_remove(pin_field_name)
    }

    /// Returns the cross-category filter for a pin field name.
    pub fn pin_field_filter(&self, pin_field_name: &str) -> Option<&Value> {
        self.pin_field_filters.get(pin_field_name)
    }

    /// Returns all cross-category filters.
    pub fn pin_field_filters(&self) -> &Map<String, Value> {
        &self.pin_field_filters
    }

    // ========================================================================
    // Whole-state operations
    // ========================================================================

    /// Replaces all three partitions at once.
    pub(crate) fn replace(
        &mut self,
        model_field_filters: Map<String, Value>,
        pin_field_filters: Map<String, Value>,
        pin_type_specific_filters: Map<String, Value>,
    ) {
        self.model_field_filters = model_field_filters;
        self.pin_field_filters = pin_field_filters;
        self.pin_type_specific_filters = pin_type_specific_filters;
    }

    /// Returns `true` if no filter value is stored in any partition.
    pub fn is_empty(&self) -> bool {
        self.model_field_filters.is_empty()
            && self.pin_type_specific_filters.is_empty()
            && self.pin_field_filters.is_empty()
    }
}
