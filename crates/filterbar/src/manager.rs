//! Filter bar manager.
//!
//! The [`FilterBarManager`] owns the applied values of one filter bar, the
//! configurations registered with it, and the chips shown for the applied
//! filters. It translates that state into the query object sent to the data
//! service, and back.

use serde_json::{json, Map, Value};
use tracing::{debug, trace, warn};

use crate::category::CategoryHandle;
use crate::clause::{
    scoped_entry, split_scoped_entry, PinFieldClause, PinTypeClause, PIN_FIELDS_KEY, PIN_TYPE_KEY,
};
use crate::error::{FilterBarError, Result};
use crate::state::FilterState;
use crate::traits::{FilterConfiguration, FilterId};
use crate::value::EnumOption;

/// A chip: one applied filter as shown in the bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip {
    /// Left text, the filter's chip name.
    pub left: String,
    /// Right text, the applied value.
    pub right: String,
    /// The configuration that produced this chip.
    pub filter_configuration: FilterId,
}

/// Tracks applied filters, their chips, and the query they translate to.
///
/// Every operation runs synchronously to completion. A manager belongs to a
/// single filter bar.
///
/// # Example
///
/// ```
/// use filterbar::{FilterBarManager, SimpleModelFieldFilter};
/// use serde_json::json;
///
/// let mut manager = FilterBarManager::new();
/// let name = manager.add_filter_configuration(SimpleModelFieldFilter::text("Name", "name"));
///
/// manager.apply_filter(name, json!("some value")).unwrap();
/// assert_eq!(manager.get_query(None), json!({"name": "some value"}));
/// assert_eq!(manager.chips()[0].left, "Name");
///
/// manager.clear_filter(name).unwrap();
/// assert_eq!(manager.get_query(None), json!({}));
/// assert!(manager.chips().is_empty());
/// ```
#[derive(Default)]
pub struct FilterBarManager {
    state: FilterState,
    chips: Vec<Chip>,
    filter_configurations: Vec<Box<dyn FilterConfiguration>>,
}

impl FilterBarManager {
    /// Creates a manager with no configurations.
    pub fn new() -> Self {
        FilterBarManager::default()
    }

    // ========================================================================
    // Configurations
    // ========================================================================

    /// Registers a configuration and returns its id.
    ///
    /// Registration order is the order [`load_from_query`](Self::load_from_query)
    /// replays configurations in.
    pub fn add_filter_configuration<C>(&mut self, configuration: C) -> FilterId
    where
        C: FilterConfiguration + 'static,
    {
        let id = FilterId(self.filter_configurations.len());
        debug!(filter = %id, name = configuration.display_name(), "registered filter configuration");
        self.filter_configurations.push(Box::new(configuration));
        id
    }

    /// Returns a registered configuration.
    pub fn configuration(&self, id: FilterId) -> Option<&dyn FilterConfiguration> {
        self.filter_configurations.get(id.0).map(|c| c.as_ref())
    }

    /// Iterates over the registered configurations in registration order.
    pub fn filter_configurations(
        &self,
    ) -> impl Iterator<Item = (FilterId, &dyn FilterConfiguration)> + '_ {
        self.filter_configurations
            .iter()
            .enumerate()
            .map(|(index, c)| (FilterId(index), c.as_ref()))
    }

    /// Returns a handle to a registered category filter.
    ///
    /// Dependent filters are constructed from this handle.
    pub fn category(&self, id: FilterId) -> Result<CategoryHandle> {
        let configuration = self.lookup(id)?;
        let category = configuration
            .as_category()
            .ok_or(FilterBarError::NotACategory(id))?;
        Ok(CategoryHandle::new(id, category.building()))
    }

    /// Registers the configurations cleared when a category is removed or
    /// changes value.
    pub fn set_dependent_configurations(
        &mut self,
        category: FilterId,
        dependents: Vec<FilterId>,
    ) -> Result<()> {
        if let Some(unknown) = dependents
            .iter()
            .find(|dependent| dependent.0 >= self.filter_configurations.len())
        {
            return Err(FilterBarError::UnknownFilter(*unknown));
        }
        let configuration = self
            .filter_configurations
            .get_mut(category.0)
            .ok_or(FilterBarError::UnknownFilter(category))?;
        let category_filter = configuration
            .as_category_mut()
            .ok_or(FilterBarError::NotACategory(category))?;
        debug!(filter = %category, count = dependents.len(), "registered dependent filters");
        category_filter.set_dependent_configurations(dependents);
        Ok(())
    }

    /// Options for a configuration's enum input in the current state.
    pub fn enum_values(&self, id: FilterId) -> Result<Vec<EnumOption>> {
        self.lookup(id)?.enum_values(&self.state)
    }

    fn lookup(&self, id: FilterId) -> Result<&dyn FilterConfiguration> {
        self.configuration(id)
            .ok_or(FilterBarError::UnknownFilter(id))
    }

    // ========================================================================
    // Read model
    // ========================================================================

    /// The chips of the applied filters, in application order.
    pub fn chips(&self) -> &[Chip] {
        &self.chips
    }

    /// The chip of a configuration, if it is applied.
    pub fn chip(&self, id: FilterId) -> Option<&Chip> {
        self.chips.iter().find(|chip| chip.filter_configuration == id)
    }

    /// Returns `true` if the configuration currently has a chip.
    pub fn is_applied(&self, id: FilterId) -> bool {
        self.chip(id).is_some()
    }

    /// The applied filter values.
    pub fn state(&self) -> &FilterState {
        &self.state
    }

    // ========================================================================
    // Apply / clear
    // ========================================================================

    /// Applies a value through a configuration and updates its chip.
    ///
    /// A configuration never has more than one chip: re-applying replaces the
    /// old chip and moves it to the end. When a configuration with
    /// dependents changes value, including from unset to set, the dependents
    /// are cleared. Re-applying the same value keeps them.
    pub fn apply_filter(&mut self, id: FilterId, value: Value) -> Result<()> {
        let configuration = self
            .filter_configurations
            .get_mut(id.0)
            .ok_or(FilterBarError::UnknownFilter(id))?;

        let cascades = !configuration.dependents().is_empty();
        let previous = if cascades {
            configuration.get_input_value(&self.state)
        } else {
            None
        };

        configuration.on_apply(&mut self.state, &value)?;
        let chip = configuration.get_chip(&value);

        let changed = cascades && previous != configuration.get_input_value(&self.state);
        let dependents = if changed {
            configuration.dependents().to_vec()
        } else {
            Vec::new()
        };

        self.remove_chip(id);
        debug!(filter = %id, left = %chip.left, right = %chip.right, "applied filter");
        self.chips.push(Chip {
            left: chip.left,
            right: chip.right,
            filter_configuration: id,
        });

        for dependent in dependents.into_iter().filter(|dependent| *dependent != id) {
            debug!(filter = %id, dependent = %dependent, "value changed, clearing dependent filter");
            self.clear_filter(dependent)?;
        }
        Ok(())
    }

    /// Removes a configuration's value and chip, then its dependents'.
    ///
    /// Clearing a configuration that is not applied is a no-op.
    pub fn clear_filter(&mut self, id: FilterId) -> Result<()> {
        let mut pending = vec![id];
        let mut cleared: Vec<FilterId> = Vec::new();

        while let Some(current) = pending.pop() {
            if cleared.contains(&current) {
                continue;
            }
            let configuration = self
                .filter_configurations
                .get_mut(current.0)
                .ok_or(FilterBarError::UnknownFilter(current))?;

            configuration.on_remove(&mut self.state);
            pending.extend(configuration.dependents().iter().rev().copied());
            self.remove_chip(current);

            if current != id {
                debug!(filter = %id, dependent = %current, "cleared dependent filter");
            }
            cleared.push(current);
        }
        debug!(filter = %id, "cleared filter");
        Ok(())
    }

    /// Clears every applied filter.
    pub fn clear_all(&mut self) -> Result<()> {
        let applied: Vec<FilterId> = self
            .chips
            .iter()
            .map(|chip| chip.filter_configuration)
            .collect();
        for id in applied {
            self.clear_filter(id)?;
        }
        Ok(())
    }

    fn remove_chip(&mut self, id: FilterId) {
        self.chips.retain(|chip| chip.filter_configuration != id);
    }

    // ========================================================================
    // Query translation
    // ========================================================================

    /// Builds the query object for the applied filters.
    ///
    /// ```text
    /// {...model fields, "pin_fields": [{name, value}], "pin_type": {_id, values: [{_id, ...value}]}}
    /// ```
    ///
    /// `pin_fields` is present only when cross-category filters exist and
    /// `pin_type` is an object only when category-scoped filters exist. Its
    /// `_id` is `category_id` when given, otherwise the applied category.
    /// Without scoped filters an applied category is not dropped: it stays
    /// the plain `pin_type` model field so that loading the query restores
    /// the category.
    pub fn get_query(&self, category_id: Option<&Value>) -> Value {
        let mut query = self.state.model_field_filters().clone();

        let pin_field_filters = self.state.pin_field_filters();
        if !pin_field_filters.is_empty() {
            let clauses = pin_field_filters
                .iter()
                .map(|(name, value)| json!({"name": name, "value": value}))
                .collect();
            query.insert(PIN_FIELDS_KEY.to_string(), Value::Array(clauses));
        }

        let scoped = self.state.pin_type_specific_filters();
        if !scoped.is_empty() {
            let id = category_id
                .cloned()
                .or_else(|| query.get(PIN_TYPE_KEY).cloned())
                .unwrap_or(Value::Null);
            let values: Vec<Value> = scoped
                .iter()
                .map(|(field_id, value)| Value::Object(scoped_entry(field_id, value)))
                .collect();
            query.insert(PIN_TYPE_KEY.to_string(), json!({"_id": id, "values": values}));
        }

        trace!(keys = query.len(), "built query");
        Value::Object(query)
    }

    /// Replaces the applied filters with those of a query object.
    ///
    /// Every top-level key other than `pin_fields` and `pin_type` becomes a
    /// model field filter. Afterwards each configuration, in registration
    /// order, is asked for its input value and re-applied when it has one,
    /// which rebuilds the chips.
    pub fn load_from_query(&mut self, query: &Value) -> Result<()> {
        let Value::Object(query) = query else {
            return Err(FilterBarError::MalformedQuery(format!(
                "expected a JSON object, got {query}"
            )));
        };

        let mut model_field_filters = query.clone();
        let mut pin_field_filters = Map::new();
        let mut pin_type_specific_filters = Map::new();

        if let Some(section) = model_field_filters.shift_remove(PIN_FIELDS_KEY) {
            if !section.is_null() {
                let clauses: Vec<PinFieldClause> =
                    serde_json::from_value(section).map_err(|source| {
                        FilterBarError::MalformedSection {
                            section: PIN_FIELDS_KEY,
                            source,
                        }
                    })?;
                for clause in clauses {
                    pin_field_filters.insert(clause.name, clause.value);
                }
            }
        }

        match model_field_filters.get(PIN_TYPE_KEY).cloned() {
            Some(section @ Value::Object(_)) => {
                let clause: PinTypeClause = serde_json::from_value(section).map_err(|source| {
                    FilterBarError::MalformedSection {
                        section: PIN_TYPE_KEY,
                        source,
                    }
                })?;
                for entry in clause.values {
                    let (field_id, value) = split_scoped_entry(entry).ok_or_else(|| {
                        FilterBarError::MalformedQuery(
                            "pin_type.values entry without a usable _id".to_string(),
                        )
                    })?;
                    pin_type_specific_filters.insert(field_id, value);
                }
                if clause.id.is_null() {
                    model_field_filters.shift_remove(PIN_TYPE_KEY);
                } else {
                    model_field_filters.insert(PIN_TYPE_KEY.to_string(), clause.id);
                }
            }
            Some(Value::Null) => {
                model_field_filters.shift_remove(PIN_TYPE_KEY);
            }
            _ => {}
        }

        for configuration in &mut self.filter_configurations {
            configuration.on_remove(&mut self.state);
        }
        self.chips.clear();
        self.state.replace(
            model_field_filters,
            pin_field_filters,
            pin_type_specific_filters,
        );
        debug!(
            model_fields = self.state.model_field_filters().len(),
            pin_fields = self.state.pin_field_filters().len(),
            scoped = self.state.pin_type_specific_filters().len(),
            "loaded query"
        );

        for index in 0..self.filter_configurations.len() {
            let id = FilterId(index);
            let Some(value) = self.filter_configurations[index].get_input_value(&self.state)
            else {
                continue;
            };
            if let Err(err) = self.apply_filter(id, value) {
                warn!(filter = %id, error = %err, "could not re-apply loaded filter");
                return Err(err);
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for FilterBarManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterBarManager")
            .field("state", &self.state)
            .field("chips", &self.chips)
            .field("filter_configurations", &self.filter_configurations.len())
            .finish()
    }
}
