//! Declarative filter bar configuration.
//!
//! A [`FilterBarConfig`] lists the filters of a bar in a JSON or YAML
//! document and builds a wired [`FilterBarManager`] from it:
//!
//! ```yaml
//! building: hq
//! filters:
//!   - kind: simple
//!     display_name: Name
//!     query_field: name
//!     chip_name: Name
//!   - kind: category
//!   - kind: pin_type_specific
//!     display_name: Status
//!     chip_name: Status
//!     pin_field_name: status
//!     input_type: enum
//! ```
//!
//! A `pin_type_specific` filter depends on the closest `category` filter
//! defined before it and is registered as that category's dependent.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::PinCatalog;
use crate::category::CategoryFilter;
use crate::dependent::{PinTypeSpecificFilter, PinTypeSpecificOptions};
use crate::error::{FilterBarError, Result};
use crate::manager::FilterBarManager;
use crate::pin_field::{PinFieldFilter, PinFieldOptions};
use crate::simple::{SimpleFieldOptions, SimpleModelFieldFilter};
use crate::traits::FilterId;
use crate::value::EnumOption;

/// A filter bar described as data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterBarConfig {
    /// Default building for category and dependent filters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,
    /// Filters in registration order.
    #[serde(default)]
    pub filters: Vec<FilterDefinition>,
}

/// One filter of a [`FilterBarConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterDefinition {
    /// A [`SimpleModelFieldFilter`].
    Simple(SimpleDefinition),
    /// A [`CategoryFilter`].
    Category(CategoryDefinition),
    /// A [`PinFieldFilter`].
    PinField(PinFieldDefinition),
    /// A [`PinTypeSpecificFilter`].
    PinTypeSpecific(PinTypeSpecificOptions),
}

/// Definition of a simple model field filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleDefinition {
    #[serde(flatten)]
    pub options: SimpleFieldOptions,
    /// Fixed options for enum inputs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_options: Vec<EnumOption>,
}

/// Definition of a category filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    /// Building whose pin types are offered. Defaults to the bar's building.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,
}

/// Definition of a cross-category pin field filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinFieldDefinition {
    #[serde(flatten)]
    pub options: PinFieldOptions,
    /// Fixed options for enum inputs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_options: Vec<EnumOption>,
}

impl FilterBarConfig {
    /// Parses a JSON document.
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|err| FilterBarError::InvalidConfig(err.to_string()))
    }

    /// Parses a YAML document.
    pub fn from_yaml(input: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(input)?)
    }

    /// Registers every filter with a new manager and wires dependents.
    pub fn build(&self, catalog: Arc<dyn PinCatalog>) -> Result<FilterBarManager> {
        let mut manager = FilterBarManager::new();
        let mut categories: Vec<(FilterId, Vec<FilterId>)> = Vec::new();

        for definition in &self.filters {
            match definition {
                FilterDefinition::Simple(simple) => {
                    let mut filter = SimpleModelFieldFilter::new(simple.options.clone());
                    if !simple.enum_options.is_empty() {
                        filter = filter.with_enum_options(simple.enum_options.clone());
                    }
                    manager.add_filter_configuration(filter);
                }
                FilterDefinition::Category(category) => {
                    let building = category
                        .building
                        .as_ref()
                        .or(self.building.as_ref())
                        .ok_or_else(|| {
                            FilterBarError::InvalidConfig(
                                "category filter needs a building".to_string(),
                            )
                        })?;
                    let id = manager.add_filter_configuration(CategoryFilter::new(
                        building.clone(),
                        Arc::clone(&catalog),
                    ));
                    categories.push((id, Vec::new()));
                }
                FilterDefinition::PinField(pin_field) => {
                    let mut filter = PinFieldFilter::new(pin_field.options.clone());
                    if !pin_field.enum_options.is_empty() {
                        filter = filter.with_enum_options(pin_field.enum_options.clone());
                    }
                    manager.add_filter_configuration(filter);
                }
                FilterDefinition::PinTypeSpecific(options) => {
                    let (category, dependents) =
                        categories
                            .last_mut()
                            .ok_or_else(|| FilterBarError::MissingCategory {
                                filter: options.display_name.clone(),
                            })?;
                    let handle = manager.category(*category)?;
                    let id = manager.add_filter_configuration(PinTypeSpecificFilter::new(
                        handle,
                        options.clone(),
                        Arc::clone(&catalog),
                    ));
                    dependents.push(id);
                }
            }
        }

        for (category, dependents) in categories {
            manager.set_dependent_configurations(category, dependents)?;
        }
        Ok(manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PinField, PinType, StaticCatalog};
    use crate::value::InputType;
    use serde_json::json;

    const YAML: &str = r#"
building: hq
filters:
  - kind: simple
    display_name: Name
    query_field: name
    chip_name: Name
  - kind: simple
    display_name: Priority
    query_field: priority
    chip_name: Prio
    input_type: enum
    enum_options:
      - option_text: High
        option_value: 3
  - kind: category
  - kind: pin_type_specific
    display_name: Status
    chip_name: Status
    pin_field_name: status
    input_type: enum
  - kind: pin_field
    display_name: Serial
    chip_name: Serial
    pin_field_name: serial
"#;

    fn catalog() -> Arc<dyn PinCatalog> {
        Arc::new(
            StaticCatalog::new()
                .with_pin_type(PinType::new("pump", "Pump").in_building("hq"))
                .with_pin_field(PinField::new("pump.status", "status", "pump").with_options(["on", "off"])),
        )
    }

    #[test]
    fn parses_yaml() {
        let config = FilterBarConfig::from_yaml(YAML).unwrap();
        assert_eq!(config.building.as_deref(), Some("hq"));
        assert_eq!(config.filters.len(), 5);
        match &config.filters[1] {
            FilterDefinition::Simple(simple) => {
                assert_eq!(simple.options.input_type, InputType::Enum);
                assert_eq!(simple.enum_options, vec![EnumOption::new("High", json!(3))]);
            }
            other => panic!("unexpected definition: {other:?}"),
        }
    }

    #[test]
    fn parses_json() {
        let config = FilterBarConfig::from_json(
            r#"{"filters": [{"kind": "category", "building": "annex"}]}"#,
        )
        .unwrap();
        assert_eq!(
            config.filters,
            vec![FilterDefinition::Category(CategoryDefinition {
                building: Some("annex".to_string())
            })]
        );
    }

    #[test]
    fn rejects_unknown_kind() {
        let err = FilterBarConfig::from_json(r#"{"filters": [{"kind": "slider"}]}"#).unwrap_err();
        assert!(matches!(err, FilterBarError::InvalidConfig(_)));
    }

    #[test]
    fn builds_wired_manager() {
        let manager = FilterBarConfig::from_yaml(YAML).unwrap().build(catalog()).unwrap();
        let names: Vec<&str> = manager
            .filter_configurations()
            .map(|(_, c)| c.display_name())
            .collect();
        assert_eq!(names, vec!["Name", "Priority", "Category", "Status", "Serial"]);

        let category = manager.configuration(FilterId(2)).unwrap();
        assert_eq!(category.dependents(), &[FilterId(3)]);
        assert_eq!(manager.enum_values(FilterId(1)).unwrap().len(), 1);
        assert_eq!(manager.enum_values(FilterId(3)).unwrap().len(), 2);
    }

    #[test]
    fn dependent_without_category_fails() {
        let config = FilterBarConfig::from_json(
            r#"{"filters": [{"kind": "pin_type_specific", "display_name": "Status",
                "chip_name": "Status", "pin_field_name": "status"}]}"#,
        )
        .unwrap();
        let err = config.build(catalog()).unwrap_err();
        assert!(matches!(err, FilterBarError::MissingCategory { ref filter } if filter == "Status"));
    }

    #[test]
    fn category_without_building_fails() {
        let config = FilterBarConfig::from_json(r#"{"filters": [{"kind": "category"}]}"#).unwrap();
        assert!(matches!(
            config.build(catalog()),
            Err(FilterBarError::InvalidConfig(_))
        ));
    }
}
