//! Filterbar - filter state, chips, and query translation for filter bars.
//!
//! A filter bar lets a user narrow a list of records by applying filters.
//! Each applied filter shows up as a chip (a left label and a right value),
//! and the set of applied filters translates into a query object for a
//! backing data service. Filterbar provides:
//!
//! - A [`FilterBarManager`] holding the applied values and their chips
//! - Filter configurations for model fields, categories, and pin fields
//! - Category-dependent filters that are cleared when the category changes
//! - Two-way translation between filter state and the query object
//! - Declarative bar definitions in JSON or YAML via [`FilterBarConfig`]
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use filterbar::{
//!     presets, FilterBarManager, InputType, PinField, PinType, PinTypeSpecificFilter,
//!     PinTypeSpecificOptions, StaticCatalog,
//! };
//! use serde_json::json;
//!
//! let catalog = Arc::new(
//!     StaticCatalog::new()
//!         .with_pin_type(PinType::new("pump", "Pump").in_building("hq"))
//!         .with_pin_field(PinField::new("pump.status", "status", "pump").with_options(["on", "off"])),
//! );
//!
//! let mut manager = FilterBarManager::new();
//! let name = manager.add_filter_configuration(presets::name_filter());
//! let category = manager.add_filter_configuration(presets::pin_type_filter("hq", catalog.clone()));
//! let handle = manager.category(category).unwrap();
//! let status = manager.add_filter_configuration(PinTypeSpecificFilter::new(
//!     handle,
//!     PinTypeSpecificOptions::new("Status", "Status", "status", InputType::Enum),
//!     catalog,
//! ));
//! manager.set_dependent_configurations(category, vec![status]).unwrap();
//!
//! manager.apply_filter(name, json!("boiler")).unwrap();
//! manager.apply_filter(category, json!({"_id": "pump", "name": "Pump"})).unwrap();
//! manager.apply_filter(status, json!("on")).unwrap();
//!
//! assert_eq!(
//!     manager.get_query(None),
//!     json!({
//!         "name": "boiler",
//!         "pin_type": {"_id": "pump", "values": [{"_id": "pump.status", "value": "on"}]}
//!     })
//! );
//!
//! // Removing the category removes the filters that depend on it.
//! manager.clear_filter(category).unwrap();
//! assert_eq!(manager.get_query(None), json!({"name": "boiler"}));
//! assert_eq!(manager.chips().len(), 1);
//! ```
//!
//! # Query Shape
//!
//! ```text
//! {
//!   <model field>: <value>, ...
//!   "pin_fields": [{"name": <pin field name>, "value": <value>}, ...],
//!   "pin_type": {"_id": <pin type id>, "values": [{"_id": <pin field id>, ...}, ...]}
//! }
//! ```
//!
//! `pin_fields` and the `pin_type` object only appear when filters of that
//! kind are applied. Object values of category-scoped filters are spread
//! next to `_id`; other values are stored under `value`.

mod catalog;
mod category;
mod clause;
mod config;
mod dependent;
mod error;
mod hooks;
mod manager;
mod pin_field;
pub mod presets;
mod simple;
mod state;
mod traits;
mod value;

// Re-export public API
pub use catalog::{PinCatalog, PinField, PinType, StaticCatalog};
pub use category::{CategoryFilter, CategoryHandle, CATEGORY_LABEL};
pub use clause::{
    scoped_entry, split_scoped_entry, PinFieldClause, PinTypeClause, ID_KEY, PIN_FIELDS_KEY,
    PIN_TYPE_KEY, VALUE_KEY,
};
pub use config::{
    CategoryDefinition, FilterBarConfig, FilterDefinition, PinFieldDefinition, SimpleDefinition,
};
pub use dependent::{
    PinFieldEnumFn, PinFieldSelection, PinTypeSpecificFilter, PinTypeSpecificOptions,
};
pub use error::{FilterBarError, Result};
pub use manager::{Chip, FilterBarManager};
pub use pin_field::{PinFieldFilter, PinFieldOptions};
pub use simple::{SimpleFieldOptions, SimpleModelFieldFilter};
pub use state::FilterState;
pub use traits::{ChipText, ChipTextFn, ConvertFn, EnumValuesFn, FilterConfiguration, FilterId};
pub use value::{display_value, id_string, EnumOption, InputConfiguration, InputType};
