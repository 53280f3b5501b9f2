//! Pin types and pin fields from the backing data service.
//!
//! Category and dependent filters need to know which pin types exist in a
//! building and which pin fields each pin type defines. [`PinCatalog`] is
//! the seam to that service; [`StaticCatalog`] is an in-memory version.

use serde::{Deserialize, Serialize};

use crate::value::InputType;

/// A category of pins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinType {
    /// Identifier stored in the query.
    #[serde(rename = "_id")]
    pub id: String,
    /// Human-readable name, used as chip text.
    pub name: String,
    /// Building the pin type belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,
}

impl PinType {
    /// Creates a pin type.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        PinType {
            id: id.into(),
            name: name.into(),
            building: None,
        }
    }

    /// Sets the building.
    pub fn in_building(mut self, building: impl Into<String>) -> Self {
        self.building = Some(building.into());
        self
    }
}

/// A field defined by one pin type.
///
/// Fields with the same `name` in different pin types are distinct fields
/// with distinct ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinField {
    /// Identifier used as the key of category-scoped filters.
    #[serde(rename = "_id")]
    pub id: String,
    /// Logical field name, shared across pin types.
    pub name: String,
    /// Id of the owning pin type.
    pub pin_type: String,
    /// The kind of value the field holds.
    #[serde(default)]
    pub field_type: InputType,
    /// Allowed values for enum fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl PinField {
    /// Creates a text field.
    pub fn new(id: impl Into<String>, name: impl Into<String>, pin_type: impl Into<String>) -> Self {
        PinField {
            id: id.into(),
            name: name.into(),
            pin_type: pin_type.into(),
            field_type: InputType::Text,
            options: Vec::new(),
        }
    }

    /// Turns this into an enum field with the given options.
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field_type = InputType::Enum;
        self.options = options.into_iter().map(Into::into).collect();
        self
    }
}

/// Lookup of pin types and pin fields.
///
/// # Example
///
/// ```
/// use filterbar::{PinCatalog, PinField, PinType, StaticCatalog};
///
/// let catalog = StaticCatalog::new()
///     .with_pin_type(PinType::new("pump", "Pump").in_building("hq"))
///     .with_pin_field(PinField::new("pump.status", "status", "pump"));
///
/// assert_eq!(catalog.pin_types_for_building("hq").len(), 1);
/// assert_eq!(catalog.pin_fields_for_pin_type("pump")[0].id, "pump.status");
/// ```
pub trait PinCatalog: Send + Sync {
    /// Looks up a pin type by id.
    fn pin_type(&self, id: &str) -> Option<PinType>;

    /// All pin types of a building.
    fn pin_types_for_building(&self, building: &str) -> Vec<PinType>;

    /// All fields defined by a pin type.
    fn pin_fields_for_pin_type(&self, pin_type_id: &str) -> Vec<PinField>;

    /// All fields defined by any of the given pin types.
    fn pin_fields_for_pin_types(&self, pin_types: &[PinType]) -> Vec<PinField> {
        pin_types
            .iter()
            .flat_map(|pin_type| self.pin_fields_for_pin_type(&pin_type.id))
            .collect()
    }
}

/// An in-memory [`PinCatalog`].
///
/// Pin types without a building are offered for every building.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticCatalog {
    #[serde(default)]
    pin_types: Vec<PinType>,
    #[serde(default)]
    pin_fields: Vec<PinField>,
}

impl StaticCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        StaticCatalog::default()
    }

    /// Adds a pin type.
    pub fn with_pin_type(mut self, pin_type: PinType) -> Self {
        self.pin_types.push(pin_type);
        self
    }

    /// Adds a pin field.
    pub fn with_pin_field(mut self, pin_field: PinField) -> Self {
        self.pin_fields.push(pin_field);
        self
    }

    /// All pin types, in insertion order.
    pub fn pin_types(&self) -> &[PinType] {
        &self.pin_types
    }

    /// All pin fields, in insertion order.
    pub fn pin_fields(&self) -> &[PinField] {
        &self.pin_fields
    }
}

impl PinCatalog for StaticCatalog {
    fn pin_type(&self, id: &str) -> Option<PinType> {
        self.pin_types.iter().find(|t| t.id == id).cloned()
    }

    fn pin_types_for_building(&self, building: &str) -> Vec<PinType> {
        self.pin_types
            .iter()
            .filter(|t| t.building.as_deref().map_or(true, |b| b == building))
            .cloned()
            .collect()
    }

    fn pin_fields_for_pin_type(&self, pin_type_id: &str) -> Vec<PinField> {
        self.pin_fields
            .iter()
            .filter(|f| f.pin_type == pin_type_id)
            .cloned()
            .collect()
    }
}
