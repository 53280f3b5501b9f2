//! Error types for the filterbar crate.

use thiserror::Error;

use crate::traits::FilterId;

/// Errors that can occur when configuring filters or translating queries.
#[derive(Debug, Error)]
pub enum FilterBarError {
    /// An enum input was asked for its options but no provider was supplied.
    #[error("enum values for filter '{filter}' must be implemented or provided at construction")]
    EnumValuesNotImplemented { filter: String },

    /// A dependent filter definition did not name its category filter.
    #[error("a pin type filter configuration is required to instantiate dependent filter '{filter}'")]
    MissingCategory { filter: String },

    /// The referenced configuration is not a category filter.
    #[error("filter {0} is not a category filter")]
    NotACategory(FilterId),

    /// The id does not belong to a registered configuration.
    #[error("no filter configuration registered as {0}")]
    UnknownFilter(FilterId),

    /// A dependent filter could not decide which pin field it targets.
    #[error("cannot resolve pin field '{pin_field}': {reason}")]
    UnresolvedPinField { pin_field: String, reason: String },

    /// The query object does not have the expected shape.
    #[error("malformed query: {0}")]
    MalformedQuery(String),

    /// A query section failed to deserialize.
    #[error("malformed query section '{section}': {source}")]
    MalformedSection {
        section: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A filter bar configuration document failed to parse or validate.
    #[error("invalid filter bar configuration: {0}")]
    InvalidConfig(String),
}

impl FilterBarError {
    /// Create an unresolved pin field error.
    pub fn unresolved(pin_field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnresolvedPinField {
            pin_field: pin_field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_yaml::Error> for FilterBarError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}

/// Result type for filterbar operations.
pub type Result<T> = std::result::Result<T, FilterBarError>;
