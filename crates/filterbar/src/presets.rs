//! Ready-made filter configurations.

use std::sync::Arc;

use crate::catalog::PinCatalog;
use crate::category::CategoryFilter;
use crate::simple::SimpleModelFieldFilter;

/// Text filter on the `name` model field.
pub fn name_filter() -> SimpleModelFieldFilter {
    SimpleModelFieldFilter::text("Name", "name")
}

/// Category filter offering the pin types of `building`.
pub fn pin_type_filter(building: impl Into<String>, catalog: Arc<dyn PinCatalog>) -> CategoryFilter {
    CategoryFilter::new(building, catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PinType, StaticCatalog};
    use crate::state::FilterState;
    use crate::traits::FilterConfiguration;
    use crate::value::InputType;
    use serde_json::json;

    #[test]
    fn name_filter_targets_name() {
        let mut filter = name_filter();
        assert_eq!(filter.display_name(), "Name");
        assert_eq!(filter.chip_name(), "Name");
        assert_eq!(filter.input_configuration().input_type, InputType::Text);

        let mut state = FilterState::new();
        filter.on_apply(&mut state, &json!("boiler")).unwrap();
        assert_eq!(state.model_field_filter("name"), Some(&json!("boiler")));
    }

    #[test]
    fn pin_type_filter_lists_building() {
        let catalog = Arc::new(
            StaticCatalog::new()
                .with_pin_type(PinType::new("pump", "Pump").in_building("hq"))
                .with_pin_type(PinType::new("crane", "Crane").in_building("yard")),
        );
        let filter = pin_type_filter("hq", catalog);
        assert_eq!(filter.building(), "hq");

        let options = filter.enum_values(&FilterState::new()).unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].option_text, "Pump");
    }
}
