use serde::Serialize;

use crate::{config::ColorConfig, data::{AttributeRecord, DistrictRecord}, scale::ColorMapping, types::{AttributeId, Selection}};

/// What is currently on screen: the active attribute, its color mapping, and
/// the district shown in the population view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub attribute: AttributeId,
    pub mapping: ColorMapping,
    pub selection: Selection,
}

impl ViewState {
    /// Initial state: first catalog attribute, nationwide selection.
    pub fn initial(districts: &[DistrictRecord], colors: &ColorConfig) -> Self {
        Self::for_attribute(AttributeId::default(), districts, colors)
    }

    /// State for `attribute` with the mapping built over every district's value.
    pub fn for_attribute(attribute: AttributeId, districts: &[DistrictRecord], colors: &ColorConfig) -> Self {
        Self {
            attribute,
            mapping: build_mapping(attribute, districts, colors),
            selection: Selection::All,
        }
    }
}

/// Color mapping over the full value distribution of `attribute`.
pub(crate) fn build_mapping(attribute: AttributeId, districts: &[DistrictRecord], colors: &ColorConfig) -> ColorMapping {
    ColorMapping::build(districts.iter().map(|d| d.value(attribute)), colors)
}
