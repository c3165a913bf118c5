use std::sync::Arc;

use serde::Serialize;

use crate::{data::{AttributeRecord, EnrichedGeometryRecord}, scale::Rgb, types::DistrictKey, view::ViewState};

/// Fill of one map region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionFill {
    pub key: DistrictKey,
    pub name: Arc<str>,
    pub value: Option<f64>,
    pub fill: Rgb,
}

/// One fill per region, in region order. Regions without data get the
/// mapping's no-data color; none are dropped.
pub fn fills(regions: &[EnrichedGeometryRecord], state: &ViewState) -> Vec<RegionFill> {
    regions.iter()
        .map(|region| {
            let value = region.value(state.attribute);
            RegionFill {
                key: region.geometry.key.clone(),
                name: region.geometry.name.clone(),
                value,
                fill: state.mapping.color(value),
            }
        })
        .collect()
}
