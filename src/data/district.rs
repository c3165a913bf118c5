use std::sync::Arc;

use serde::Serialize;

use crate::types::{AttributeId, AttributeValues, DistrictKey};

/// Anything keyed by district that can report attribute values.
pub trait AttributeRecord {
    fn key(&self) -> &DistrictKey;
    fn name(&self) -> &str;
    /// Value of `attribute`, or `None` when the record has no data for it.
    fn value(&self, attribute: AttributeId) -> Option<f64>;
}

/// One row of the attribute source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictRecord {
    pub key: DistrictKey,
    pub name: Arc<str>,
    pub values: AttributeValues,
}

impl DistrictRecord {
    pub fn new(key: DistrictKey, name: &str, values: AttributeValues) -> Self {
        Self { key, name: Arc::from(name), values }
    }
}

impl AttributeRecord for DistrictRecord {
    #[inline] fn key(&self) -> &DistrictKey { &self.key }
    #[inline] fn name(&self) -> &str { &self.name }
    #[inline] fn value(&self, attribute: AttributeId) -> Option<f64> { self.values.get(attribute) }
}
