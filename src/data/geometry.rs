use std::sync::Arc;

use geo::{BoundingRect, Coord, MultiPolygon, Rect};

use crate::{data::AttributeRecord, types::{AttributeId, AttributeValues, DistrictKey}};

/// One feature of the geometry source (lon/lat degrees).
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryRecord {
    pub key: DistrictKey,
    pub name: Arc<str>,
    pub shape: MultiPolygon<f64>,
}

impl GeometryRecord {
    pub fn new(key: DistrictKey, name: &str, shape: MultiPolygon<f64>) -> Self {
        Self { key, name: Arc::from(name), shape }
    }
}

/// A geometry record with the attribute values of its district copied in at join time.
/// `values` is `None` when no attribute row matched the key.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedGeometryRecord {
    pub geometry: GeometryRecord,
    pub values: Option<AttributeValues>,
}

impl EnrichedGeometryRecord {
    #[inline] pub fn shape(&self) -> &MultiPolygon<f64> { &self.geometry.shape }

    #[inline] pub fn has_data(&self) -> bool { self.values.is_some() }
}

impl AttributeRecord for EnrichedGeometryRecord {
    #[inline] fn key(&self) -> &DistrictKey { &self.geometry.key }
    #[inline] fn name(&self) -> &str { &self.geometry.name }

    #[inline]
    fn value(&self, attribute: AttributeId) -> Option<f64> {
        self.values.as_ref().and_then(|values| values.get(attribute))
    }
}

/// Compute the bounding rectangle of all shapes.
pub fn bounds<'a>(shapes: impl IntoIterator<Item = &'a MultiPolygon<f64>>) -> Option<Rect<f64>> {
    shapes.into_iter()
        .filter_map(|polygon| polygon.bounding_rect())
        .reduce(|a, b| Rect::new(
            Coord {
                x: a.min().x.min(b.min().x),
                y: a.min().y.min(b.min().y),
            },
            Coord {
                x: a.max().x.max(b.max().x),
                y: a.max().y.max(b.max().y),
            }
        ))
}
