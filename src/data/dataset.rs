use geo::Rect;

use crate::{data::{bounds, join_with_report, DistrictRecord, EnrichedGeometryRecord, GeometryRecord, JoinReport, PopulationTable}, types::DistrictKey};

/// All loaded sources, joined. Immutable for the lifetime of a session.
#[derive(Debug, Clone)]
pub struct Dataset {
    districts: Vec<DistrictRecord>,
    regions: Vec<EnrichedGeometryRecord>,
    population: PopulationTable,
    report: JoinReport,
}

impl Dataset {
    /// Join the geometry and attribute sources and take ownership of the population table.
    pub fn new(geometries: Vec<GeometryRecord>, districts: Vec<DistrictRecord>, population: PopulationTable) -> Self {
        let (regions, report) = join_with_report(&geometries, &districts);
        Self { districts, regions, population, report }
    }

    /// Attribute rows, in source order. Drives the color scale and the bar chart.
    #[inline] pub fn districts(&self) -> &[DistrictRecord] { &self.districts }

    /// Enriched geometries, one per geometry feature, in source order.
    #[inline] pub fn regions(&self) -> &[EnrichedGeometryRecord] { &self.regions }

    #[inline] pub fn population(&self) -> &PopulationTable { &self.population }

    #[inline] pub fn join_report(&self) -> &JoinReport { &self.report }

    /// Lon/lat bounds of every region.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        bounds(self.regions.iter().map(|r| r.shape()))
    }

    /// Display name for a district key, from either source.
    pub fn name_of(&self, key: &DistrictKey) -> Option<&str> {
        self.districts.iter().find(|d| &d.key == key).map(|d| &*d.name)
            .or_else(|| self.regions.iter().find(|r| &r.geometry.key == key).map(|r| &*r.geometry.name))
    }
}
