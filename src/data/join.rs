use ahash::{AHashMap, AHashSet};
use log::{debug, warn};

use crate::{data::{DistrictRecord, EnrichedGeometryRecord, GeometryRecord}, types::DistrictKey};

/// Keys that failed to match across the two sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinReport {
    /// Geometries with no attribute row; rendered as "no data".
    pub unmatched_geometries: Vec<DistrictKey>,
    /// Attribute rows with no geometry; still shown in the bar chart.
    pub unmatched_records: Vec<DistrictKey>,
    /// Attribute keys that appear more than once; the first row wins.
    pub duplicate_records: Vec<DistrictKey>,
}

impl JoinReport {
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.unmatched_geometries.is_empty() && self.unmatched_records.is_empty() && self.duplicate_records.is_empty()
    }
}

/// Build enriched geometry records, one per geometry in input order.
/// Inputs are left untouched; unmatched geometries carry no values.
pub fn join(geometries: &[GeometryRecord], districts: &[DistrictRecord]) -> Vec<EnrichedGeometryRecord> {
    join_with_report(geometries, districts).0
}

/// As [`join`], also reporting which keys did not match.
pub fn join_with_report(geometries: &[GeometryRecord], districts: &[DistrictRecord]) -> (Vec<EnrichedGeometryRecord>, JoinReport) {
    let mut report = JoinReport::default();

    let mut index: AHashMap<&DistrictKey, &DistrictRecord> = AHashMap::with_capacity(districts.len());
    for record in districts {
        if index.contains_key(&record.key) {
            report.duplicate_records.push(record.key.clone());
        } else {
            index.insert(&record.key, record);
        }
    }

    let enriched = geometries.iter()
        .map(|geometry| {
            let values = index.get(&geometry.key).map(|record| record.values);
            if values.is_none() { report.unmatched_geometries.push(geometry.key.clone()) }
            EnrichedGeometryRecord { geometry: geometry.clone(), values }
        })
        .collect::<Vec<_>>();

    let geometry_keys: AHashSet<&DistrictKey> = geometries.iter().map(|g| &g.key).collect();
    report.unmatched_records = index.keys()
        .filter(|key| !geometry_keys.contains(*key))
        .map(|key| (*key).clone())
        .collect();
    report.unmatched_records.sort();

    if !report.unmatched_geometries.is_empty() {
        warn!("[join] {} geometries have no attribute row: {:?}", report.unmatched_geometries.len(), report.unmatched_geometries);
    }
    if !report.unmatched_records.is_empty() {
        warn!("[join] {} attribute rows have no geometry: {:?}", report.unmatched_records.len(), report.unmatched_records);
    }
    if !report.duplicate_records.is_empty() {
        warn!("[join] duplicate attribute keys ignored: {:?}", report.duplicate_records);
    }
    debug!("[join] {} geometries, {} attribute rows, {} matched",
        geometries.len(), districts.len(), geometries.len() - report.unmatched_geometries.len());

    (enriched, report)
}
