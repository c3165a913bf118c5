use std::collections::BTreeMap;

use ahash::AHashMap;
use log::warn;
use serde::Serialize;

use crate::types::{AgeBand, DistrictKey, Selection};

/// Male and female counts of one district in one age band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationAgeRecord {
    pub key: DistrictKey,
    pub band: AgeBand,
    pub male: f64,
    pub female: f64,
}

/// Population rows indexed by (district, band). Row order in the source is irrelevant.
#[derive(Debug, Clone)]
pub struct PopulationTable {
    aggregate_key: DistrictKey,
    rows: AHashMap<DistrictKey, BTreeMap<AgeBand, PopulationAgeRecord>>,
}

impl PopulationTable {
    /// Index `records`; `aggregate_key` names the nationwide pseudo-district.
    /// A repeated (district, band) pair keeps the first row.
    pub fn new(records: impl IntoIterator<Item = PopulationAgeRecord>, aggregate_key: DistrictKey) -> Self {
        let mut rows: AHashMap<DistrictKey, BTreeMap<AgeBand, PopulationAgeRecord>> = AHashMap::new();
        for record in records {
            let bands = rows.entry(record.key.clone()).or_default();
            if bands.contains_key(&record.band) {
                warn!("[population] duplicate row for {} {}, keeping the first", record.key, record.band);
                continue;
            }
            bands.insert(record.band, record);
        }
        Self { aggregate_key, rows }
    }

    #[inline] pub fn aggregate_key(&self) -> &DistrictKey { &self.aggregate_key }

    /// Number of districts (including the aggregate) with at least one row.
    #[inline] pub fn len(&self) -> usize { self.rows.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    #[inline]
    pub fn get(&self, key: &DistrictKey, band: AgeBand) -> Option<&PopulationAgeRecord> {
        self.rows.get(key).and_then(|bands| bands.get(&band))
    }

    /// Whether `selection` resolves to any rows.
    pub fn contains(&self, selection: &Selection) -> bool {
        self.rows.contains_key(self.resolve(selection))
    }

    /// District key holding the rows for `selection`.
    #[inline]
    pub fn resolve<'a>(&'a self, selection: &'a Selection) -> &'a DistrictKey {
        selection.district().unwrap_or(&self.aggregate_key)
    }

    /// Rows for `selection`, oldest band first. Bands absent from the source are skipped.
    pub fn select(&self, selection: &Selection) -> PopulationSelection {
        let key = self.resolve(selection);
        let records = self.rows.get(key)
            .map(|bands| bands.values().rev().cloned().collect())
            .unwrap_or_default();
        PopulationSelection { selection: selection.clone(), key: key.clone(), records }
    }
}

/// The rows of one selection in rendering order (oldest band first).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationSelection {
    pub selection: Selection,
    /// District key the rows were read from; the aggregate key for `All`.
    pub key: DistrictKey,
    pub records: Vec<PopulationAgeRecord>,
}

impl PopulationSelection {
    #[inline] pub fn is_empty(&self) -> bool { self.records.is_empty() }

    /// Largest male or female count, or 0 for an empty selection.
    pub fn max_count(&self) -> f64 {
        self.records.iter()
            .flat_map(|r| [r.male, r.female])
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(key: &str, band: usize, male: f64, female: f64) -> PopulationAgeRecord {
        PopulationAgeRecord { key: key.into(), band: AgeBand::from_index(band).unwrap(), male, female }
    }

    fn table() -> PopulationTable {
        // Rows deliberately interleaved across districts.
        let rows = vec![
            row("ALL", 0, 100.0, 90.0),
            row("001", 1, 3.0, 4.0),
            row("ALL", 17, 10.0, 20.0),
            row("001", 0, 5.0, 6.0),
            row("ALL", 1, 80.0, 85.0),
        ];
        PopulationTable::new(rows, DistrictKey::new("ALL"))
    }

    #[test]
    fn select_orders_oldest_first() {
        let table = table();
        let all = table.select(&Selection::All);
        let bands: Vec<_> = all.records.iter().map(|r| r.band.index()).collect();
        assert_eq!(bands, vec![17, 1, 0]);
        assert_eq!(all.max_count(), 100.0);

        let district = table.select(&Selection::parse("001"));
        let bands: Vec<_> = district.records.iter().map(|r| r.band.index()).collect();
        assert_eq!(bands, vec![1, 0]);
    }

    #[test]
    fn reselect_is_identical() {
        let table = table();
        let d = Selection::parse("001");
        let first = table.select(&d);
        let _ = table.select(&Selection::All);
        assert_eq!(table.select(&d), first);
    }

    #[test]
    fn unknown_district_is_empty() {
        let table = table();
        let missing = Selection::parse("404");
        assert!(!table.contains(&missing));
        assert!(table.select(&missing).is_empty());
        assert_eq!(table.select(&missing).max_count(), 0.0);
        assert!(table.contains(&Selection::All));
    }

    #[test]
    fn explicit_index_lookup() {
        let table = table();
        let band = AgeBand::from_index(1).unwrap();
        assert_eq!(table.get(&DistrictKey::new("001"), band).map(|r| r.female), Some(4.0));
        assert_eq!(table.len(), 2);
    }
}
