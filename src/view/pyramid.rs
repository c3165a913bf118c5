use serde::Serialize;

use crate::{data::PopulationSelection, scale::Rgb, types::{AgeBand, DistrictKey, Selection}, view::{scaled, BarGeometry, Viewport}};

/// Both series are drawn on top of each other at this opacity.
pub const PYRAMID_OPACITY: f64 = 0.6;

const MALE_FILL: Rgb = Rgb { r: 70, g: 130, b: 180 };
const FEMALE_FILL: Rgb = Rgb { r: 219, g: 112, b: 147 };

/// One bar of the pyramid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PyramidBar {
    pub band: AgeBand,
    pub count: f64,
    #[serde(flatten)]
    pub geometry: BarGeometry,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PyramidLayout {
    pub selection: Selection,
    /// Population key of the drawn rows; pointer targets on the bars carry it.
    pub key: DistrictKey,
    /// Largest count in the selection; the common scale of both series.
    pub max: f64,
    pub male_bars: Vec<PyramidBar>,
    pub female_bars: Vec<PyramidBar>,
    /// Band labels in drawing order (oldest first).
    pub age_labels: Vec<String>,
}

/// Lay out opposing male/female bars for a selection, one slot per age band in
/// selection order. An empty or all-zero selection yields zero-height bars.
pub fn layout(selection: &PopulationSelection, viewport: &Viewport) -> PyramidLayout {
    let max = selection.max_count();
    let slots = selection.records.len().max(1) as f64;
    let slot = viewport.width / slots;

    let bar = |i: usize, band: AgeBand, count: f64, fill: Rgb| {
        let height = scaled(viewport.height, Some(count), max);
        PyramidBar {
            band,
            count,
            geometry: BarGeometry {
                x: i as f64 * slot,
                y: viewport.height - height,
                width: (slot - 1.0).max(0.0),
                height,
                fill,
            },
        }
    };

    let (male_bars, female_bars): (Vec<_>, Vec<_>) = selection.records.iter()
        .enumerate()
        .map(|(i, r)| (bar(i, r.band, r.male, MALE_FILL), bar(i, r.band, r.female, FEMALE_FILL)))
        .unzip();

    PyramidLayout {
        selection: selection.selection.clone(),
        key: selection.key.clone(),
        max,
        male_bars,
        female_bars,
        age_labels: selection.records.iter().map(|r| r.band.label()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{data::{PopulationAgeRecord, PopulationTable}, types::DistrictKey};

    fn table() -> PopulationTable {
        let rows = AgeBand::all()
            .map(|band| PopulationAgeRecord {
                key: "001".into(),
                band,
                male: band.index() as f64 * 10.0,
                female: 200.0 - band.index() as f64 * 10.0,
            })
            .collect::<Vec<_>>();
        PopulationTable::new(rows, DistrictKey::new("ALL"))
    }

    fn viewport() -> Viewport { Viewport { width: 180.0, height: 140.0, title_offset: 40.0 } }

    #[test]
    fn bars_scale_to_largest_count() {
        let layout = layout(&table().select(&Selection::parse("001")), &viewport());
        assert_eq!(layout.key.as_str(), "001");
        assert_eq!(layout.max, 200.0);
        assert_eq!(layout.male_bars.len(), 18);
        assert_eq!(layout.female_bars.len(), 18);

        // Oldest band first.
        assert_eq!(layout.age_labels.first().map(String::as_str), Some("85+"));
        assert_eq!(layout.age_labels.last().map(String::as_str), Some("0-4"));

        // Youngest band: female 200 spans the whole viewport height, male 0.
        let last = 17;
        assert_eq!(layout.female_bars[last].geometry.height, 140.0);
        assert_eq!(layout.female_bars[last].geometry.y, 0.0);
        assert_eq!(layout.male_bars[last].geometry.height, 0.0);
        assert_eq!(layout.male_bars[last].geometry.y, 140.0);

        // Oldest band: male 170, female 30.
        assert!((layout.male_bars[0].geometry.height - 119.0).abs() < 1e-9);
        assert!((layout.female_bars[0].geometry.height - 21.0).abs() < 1e-9);

        for (i, (m, f)) in layout.male_bars.iter().zip(&layout.female_bars).enumerate() {
            assert_eq!(m.geometry.x, i as f64 * 10.0);
            assert_eq!(m.geometry.x, f.geometry.x);
            assert_eq!(m.band, f.band);
        }
    }

    #[test]
    fn empty_selection_has_no_bars() {
        let layout = layout(&table().select(&Selection::All), &viewport());
        assert_eq!(layout.max, 0.0);
        assert!(layout.male_bars.is_empty());
        assert!(layout.age_labels.is_empty());
    }

    #[test]
    fn all_zero_counts_have_zero_height() {
        let rows = vec![PopulationAgeRecord { key: "ALL".into(), band: AgeBand::from_index(0).unwrap(), male: 0.0, female: 0.0 }];
        let table = PopulationTable::new(rows, DistrictKey::new("ALL"));
        let layout = layout(&table.select(&Selection::All), &viewport());
        assert_eq!(layout.male_bars[0].geometry.height, 0.0);
        assert_eq!(layout.female_bars[0].geometry.height, 0.0);
    }
}
