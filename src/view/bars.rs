use std::cmp::Ordering;

use serde::Serialize;

use crate::{data::AttributeRecord, types::DistrictKey, view::{scaled, BarGeometry, ViewState, Viewport}};

/// Per-rank transition delay when bars re-sort.
pub const STAGGER_MS: u64 = 10;

/// One bar of the ranked chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedBar {
    pub key: DistrictKey,
    pub name: String,
    pub value: Option<f64>,
    /// Position after sorting, 0 = smallest value.
    pub rank: usize,
    /// Cosmetic transition delay.
    pub delay_ms: u64,
    #[serde(flatten)]
    pub geometry: BarGeometry,
}

/// Lay out one bar per record, sorted ascending by the active attribute.
/// Records without a value sort first and get zero height; ties keep input order.
pub fn layout<R: AttributeRecord>(records: &[R], state: &ViewState, viewport: &Viewport) -> Vec<RankedBar> {
    let attribute = state.attribute;

    let mut order: Vec<(usize, Option<f64>)> = records.iter()
        .map(|r| r.value(attribute))
        .enumerate()
        .collect();
    order.sort_by(|(_, a), (_, b)| compare_values(*a, *b));

    let max = records.iter()
        .filter_map(|r| r.value(attribute))
        .fold(f64::NEG_INFINITY, f64::max);

    let count = records.len().max(1) as f64;
    let slot = viewport.width / count;
    let plot_height = viewport.plot_height();

    order.into_iter()
        .enumerate()
        .map(|(rank, (i, value))| {
            let record = &records[i];
            let height = scaled(plot_height, value, max);
            RankedBar {
                key: record.key().clone(),
                name: record.name().to_string(),
                value,
                rank,
                delay_ms: rank as u64 * STAGGER_MS,
                geometry: BarGeometry {
                    x: rank as f64 * slot,
                    y: viewport.height - height,
                    width: (slot - 1.0).max(0.0),
                    height,
                    fill: state.mapping.color(value),
                },
            }
        })
        .collect()
}

fn compare_values(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.total_cmp(&b),
    }
}
