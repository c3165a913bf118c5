use serde::Serialize;

use crate::{scale::{ColorMapping, Rgb}, types::{AttributeId, FormatKind}};

/// A legend swatch and its label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub fill: Rgb,
    pub label: String,
}

/// One label per quantile boundary. The top bin is open-ended and unlabeled.
pub fn labels(mapping: &ColorMapping, attribute: AttributeId) -> Vec<String> {
    mapping.boundaries().iter()
        .map(|&b| format_value(b, attribute.format_kind()))
        .collect()
}

/// Swatches for the legend: each bin with its lower boundary (the first bin
/// is labeled by the first boundary as an upper bound), then the no-data swatch.
pub fn entries(mapping: &ColorMapping, attribute: AttributeId) -> Vec<LegendEntry> {
    let labels = labels(mapping, attribute);
    let mut entries = Vec::with_capacity(labels.len() + 2);
    if let Some(first) = labels.first() {
        entries.extend(mapping.palette().iter()
            .take(labels.len() + 1)
            .enumerate()
            .map(|(bin, &fill)| {
                let label = match bin {
                    0 => format!("< {first}"),
                    _ => format!("\u{2265} {}", labels[bin - 1]),
                };
                LegendEntry { fill, label }
            }));
    }
    entries.push(LegendEntry { fill: mapping.no_data(), label: "No data".into() });
    entries
}

/// Format a value the way the attribute is presented.
pub fn format_value(value: f64, kind: FormatKind) -> String {
    match kind {
        FormatKind::RawCount => format!("{:.0}", value.round()),
        FormatKind::Currency => format!("${:.0}", value.round()),
        FormatKind::Percentage => format!("{}%", round_to(value * 100.0, 2)),
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 { 0.0 } else { rounded } // no "-0%"
}
