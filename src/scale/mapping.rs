//! Value -> color mapping over an attribute's value distribution.

use serde::{Deserialize, Serialize};

use crate::{config::ColorConfig, scale::Rgb};

/// How bin cut points are derived from the values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalePolicy {
    /// Equal-count bins (cut points at the 20/40/60/80th percentiles for 5 bins).
    #[default]
    Quantile,
    /// Equal-width bins over [min, max].
    EqualInterval,
}

/// Color mapping for one attribute. Built once per attribute change and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorMapping {
    policy: ScalePolicy,
    palette: Vec<Rgb>,
    no_data: Rgb,
    /// Cut points used for coloring under `policy`.
    thresholds: Vec<f64>,
    /// Quantile cut points; reported by the legend regardless of `policy`.
    boundaries: Vec<f64>,
    /// (min, max) of the present values.
    extent: Option<(f64, f64)>,
}

impl ColorMapping {
    /// Build a mapping from every value of the active attribute.
    /// `None` and non-finite values are excluded from the distribution.
    pub fn build(values: impl IntoIterator<Item = Option<f64>>, colors: &ColorConfig) -> Self {
        let mut sorted: Vec<f64> = values.into_iter().flatten().filter(|v| v.is_finite()).collect();
        sorted.sort_by(f64::total_cmp);

        let bins = colors.palette.len();
        let (boundaries, extent) = match (sorted.first(), sorted.last()) {
            (Some(&min), Some(&max)) => (
                (1..bins).map(|i| quantile(&sorted, i as f64 / bins as f64)).collect::<Vec<_>>(),
                Some((min, max)),
            ),
            _ => (Vec::new(), None),
        };

        let thresholds = match (colors.policy, extent) {
            (ScalePolicy::EqualInterval, Some((min, max))) => (1..bins)
                .map(|i| min + (max - min) * i as f64 / bins as f64)
                .collect(),
            _ => boundaries.clone(),
        };

        Self {
            policy: colors.policy,
            palette: colors.palette.clone(),
            no_data: colors.no_data,
            thresholds,
            boundaries,
            extent,
        }
    }

    /// Bin index for a value, or `None` for missing data.
    /// A value equal to a cut point falls into the upper bin.
    pub fn bin(&self, value: Option<f64>) -> Option<usize> {
        let value = value.filter(|v| v.is_finite())?;
        if self.extent.is_none() { return None }
        Some(self.thresholds.partition_point(|&t| t <= value))
    }

    /// Fill color for a value; missing data maps to the neutral color.
    pub fn color(&self, value: Option<f64>) -> Rgb {
        self.bin(value)
            .and_then(|bin| self.palette.get(bin).copied())
            .unwrap_or(self.no_data)
    }

    #[inline] pub fn policy(&self) -> ScalePolicy { self.policy }
    #[inline] pub fn palette(&self) -> &[Rgb] { &self.palette }
    #[inline] pub fn no_data(&self) -> Rgb { self.no_data }
    #[inline] pub fn thresholds(&self) -> &[f64] { &self.thresholds }
    #[inline] pub fn boundaries(&self) -> &[f64] { &self.boundaries }
    #[inline] pub fn extent(&self) -> Option<(f64, f64)> { self.extent }
}

/// Linearly interpolated p-quantile of sorted, non-empty values (R-7).
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    sorted[lo] + (sorted[hi] - sorted[lo]) * (h - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::{DEFAULT_PALETTE, NO_DATA_COLOR};

    fn approx(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-9)
    }

    fn one_to_ten() -> Vec<Option<f64>> { (1..=10).map(|v| Some(v as f64)).collect() }

    #[test]
    fn quantile_boundaries_one_to_ten() {
        let mapping = ColorMapping::build(one_to_ten(), &ColorConfig::default());
        assert!(approx(mapping.boundaries(), &[2.8, 4.6, 6.4, 8.2]));
        assert_eq!(mapping.thresholds(), mapping.boundaries());
    }

    #[test]
    fn bins_agree_with_boundaries() {
        let mapping = ColorMapping::build(one_to_ten(), &ColorConfig::default());
        for v in 1..=10 {
            let v = v as f64;
            let expected = mapping.boundaries().iter().filter(|&&b| b <= v).count();
            assert_eq!(mapping.bin(Some(v)), Some(expected));
            assert_eq!(mapping.color(Some(v)), DEFAULT_PALETTE[expected]);
        }
        assert_eq!(mapping.bin(Some(1.0)), Some(0));
        assert_eq!(mapping.bin(Some(10.0)), Some(4));
    }

    #[test]
    fn rebuild_is_idempotent_and_order_independent() {
        let a = ColorMapping::build(one_to_ten(), &ColorConfig::default());
        let mut shuffled = one_to_ten();
        shuffled.reverse();
        let b = ColorMapping::build(shuffled, &ColorConfig::default());
        assert_eq!(a, b);
    }

    #[test]
    fn zero_is_not_missing() {
        let values = vec![Some(0.0), Some(0.2), Some(0.4), Some(0.6), None];
        let mapping = ColorMapping::build(values, &ColorConfig::default());
        assert_eq!(mapping.color(None), NO_DATA_COLOR);
        assert_eq!(mapping.color(Some(0.0)), DEFAULT_PALETTE[0]);
        assert_ne!(mapping.color(Some(0.0)), mapping.color(None));
    }

    #[test]
    fn equal_values_collapse_boundaries() {
        let mapping = ColorMapping::build(vec![Some(3.0); 6], &ColorConfig::default());
        assert_eq!(mapping.boundaries(), &[3.0, 3.0, 3.0, 3.0]);
        assert_eq!(mapping.bin(Some(3.0)), Some(4));
    }

    #[test]
    fn no_values_maps_everything_to_no_data() {
        let mapping = ColorMapping::build(vec![None, Some(f64::NAN)], &ColorConfig::default());
        assert!(mapping.boundaries().is_empty());
        assert_eq!(mapping.extent(), None);
        assert_eq!(mapping.color(Some(1.0)), NO_DATA_COLOR);
    }

    #[test]
    fn equal_interval_policy_keeps_quantile_boundaries() {
        let colors = ColorConfig { policy: ScalePolicy::EqualInterval, ..ColorConfig::default() };
        let values = vec![Some(0.0), Some(1.0), Some(2.0), Some(3.0), Some(100.0)];
        let mapping = ColorMapping::build(values, &colors);
        assert!(approx(mapping.thresholds(), &[20.0, 40.0, 60.0, 80.0]));
        assert!(approx(mapping.boundaries(), &[0.8, 1.6, 2.4, 22.4]));
        assert_eq!(mapping.bin(Some(3.0)), Some(0));
        assert_eq!(mapping.bin(Some(100.0)), Some(4));
    }
}
