//! Runtime configuration, read from JSON. Every field has a default so a
//! partial file (or none at all) is valid.

use std::{fs, path::Path, time::Duration};

use anyhow::{anyhow, ensure, Context};
use serde::{Deserialize, Serialize};

use crate::{error::{AtlasError, AtlasResult}, scale::{Rgb, ScalePolicy, DEFAULT_PALETTE, NO_DATA_COLOR}, view::Viewport};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    pub map: MapConfig,
    pub chart: Viewport,
    pub pyramid: Viewport,
    pub colors: ColorConfig,
    pub overlay: OverlayConfig,
    pub sources: SourceConfig,
    /// Upper bound on loading all three sources, in seconds.
    pub load_timeout_secs: u64,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            map: MapConfig::default(),
            chart: Viewport { width: 600.0, height: 300.0, title_offset: 40.0 },
            pyramid: Viewport { width: 600.0, height: 300.0, title_offset: 40.0 },
            colors: ColorConfig::default(),
            overlay: OverlayConfig::default(),
            sources: SourceConfig::default(),
            load_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    /// Graticule spacing in degrees; 0 disables the graticule.
    pub graticule_step: f64,
    /// Central meridian of the transverse Mercator projection.
    pub lon_0: f64,
    /// Latitude of origin of the transverse Mercator projection.
    pub lat_0: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self { width: 620.0, height: 620.0, margin: 10.0, graticule_step: 5.0, lon_0: 175.0, lat_0: -41.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub policy: ScalePolicy,
    /// Bin colors, light to dark.
    pub palette: Vec<Rgb>,
    pub no_data: Rgb,
    pub highlight: Rgb,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            policy: ScalePolicy::Quantile,
            palette: DEFAULT_PALETTE.to_vec(),
            no_data: NO_DATA_COLOR,
            highlight: Rgb { r: 230, g: 100, b: 100 },
        }
    }
}

/// Placement of hover overlays relative to the pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub width: f64,
    pub height: f64,
    /// Offset right of the pointer.
    pub offset_x: f64,
    /// Offset above the pointer.
    pub offset_y: f64,
    /// Offset left of the pointer once within `edge_x` of the right edge.
    pub flipped_x: f64,
    /// Offset above the pointer once within `edge_y` of the bottom edge.
    pub flipped_y: f64,
    pub edge_x: f64,
    pub edge_y: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 100.0,
            offset_x: 10.0,
            offset_y: 75.0,
            flipped_x: 210.0,
            flipped_y: 175.0,
            edge_x: 245.0,
            edge_y: 100.0,
        }
    }
}

/// Column and property names in the input sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub key_column: String,
    pub name_column: String,
    pub age_column: String,
    pub male_column: String,
    pub female_column: String,
    /// Key of the nationwide pseudo-district in the population source.
    pub aggregate_key: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            key_column: "TA2014".into(),
            name_column: "TA2014_NAM".into(),
            age_column: "AgeGroup".into(),
            male_column: "Male".into(),
            female_column: "Female".into(),
            aggregate_key: "ALL".into(),
        }
    }
}

impl AtlasConfig {
    /// Read a JSON config file and validate it.
    pub fn from_path(path: &Path) -> AtlasResult<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("[config] Failed to read {}", path.display()))
            .map_err(AtlasError::Config)?;
        Self::from_json(&text)
    }

    /// Parse a JSON config string and validate it.
    pub fn from_json(text: &str) -> AtlasResult<Self> {
        let config: Self = serde_json::from_str(text)
            .context("[config] Failed to parse config JSON")
            .map_err(AtlasError::Config)?;
        config.validate().map_err(AtlasError::Config)?;
        Ok(config)
    }

    #[inline] pub fn load_timeout(&self) -> Duration { Duration::from_secs(self.load_timeout_secs) }

    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, vp) in [("chart", &self.chart), ("pyramid", &self.pyramid)] {
            ensure!(vp.width > 0.0 && vp.height > 0.0, "[config] {name} viewport must be positive");
            ensure!(vp.title_offset >= 0.0 && vp.title_offset < vp.height,
                "[config] {name} title_offset must lie within the viewport height");
        }
        ensure!(self.map.width > 2.0 * self.map.margin && self.map.height > 2.0 * self.map.margin,
            "[config] map viewport must exceed twice the margin");
        ensure!(self.map.graticule_step >= 0.0, "[config] graticule_step must not be negative");
        if self.colors.palette.is_empty() {
            return Err(anyhow!("[config] palette must contain at least one color"));
        }
        ensure!(self.load_timeout_secs > 0, "[config] load_timeout_secs must be positive");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AtlasConfig::default();
        config.validate().unwrap();
        assert_eq!(config.colors.palette.len(), 5);
        assert_eq!(config.sources.key_column, "TA2014");
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = AtlasConfig::from_json(r#"{ "chart": { "width": 800 }, "colors": { "policy": "equal_interval" } }"#).unwrap();
        assert_eq!(config.chart.width, 800.0);
        assert_eq!(config.chart.height, 300.0);
        assert_eq!(config.colors.policy, ScalePolicy::EqualInterval);
        assert_eq!(config.map, MapConfig::default());
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(AtlasConfig::from_json(r#"{ "load_timeout_secs": 0 }"#).is_err());
        assert!(AtlasConfig::from_json(r#"{ "colors": { "palette": [] } }"#).is_err());
        assert!(AtlasConfig::from_json("not json").is_err());
    }

    #[test]
    fn palette_accepts_css_strings() {
        let config = AtlasConfig::from_json(r##"{ "colors": { "palette": ["#000000", "rgb(255, 255, 255)"] } }"##).unwrap();
        assert_eq!(config.colors.palette, vec![Rgb { r: 0, g: 0, b: 0 }, Rgb { r: 255, g: 255, b: 255 }]);
    }
}
