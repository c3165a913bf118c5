//! Derived views. Each one is a pure function of the view state and the
//! loaded data, so they can be computed and tested without a drawing surface.

mod bars;
mod choropleth;
mod controller;
mod legend;
mod overlay;
mod pyramid;
mod state;

pub use bars::{layout as layout_bars, RankedBar, STAGGER_MS};
pub use choropleth::{fills as region_fills, RegionFill};
pub use controller::{Event, InteractionController, PointerTarget, ViewKind, ViewUpdate};
pub(crate) use controller::describe;
pub use legend::{entries as legend_entries, format_value, labels as legend_labels, LegendEntry};
pub use overlay::{place_overlay, Overlay, OverlayKey, OverlayRegistry};
pub use pyramid::{layout as layout_pyramid, PyramidBar, PyramidLayout, PYRAMID_OPACITY};
pub use state::ViewState;

use serde::{Deserialize, Serialize};

use crate::scale::Rgb;

/// Drawing area of a chart. The ranked bars reserve `title_offset` at the top
/// of `height` for the title; the pyramid bars use the whole `height` and the
/// title band sits above them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub title_offset: f64,
}

impl Default for Viewport {
    fn default() -> Self { Self { width: 600.0, height: 300.0, title_offset: 40.0 } }
}

impl Viewport {
    /// Height available to bars below the title.
    #[inline] pub fn plot_height(&self) -> f64 { (self.height - self.title_offset).max(0.0) }
}

/// A filled rectangle in chart coordinates (y down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BarGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Rgb,
}

/// `extent * value / max`, or 0 when the ratio is undefined or negative.
#[inline]
pub(crate) fn scaled(extent: f64, value: Option<f64>, max: f64) -> f64 {
    match value {
        Some(v) if max.is_finite() && max > 0.0 && v.is_finite() => (extent * v / max).clamp(0.0, extent),
        _ => 0.0,
    }
}
