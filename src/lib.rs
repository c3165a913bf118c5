#![doc = "nzatlas public API"]
mod config;
mod data;
mod error;
mod io;
mod scale;
mod types;
mod view;

use std::path::Path;

use log::info;

#[doc(inline)]
pub use config::{AtlasConfig, ColorConfig, MapConfig, OverlayConfig, SourceConfig};

#[doc(inline)]
pub use data::{
    join, join_with_report, AttributeRecord, Dataset, DistrictRecord, EnrichedGeometryRecord, GeometryRecord,
    JoinReport, PopulationAgeRecord, PopulationSelection, PopulationTable,
};

#[doc(inline)]
pub use error::{AtlasError, AtlasResult, SourceKind};

#[doc(inline)]
pub use io::{load_dataset, read_attributes, read_geometry, read_population, SourcePaths};

#[doc(inline)]
pub use scale::{ColorMapping, Rgb, ScalePolicy, DEFAULT_PALETTE, NO_DATA_COLOR};

#[doc(inline)]
pub use types::{AgeBand, AttributeId, AttributeValues, DistrictKey, FormatKind, Selection, UnknownAttribute, AGE_BAND_COUNT, ATTRIBUTE_COUNT};

#[doc(inline)]
pub use view::{
    format_value, layout_bars, layout_pyramid, legend_entries, legend_labels, place_overlay, region_fills, BarGeometry,
    Event, InteractionController, LegendEntry, Overlay, OverlayKey, OverlayRegistry, PointerTarget, PyramidBar,
    PyramidLayout, RankedBar, RegionFill, ViewKind, ViewState, ViewUpdate, Viewport, PYRAMID_OPACITY, STAGGER_MS,
};

/// Render the controller's current state as an SVG document.
pub fn render_svg(controller: &InteractionController) -> AtlasResult<String> {
    let mut writer = io::svg::SvgStringWriter::new();
    io::svg::write_document(&mut writer, controller).map_err(AtlasError::Render)?;
    writer.into_string().map_err(AtlasError::Render)
}

/// Render the controller's current state to an SVG file.
pub fn write_svg(controller: &InteractionController, path: &Path) -> AtlasResult<()> {
    let mut writer = io::svg::SvgWriter::new(path).map_err(AtlasError::Render)?;
    io::svg::write_document(&mut writer, controller).map_err(AtlasError::Render)?;
    info!("[write_svg] wrote {}", path.display());
    Ok(())
}
