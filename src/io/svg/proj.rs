//! Map projection and path building.

use anyhow::{anyhow, Context, Result};
use geo::{Coord, CoordsIter, LineString, MapCoords, MultiPolygon, Rect};
use proj4rs::{proj::Proj as Proj4, transform::transform};

use crate::{config::MapConfig, data::bounds};

const SOURCE_PROJ4: &str = "+proj=longlat +datum=WGS84 +no_defs +type=crs";

/// Densification step for graticule lines, in degrees.
const GRATICULE_PRECISION: f64 = 0.5;

/// Transverse Mercator projection fitted to the map viewport.
/// Screen coordinates have their origin top-left with y pointing down.
pub(crate) struct MapProjection {
    from: Proj4,
    to: Proj4,
    scale: f64,
    /// Projected (meters) coordinate drawn at the viewport centre.
    center: Coord<f64>,
    viewport: (f64, f64),
}

impl MapProjection {
    /// Build the projection and fit the projected extent of `shapes` into the
    /// viewport, less the margin. Returns `None` when there is nothing to fit.
    pub(crate) fn fit(shapes: &[&MultiPolygon<f64>], config: &MapConfig) -> Result<Option<Self>> {
        let from = Proj4::from_proj_string(SOURCE_PROJ4)
            .with_context(|| anyhow!("[io::svg::proj] failed to build source PROJ.4: {SOURCE_PROJ4}"))?;
        let target = format!(
            "+proj=tmerc +lat_0={} +lon_0={} +k=1 +x_0=0 +y_0=0 +datum=WGS84 +units=m +no_defs +type=crs",
            config.lat_0, config.lon_0,
        );
        let to = Proj4::from_proj_string(&target)
            .with_context(|| anyhow!("[io::svg::proj] failed to build target PROJ.4: {target}"))?;

        let mut projection = Self { from, to, scale: 1.0, center: Coord { x: 0.0, y: 0.0 }, viewport: (config.width, config.height) };

        let projected = shapes.iter()
            .map(|shape| projection.to_meters(shape))
            .collect::<Result<Vec<_>>>()?;
        let Some(extent) = bounds(&projected) else { return Ok(None) };

        let (inner_w, inner_h) = ((config.width - 2.0 * config.margin).max(0.0), (config.height - 2.0 * config.margin).max(0.0));
        let scale = match (extent.width() > 0.0, extent.height() > 0.0) {
            (true, true) => (inner_w / extent.width()).min(inner_h / extent.height()),
            (true, false) => inner_w / extent.width(),
            (false, true) => inner_h / extent.height(),
            (false, false) => 1.0,
        };
        projection.scale = scale;
        projection.center = extent.center();
        Ok(Some(projection))
    }

    /// Project one lon/lat coordinate (degrees) to meters.
    fn project_meters(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        let mut point = (coord.x.to_radians(), coord.y.to_radians(), 0.0);
        transform(&self.from, &self.to, &mut point)
            .map_err(|e| anyhow!("[io::svg::proj] CRS transform failed at ({}, {}): {e}", coord.x, coord.y))?;
        Ok(Coord { x: point.0, y: point.1 })
    }

    fn to_meters(&self, shape: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>> {
        shape.try_map_coords(|coord| self.project_meters(coord))
    }

    /// Meters to screen coordinates.
    #[inline]
    fn to_screen(&self, coord: Coord<f64>) -> Coord<f64> {
        Coord {
            x: self.viewport.0 / 2.0 + (coord.x - self.center.x) * self.scale,
            y: self.viewport.1 / 2.0 - (coord.y - self.center.y) * self.scale,
        }
    }

    /// Project a lon/lat coordinate to screen coordinates.
    pub(crate) fn project(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        Ok(self.to_screen(self.project_meters(coord)?))
    }

    /// Project a shape to screen coordinates.
    pub(crate) fn project_shape(&self, shape: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>> {
        shape.try_map_coords(|coord| self.project(coord))
    }

    /// Project a lon/lat line to screen coordinates.
    pub(crate) fn project_line(&self, line: &LineString<f64>) -> Result<LineString<f64>> {
        line.try_map_coords(|coord| self.project(coord))
    }
}

/// Meridians and parallels every `step` degrees covering `extent`, each
/// densified so it curves under the projection. A non-positive step gives none.
pub(crate) fn graticule_lines(extent: Rect<f64>, step: f64) -> Vec<LineString<f64>> {
    if !step.is_finite() || step <= 0.0 { return Vec::new() }
    let (lon_min, lon_max) = snap(extent.min().x, extent.max().x, step);
    let (lat_min, lat_max) = snap(extent.min().y, extent.max().y, step);

    let samples = |from: f64, to: f64| {
        let n = ((to - from) / GRATICULE_PRECISION).ceil().max(1.0) as usize;
        (0..=n).map(move |i| from + (to - from) * i as f64 / n as f64)
    };
    let meridians = stops(lon_min, lon_max, step)
        .map(|lon| samples(lat_min, lat_max).map(|lat| Coord { x: lon, y: lat }).collect());
    let parallels = stops(lat_min, lat_max, step)
        .map(|lat| samples(lon_min, lon_max).map(|lon| Coord { x: lon, y: lat }).collect());

    meridians.chain(parallels).collect()
}

/// The closed outline of the graticule, used as the map background.
pub(crate) fn graticule_outline(extent: Rect<f64>, step: f64) -> LineString<f64> {
    let step = if step.is_finite() && step > 0.0 { step } else { 1.0 };
    let (lon_min, lon_max) = snap(extent.min().x, extent.max().x, step);
    let (lat_min, lat_max) = snap(extent.min().y, extent.max().y, step);
    let mut coords = Vec::new();
    let mut edge = |from: Coord<f64>, to: Coord<f64>| {
        let n = ((to.x - from.x).abs().max((to.y - from.y).abs()) / GRATICULE_PRECISION).ceil().max(1.0) as usize;
        coords.extend((0..n).map(|i| {
            let t = i as f64 / n as f64;
            Coord { x: from.x + (to.x - from.x) * t, y: from.y + (to.y - from.y) * t }
        }));
    };
    let corners = [
        Coord { x: lon_min, y: lat_min },
        Coord { x: lon_max, y: lat_min },
        Coord { x: lon_max, y: lat_max },
        Coord { x: lon_min, y: lat_max },
    ];
    for i in 0..corners.len() {
        edge(corners[i], corners[(i + 1) % corners.len()]);
    }
    coords.push(corners[0]);
    LineString::new(coords)
}

/// Widen `[min, max]` outward to multiples of `step`.
#[inline]
fn snap(min: f64, max: f64, step: f64) -> (f64, f64) {
    let lo = (min / step).floor() * step;
    let hi = (max / step).ceil() * step;
    (lo, if hi > lo { hi } else { lo + step })
}

fn stops(min: f64, max: f64, step: f64) -> impl Iterator<Item = f64> {
    let n = ((max - min) / step).round() as usize;
    (0..=n).map(move |i| min + i as f64 * step)
}

/// Build a compact SVG path string for a MultiPolygon (exteriors + holes).
pub(crate) fn multipolygon_to_path(shape: &MultiPolygon<f64>) -> String {
    let mut out = String::new();
    for polygon in &shape.0 {
        ring_to_path(polygon.exterior(), true, &mut out);
        for interior in polygon.interiors() {
            ring_to_path(interior, true, &mut out);
        }
    }
    out
}

/// Build an SVG path string for an open line.
pub(crate) fn line_to_path(line: &LineString<f64>) -> String {
    let mut out = String::new();
    ring_to_path(line, false, &mut out);
    out
}

/// Append a line as an SVG subpath: "M x,y L x,y ..." with a trailing "Z" when closed.
fn ring_to_path(ring: &LineString<f64>, close: bool, out: &mut String) {
    let mut coords = ring.coords_iter();
    if let Some(Coord { x, y }) = coords.next() {
        out.push_str(&format!(" M{x:.3},{y:.3}"));
        for Coord { x, y } in coords {
            out.push_str(&format!(" L{x:.3},{y:.3}"));
        }
        if close { out.push('Z') }
    }
}
