//! GeoJSON geometry reading.

use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use log::warn;
use serde_json::{Map, Value};

use crate::{config::SourceConfig, data::GeometryRecord, types::DistrictKey};

/// Read a GeoJSON FeatureCollection of Polygon/MultiPolygon features.
pub(crate) fn read_geojson_value(value: &Value, sources: &SourceConfig) -> Result<Vec<GeometryRecord>> {
    let features = value["features"].as_array()
        .ok_or_else(|| anyhow!("[io::geojson] expected a FeatureCollection with a features array"))?;

    features.iter().enumerate()
        .map(|(index, feature)| {
            let properties = feature["properties"].as_object();
            let shape = match &feature["geometry"] {
                Value::Null => {
                    warn!("[io::geojson] feature {index} has no geometry");
                    MultiPolygon(vec![])
                }
                geometry => parse_geometry(geometry)
                    .with_context(|| format!("[io::geojson] feature {index}"))?,
            };
            Ok(feature_record(index, properties, shape, sources))
        })
        .collect()
}

/// Build a record from feature properties. Features without a key get a
/// positional placeholder key so every feature is kept.
pub(crate) fn feature_record(index: usize, properties: Option<&Map<String, Value>>, shape: MultiPolygon<f64>, sources: &SourceConfig) -> GeometryRecord {
    let property = |name: &str| properties.and_then(|p| p.get(name)).and_then(property_text);
    let key = property(&sources.key_column).unwrap_or_else(|| {
        warn!("[io::geojson] feature {index} has no {} property", sources.key_column);
        format!("#{index}")
    });
    let name = property(&sources.name_column).unwrap_or_else(|| key.clone());
    GeometryRecord::new(DistrictKey::new(&key), &name, shape)
}

/// Property value as text; numeric codes are accepted as well as strings.
fn property_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse a GeoJSON Polygon or MultiPolygon geometry object.
pub(crate) fn parse_geometry(geometry: &Value) -> Result<MultiPolygon<f64>> {
    let coords = geometry["coordinates"].as_array()
        .ok_or_else(|| anyhow!("geometry has no coordinates"))?;
    match geometry["type"].as_str() {
        Some("Polygon") => Ok(MultiPolygon(vec![parse_polygon(coords)?])),
        Some("MultiPolygon") => coords.iter()
            .map(|polygon| parse_polygon(polygon.as_array().ok_or_else(|| anyhow!("invalid MultiPolygon member"))?))
            .collect::<Result<Vec<_>>>()
            .map(MultiPolygon),
        other => bail!("unsupported geometry type {other:?}"),
    }
}

/// Parse polygon rings: the first is the exterior, the rest are holes.
fn parse_polygon(rings: &[Value]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter()
        .map(|ring| parse_ring(ring.as_array().ok_or_else(|| anyhow!("invalid polygon ring"))?));
    let exterior = rings.next().ok_or_else(|| anyhow!("polygon has no exterior ring"))??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

/// Parse a ring of [x, y] positions. Extra dimensions are ignored.
fn parse_ring(positions: &[Value]) -> Result<LineString<f64>> {
    positions.iter()
        .map(|position| {
            let x = position[0].as_f64().ok_or_else(|| anyhow!("invalid coordinate: x must be a number"))?;
            let y = position[1].as_f64().ok_or_else(|| anyhow!("invalid coordinate: y must be a number"))?;
            Ok(Coord { x, y })
        })
        .collect::<Result<Vec<_>>>()
        .map(LineString)
}
